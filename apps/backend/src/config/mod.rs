//! Runtime configuration.

pub mod game;

pub use game::{DisconnectPolicy, GameConfig};
