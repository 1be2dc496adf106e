//! Service layer: serialized command application over in-memory game state.
//!
//! Every mutating command for a game goes through that game's single
//! [`games::GameRoom`] mutex; broadcasts happen after the lock is released.

pub mod auto_act;
pub mod events;
pub mod game_flow;
pub mod games;
