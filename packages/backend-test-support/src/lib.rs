//! Backend test support utilities
//!
//! Shared helpers for backend unit and integration tests, currently unified
//! logging initialization.

pub mod logging;
