//! # Domain Layer
//!
//! Audit requests, results and the submission state machine.
//! This layer is independent of providers, transports and the terminal.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
