//! # Application Layer
//!
//! Provider interface, the audit use case and the per-view submission session.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
