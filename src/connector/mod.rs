//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Audit providers (Gemini structured output, Anthropic-compatible chat, mock)
//! - Terminal surface (container wiring, controllers, view rendering)

pub mod adapter;
pub mod api;

pub use adapter::*;
