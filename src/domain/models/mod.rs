mod audit_request;
mod audit_result;
mod audit_state;
mod sample;
mod severity;

pub use audit_request::*;
pub use audit_result::*;
pub use audit_state::*;
pub use sample::*;
pub use severity::*;
