mod audit_code;
mod audit_session;

pub use audit_code::*;
pub use audit_session::*;
