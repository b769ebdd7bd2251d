pub mod audit_controller;
pub mod repl_controller;
pub mod sample_controller;

pub use audit_controller::AuditController;
pub use repl_controller::ReplController;
pub use sample_controller::SampleController;
