//! Audit logging of pipeline operations.

pub mod logger;

pub use logger::{AuditEvent, AuditLogger};
