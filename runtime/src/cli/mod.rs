//! CLI subcommand implementations for the Paperflow binary.

pub mod answer_cmd;
pub mod console_cmd;
pub mod crawl_cmd;
pub mod doctor;
pub mod kv_cmd;
pub mod labels_cmd;
pub mod output;
pub mod pending_cmd;
pub mod siteshot_cmd;

use crate::audit::AuditLogger;
use crate::pipeline::ItemOutcome;

/// Open the audit log, or carry on without one.
pub(crate) fn open_audit() -> Option<AuditLogger> {
    match AuditLogger::default_logger() {
        Ok(logger) => Some(logger),
        Err(e) => {
            tracing::warn!("audit log unavailable: {e:#}");
            None
        }
    }
}

/// Append per-item outcomes to the audit log.
pub(crate) fn audit_outcomes(audit: &mut Option<AuditLogger>, operation: &str, outcomes: &[ItemOutcome]) {
    let Some(logger) = audit.as_mut() else {
        return;
    };
    for outcome in outcomes {
        if let Err(e) = logger.log_operation(
            operation,
            Some(outcome.target.as_str()),
            outcome.duration_ms,
            outcome.status.as_str(),
        ) {
            tracing::warn!("failed to write audit event: {e:#}");
            return;
        }
    }
}

/// Append a single event to the audit log.
pub(crate) fn audit_event(
    audit: &mut Option<AuditLogger>,
    operation: &str,
    target: Option<&str>,
    duration_ms: u64,
    status: &str,
) {
    if let Some(logger) = audit.as_mut() {
        if let Err(e) = logger.log_operation(operation, target, duration_ms, status) {
            tracing::warn!("failed to write audit event: {e:#}");
        }
    }
}
