//! Audit logging
//!
//! Every create, update and delete of a transaction or budget is appended to
//! `audit.log` as one JSON line, together with the owning user and
//! before/after snapshots.
//!
//! - `AuditEntry`: one logged operation.
//! - `AuditLogger`: appends entries and reads them back.
//!
//! Services do not use the logger directly; they go through
//! `Storage::log_create`, `Storage::log_update` and `Storage::log_delete`,
//! which respect the `audit_enabled` setting.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
