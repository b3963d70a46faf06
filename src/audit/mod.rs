//! Audit logging
//!
//! Every create, update and delete made through the services is appended to
//! `audit.log` as one JSON line, with the before/after values and a short
//! diff summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use fortnight_cli::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Bill, bill.id.as_str(), Some(bill.name.clone()), &bill))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{generate_detailed_diff, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
