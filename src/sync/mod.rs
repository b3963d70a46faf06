//! Hosted datastore sync
//!
//! The local JSON store stays authoritative for reads. Changes are mirrored
//! to a [`RowStore`] and `refresh` pulls the remote tables back down,
//! normalizing whatever row shapes older clients left behind.

pub mod records;
pub mod row_store;
pub mod service;

pub use records::Row;
pub use row_store::{FileRowStore, MemoryRowStore, RowStore, Table};
pub use service::{PushReport, RefreshReport, SyncService, Syncable};
