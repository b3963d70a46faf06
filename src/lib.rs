//! Fortnight - terminal bill tracker and fortnightly bucket budgeting
//!
//! Tracks recurring bills, debts and savings goals, works out which bills
//! fall due in a 14-day pay cycle, and splits what is left of the pay into
//! three buckets: Fire (debt and savings), Smile (longer-term treats) and
//! Mojo (everything else).
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (bills, debts, goals, snapshots)
//! - `engine`: Pure recurrence, pay-cycle and allocation calculations
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `sync`: Record adapter and remote row store synchronization
//! - `audit`: Audit logging system
//! - `export`: JSON, YAML and CSV export and import
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fortnight_cli::config::{paths::FortnightPaths, settings::Settings};
//! use fortnight_cli::storage::BudgetStore;
//!
//! let paths = FortnightPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = BudgetStore::open(paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod sync;

pub use error::{BudgetError, BudgetResult};
