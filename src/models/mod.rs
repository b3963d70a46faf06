//! Core data models for Fortnight
//!
//! This module contains the canonical record types of the budgeting domain:
//! bills, debts, goals, budget snapshots and the pay-cycle window.

pub mod bill;
pub mod debt;
pub mod goal;
pub mod ids;
pub mod money;
pub mod pay_cycle;
pub mod priority;
pub mod snapshot;

pub use bill::{parse_bill_date, Bill, BillValidationError, CustomUnit, Frequency, Step};
pub use debt::{Debt, DebtValidationError};
pub use goal::{Goal, GoalValidationError};
pub use ids::{BillId, DebtId, GoalId, SnapshotId};
pub use money::Money;
pub use pay_cycle::{PayCycleWindow, PAY_CYCLE_DAYS};
pub use priority::Priority;
pub use snapshot::{parse_timestamp, BudgetSnapshot};
