//! Service layer for Fortnight
//!
//! The service layer provides business logic on top of the storage layer:
//! validation before records reach the store, saving, and audit logging.

pub mod bill;
pub mod budget;
pub mod dashboard;
pub mod debt;
pub mod goal;
pub mod history;

pub use bill::{BillChanges, BillService};
pub use budget::{BudgetService, Calculation, CalculationRequest, CountedBill};
pub use dashboard::DashboardService;
pub use debt::{DebtChanges, DebtService};
pub use goal::{GoalChanges, GoalService};
pub use history::HistoryService;
