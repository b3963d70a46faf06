//! Recurrence and budget engine
//!
//! Pure computation over in-memory records. Nothing in here touches the
//! filesystem; callers hand in slices of bills, debts and goals.

pub mod allocation;
pub mod dashboard;
pub mod recurrence;

pub use allocation::{allocate, bills_due_amount, Allocation, AllocationInput, BillSelection};
pub use dashboard::{average_goal_completion, summarize, total_debt, DashboardSummary};
pub use recurrence::{
    due_bills, is_due_in_window, next_occurrence_from, next_occurrence_on_or_after, upcoming,
    DueBill, UpcomingBill,
};
