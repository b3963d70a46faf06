//! Recurrence projection
//!
//! Works out when a bill next falls due and whether it falls inside a
//! pay-cycle window.
//!
//! Occurrence `k` of a bill is `start + k * period`. Month and year periods
//! are computed from the start date rather than from the previous
//! occurrence, and a day that does not exist in the target month is clamped
//! to that month's last day. A bill starting on Jan 31 therefore falls on
//! Feb 29 (or 28), Mar 31, Apr 30 and so on, never drifting to the 28th.

use chrono::{Datelike, Days, Months, NaiveDate};
use log::warn;

use crate::models::{Bill, Frequency, PayCycleWindow, Step};

/// A bill together with the occurrence that makes it due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DueBill<'a> {
    pub bill: &'a Bill,
    pub due_date: NaiveDate,
}

/// A bill with its next occurrence, if it has one left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpcomingBill<'a> {
    pub bill: &'a Bill,
    pub next_due: Option<NaiveDate>,
}

/// The `k`-th occurrence of a series starting at `start`
pub fn occurrence(start: NaiveDate, step: Step, k: u64) -> Option<NaiveDate> {
    match step {
        Step::Days(days) => start.checked_add_days(Days::new(days.checked_mul(k)?)),
        Step::Months(months) => {
            let total = u32::try_from(k).ok()?.checked_mul(months)?;
            start.checked_add_months(Months::new(total))
        }
    }
}

/// Index of the first occurrence on or after `reference`
fn first_index_on_or_after(start: NaiveDate, step: Step, reference: NaiveDate) -> Option<u64> {
    if start >= reference {
        return Some(0);
    }

    match step {
        Step::Days(0) | Step::Months(0) => None,
        Step::Days(days) => {
            let gap = u64::try_from((reference - start).num_days()).ok()?;
            Some(gap.div_ceil(days))
        }
        Step::Months(months) => {
            let month_gap = i64::from(reference.year() - start.year()) * 12
                + i64::from(reference.month0())
                - i64::from(start.month0());
            // One period short of the gap is always still before the reference
            let mut k = u64::try_from(month_gap / i64::from(months) - 1).unwrap_or(0);
            loop {
                if occurrence(start, step, k)? >= reference {
                    return Some(k);
                }
                k += 1;
            }
        }
    }
}

/// Next occurrence on or after `reference` for a series with a known start
///
/// One-off series only occur on their start date.
pub fn next_occurrence_from(
    start: NaiveDate,
    frequency: Frequency,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    match frequency.step() {
        None => (start >= reference).then_some(start),
        Some(step) => {
            let k = first_index_on_or_after(start, step, reference)?;
            occurrence(start, step, k)
        }
    }
}

/// The bill's start date, or `None` (with a warning) when it cannot be parsed
fn start_of(bill: &Bill) -> Option<NaiveDate> {
    match bill.start() {
        Ok(start) => Some(start),
        Err(e) => {
            warn!("Bill '{}' ({}) is never due: {}", bill.name, bill.id.short(), e);
            None
        }
    }
}

/// The smallest occurrence of `bill` that is on or after `reference`
///
/// Returns `None` for one-off bills already in the past and for bills whose
/// start date cannot be parsed.
pub fn next_occurrence_on_or_after(bill: &Bill, reference: NaiveDate) -> Option<NaiveDate> {
    next_occurrence_from(start_of(bill)?, bill.frequency, reference)
}

/// The occurrence of `bill` inside `window`, if there is one
///
/// Without a window nothing is due.
pub fn due_date_in_window(bill: &Bill, window: Option<&PayCycleWindow>) -> Option<NaiveDate> {
    let window = window?;
    next_occurrence_on_or_after(bill, window.start_date()).filter(|d| window.contains(*d))
}

/// Whether `bill` has an occurrence inside `window`
pub fn is_due_in_window(bill: &Bill, window: Option<&PayCycleWindow>) -> bool {
    due_date_in_window(bill, window).is_some()
}

/// Bills due in `window`, ordered by due date
///
/// Bills due on the same day keep their input order.
pub fn due_bills<'a>(bills: &'a [Bill], window: Option<&PayCycleWindow>) -> Vec<DueBill<'a>> {
    let mut due: Vec<DueBill<'a>> = bills
        .iter()
        .filter_map(|bill| {
            due_date_in_window(bill, window).map(|due_date| DueBill { bill, due_date })
        })
        .collect();
    due.sort_by_key(|d| d.due_date);
    due
}

/// Every bill with its next occurrence on or after `today`
///
/// Ordered by that date; bills with nothing left to pay come last.
pub fn upcoming(bills: &[Bill], today: NaiveDate) -> Vec<UpcomingBill<'_>> {
    let mut upcoming: Vec<UpcomingBill<'_>> = bills
        .iter()
        .map(|bill| UpcomingBill {
            bill,
            next_due: next_occurrence_on_or_after(bill, today),
        })
        .collect();
    upcoming.sort_by_key(|u| (u.next_due.is_none(), u.next_due));
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomUnit, Money};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(name: &str, frequency: Frequency, start: NaiveDate) -> Bill {
        Bill::new(name, Money::from_cents(5000), frequency, start)
    }

    #[test]
    fn test_fortnightly_due_in_window() {
        let rent = bill("Rent", Frequency::Fortnightly, date(2024, 1, 1));
        let window = PayCycleWindow::new(date(2024, 1, 15));

        assert_eq!(
            next_occurrence_on_or_after(&rent, date(2024, 1, 15)),
            Some(date(2024, 1, 15))
        );
        assert!(is_due_in_window(&rent, Some(&window)));
    }

    #[test]
    fn test_custom_three_months() {
        let insurance = bill(
            "Insurance",
            Frequency::custom(CustomUnit::Month, 3),
            date(2024, 1, 1),
        );
        assert_eq!(
            next_occurrence_on_or_after(&insurance, date(2024, 5, 1)),
            Some(date(2024, 7, 1))
        );
    }

    #[test]
    fn test_once_off() {
        let fine = bill("Parking fine", Frequency::OnceOff, date(2024, 2, 10));

        assert_eq!(
            next_occurrence_on_or_after(&fine, date(2024, 2, 1)),
            Some(date(2024, 2, 10))
        );
        assert_eq!(
            next_occurrence_on_or_after(&fine, date(2024, 2, 10)),
            Some(date(2024, 2, 10))
        );
        assert_eq!(next_occurrence_on_or_after(&fine, date(2024, 2, 11)), None);

        assert!(is_due_in_window(&fine, Some(&PayCycleWindow::new(date(2024, 2, 1)))));
        assert!(!is_due_in_window(&fine, Some(&PayCycleWindow::new(date(2024, 2, 11)))));
        // Window ending the day before
        assert!(!is_due_in_window(&fine, Some(&PayCycleWindow::new(date(2024, 1, 27)))));
        // Window ending exactly on it
        assert!(is_due_in_window(&fine, Some(&PayCycleWindow::new(date(2024, 1, 28)))));
    }

    #[test]
    fn test_start_in_future_is_first_occurrence() {
        let gym = bill("Gym", Frequency::Weekly, date(2024, 6, 1));
        assert_eq!(
            next_occurrence_on_or_after(&gym, date(2024, 1, 1)),
            Some(date(2024, 6, 1))
        );
    }

    #[test]
    fn test_monthly_clamps_to_month_end_without_drift() {
        let start = date(2024, 1, 31);
        assert_eq!(
            next_occurrence_from(start, Frequency::Monthly, date(2024, 2, 1)),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            next_occurrence_from(start, Frequency::Monthly, date(2024, 3, 1)),
            Some(date(2024, 3, 31))
        );
        assert_eq!(
            next_occurrence_from(start, Frequency::Monthly, date(2024, 4, 1)),
            Some(date(2024, 4, 30))
        );
        assert_eq!(
            next_occurrence_from(start, Frequency::Monthly, date(2025, 2, 1)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn test_annual_leap_day() {
        let start = date(2024, 2, 29);
        assert_eq!(
            next_occurrence_from(start, Frequency::Annually, date(2024, 3, 1)),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            next_occurrence_from(start, Frequency::Annually, date(2027, 3, 1)),
            Some(date(2028, 2, 29))
        );
    }

    #[test]
    fn test_custom_days_and_weeks() {
        let start = date(2024, 1, 1);
        assert_eq!(
            next_occurrence_from(start, Frequency::custom(CustomUnit::Day, 10), date(2024, 1, 12)),
            Some(date(2024, 1, 21))
        );
        assert_eq!(
            next_occurrence_from(start, Frequency::custom(CustomUnit::Week, 3), date(2024, 1, 23)),
            Some(date(2024, 2, 12))
        );
        assert_eq!(
            next_occurrence_from(start, Frequency::custom(CustomUnit::Year, 2), date(2024, 1, 2)),
            Some(date(2026, 1, 1))
        );
    }

    #[test]
    fn test_occurrence_is_minimal_and_reachable() {
        let frequencies = [
            Frequency::Weekly,
            Frequency::Fortnightly,
            Frequency::Monthly,
            Frequency::Annually,
            Frequency::custom(CustomUnit::Day, 5),
            Frequency::custom(CustomUnit::Week, 2),
            Frequency::custom(CustomUnit::Month, 3),
            Frequency::custom(CustomUnit::Year, 1),
        ];
        let starts = [date(2023, 1, 31), date(2023, 11, 15), date(2024, 2, 29)];

        for frequency in frequencies {
            let step = frequency.step().unwrap();
            for start in starts {
                // Brute force list of the first occurrences
                let series: Vec<NaiveDate> =
                    (0..40).map(|k| occurrence(start, step, k).unwrap()).collect();

                let mut reference = date(2022, 12, 1);
                while reference <= date(2025, 1, 1) {
                    let next = next_occurrence_from(start, frequency, reference).unwrap();
                    let expected = *series.iter().find(|d| **d >= reference).unwrap();
                    assert_eq!(next, expected, "{frequency} from {start} at {reference}");
                    reference = reference + Days::new(3);
                }
            }
        }
    }

    #[test]
    fn test_due_iff_next_occurrence_in_window() {
        let bills = [
            bill("Weekly", Frequency::Weekly, date(2024, 1, 3)),
            bill("Monthly", Frequency::Monthly, date(2024, 1, 20)),
            bill("Quarterly", Frequency::custom(CustomUnit::Month, 3), date(2023, 12, 5)),
            bill("Once", Frequency::OnceOff, date(2024, 3, 2)),
        ];
        let mut window = PayCycleWindow::new(date(2024, 1, 1));
        for _ in 0..12 {
            for b in &bills {
                let expected = next_occurrence_on_or_after(b, window.start_date())
                    .map(|d| d <= window.end_date())
                    .unwrap_or(false);
                assert_eq!(is_due_in_window(b, Some(&window)), expected);
            }
            window = window.next().unwrap();
        }
    }

    #[test]
    fn test_window_at_end_of_calendar_does_not_panic() {
        let weekly = bill("Gym", Frequency::Weekly, date(2024, 1, 1));
        let monthly = bill("Rent", Frequency::Monthly, date(2024, 1, 31));
        let window = PayCycleWindow::new(NaiveDate::MAX - chrono::Duration::days(3));

        for b in [&weekly, &monthly] {
            let due = due_date_in_window(b, Some(&window));
            assert_eq!(is_due_in_window(b, Some(&window)), due.is_some());
            if let Some(d) = due {
                assert!(d >= window.start_date());
            }
        }
    }

    #[test]
    fn test_no_window_means_nothing_due() {
        let rent = bill("Rent", Frequency::Weekly, date(2024, 1, 1));
        assert!(!is_due_in_window(&rent, None));
        assert!(due_bills(std::slice::from_ref(&rent), None).is_empty());
    }

    #[test]
    fn test_unparseable_start_is_never_due() {
        let mut broken = bill("Broken", Frequency::Weekly, date(2024, 1, 1));
        broken.start_date = "31/01/2024".to_string();
        let ok = bill("Fine", Frequency::Weekly, date(2024, 1, 1));
        let window = PayCycleWindow::new(date(2024, 1, 1));

        assert_eq!(next_occurrence_on_or_after(&broken, date(2024, 1, 1)), None);
        assert!(!is_due_in_window(&broken, Some(&window)));

        let bills = vec![broken, ok];
        let due = due_bills(&bills, Some(&window));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].bill.name, "Fine");
    }

    #[test]
    fn test_due_bills_ordered_with_stable_ties() {
        let bills = vec![
            bill("Phone", Frequency::Monthly, date(2024, 1, 20)),
            bill("Rent", Frequency::Fortnightly, date(2024, 1, 1)),
            bill("Water", Frequency::OnceOff, date(2024, 1, 15)),
            bill("Gym", Frequency::Weekly, date(2024, 1, 1)),
            bill("Later", Frequency::OnceOff, date(2024, 3, 1)),
        ];
        let window = PayCycleWindow::new(date(2024, 1, 15));
        let due = due_bills(&bills, Some(&window));
        let names: Vec<&str> = due.iter().map(|d| d.bill.name.as_str()).collect();

        assert_eq!(names, vec!["Rent", "Water", "Gym", "Phone"]);
        assert_eq!(due[3].due_date, date(2024, 1, 20));
    }

    #[test]
    fn test_upcoming_orders_expired_last() {
        let bills = vec![
            bill("Expired", Frequency::OnceOff, date(2023, 1, 1)),
            bill("Monthly", Frequency::Monthly, date(2024, 1, 9)),
            bill("Weekly", Frequency::Weekly, date(2024, 1, 1)),
        ];
        let upcoming = upcoming(&bills, date(2024, 1, 5));

        assert_eq!(upcoming[0].bill.name, "Weekly");
        assert_eq!(upcoming[0].next_due, Some(date(2024, 1, 8)));
        assert_eq!(upcoming[1].bill.name, "Monthly");
        assert_eq!(upcoming[2].bill.name, "Expired");
        assert_eq!(upcoming[2].next_due, None);
    }
}
