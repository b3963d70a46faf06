//! Bill model
//!
//! A bill is a recurring (or one-off) obligation with a start date and a
//! recurrence rule, modelled after the way budget targets carry a cadence.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BillId;
use super::money::Money;
use crate::error::{BudgetError, BudgetResult};

/// Unit of a custom recurrence interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomUnit {
    Day,
    Week,
    Month,
    Year,
}

impl CustomUnit {
    /// Parse a unit from user or remote input ("week", "Weeks", "w")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().trim_end_matches('s') {
            "day" | "d" => Some(Self::Day),
            "week" | "w" => Some(Self::Week),
            "month" | "m" => Some(Self::Month),
            "year" | "y" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }
}

impl fmt::Display for CustomUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far one recurrence period moves a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(u64),
    Months(u32),
}

/// The recurrence rule of a bill
///
/// The custom unit and count only exist on the `Custom` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Frequency {
    OnceOff,
    Weekly,
    Fortnightly,
    Monthly,
    Annually,
    Custom { unit: CustomUnit, value: u32 },
}

impl Frequency {
    pub fn custom(unit: CustomUnit, value: u32) -> Self {
        Self::Custom { unit, value }
    }

    /// Parse a named frequency ("weekly", "Once Off", "yearly", ...)
    ///
    /// Custom frequencies need a unit and count and are built with
    /// [`Frequency::custom`] instead.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "onceoff" | "once" | "oneoff" | "oneoffs" => Some(Self::OnceOff),
            "weekly" | "week" => Some(Self::Weekly),
            "fortnightly" | "fortnight" | "biweekly" => Some(Self::Fortnightly),
            "monthly" | "month" => Some(Self::Monthly),
            "annually" | "annual" | "yearly" | "year" => Some(Self::Annually),
            _ => None,
        }
    }

    /// The period between occurrences, or `None` for one-off bills
    pub fn step(&self) -> Option<Step> {
        match *self {
            Self::OnceOff => None,
            Self::Weekly => Some(Step::Days(7)),
            Self::Fortnightly => Some(Step::Days(14)),
            Self::Monthly => Some(Step::Months(1)),
            Self::Annually => Some(Step::Months(12)),
            Self::Custom { unit, value } => match unit {
                CustomUnit::Day => Some(Step::Days(u64::from(value))),
                CustomUnit::Week => Some(Step::Days(7 * u64::from(value))),
                CustomUnit::Month => Some(Step::Months(value)),
                CustomUnit::Year => value.checked_mul(12).map(Step::Months),
            },
        }
    }

    pub fn is_once_off(&self) -> bool {
        matches!(self, Self::OnceOff)
    }

    /// Human-readable label, e.g. "Fortnightly" or "Every 3 Months"
    pub fn label(&self) -> String {
        match self {
            Self::OnceOff => "Once Off".to_string(),
            Self::Weekly => "Weekly".to_string(),
            Self::Fortnightly => "Fortnightly".to_string(),
            Self::Monthly => "Monthly".to_string(),
            Self::Annually => "Annually".to_string(),
            Self::Custom { unit, value } => {
                let plural = if *value > 1 { "s" } else { "" };
                format!("Every {} {}{}", value, unit, plural)
            }
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::Fortnightly
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a bill start date, discarding any time of day
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_bill_date(raw: &str) -> BudgetResult<NaiveDate> {
    let s = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }

    Err(BudgetError::UnparseableDate(raw.to_string()))
}

/// A bill the user has to pay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub name: String,
    pub amount: Money,
    pub frequency: Frequency,
    /// Start date as entered or synced; parsed on use
    pub start_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(
        name: impl Into<String>,
        amount: Money,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            name: name.into(),
            amount,
            frequency,
            start_date: start_date.format("%Y-%m-%d").to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The parsed start date, normalized to a calendar day
    pub fn start(&self) -> BudgetResult<NaiveDate> {
        parse_bill_date(&self.start_date)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        self.updated_at = Utc::now();
    }

    pub fn set_start_date(&mut self, start_date: NaiveDate) {
        self.start_date = start_date.format("%Y-%m-%d").to_string();
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), BillValidationError> {
        if self.name.trim().is_empty() {
            return Err(BillValidationError::EmptyName);
        }

        if !self.amount.is_positive() {
            return Err(BillValidationError::NonPositiveAmount);
        }

        if let Frequency::Custom { value, .. } = self.frequency {
            if value == 0 {
                return Err(BillValidationError::InvalidCustomInterval);
            }
        }

        if self.start().is_err() {
            return Err(BillValidationError::InvalidStartDate(self.start_date.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.amount, self.frequency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillValidationError {
    EmptyName,
    NonPositiveAmount,
    InvalidCustomInterval,
    InvalidStartDate(String),
}

impl fmt::Display for BillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Bill name cannot be empty"),
            Self::NonPositiveAmount => write!(f, "Bill amount must be greater than zero"),
            Self::InvalidCustomInterval => write!(f, "Custom interval must be at least 1"),
            Self::InvalidStartDate(s) => write!(f, "Invalid start date '{}'. Use YYYY-MM-DD", s),
        }
    }
}

impl std::error::Error for BillValidationError {}
