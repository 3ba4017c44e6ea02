//! Budget model
//!
//! A spending cap for one category over one inclusive date interval.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::date_range::DateRange;
use super::ids::BudgetId;
use super::money::Money;
use super::period::BudgetPeriod;
use super::user::UserId;

/// A user's budget for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Owning user
    pub user_id: UserId,

    /// Free-form category name the cap applies to
    pub category: String,

    /// The cap, always positive
    pub amount: Money,

    /// Informational only; aggregation uses the dates
    #[serde(default)]
    pub period: BudgetPeriod,

    /// First day covered (inclusive)
    pub start_date: NaiveDate,

    /// Last day covered (inclusive)
    pub end_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget covering `range`
    pub fn new(
        user_id: UserId,
        category: impl Into<String>,
        amount: Money,
        period: BudgetPeriod,
        range: DateRange,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id,
            category: category.into(),
            amount,
            period,
            start_date: range.start(),
            end_date: range.end(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check if this budget belongs to the given user
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Check if this budget's interval shares a day with `range`
    pub fn overlaps(&self, range: &DateRange) -> bool {
        range.overlaps_dates(self.start_date, self.end_date)
    }

    /// Check if this budget's interval lies entirely within `range`
    pub fn is_within(&self, range: &DateRange) -> bool {
        range.encloses_dates(self.start_date, self.end_date)
    }

    /// The budget's interval
    pub fn date_range(&self) -> Result<DateRange, BudgetValidationError> {
        DateRange::new(self.start_date, self.end_date).map_err(|_| {
            BudgetValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            }
        })
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount(self.amount));
        }

        if !self.amount.is_within_entry_limit() {
            return Err(BudgetValidationError::AmountTooLarge(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::EmptyCategory);
        }

        self.date_range()?;

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) {}..{}",
            self.category,
            self.amount,
            self.period,
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    EmptyCategory,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl BudgetValidationError {
    /// Whether this error is about the date interval rather than the values
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::EndBeforeStart { .. })
    }
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be greater than 0 (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Budget amount must not exceed {} (got {})", Money::MAX_ENTRY, amount)
            }
            Self::EmptyCategory => write!(f, "Category is required"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn food_january() -> Budget {
        Budget::new(
            UserId::new("alice").unwrap(),
            "Food",
            Money::from_cents(100000),
            BudgetPeriod::Monthly,
            DateRange::month(2024, 1).unwrap(),
        )
    }

    #[test]
    fn test_new_budget() {
        let budget = food_january();
        assert_eq!(budget.start_date, date(2024, 1, 1));
        assert_eq!(budget.end_date, date(2024, 1, 31));
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn test_overlaps_inclusive() {
        let budget = food_january();
        let touching = DateRange::new(date(2024, 1, 31), date(2024, 2, 15)).unwrap();
        let february = DateRange::month(2024, 2).unwrap();

        assert!(budget.overlaps(&touching));
        assert!(!budget.overlaps(&february));
    }

    #[test]
    fn test_is_within() {
        let budget = food_january();
        assert!(budget.is_within(&DateRange::new(date(2023, 12, 1), date(2024, 2, 1)).unwrap()));
        assert!(!budget.is_within(&DateRange::new(date(2024, 1, 2), date(2024, 2, 1)).unwrap()));
    }

    #[test]
    fn test_validation() {
        let mut budget = food_january();
        budget.amount = Money::from_cents(-1);
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::NonPositiveAmount(_))
        ));

        let mut budget = food_january();
        budget.amount = Money::from_cents(Money::MAX_ENTRY.cents() + 1);
        let err = budget.validate().unwrap_err();
        assert!(matches!(err, BudgetValidationError::AmountTooLarge(_)));
        assert!(!err.is_range_error());

        let mut budget = food_january();
        budget.category = String::new();
        assert_eq!(budget.validate(), Err(BudgetValidationError::EmptyCategory));

        let mut budget = food_january();
        budget.end_date = date(2023, 12, 31);
        let err = budget.validate().unwrap_err();
        assert!(err.is_range_error());
    }

    #[test]
    fn test_serialization() {
        let budget = food_january().with_description("Groceries and takeout");
        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(json["period"], "monthly");
        assert_eq!(json["start_date"], "2024-01-01");

        let back: Budget = serde_json::from_value(json).unwrap();
        assert_eq!(back, budget);
    }
}
