//! Budget period labels
//!
//! A budget's period (daily, weekly, monthly, yearly) describes how the user
//! thinks about the cap. Aggregation never enforces it: only the budget's
//! start and end dates take part in overlap checks and reports.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a budget is meant to recur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub const ALL: [BudgetPeriod; 4] = [
        BudgetPeriod::Daily,
        BudgetPeriod::Weekly,
        BudgetPeriod::Monthly,
        BudgetPeriod::Yearly,
    ];

    /// Suggested inclusive end date for a budget of this period starting on `start`
    ///
    /// Used only to fill in a missing end date; e.g. a monthly budget starting
    /// 2025-01-15 ends 2025-02-14 so the next month's budget can start the day
    /// after without touching it.
    pub fn default_end(&self, start: NaiveDate) -> NaiveDate {
        let next = match self {
            Self::Daily => start.checked_add_signed(Duration::days(1)),
            Self::Weekly => start.checked_add_signed(Duration::days(7)),
            Self::Monthly => start.checked_add_months(Months::new(1)),
            Self::Yearly => start.checked_add_months(Months::new(12)),
        };
        next.and_then(|d| d.pred_opt()).unwrap_or(start)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Self::Daily),
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" | "y" => Ok(Self::Yearly),
            _ => Err(PeriodParseError(s.to_string())),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(pub String);

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid budget period: '{}' (expected daily, weekly, monthly or yearly)",
            self.0
        )
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_end() {
        let start = date(2025, 1, 15);
        assert_eq!(BudgetPeriod::Daily.default_end(start), start);
        assert_eq!(BudgetPeriod::Weekly.default_end(start), date(2025, 1, 21));
        assert_eq!(BudgetPeriod::Monthly.default_end(start), date(2025, 2, 14));
        assert_eq!(BudgetPeriod::Yearly.default_end(start), date(2026, 1, 14));
    }

    #[test]
    fn test_monthly_from_first_day_ends_on_last_day() {
        assert_eq!(
            BudgetPeriod::Monthly.default_end(date(2024, 2, 1)),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("monthly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Monthly);
        assert_eq!("Week".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert!("fortnightly".parse::<BudgetPeriod>().is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&BudgetPeriod::Yearly).unwrap();
        assert_eq!(json, "\"yearly\"");
        let parsed: BudgetPeriod = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(parsed, BudgetPeriod::Daily);
    }
}
