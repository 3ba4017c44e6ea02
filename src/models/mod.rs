//! Core data models for Spendwise
//!
//! This module contains the data structures of the finance domain:
//! transactions, budgets, money amounts, date ranges and identities.

pub mod budget;
pub mod date_range;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetValidationError};
pub use date_range::{parse_calendar_date, DateRange, DateRangeError};
pub use ids::{BudgetId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use period::{BudgetPeriod, PeriodParseError};
pub use transaction::{Transaction, TransactionType, TransactionValidationError};
pub use user::UserId;
