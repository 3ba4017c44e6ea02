//! CLI command handlers
//!
//! Bridges clap argument parsing with the service and report layers. Every
//! handler receives the storage and the resolved user explicitly.

pub mod audit;
pub mod budget;
pub mod report;
pub mod transaction;

pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{parse_calendar_date, Money, TransactionType};

/// Parse a date argument (`YYYY-MM-DD`; timestamps are cut to their date)
pub fn parse_date_arg(s: &str) -> SpendwiseResult<NaiveDate> {
    Ok(parse_calendar_date(s)?)
}

pub fn parse_optional_date(s: Option<String>) -> SpendwiseResult<Option<NaiveDate>> {
    s.as_deref().map(parse_date_arg).transpose()
}

/// Parse an amount argument such as "12.50", "$1,200" or "80"
pub fn parse_amount_arg(s: &str) -> SpendwiseResult<Money> {
    Money::parse(s).map_err(|e| SpendwiseError::Validation(e.to_string()))
}

/// Parse "income" or "expense"
pub fn parse_kind_arg(s: &str) -> SpendwiseResult<TransactionType> {
    s.parse::<TransactionType>()
        .map_err(|e| SpendwiseError::Validation(e.to_string()))
}
