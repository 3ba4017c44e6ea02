//! Reports for Spendwise
//!
//! Read-only reductions over a user's transactions and budgets: window
//! aggregates, budget vs. actual, monthly summaries and category spending.
//! Each report renders for the terminal, serializes with serde and exports
//! to CSV.

pub mod aggregate;
pub mod budget_vs_actual;
pub mod monthly_summary;
pub mod service;

pub use aggregate::{AggregateFilter, CategorySpending, TransactionAggregate};
pub use budget_vs_actual::{BudgetComparisonRow, BudgetVsActualReport};
pub use monthly_summary::MonthlySummary;
pub use service::ReportService;
