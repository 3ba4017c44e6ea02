//! Report service
//!
//! Entry point for the read-only aggregation operations. Every call takes
//! the authenticated user explicitly and only ever sees that user's data.

use tracing::info;

use crate::error::SpendwiseResult;
use crate::models::{DateRange, UserId};
use crate::storage::{BudgetStore, TransactionStore};

use super::aggregate::{AggregateFilter, CategorySpending, TransactionAggregate};
use super::budget_vs_actual::BudgetVsActualReport;
use super::monthly_summary::MonthlySummary;

/// Runs reports against any store that can answer transaction and budget queries
pub struct ReportService<'a, S: TransactionStore + BudgetStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TransactionStore + BudgetStore + ?Sized> ReportService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Income/expense totals and per-category expenses over `range`
    pub fn aggregate(
        &self,
        user_id: &UserId,
        range: DateRange,
        filter: AggregateFilter,
    ) -> SpendwiseResult<TransactionAggregate> {
        TransactionAggregate::generate(self.store, user_id, range, filter)
    }

    /// Budgeted vs. actual spending for every budget active in the month
    ///
    /// `month` is 1-based; out-of-range values yield `InvalidRange`.
    pub fn compare(
        &self,
        user_id: &UserId,
        month: u32,
        year: i32,
    ) -> SpendwiseResult<BudgetVsActualReport> {
        let report = BudgetVsActualReport::generate(self.store, user_id, year, month)?;
        info!(user = %user_id, year, month, rows = report.rows.len(), "budget comparison");
        Ok(report)
    }

    /// Income, expenses, balance and per-category expenses for one month
    pub fn summarize(
        &self,
        user_id: &UserId,
        month: u32,
        year: i32,
    ) -> SpendwiseResult<MonthlySummary> {
        let summary = MonthlySummary::generate(self.store, user_id, year, month)?;
        info!(user = %user_id, year, month, "monthly summary");
        Ok(summary)
    }

    /// Expense totals per category over `range`
    pub fn category_spending(
        &self,
        user_id: &UserId,
        range: DateRange,
    ) -> SpendwiseResult<CategorySpending> {
        let aggregate = self.aggregate(user_id, range, AggregateFilter::expenses())?;
        Ok(CategorySpending::from(aggregate))
    }
}
