//! Monthly income/expense summary

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::display::report::{separator, title, REPORT_WIDTH};
use crate::error::SpendwiseResult;
use crate::models::{DateRange, Money, UserId};
use crate::storage::TransactionStore;

use super::aggregate::{format_category_table, AggregateFilter, TransactionAggregate};

/// Income, expenses and per-category spending for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    #[serde(with = "crate::models::money::decimal")]
    pub income: Money,
    #[serde(with = "crate::models::money::decimal")]
    pub expenses: Money,
    /// Always `income - expenses`
    #[serde(with = "crate::models::money::decimal")]
    pub balance: Money,
    /// Only categories with at least one expense
    #[serde(with = "crate::models::money::decimal_map")]
    pub categories: BTreeMap<String, Money>,
}

impl MonthlySummary {
    pub fn from_aggregate(year: i32, month: u32, aggregate: TransactionAggregate) -> Self {
        Self {
            year,
            month,
            income: aggregate.total_income,
            expenses: aggregate.total_expense,
            balance: aggregate.balance(),
            categories: aggregate.by_category,
        }
    }

    pub fn generate<S: TransactionStore + ?Sized>(
        store: &S,
        user_id: &UserId,
        year: i32,
        month: u32,
    ) -> SpendwiseResult<Self> {
        let range = DateRange::month(year, month)?;
        let aggregate =
            TransactionAggregate::generate(store, user_id, range, AggregateFilter::default())?;
        Ok(Self::from_aggregate(year, month, aggregate))
    }

    /// "2024-03"
    pub fn period_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn format_terminal(&self) -> String {
        let mut output = title(&format!("Monthly summary {}", self.period_label()));

        output.push_str(&format!("{:<20} {:>14}\n", "Income", self.income));
        output.push_str(&format!("{:<20} {:>14}\n", "Expenses", self.expenses));
        output.push_str(&separator(36));
        output.push('\n');
        output.push_str(&format!("{:<20} {:>14}\n", "Balance", self.balance));

        if !self.categories.is_empty() {
            output.push('\n');
            output.push_str(&format_category_table(&self.categories, self.expenses));
            output.push_str(&separator(REPORT_WIDTH));
            output.push('\n');
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["month", "line", "amount"])?;

        let month = self.period_label();
        csv.write_record([month.as_str(), "income", self.income.to_decimal_string().as_str()])?;
        csv.write_record([month.as_str(), "expenses", self.expenses.to_decimal_string().as_str()])?;
        csv.write_record([month.as_str(), "balance", self.balance.to_decimal_string().as_str()])?;
        for (category, amount) in &self.categories {
            let line = format!("category:{}", category);
            csv.write_record([month.as_str(), line.as_str(), amount.to_decimal_string().as_str()])?;
        }

        csv.flush()?;
        Ok(())
    }
}
