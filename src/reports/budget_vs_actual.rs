//! Budget vs. actual comparison
//!
//! For every budget of a user that is active at some point in a month, sets
//! the budgeted amount against the month's expenses in that category.

use std::collections::HashMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::display::report::{format_percentage, percentage_of, separator, title, truncate, REPORT_WIDTH};
use crate::error::SpendwiseResult;
use crate::models::{Budget, BudgetId, DateRange, Money, Transaction, TransactionType, UserId};
use crate::storage::{BudgetFilter, BudgetStore, TransactionFilter, TransactionStore};

/// One budget set against actual spending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetComparisonRow {
    pub budget_id: BudgetId,
    pub category: String,
    #[serde(with = "crate::models::money::decimal")]
    pub budgeted: Money,
    #[serde(with = "crate::models::money::decimal")]
    pub actual: Money,
    /// `budgeted - actual`; negative when overspent
    #[serde(with = "crate::models::money::decimal")]
    pub difference: Money,
    pub over_budget: bool,
}

impl BudgetComparisonRow {
    pub fn new(budget: &Budget, actual: Money) -> Self {
        let difference = budget.amount - actual;
        Self {
            budget_id: budget.id,
            category: budget.category.clone(),
            budgeted: budget.amount,
            actual,
            difference,
            over_budget: difference.is_negative(),
        }
    }

    /// Portion of the budget spent, as a percentage
    pub fn percent_used(&self) -> f64 {
        percentage_of(self.actual, self.budgeted)
    }
}

/// Budget vs. actual for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVsActualReport {
    pub year: i32,
    pub month: u32,
    pub range: DateRange,
    /// One row per budget in store retrieval order
    pub rows: Vec<BudgetComparisonRow>,
}

impl BudgetVsActualReport {
    /// Build rows from budgets and the month's transactions
    ///
    /// Only expenses dated inside `range` count toward `actual`; income never
    /// does. `budgets` keep their given order.
    pub fn from_parts(
        year: i32,
        month: u32,
        range: DateRange,
        budgets: &[Budget],
        transactions: &[Transaction],
    ) -> Self {
        let mut spent: HashMap<&str, Money> = HashMap::new();
        for txn in transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Expense && range.contains(t.date))
        {
            *spent.entry(txn.category.as_str()).or_default() += txn.amount;
        }

        let rows = budgets
            .iter()
            .map(|b| {
                let actual = spent.get(b.category.as_str()).copied().unwrap_or_default();
                BudgetComparisonRow::new(b, actual)
            })
            .collect();

        Self {
            year,
            month,
            range,
            rows,
        }
    }

    /// Compare the user's budgets active in the month against its expenses
    pub fn generate<S: TransactionStore + BudgetStore + ?Sized>(
        store: &S,
        user_id: &UserId,
        year: i32,
        month: u32,
    ) -> SpendwiseResult<Self> {
        let range = DateRange::month(year, month)?;

        let budgets = store.find_budgets(user_id, &BudgetFilter::new().overlapping(range))?;
        let expenses = store.find_transactions(
            user_id,
            &TransactionFilter::new().date_range(range).expenses(),
        )?;

        debug!(
            user = %user_id,
            year,
            month,
            budgets = budgets.len(),
            expenses = expenses.len(),
            "comparing budgets to actual"
        );

        Ok(Self::from_parts(year, month, range, &budgets, &expenses))
    }

    pub fn total_budgeted(&self) -> Money {
        self.rows.iter().map(|r| r.budgeted).sum()
    }

    pub fn total_actual(&self) -> Money {
        self.rows.iter().map(|r| r.actual).sum()
    }

    pub fn total_difference(&self) -> Money {
        self.total_budgeted() - self.total_actual()
    }

    pub fn over_budget_count(&self) -> usize {
        self.rows.iter().filter(|r| r.over_budget).count()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = title(&format!("Budget vs. actual {:04}-{:02}", self.year, self.month));

        if self.rows.is_empty() {
            output.push_str("No budgets active in this month.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<22} {:>13} {:>13} {:>13} {:>6}\n",
            "Category", "Budgeted", "Actual", "Remaining", "Used"
        ));
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');

        for row in &self.rows {
            let remaining = if row.over_budget {
                format!("{} *", row.difference)
            } else {
                row.difference.to_string()
            };
            output.push_str(&format!(
                "{:<22} {:>13} {:>13} {:>13} {:>6}\n",
                truncate(&row.category, 22),
                row.budgeted,
                row.actual,
                remaining,
                format_percentage(row.percent_used())
            ));
        }

        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<22} {:>13} {:>13} {:>13}\n",
            "Total",
            self.total_budgeted(),
            self.total_actual(),
            self.total_difference()
        ));

        if self.over_budget_count() > 0 {
            output.push_str("\n* = Over budget\n");
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "month",
            "budget_id",
            "category",
            "budgeted",
            "actual",
            "difference",
            "over_budget",
        ])?;

        let month = format!("{:04}-{:02}", self.year, self.month);
        for row in &self.rows {
            csv.write_record([
                month.clone(),
                row.budget_id.to_string(),
                row.category.clone(),
                row.budgeted.to_decimal_string(),
                row.actual.to_decimal_string(),
                row.difference.to_decimal_string(),
                row.over_budget.to_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
