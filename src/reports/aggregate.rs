//! Transaction aggregation
//!
//! Reduces a user's transactions over an inclusive date window to income and
//! expense totals plus expense totals per category.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::display::report::{format_bar, format_percentage, percentage_of, separator, title, truncate, REPORT_WIDTH};
use crate::error::SpendwiseResult;
use crate::models::{DateRange, Money, Transaction, TransactionType, UserId};
use crate::storage::{TransactionFilter, TransactionStore};

/// Optional narrowing applied on top of the user and date window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateFilter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl AggregateFilter {
    pub fn expenses() -> Self {
        Self {
            transaction_type: Some(TransactionType::Expense),
            category: None,
        }
    }

    /// The store query for this filter over `range`
    pub fn to_query(&self, range: DateRange) -> TransactionFilter {
        TransactionFilter {
            date_range: Some(range),
            transaction_type: self.transaction_type,
            category: self.category.clone(),
            limit: None,
        }
    }
}

/// Totals over a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAggregate {
    pub range: DateRange,
    #[serde(default, skip_serializing_if = "is_unfiltered")]
    pub filter: AggregateFilter,
    #[serde(with = "crate::models::money::decimal")]
    pub total_income: Money,
    #[serde(with = "crate::models::money::decimal")]
    pub total_expense: Money,
    /// Expense sum per category; categories without expenses are absent
    #[serde(with = "crate::models::money::decimal_map")]
    pub by_category: BTreeMap<String, Money>,
    pub transaction_count: usize,
}

fn is_unfiltered(filter: &AggregateFilter) -> bool {
    filter == &AggregateFilter::default()
}

impl TransactionAggregate {
    /// Reduce `transactions` in a single pass
    ///
    /// Only transactions inside `range` that satisfy `filter` contribute, so
    /// the result is the same whether or not the caller pre-filtered.
    /// Expenses with a blank category count toward `total_expense` only.
    pub fn from_transactions<'t, I>(range: DateRange, filter: AggregateFilter, transactions: I) -> Self
    where
        I: IntoIterator<Item = &'t Transaction>,
    {
        let query = filter.to_query(range);
        let mut total_income = Money::zero();
        let mut total_expense = Money::zero();
        let mut by_category: BTreeMap<String, Money> = BTreeMap::new();
        let mut transaction_count = 0;

        for txn in transactions.into_iter().filter(|t| query.matches(t)) {
            transaction_count += 1;
            match txn.transaction_type {
                TransactionType::Income => total_income += txn.amount,
                TransactionType::Expense => {
                    total_expense += txn.amount;
                    if !txn.category.trim().is_empty() {
                        *by_category.entry(txn.category.clone()).or_default() += txn.amount;
                    }
                }
            }
        }

        Self {
            range,
            filter,
            total_income,
            total_expense,
            by_category,
            transaction_count,
        }
    }

    /// Fetch the user's matching transactions and reduce them
    pub fn generate<S: TransactionStore + ?Sized>(
        store: &S,
        user_id: &UserId,
        range: DateRange,
        filter: AggregateFilter,
    ) -> SpendwiseResult<Self> {
        let transactions = store.find_transactions(user_id, &filter.to_query(range))?;
        let aggregate = Self::from_transactions(range, filter, &transactions);
        debug!(
            user = %user_id,
            range = %range,
            transactions = aggregate.transaction_count,
            "aggregated transactions"
        );
        Ok(aggregate)
    }

    /// Income minus expenses
    pub fn balance(&self) -> Money {
        self.total_income - self.total_expense
    }

    /// Sum of the per-category expenses
    pub fn categorized_expense(&self) -> Money {
        self.by_category.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    pub fn format_terminal(&self) -> String {
        let mut output = title(&format!("Transactions {}", self.range));

        if let Some(t) = self.filter.transaction_type {
            output.push_str(&format!("Type:     {}\n", t));
        }
        if let Some(c) = &self.filter.category {
            output.push_str(&format!("Category: {}\n", c));
        }

        output.push_str(&format!("{:<20} {:>14}\n", "Income", self.total_income));
        output.push_str(&format!("{:<20} {:>14}\n", "Expenses", self.total_expense));
        output.push_str(&format!("{:<20} {:>14}\n", "Balance", self.balance()));
        output.push_str(&format!("{:<20} {:>14}\n", "Transactions", self.transaction_count));

        if !self.by_category.is_empty() {
            output.push('\n');
            output.push_str(&format_category_table(&self.by_category, self.total_expense));
        }

        output
    }

    /// Write one CSV row per category plus income/expense total rows
    pub fn export_csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["start", "end", "kind", "category", "amount"])?;

        let start = self.range.start().to_string();
        let end = self.range.end().to_string();

        for (category, amount) in &self.by_category {
            csv.write_record([
                start.as_str(),
                end.as_str(),
                "expense",
                category.as_str(),
                amount.to_decimal_string().as_str(),
            ])?;
        }
        csv.write_record([
            start.as_str(),
            end.as_str(),
            "total_income",
            "",
            self.total_income.to_decimal_string().as_str(),
        ])?;
        csv.write_record([
            start.as_str(),
            end.as_str(),
            "total_expense",
            "",
            self.total_expense.to_decimal_string().as_str(),
        ])?;

        csv.flush()?;
        Ok(())
    }
}

/// Expense totals per category over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub range: DateRange,
    #[serde(with = "crate::models::money::decimal_map")]
    pub categories: BTreeMap<String, Money>,
}

impl CategorySpending {
    pub fn total(&self) -> Money {
        self.categories.values().sum()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = title(&format!("Spending by category {}", self.range));

        if self.categories.is_empty() {
            output.push_str("No expenses in this period.\n");
            return output;
        }

        output.push_str(&format_category_table(&self.categories, self.total()));
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>14}\n", "Total", self.total()));
        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["start", "end", "category", "amount"])?;

        let start = self.range.start().to_string();
        let end = self.range.end().to_string();
        for (category, amount) in &self.categories {
            csv.write_record([
                start.as_str(),
                end.as_str(),
                category.as_str(),
                amount.to_decimal_string().as_str(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

impl From<TransactionAggregate> for CategorySpending {
    fn from(aggregate: TransactionAggregate) -> Self {
        Self {
            range: aggregate.range,
            categories: aggregate.by_category,
        }
    }
}

/// Category rows sorted by amount, largest first, with share and bar
pub(crate) fn format_category_table(categories: &BTreeMap<String, Money>, total: Money) -> String {
    let mut rows: Vec<_> = categories.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let max = rows.first().map(|(_, m)| m.cents() as f64).unwrap_or(0.0);

    let mut output = format!("{:<24} {:>14} {:>7}  {}\n", "Category", "Spent", "Share", "");
    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');

    for (category, amount) in rows {
        output.push_str(&format!(
            "{:<24} {:>14} {:>7}  {}\n",
            truncate(category, 24),
            amount,
            format_percentage(percentage_of(*amount, total)),
            format_bar(amount.cents() as f64, max, 20)
        ));
    }

    output
}
