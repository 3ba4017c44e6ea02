//! Query filters understood by the stores
//!
//! Both filters are plain data with builder methods. The user is never part
//! of a filter; every store call takes the owning `UserId` separately.

use crate::models::{Budget, BudgetId, DateRange, Transaction, TransactionType};

/// Selects a user's transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive window on the transaction date
    pub date_range: Option<DateRange>,
    pub transaction_type: Option<TransactionType>,
    /// Exact category match
    pub category: Option<String>,
    /// Maximum number of results, applied after ordering
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn expenses(self) -> Self {
        self.transaction_type(TransactionType::Expense)
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a transaction against every criterion except `limit`
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(txn.date) {
                return false;
            }
        }
        if let Some(transaction_type) = self.transaction_type {
            if txn.transaction_type != transaction_type {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &txn.category != category {
                return false;
            }
        }
        true
    }
}

/// Selects a user's budgets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Keep budgets whose interval shares at least one day with this range
    pub overlapping: Option<DateRange>,
    /// Keep budgets whose interval lies entirely inside this range
    pub within: Option<DateRange>,
    /// Drop this budget from the results
    pub exclude_id: Option<BudgetId>,
}

impl BudgetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn overlapping(mut self, range: DateRange) -> Self {
        self.overlapping = Some(range);
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.within = Some(range);
        self
    }

    pub fn exclude(mut self, id: BudgetId) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn matches(&self, budget: &Budget) -> bool {
        if self.exclude_id == Some(budget.id) {
            return false;
        }
        if let Some(category) = &self.category {
            if &budget.category != category {
                return false;
            }
        }
        if let Some(range) = &self.overlapping {
            if !budget.overlaps(range) {
                return false;
            }
        }
        if let Some(range) = &self.within {
            if !budget.is_within(range) {
                return false;
            }
        }
        true
    }
}
