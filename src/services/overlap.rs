//! Interval overlap checking for budgets
//!
//! A user may not hold two budgets for the same category whose closed date
//! intervals share a day. `[a, b]` and `[c, d]` overlap iff `a <= d && c <= b`,
//! so a budget ending on the day another one starts is a conflict.

use tracing::{debug, warn};

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Budget, BudgetId, DateRange, UserId};
use crate::storage::{BudgetFilter, BudgetStore};

/// Detects budgets that would collide with a proposed interval
pub struct OverlapChecker<'a, S: BudgetStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BudgetStore + ?Sized> OverlapChecker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// First existing budget of `user_id` for `category` overlapping `range`
    ///
    /// `exclude` skips one budget, which lets an update be checked without
    /// colliding with the budget's own current interval.
    pub fn find_conflict(
        &self,
        user_id: &UserId,
        category: &str,
        range: DateRange,
        exclude: Option<BudgetId>,
    ) -> SpendwiseResult<Option<Budget>> {
        let mut filter = BudgetFilter::new().category(category).overlapping(range);
        if let Some(id) = exclude {
            filter = filter.exclude(id);
        }

        let conflict = self.store.find_budgets(user_id, &filter)?.into_iter().next();
        debug!(
            user = %user_id,
            category,
            range = %range,
            conflict = conflict.is_some(),
            "checked budget overlap"
        );
        Ok(conflict)
    }

    pub fn has_overlap(
        &self,
        user_id: &UserId,
        category: &str,
        range: DateRange,
        exclude: Option<BudgetId>,
    ) -> SpendwiseResult<bool> {
        Ok(self
            .find_conflict(user_id, category, range, exclude)?
            .is_some())
    }

    /// Fail with `OverlapConflict` if any budget collides with `range`
    pub fn ensure_available(
        &self,
        user_id: &UserId,
        category: &str,
        range: DateRange,
        exclude: Option<BudgetId>,
    ) -> SpendwiseResult<()> {
        match self.find_conflict(user_id, category, range, exclude)? {
            Some(existing) => {
                warn!(
                    user = %user_id,
                    category,
                    requested = %range,
                    existing = %existing.id,
                    "rejected overlapping budget"
                );
                Err(SpendwiseError::OverlapConflict {
                    category: category.to_string(),
                    start: range.start(),
                    end: range.end(),
                    conflicting_id: existing.id.to_string(),
                })
            }
            None => Ok(()),
        }
    }
}
