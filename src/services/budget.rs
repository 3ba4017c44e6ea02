//! Budget service
//!
//! CRUD for a user's budgets with the per-category overlap rule enforced on
//! create and update.
//!
//! # Concurrency
//!
//! The overlap check and the write that follows it are two separate steps.
//! Two processes creating overlapping budgets for the same category at the
//! same moment can both pass the check and both be persisted. Within one
//! process the repository locks keep each step consistent, but nothing
//! serializes check-then-write as a unit.

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Budget, BudgetId, BudgetPeriod, DateRange, Money, UserId};
use crate::storage::{BudgetFilter, Storage};

use super::overlap::OverlapChecker;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub category: String,
    pub amount: Money,
    /// Defaults to monthly
    pub period: Option<BudgetPeriod>,
    /// Defaults to today
    pub start_date: Option<NaiveDate>,
    /// Defaults to the last day of one period starting at `start_date`
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Fields to change on an existing budget; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `Some("")` clears the description
    pub description: Option<String>,
}

impl UpdateBudgetInput {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.period.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.description.is_none()
    }
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn entity_name(budget: &Budget) -> Option<String> {
    Some(format!(
        "{} {}..{}",
        budget.category, budget.start_date, budget.end_date
    ))
}

/// Validate values, then the interval; returns the interval
fn validate(budget: &Budget) -> SpendwiseResult<DateRange> {
    budget.validate().map_err(|e| {
        if e.is_range_error() {
            SpendwiseError::InvalidRange(e.to_string())
        } else {
            SpendwiseError::Validation(e.to_string())
        }
    })?;
    Ok(DateRange::new(budget.start_date, budget.end_date)?)
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn overlap(&self) -> OverlapChecker<'a, Storage> {
        OverlapChecker::new(self.storage)
    }

    /// Create a budget after checking it against the user's existing ones
    pub fn create(&self, user_id: &UserId, input: CreateBudgetInput) -> SpendwiseResult<Budget> {
        let period = input.period.unwrap_or_default();
        let start = input
            .start_date
            .unwrap_or_else(|| Local::now().date_naive());
        let end = input.end_date.unwrap_or_else(|| period.default_end(start));

        let now = Utc::now();
        let budget = Budget {
            id: BudgetId::new(),
            user_id: user_id.clone(),
            category: input.category.trim().to_string(),
            amount: input.amount,
            period,
            start_date: start,
            end_date: end,
            description: clean_description(input.description),
            created_at: now,
            updated_at: now,
        };

        let range = validate(&budget)?;
        self.overlap()
            .ensure_available(user_id, &budget.category, range, None)?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            user_id,
            entity_name(&budget),
            &budget,
        )?;

        info!(user = %user_id, id = %budget.id, category = %budget.category, range = %range, "created budget");
        Ok(budget)
    }

    /// Get a budget owned by `user_id`
    pub fn get(&self, user_id: &UserId, id: BudgetId) -> SpendwiseResult<Budget> {
        debug!(user = %user_id, id = %id, "get budget");
        self.storage
            .budgets
            .get_for_user(user_id, id)?
            .ok_or_else(|| SpendwiseError::budget_not_found(id.to_string()))
    }

    /// Resolve a full or short id among `user_id`'s budgets
    pub fn find(&self, user_id: &UserId, identifier: &str) -> SpendwiseResult<Budget> {
        debug!(user = %user_id, identifier, "find budget");
        self.storage
            .budgets
            .find_for_user(user_id, identifier)?
            .ok_or_else(|| SpendwiseError::budget_not_found(identifier))
    }

    /// List a user's budgets, newest start date first
    pub fn list(&self, user_id: &UserId, filter: &BudgetFilter) -> SpendwiseResult<Vec<Budget>> {
        let budgets = self.storage.budgets.find(user_id, filter)?;
        debug!(user = %user_id, count = budgets.len(), "listed budgets");
        Ok(budgets)
    }

    pub fn list_by_category(&self, user_id: &UserId, category: &str) -> SpendwiseResult<Vec<Budget>> {
        self.list(user_id, &BudgetFilter::new().category(category.trim()))
    }

    /// Apply `input` to a budget owned by `user_id`
    ///
    /// Ownership is checked first, then the new values, then the overlap rule
    /// with the budget itself excluded.
    pub fn update(
        &self,
        user_id: &UserId,
        id: BudgetId,
        input: UpdateBudgetInput,
    ) -> SpendwiseResult<Budget> {
        let mut budget = self.get(user_id, id)?;
        let before = budget.clone();

        if let Some(category) = input.category {
            budget.category = category.trim().to_string();
        }
        if let Some(amount) = input.amount {
            budget.amount = amount;
        }
        if let Some(period) = input.period {
            budget.period = period;
        }
        if let Some(start) = input.start_date {
            budget.start_date = start;
        }
        if let Some(end) = input.end_date {
            budget.end_date = end;
        }
        if input.description.is_some() {
            budget.description = clean_description(input.description);
        }

        let range = validate(&budget)?;
        self.overlap()
            .ensure_available(user_id, &budget.category, range, Some(budget.id))?;

        budget.updated_at = Utc::now();

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            user_id,
            entity_name(&budget),
            &before,
            &budget,
        )?;

        info!(user = %user_id, id = %budget.id, "updated budget");
        Ok(budget)
    }

    /// Delete a budget owned by `user_id`, returning it
    pub fn delete(&self, user_id: &UserId, id: BudgetId) -> SpendwiseResult<Budget> {
        let budget = self.get(user_id, id)?;

        self.storage.budgets.delete(budget.id)?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            user_id,
            entity_name(&budget),
            &budget,
        )?;

        info!(user = %user_id, id = %budget.id, "deleted budget");
        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendwisePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(category: &str, cents: i64, start: NaiveDate, end: NaiveDate) -> CreateBudgetInput {
        CreateBudgetInput {
            category: category.to_string(),
            amount: Money::from_cents(cents),
            period: None,
            start_date: Some(start),
            end_date: Some(end),
            description: None,
        }
    }

    #[test]
    fn test_create_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let budget = service
            .create(&user("alice"), input("Food", 100000, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();

        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!(service.get(&user("alice"), budget.id).unwrap(), budget);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_default_dates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let budget = service
            .create(
                &user("alice"),
                CreateBudgetInput {
                    category: "Food".into(),
                    amount: Money::from_cents(100),
                    period: Some(BudgetPeriod::Weekly),
                    start_date: Some(date(2024, 3, 4)),
                    end_date: None,
                    description: None,
                },
            )
            .unwrap();

        assert_eq!(budget.end_date, date(2024, 3, 10));
    }

    #[test]
    fn test_overlapping_budget_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = user("alice");

        service
            .create(&alice, input("Food", 100000, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();

        let err = service
            .create(&alice, input("Food", 50000, date(2024, 1, 31), date(2024, 2, 15)))
            .unwrap_err();
        assert!(err.is_overlap());
        assert_eq!(storage.budgets.count().unwrap(), 1);

        // Same dates, different category or user
        service
            .create(&alice, input("Rent", 150000, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();
        service
            .create(&user("bob"), input("Food", 100000, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();

        // Adjacent without a shared day
        service
            .create(&alice, input("Food", 100000, date(2024, 2, 1), date(2024, 2, 29)))
            .unwrap();
    }

    #[test]
    fn test_invalid_values_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = user("alice");

        let err = service
            .create(&alice, input("Food", 100, date(2024, 2, 1), date(2024, 1, 31)))
            .unwrap_err();
        assert!(err.is_invalid_range());

        let err = service
            .create(&alice, input("Food", 0, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create(&alice, input(" ", 100, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap_err();
        assert!(err.is_validation());

        let too_large = Money::MAX_ENTRY.cents() + 1;
        let err = service
            .create(&alice, input("Food", too_large, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.budgets.count().unwrap(), 0);
    }

    #[test]
    fn test_update_to_own_dates_does_not_conflict() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = user("alice");

        let budget = service
            .create(&alice, input("Food", 100000, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();

        let updated = service
            .update(
                &alice,
                budget.id,
                UpdateBudgetInput {
                    amount: Some(Money::from_cents(120000)),
                    start_date: Some(date(2024, 1, 1)),
                    end_date: Some(date(2024, 1, 31)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount.cents(), 120000);
    }

    #[test]
    fn test_update_into_other_budget_conflicts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = user("alice");

        service
            .create(&alice, input("Food", 100000, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();
        let february = service
            .create(&alice, input("Food", 100000, date(2024, 2, 1), date(2024, 2, 29)))
            .unwrap();

        let err = service
            .update(
                &alice,
                february.id,
                UpdateBudgetInput {
                    start_date: Some(date(2024, 1, 15)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_overlap());
        assert_eq!(service.get(&alice, february.id).unwrap().start_date, date(2024, 2, 1));
    }

    #[test]
    fn test_update_checks_ownership_first() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let budget = service
            .create(&user("alice"), input("Food", 100000, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();

        // Invalid values from the wrong user still report NotFound
        let err = service
            .update(
                &user("bob"),
                budget.id,
                UpdateBudgetInput {
                    amount: Some(Money::zero()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(service.delete(&user("bob"), budget.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_within_and_by_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = user("alice");

        service
            .create(&alice, input("Food", 100, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();
        service
            .create(&alice, input("Food", 100, date(2024, 2, 1), date(2024, 2, 29)))
            .unwrap();
        service
            .create(&alice, input("Rent", 100, date(2024, 1, 15), date(2024, 2, 14)))
            .unwrap();

        let january = DateRange::month(2024, 1).unwrap();
        let within = service.list(&alice, &BudgetFilter::new().within(january)).unwrap();
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].category, "Food");

        let food = service.list_by_category(&alice, "Food").unwrap();
        assert_eq!(food.len(), 2);
        assert_eq!(food[0].start_date, date(2024, 2, 1));
    }

    #[test]
    fn test_delete_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = user("alice");

        let budget = service
            .create(&alice, input("Food", 100, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();
        service.delete(&alice, budget.id).unwrap();

        assert!(service.get(&alice, budget.id).unwrap_err().is_not_found());
        // The interval is free again
        service
            .create(&alice, input("Food", 100, date(2024, 1, 1), date(2024, 1, 31)))
            .unwrap();
    }
}
