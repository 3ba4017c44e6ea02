//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{Budget, BudgetId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::query::BudgetFilter;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Retrieval order: start date descending, then creation time descending
fn retrieval_order(a: &Budget, b: &Budget) -> std::cmp::Ordering {
    b.start_date
        .cmp(&a.start_date)
        .then(b.created_at.cmp(&a.created_at))
}

/// Repository for budget persistence with a per-user index
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, Budget>>,
    by_user: RwLock<HashMap<UserId, Vec<BudgetId>>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        data.clear();
        by_user.clear();

        for budget in file_data.budgets {
            by_user
                .entry(budget.user_id.clone())
                .or_default()
                .push(budget.id);
            data.insert(budget.id, budget);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by(retrieval_order);

        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get a budget by ID only if `user_id` owns it
    pub fn get_for_user(
        &self,
        user_id: &UserId,
        id: BudgetId,
    ) -> Result<Option<Budget>, SpendwiseError> {
        Ok(self.get(id)?.filter(|b| b.is_owned_by(user_id)))
    }

    /// Resolve a full UUID or short display id among a user's budgets
    pub fn find_for_user(
        &self,
        user_id: &UserId,
        identifier: &str,
    ) -> Result<Option<Budget>, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_user = self.by_user.read().map_err(lock_error)?;

        let ids = by_user.get(user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids
            .iter()
            .find(|id| id.matches(identifier))
            .and_then(|id| data.get(id).cloned()))
    }

    /// A user's budgets matching `filter`, in retrieval order
    pub fn find(
        &self,
        user_id: &UserId,
        filter: &BudgetFilter,
    ) -> Result<Vec<Budget>, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_user = self.by_user.read().map_err(lock_error)?;

        let ids = by_user.get(user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut budgets: Vec<_> = ids
            .iter()
            .filter_map(|id| data.get(id))
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        budgets.sort_by(retrieval_order);

        Ok(budgets)
    }

    pub fn upsert(&self, budget: Budget) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        if let Some(old) = data.get(&budget.id) {
            if let Some(ids) = by_user.get_mut(&old.user_id) {
                ids.retain(|&id| id != budget.id);
            }
        }

        by_user
            .entry(budget.user_id.clone())
            .or_default()
            .push(budget.id);
        data.insert(budget.id, budget);
        Ok(())
    }

    /// Delete a budget, returning it if it existed
    pub fn delete(&self, id: BudgetId) -> Result<Option<Budget>, SpendwiseError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(budget) = &removed {
            if let Some(ids) = by_user.get_mut(&budget.user_id) {
                ids.retain(|&bid| bid != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, DateRange, Money};
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    fn monthly(owner: &str, category: &str, month: u32) -> Budget {
        Budget::new(
            user(owner),
            category,
            Money::from_cents(100000),
            BudgetPeriod::Monthly,
            DateRange::month(2024, month).unwrap(),
        )
    }

    #[test]
    fn test_find_orders_by_start_desc() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(monthly("alice", "Food", 1)).unwrap();
        repo.upsert(monthly("alice", "Food", 3)).unwrap();
        repo.upsert(monthly("alice", "Rent", 2)).unwrap();

        let found = repo.find(&user("alice"), &BudgetFilter::new()).unwrap();
        let months: Vec<_> = found.iter().map(|b| b.start_date).collect();
        assert_eq!(
            months,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_same_start_orders_by_created_desc() {
        let (_temp_dir, repo) = create_test_repo();
        let mut older = monthly("alice", "Food", 3);
        older.created_at = older.created_at - Duration::hours(1);
        let newer = monthly("alice", "Rent", 3);
        let newer_id = newer.id;

        repo.upsert(older).unwrap();
        repo.upsert(newer).unwrap();

        let found = repo.find(&user("alice"), &BudgetFilter::new()).unwrap();
        assert_eq!(found[0].id, newer_id);
    }

    #[test]
    fn test_find_is_per_user() {
        let (_temp_dir, repo) = create_test_repo();
        let bob_budget = monthly("bob", "Food", 1);
        let bob_id = bob_budget.id;
        repo.upsert(monthly("alice", "Food", 1)).unwrap();
        repo.upsert(bob_budget).unwrap();

        let filter = BudgetFilter::new().category("Food");
        assert_eq!(repo.find(&user("alice"), &filter).unwrap().len(), 1);
        assert!(repo.get_for_user(&user("alice"), bob_id).unwrap().is_none());
        assert!(repo.get_for_user(&user("bob"), bob_id).unwrap().is_some());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let budget = monthly("alice", "Food", 1);
        let short = budget.id.to_string();

        repo.upsert(budget).unwrap();
        repo.save().unwrap();

        let repo2 = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert!(repo2.find_for_user(&user("alice"), &short).unwrap().is_some());
    }

    #[test]
    fn test_upsert_moves_owner_index() {
        let (_temp_dir, repo) = create_test_repo();
        let mut budget = monthly("alice", "Food", 1);
        repo.upsert(budget.clone()).unwrap();

        budget.user_id = user("bob");
        repo.upsert(budget).unwrap();

        assert!(repo.find(&user("alice"), &BudgetFilter::new()).unwrap().is_empty());
        assert_eq!(repo.find(&user("bob"), &BudgetFilter::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = monthly("alice", "Food", 1);
        let id = budget.id;
        repo.upsert(budget).unwrap();

        let removed = repo.delete(id).unwrap().unwrap();
        assert_eq!(removed.category, "Food");
        assert_eq!(repo.count().unwrap(), 0);
    }
}
