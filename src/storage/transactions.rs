//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{Transaction, TransactionId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;
use super::query::TransactionFilter;

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Newest first: date descending, then creation time descending
fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then(b.created_at.cmp(&a.created_at))
}

/// Repository for transaction persistence with a per-user index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: user_id -> transaction_ids
    by_user: RwLock<HashMap<UserId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        data.clear();
        by_user.clear();

        for txn in file_data.transactions {
            by_user.entry(txn.user_id.clone()).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID regardless of owner
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get a transaction by ID only if `user_id` owns it
    pub fn get_for_user(
        &self,
        user_id: &UserId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, SpendwiseError> {
        Ok(self.get(id)?.filter(|t| t.is_owned_by(user_id)))
    }

    /// Resolve a full UUID or short display id among a user's transactions
    pub fn find_for_user(
        &self,
        user_id: &UserId,
        identifier: &str,
    ) -> Result<Option<Transaction>, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_user = self.by_user.read().map_err(lock_error)?;

        let ids = by_user.get(user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids
            .iter()
            .find(|id| id.matches(identifier))
            .and_then(|id| data.get(id).cloned()))
    }

    /// A user's transactions matching `filter`, newest first
    pub fn find(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_user = self.by_user.read().map_err(lock_error)?;

        let ids = by_user.get(user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids
            .iter()
            .filter_map(|id| data.get(id))
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        transactions.sort_by(newest_first);

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_user.get_mut(&old.user_id) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_user.entry(txn.user_id.clone()).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, SpendwiseError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            if let Some(ids) = by_user.get_mut(&txn.user_id) {
                ids.retain(|&tid| tid != id);
            }
        }
        Ok(removed)
    }

    /// Total number of stored transactions across all users
    pub fn count(&self) -> Result<usize, SpendwiseError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, Money, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let txn = Transaction::expense(user("alice"), Money::from_cents(800), "Food", date(2024, 3, 2));
        let id = txn.id;

        repo.upsert(txn).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.category, "Food");
    }

    #[test]
    fn test_get_for_user_checks_owner() {
        let (_temp_dir, repo) = create_test_repo();
        let txn = Transaction::expense(user("alice"), Money::from_cents(800), "Food", date(2024, 3, 2));
        let id = txn.id;
        repo.upsert(txn).unwrap();

        assert!(repo.get_for_user(&user("alice"), id).unwrap().is_some());
        assert!(repo.get_for_user(&user("bob"), id).unwrap().is_none());
    }

    #[test]
    fn test_find_for_user_by_short_id() {
        let (_temp_dir, repo) = create_test_repo();
        let txn = Transaction::income(user("alice"), Money::from_cents(500), "Salary", date(2024, 3, 1));
        let short = txn.id.to_string();
        repo.upsert(txn).unwrap();

        assert!(repo.find_for_user(&user("alice"), &short).unwrap().is_some());
        assert!(repo.find_for_user(&user("bob"), &short).unwrap().is_none());
    }

    #[test]
    fn test_find_filters_and_orders() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = user("alice");

        repo.upsert(Transaction::expense(alice.clone(), Money::from_cents(100), "Food", date(2024, 3, 1))).unwrap();
        repo.upsert(Transaction::expense(alice.clone(), Money::from_cents(200), "Food", date(2024, 3, 20))).unwrap();
        repo.upsert(Transaction::income(alice.clone(), Money::from_cents(900), "Salary", date(2024, 3, 5))).unwrap();
        repo.upsert(Transaction::expense(alice.clone(), Money::from_cents(300), "Food", date(2024, 4, 1))).unwrap();
        repo.upsert(Transaction::expense(user("bob"), Money::from_cents(999), "Food", date(2024, 3, 10))).unwrap();

        let march = TransactionFilter::new().date_range(DateRange::month(2024, 3).unwrap());
        let found = repo.find(&alice, &march).unwrap();
        let dates: Vec<_> = found.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 20), date(2024, 3, 5), date(2024, 3, 1)]);

        let expenses = repo.find(&alice, &march.clone().expenses()).unwrap();
        assert!(expenses.iter().all(|t| t.transaction_type == TransactionType::Expense));
        assert_eq!(expenses.len(), 2);

        let limited = repo.find(&alice, &TransactionFilter::new().limit(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].date, date(2024, 4, 1));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let txn = Transaction::expense(user("alice"), Money::from_cents(800), "Food", date(2024, 3, 2));
        let id = txn.id;

        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();

        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.amount.cents(), 800);
        assert_eq!(repo2.find(&user("alice"), &TransactionFilter::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = user("alice");
        let txn = Transaction::expense(alice.clone(), Money::from_cents(800), "Food", date(2024, 3, 2));
        let id = txn.id;

        repo.upsert(txn).unwrap();
        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.get(id).unwrap().is_none());
        assert!(repo.find(&alice, &TransactionFilter::new()).unwrap().is_empty());
        assert!(repo.delete(id).unwrap().is_none());
    }
}
