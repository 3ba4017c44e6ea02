//! Transaction service
//!
//! CRUD for a user's transactions. Every lookup is scoped to the requesting
//! user; an id owned by someone else resolves to `NotFound`.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Money, Transaction, TransactionId, TransactionType, UserId};
use crate::storage::{Storage, TransactionFilter};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Fields to change on an existing transaction; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    /// `Some("")` clears the description
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl UpdateTransactionInput {
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn entity_name(txn: &Transaction) -> Option<String> {
    Some(format!("{} {}", txn.date, txn.category))
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a new transaction
    pub fn create(
        &self,
        user_id: &UserId,
        input: CreateTransactionInput,
    ) -> SpendwiseResult<Transaction> {
        let mut txn = Transaction::new(
            user_id.clone(),
            input.transaction_type,
            input.amount,
            input.category.trim(),
            input.date,
        );
        txn.description = clean_description(input.description);

        txn.validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            user_id,
            entity_name(&txn),
            &txn,
        )?;

        info!(user = %user_id, id = %txn.id, kind = %txn.transaction_type, amount = %txn.amount, "created transaction");
        Ok(txn)
    }

    /// Get a transaction owned by `user_id`
    pub fn get(&self, user_id: &UserId, id: TransactionId) -> SpendwiseResult<Transaction> {
        debug!(user = %user_id, id = %id, "get transaction");
        self.storage
            .transactions
            .get_for_user(user_id, id)?
            .ok_or_else(|| SpendwiseError::transaction_not_found(id.to_string()))
    }

    /// Resolve a full or short id among `user_id`'s transactions
    pub fn find(&self, user_id: &UserId, identifier: &str) -> SpendwiseResult<Transaction> {
        debug!(user = %user_id, identifier, "find transaction");
        self.storage
            .transactions
            .find_for_user(user_id, identifier)?
            .ok_or_else(|| SpendwiseError::transaction_not_found(identifier))
    }

    /// List a user's transactions, newest first
    pub fn list(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
    ) -> SpendwiseResult<Vec<Transaction>> {
        let transactions = self.storage.transactions.find(user_id, filter)?;
        debug!(user = %user_id, count = transactions.len(), "listed transactions");
        Ok(transactions)
    }

    /// Apply `input` to a transaction owned by `user_id`
    pub fn update(
        &self,
        user_id: &UserId,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> SpendwiseResult<Transaction> {
        let mut txn = self.get(user_id, id)?;
        let before = txn.clone();

        if let Some(transaction_type) = input.transaction_type {
            txn.transaction_type = transaction_type;
        }
        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(category) = input.category {
            txn.category = category.trim().to_string();
        }
        if input.description.is_some() {
            txn.description = clean_description(input.description);
        }
        if let Some(date) = input.date {
            txn.date = date;
        }

        txn.validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        txn.updated_at = Utc::now();

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            user_id,
            entity_name(&txn),
            &before,
            &txn,
        )?;

        info!(user = %user_id, id = %txn.id, "updated transaction");
        Ok(txn)
    }

    /// Delete a transaction owned by `user_id`, returning it
    pub fn delete(&self, user_id: &UserId, id: TransactionId) -> SpendwiseResult<Transaction> {
        let txn = self.get(user_id, id)?;

        self.storage.transactions.delete(txn.id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            user_id,
            entity_name(&txn),
            &txn,
        )?;

        info!(user = %user_id, id = %txn.id, "deleted transaction");
        Ok(txn)
    }
}
