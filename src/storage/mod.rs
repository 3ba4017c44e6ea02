//! Storage layer for Spendwise
//!
//! JSON file storage with atomic writes and in-memory per-user indexes. The
//! aggregation core only sees storage through the [`TransactionStore`] and
//! [`BudgetStore`] traits.

pub mod budgets;
pub mod file_io;
pub mod init;
pub mod query;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use query::{BudgetFilter, TransactionFilter};
pub use transactions::TransactionRepository;

use std::sync::PoisonError;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SpendwisePaths;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Budget, Transaction, UserId};

/// Read access to a user's transactions
pub trait TransactionStore {
    /// Transactions owned by `user_id` matching `filter`, newest first
    fn find_transactions(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
    ) -> SpendwiseResult<Vec<Transaction>>;
}

/// Read access to a user's budgets
pub trait BudgetStore {
    /// Budgets owned by `user_id` matching `filter`, start date descending
    /// then creation time descending
    fn find_budgets(&self, user_id: &UserId, filter: &BudgetFilter)
        -> SpendwiseResult<Vec<Budget>>;
}

impl TransactionStore for TransactionRepository {
    fn find_transactions(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
    ) -> SpendwiseResult<Vec<Transaction>> {
        self.find(user_id, filter)
    }
}

impl BudgetStore for BudgetRepository {
    fn find_budgets(
        &self,
        user_id: &UserId,
        filter: &BudgetFilter,
    ) -> SpendwiseResult<Vec<Budget>> {
        self.find(user_id, filter)
    }
}

pub(crate) fn lock_error<T>(e: PoisonError<T>) -> SpendwiseError {
    SpendwiseError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SpendwisePaths,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    audit: AuditLogger,
    audit_enabled: bool,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: SpendwisePaths) -> SpendwiseResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            audit: AuditLogger::new(paths.audit_log()),
            audit_enabled: true,
            paths,
        })
    }

    /// Turn audit logging on or off
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    pub fn paths(&self) -> &SpendwisePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> SpendwiseResult<()> {
        self.transactions.load()?;
        self.budgets.load()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    fn write_audit(&self, entry: AuditEntry) -> SpendwiseResult<()> {
        if self.audit_enabled {
            self.audit.log(&entry)?;
        }
        Ok(())
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        user_id: &UserId,
        entity_name: Option<String>,
        entity: &T,
    ) -> SpendwiseResult<()> {
        self.write_audit(AuditEntry::create(
            entity_type,
            entity_id,
            user_id,
            entity_name,
            entity,
        ))
    }

    /// Record an updated entity in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        user_id: &UserId,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> SpendwiseResult<()> {
        self.write_audit(AuditEntry::update(
            entity_type,
            entity_id,
            user_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a deleted entity in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        user_id: &UserId,
        entity_name: Option<String>,
        entity: &T,
    ) -> SpendwiseResult<()> {
        self.write_audit(AuditEntry::delete(
            entity_type,
            entity_id,
            user_id,
            entity_name,
            entity,
        ))
    }
}

impl TransactionStore for Storage {
    fn find_transactions(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
    ) -> SpendwiseResult<Vec<Transaction>> {
        self.transactions.find(user_id, filter)
    }
}

impl BudgetStore for Storage {
    fn find_budgets(
        &self,
        user_id: &UserId,
        filter: &BudgetFilter,
    ) -> SpendwiseResult<Vec<Budget>> {
        self.budgets.find(user_id, filter)
    }
}
