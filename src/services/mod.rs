//! Service layer for Spendwise
//!
//! Business logic on top of the storage layer: validation, ownership checks,
//! the budget overlap rule and audit logging.

pub mod budget;
pub mod overlap;
pub mod transaction;

pub use budget::{BudgetService, CreateBudgetInput, UpdateBudgetInput};
pub use overlap::OverlapChecker;
pub use transaction::{CreateTransactionInput, TransactionService, UpdateTransactionInput};
