//! Spendwise - personal finance tracking core
//!
//! Records a user's income and expense transactions and per-category budgets,
//! and computes reports over them: date-range aggregation, monthly summaries
//! and budget-vs-actual comparison. Budgets for the same category may never
//! cover overlapping dates.
//!
//! # Architecture
//!
//! - `config`: Data directory and settings management
//! - `error`: Custom error types
//! - `logging`: Diagnostic `tracing` setup
//! - `models`: Transactions, budgets, money and date ranges
//! - `storage`: JSON file storage layer and store traits
//! - `audit`: Append-only audit log
//! - `services`: Transaction and budget management, overlap checking
//! - `reports`: Aggregation and the report service
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use spendwise::config::paths::SpendwisePaths;
//! use spendwise::models::UserId;
//! use spendwise::reports::ReportService;
//! use spendwise::storage::Storage;
//!
//! let mut storage = Storage::new(SpendwisePaths::new()?)?;
//! storage.load_all()?;
//! let user = UserId::new("alice").unwrap();
//! let summary = ReportService::new(&storage).summarize(&user, 3, 2024)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{SpendwiseError, SpendwiseResult};
