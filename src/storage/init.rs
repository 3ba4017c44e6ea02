//! Storage initialization
//!
//! First-run setup: directories, empty data files and the settings file.

use serde_json::json;

use crate::config::paths::SpendwisePaths;
use crate::config::settings::Settings;
use crate::error::SpendwiseError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing data files and settings are left untouched, so running this
/// twice is harmless.
pub fn initialize_storage(paths: &SpendwisePaths) -> Result<Settings, SpendwiseError> {
    paths.ensure_directories()?;

    if !paths.transactions_file().exists() {
        write_json_atomic(paths.transactions_file(), &json!({ "transactions": [] }))?;
    }

    if !paths.budgets_file().exists() {
        write_json_atomic(paths.budgets_file(), &json!({ "budgets": [] }))?;
    }

    let settings = Settings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    Ok(settings)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &SpendwisePaths) -> bool {
    !paths.settings_file().exists()
}
