//! Audit log viewing

use crate::error::SpendwiseResult;
use crate::models::UserId;
use crate::storage::Storage;

/// Print the user's most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, user_id: &UserId, limit: usize) -> SpendwiseResult<()> {
    let entries = storage.audit().read_recent_for_user(user_id, limit)?;

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
