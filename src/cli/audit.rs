//! Audit log CLI command

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::storage::BudgetStore;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(
    store: &BudgetStore,
    count: usize,
    entity: Option<String>,
) -> BudgetResult<()> {
    let entity_type = match entity {
        Some(raw) => Some(EntityType::parse(&raw).ok_or_else(|| {
            BudgetError::Validation(format!(
                "Unknown entity type '{}'. Use bill, debt, goal, snapshot or settings",
                raw
            ))
        })?),
        None => None,
    };

    let entries = store.audit().read_recent(count, entity_type)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
