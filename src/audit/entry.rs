//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// A whole collection was replaced (backup import or remote refresh)
    Replace,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Replace => write!(f, "REPLACE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Bill,
    Debt,
    Goal,
    Snapshot,
    Settings,
}

impl EntityType {
    /// Parse an entity type name, singular or plural ("bill", "Bills")
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.strip_suffix('s').unwrap_or(&lower) {
            "bill" => Some(Self::Bill),
            "debt" => Some(Self::Debt),
            "goal" => Some(Self::Goal),
            "snapshot" | "history" => Some(Self::Snapshot),
            "setting" => Some(Self::Settings),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Bill => write!(f, "Bill"),
            EntityType::Debt => write!(f, "Debt"),
            EntityType::Goal => write!(f, "Goal"),
            EntityType::Snapshot => write!(f, "Snapshot"),
            EntityType::Settings => write!(f, "Settings"),
        }
    }
}

/// A single audit log entry
///
/// Before/after values are stored as JSON so the log stays readable even
/// after the record types change shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Human-readable description of the entity (e.g. bill name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id.into(), entity_name)
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id.into(), entity_name)
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id.into(), entity_name)
        }
    }

    /// A bulk replacement of one collection; only the counts are kept
    pub fn replace(entity_type: EntityType, source: &str, before: usize, after: usize) -> Self {
        Self {
            diff_summary: Some(format!("{} records -> {} records", before, after)),
            ..Self::new(
                Operation::Replace,
                entity_type,
                "*".to_string(),
                Some(source.to_string()),
            )
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Replace.to_string(), "REPLACE");
        assert_eq!(EntityType::Snapshot.to_string(), "Snapshot");
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("Bills"), Some(EntityType::Bill));
        assert_eq!(EntityType::parse("history"), Some(EntityType::Snapshot));
        assert_eq!(EntityType::parse("settings"), Some(EntityType::Settings));
        assert_eq!(EntityType::parse("account"), None);
    }

    #[test]
    fn test_create_and_delete_entries() {
        let data = json!({"name": "Rent", "amount": 120000});
        let created = AuditEntry::create(EntityType::Bill, "bil-1", Some("Rent".into()), &data);
        assert_eq!(created.operation, Operation::Create);
        assert!(created.before.is_none());
        assert_eq!(created.after, Some(data.clone()));

        let deleted = AuditEntry::delete(EntityType::Bill, "bil-1", Some("Rent".into()), &data);
        assert_eq!(deleted.operation, Operation::Delete);
        assert_eq!(deleted.before, Some(data));
        assert!(deleted.after.is_none());
    }

    #[test]
    fn test_update_entry() {
        let before = json!({"amount": 5000});
        let after = json!({"amount": 2500});
        let entry = AuditEntry::update(
            EntityType::Debt,
            "dbt-1",
            None,
            &before,
            &after,
            Some("amount: 5000 -> 2500".into()),
        );
        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.diff_summary.as_deref(), Some("amount: 5000 -> 2500"));
    }

    #[test]
    fn test_replace_entry() {
        let entry = AuditEntry::replace(EntityType::Goal, "refresh", 2, 5);
        let text = entry.format_human_readable();
        assert!(text.contains("REPLACE Goal *"));
        assert!(text.contains("(refresh)"));
        assert!(text.contains("2 records -> 5 records"));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::create(EntityType::Goal, "gol-1", None, &json!({"name": "Car"}));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"operation\":\"create\""));
        assert!(line.contains("\"entity_type\":\"goal\""));
        assert!(!line.contains("before"));

        let parsed: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.entity_type, EntityType::Goal);
    }
}
