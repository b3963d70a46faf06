//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. Locally created records get a UUID; records
//! that came from the hosted datastore keep whatever id the remote assigned,
//! so the wrapped value is an opaque string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Number of characters shown in tables and accepted as a lookup prefix
pub const SHORT_ID_LEN: usize = 8;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an id assigned elsewhere (e.g. by the remote datastore)
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Get the underlying id string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Short form used for display, e.g. "bil-550e8400"
            pub fn short(&self) -> String {
                let end = self
                    .0
                    .char_indices()
                    .nth(SHORT_ID_LEN)
                    .map(|(i, _)| i)
                    .unwrap_or(self.0.len());
                format!("{}{}", $display_prefix, &self.0[..end])
            }

            /// Whether a user-typed identifier refers to this id
            ///
            /// Accepts the full id, or the short form with or without prefix.
            pub fn matches(&self, identifier: &str) -> bool {
                let identifier = identifier.trim();
                if identifier.is_empty() {
                    return false;
                }
                let bare = identifier.strip_prefix($display_prefix).unwrap_or(identifier);
                self.0 == identifier
                    || (bare.len() >= SHORT_ID_LEN.min(self.0.len()) && self.0.starts_with(bare))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid.to_string())
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Ok(Self(s.strip_prefix($display_prefix).unwrap_or(s).to_string()))
            }
        }
    };
}

define_id!(BillId, "bil-");
define_id!(DebtId, "dbt-");
define_id!(GoalId, "gol-");
define_id!(SnapshotId, "snp-");
