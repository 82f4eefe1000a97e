//! Bidirectional display-name to user-id table.
//!
//! The sheet identifies people by the text in the name column, the store by
//! Telegram id. This table is the only join between the two.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::UserId;

/// One line of the crew directory file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityEntry {
    pub name: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    by_name: HashMap<String, UserId>,
    by_id: HashMap<UserId, String>,
}

impl IdentityTable {
    /// Build a table from `(name, user_id)` pairs.
    ///
    /// Names are trimmed. Later entries win for both lookups, so a renamed
    /// user listed twice resolves to the last spelling.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, UserId)>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for (name, user_id) in entries {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            table.by_name.insert(name.to_string(), user_id);
            table.by_id.insert(user_id, name.to_string());
        }
        table
    }

    /// Parse a JSON array of `{"name": ..., "userId": ...}` objects.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let entries: Vec<IdentityEntry> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid crew directory: {e}")))?;
        Ok(Self::from_entries(
            entries.into_iter().map(|e| (e.name, e.user_id)),
        ))
    }

    pub fn user_id_for(&self, name: &str) -> Option<UserId> {
        self.by_name.get(name.trim()).copied()
    }

    pub fn name_for(&self, user_id: UserId) -> Option<&str> {
        self.by_id.get(&user_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Sheet display name for a user: `"<last_name> <first_name>"`.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", last_name.trim(), first_name.trim())
        .trim()
        .to_string()
}
