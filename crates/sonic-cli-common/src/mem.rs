//! In-memory store backend.
//!
//! Implements [`ConfigStore`] and [`StateStore`] over a plain map so command
//! logic can be exercised in tests (and demo runs) without a live Redis.
//! Writes follow HSET semantics: fields merge into the existing entry.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::db::{ConfigStore, FieldValues, StateStore};
use crate::error::DbResult;

type Entries = BTreeMap<String, BTreeMap<String, String>>;

/// In-memory database keyed `TABLE|key`, shared across handles via `&self`.
#[derive(Debug, Default)]
pub struct MemDb {
    entries: Mutex<Entries>,
}

impl MemDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder-style.
    pub fn with_entry(self, table: &str, key: &str, fields: FieldValues) -> Self {
        self.insert(table, key, fields);
        self
    }

    /// Inserts or merges an entry.
    pub fn insert(&self, table: &str, key: &str, fields: FieldValues) {
        let mut entries = self.locked();
        let entry = entries.entry(redis_key(table, key)).or_default();
        for (field, value) in fields {
            entry.insert(field, value);
        }
    }

    /// Returns a copy of an entry's fields, sorted by field name.
    pub fn entry(&self, table: &str, key: &str) -> Option<FieldValues> {
        let entries = self.locked();
        entries
            .get(&redis_key(table, key))
            .map(|fields| fields.iter().map(|(f, v)| (f.clone(), v.clone())).collect())
    }

    fn locked(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn redis_key(table: &str, key: &str) -> String {
    format!("{}|{}", table, key)
}

#[async_trait]
impl ConfigStore for MemDb {
    async fn get_entry(&self, table: &str, key: &str) -> DbResult<Option<FieldValues>> {
        Ok(self.entry(table, key))
    }

    async fn set_entry(&self, table: &str, key: &str, fields: &FieldValues) -> DbResult<()> {
        self.insert(table, key, fields.clone());
        Ok(())
    }

    async fn get_table(&self, table: &str) -> DbResult<Vec<(String, FieldValues)>> {
        let prefix = format!("{}|", table);
        let entries = self.locked();
        Ok(entries
            .iter()
            .filter_map(|(k, fields)| {
                k.strip_prefix(&prefix).map(|key| {
                    (
                        key.to_string(),
                        fields.iter().map(|(f, v)| (f.clone(), v.clone())).collect(),
                    )
                })
            })
            .collect())
    }
}

#[async_trait]
impl StateStore for MemDb {
    async fn get_all(&self, table: &str, key: &str) -> DbResult<Option<FieldValues>> {
        Ok(self.entry(table, key))
    }

    async fn keys(&self, table: &str) -> DbResult<Vec<String>> {
        let prefix = format!("{}|", table);
        let entries = self.locked();
        Ok(entries
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_values;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_get_and_set_entry() {
        let db = MemDb::new().with_entry(
            "MUX_CABLE",
            "Ethernet0",
            field_values! { "state" => "auto", "server_ipv4" => "10.1.1.1/32" },
        );

        let entry = db.get_entry("MUX_CABLE", "Ethernet0").await.unwrap().unwrap();
        assert_eq!(entry.len(), 2);

        assert!(db.get_entry("MUX_CABLE", "Ethernet4").await.unwrap().is_none());

        db.set_entry(
            "MUX_CABLE",
            "Ethernet0",
            &field_values! { "state" => "active" },
        )
        .await
        .unwrap();

        // HSET semantics: untouched fields survive the write.
        let entry = db.entry("MUX_CABLE", "Ethernet0").unwrap();
        assert_eq!(
            entry,
            field_values! { "server_ipv4" => "10.1.1.1/32", "state" => "active" }
        );
    }

    #[tokio::test]
    async fn test_state_keys_and_table() {
        let db = MemDb::new()
            .with_entry("MUX_CABLE_TABLE", "Ethernet4", field_values! { "state" => "standby" })
            .with_entry("MUX_CABLE_TABLE", "Ethernet0", field_values! { "state" => "active" })
            .with_entry("TRANSCEIVER_INFO", "Ethernet0", field_values! { "model" => "x" });

        let keys = StateStore::keys(&db, "MUX_CABLE_TABLE").await.unwrap();
        assert_eq!(keys, vec!["Ethernet0".to_string(), "Ethernet4".to_string()]);

        let table = db.get_table("MUX_CABLE_TABLE").await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].0, "Ethernet0");
    }
}
