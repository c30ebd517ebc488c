//! Store traits over the SONiC databases.
//!
//! CONFIG_DB holds operator-desired configuration and STATE_DB holds live
//! state written by platform daemons. Commands are written against the
//! [`ConfigStore`] and [`StateStore`] traits so the concrete binding (Redis in
//! production, [`crate::mem::MemDb`] in tests) is injected at startup.

use async_trait::async_trait;

use crate::error::DbResult;

/// Key-value tuple representing a field and its value.
pub type FieldValue = (String, String);

/// Collection of field-value pairs for a table entry.
pub type FieldValues = Vec<FieldValue>;

/// Helper trait for working with field-value collections.
pub trait FieldValuesExt {
    /// Gets the value for a field, if present.
    fn get_field(&self, field: &str) -> Option<&str>;

    /// Gets the value for a field, returning the default if not present.
    fn get_field_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str;

    /// Checks if a field exists.
    fn has_field(&self, field: &str) -> bool;
}

impl FieldValuesExt for FieldValues {
    fn get_field(&self, field: &str) -> Option<&str> {
        self.iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    fn get_field_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        self.get_field(field).unwrap_or(default)
    }

    fn has_field(&self, field: &str) -> bool {
        self.iter().any(|(f, _)| f == field)
    }
}

/// Builds a FieldValues collection from key-value pairs.
#[macro_export]
macro_rules! field_values {
    ($($field:expr => $value:expr),* $(,)?) => {
        vec![
            $(($field.to_string(), $value.to_string()),)*
        ]
    };
}

/// Desired-configuration store (CONFIG_DB).
///
/// Entries are hashes keyed `TABLE|key`. Absent entries read as `None`; they
/// are never defaulted here because callers decide whether absence is an
/// error.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetches one entry, or `None` when the key is absent.
    async fn get_entry(&self, table: &str, key: &str) -> DbResult<Option<FieldValues>>;

    /// Writes the given fields for one entry.
    async fn set_entry(&self, table: &str, key: &str, fields: &FieldValues) -> DbResult<()>;

    /// Reads a whole table as `(key, fields)` pairs.
    async fn get_table(&self, table: &str) -> DbResult<Vec<(String, FieldValues)>>;
}

/// Observed-state store (STATE_DB). Read-only: state tables are owned by the
/// platform daemons that populate them.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetches all fields of one entry, or `None` when the key is absent.
    async fn get_all(&self, table: &str, key: &str) -> DbResult<Option<FieldValues>>;

    /// Lists the keys present in a table.
    async fn keys(&self, table: &str) -> DbResult<Vec<String>>;
}
