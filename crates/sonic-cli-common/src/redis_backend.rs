//! Redis database backend for SONiC CLI utilities.
//!
//! Binds the [`ConfigStore`] and [`StateStore`] traits to the switch's Redis
//! instance. Entries are hashes keyed `TABLE|key`, with CONFIG_DB in database
//! 4 and STATE_DB in database 6.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::db::{ConfigStore, FieldValues, StateStore};
use crate::error::{DbError, DbResult};

/// Redis database selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedisDb {
    /// CONFIG_DB (database 4) - desired switch configuration
    ConfigDb = 4,
    /// STATE_DB (database 6) - live state written by platform daemons
    StateDb = 6,
}

/// Configuration for a Redis connection.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis server hostname or IP
    pub host: String,
    /// Redis server port
    pub port: u16,
    /// Database selector
    pub db: RedisDb,
}

impl RedisConfig {
    /// Creates a new Redis configuration.
    pub fn new(host: impl Into<String>, port: u16, db: RedisDb) -> Self {
        Self {
            host: host.into(),
            port,
            db,
        }
    }

    /// Creates CONFIG_DB connection config.
    pub fn config_db(host: impl Into<String>, port: u16) -> Self {
        Self::new(host, port, RedisDb::ConfigDb)
    }

    /// Creates STATE_DB connection config.
    pub fn state_db(host: impl Into<String>, port: u16) -> Self {
        Self::new(host, port, RedisDb::StateDb)
    }

    /// Returns the Redis connection URI.
    fn uri(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db as u8)
    }
}

/// A Redis database connection usable as a store handle.
///
/// The underlying [`ConnectionManager`] multiplexes and reconnects on its
/// own, so the handle is cheap to clone per command.
pub struct RedisDatabase {
    config: RedisConfig,
    connection: ConnectionManager,
}

impl RedisDatabase {
    /// Connects to the database described by `config`.
    pub async fn new(config: RedisConfig) -> DbResult<Self> {
        let uri = config.uri();

        let client = redis::Client::open(uri.clone())
            .map_err(|e| DbError::Connection(format!("{}: {}", uri, e)))?;

        let connection = client
            .get_connection_manager()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to create connection pool: {}", e)))?;

        info!(
            "Connected to Redis: {} (db={})",
            config.host, config.db as u8
        );

        Ok(Self { config, connection })
    }

    /// Returns the database configuration.
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    async fn fetch_entry(&self, redis_key: &str) -> DbResult<Option<FieldValues>> {
        let mut conn = self.connection.clone();
        let fvs: HashMap<String, String> = conn
            .hgetall(redis_key)
            .await
            .map_err(|e| DbError::Command(format!("HGETALL failed: {}", e)))?;

        // A hash with no fields does not exist in Redis.
        if fvs.is_empty() {
            return Ok(None);
        }
        Ok(Some(fvs.into_iter().collect()))
    }

    async fn table_redis_keys(&self, table: &str) -> DbResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}|*", table);
        conn.keys(&pattern)
            .await
            .map_err(|e| DbError::Command(format!("KEYS failed: {}", e)))
    }
}

/// Strips the table prefix from a `TABLE|key` Redis key.
fn entry_key(redis_key: &str) -> String {
    redis_key
        .splitn(2, '|')
        .nth(1)
        .unwrap_or("")
        .to_string()
}

#[async_trait]
impl ConfigStore for RedisDatabase {
    async fn get_entry(&self, table: &str, key: &str) -> DbResult<Option<FieldValues>> {
        self.fetch_entry(&format!("{}|{}", table, key)).await
    }

    async fn set_entry(&self, table: &str, key: &str, fields: &FieldValues) -> DbResult<()> {
        let redis_key = format!("{}|{}", table, key);
        debug!("HSET {} ({} fields)", redis_key, fields.len());

        let mut conn = self.connection.clone();
        let items: Vec<(&str, &str)> = fields
            .iter()
            .map(|(f, v)| (f.as_str(), v.as_str()))
            .collect();
        let _: () = conn
            .hset_multiple(&redis_key, &items)
            .await
            .map_err(|e| DbError::Command(format!("HSET failed: {}", e)))?;

        Ok(())
    }

    async fn get_table(&self, table: &str) -> DbResult<Vec<(String, FieldValues)>> {
        let mut entries = Vec::new();
        for redis_key in self.table_redis_keys(table).await? {
            if let Some(fvs) = self.fetch_entry(&redis_key).await? {
                entries.push((entry_key(&redis_key), fvs));
            }
        }

        debug!("Read {} entries from table {}", entries.len(), table);
        Ok(entries)
    }
}

#[async_trait]
impl StateStore for RedisDatabase {
    async fn get_all(&self, table: &str, key: &str) -> DbResult<Option<FieldValues>> {
        self.fetch_entry(&format!("{}|{}", table, key)).await
    }

    async fn keys(&self, table: &str) -> DbResult<Vec<String>> {
        let redis_keys = self.table_redis_keys(table).await?;
        Ok(redis_keys.iter().map(|k| entry_key(k)).collect())
    }
}
