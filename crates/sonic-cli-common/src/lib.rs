//! Common infrastructure for SONiC CLI utilities.
//!
//! This crate provides the shared plumbing that operator-facing CLI tools
//! (muxcable and friends) build on:
//!
//! - [`db`]: store traits over CONFIG_DB and STATE_DB, plus field-value helpers
//! - [`redis_backend`]: the production Redis binding for those traits
//! - [`mem`]: an in-memory store for tests and local development
//! - [`platform`]: logical/physical port topology loaded from `port_config.ini`
//! - [`error`]: error types for store and platform operations
//!
//! # Architecture
//!
//! CLI commands never talk to Redis or the platform layer directly. They are
//! written against the [`db::ConfigStore`], [`db::StateStore`], and
//! [`platform::PortTopology`] traits, with the concrete binding chosen once at
//! startup. Tests inject [`mem::MemDb`] and hand-built topologies instead of
//! requiring a live switch.
//!
//! # Example
//!
//! ```ignore
//! use sonic_cli_common::{
//!     db::{ConfigStore, FieldValuesExt},
//!     redis_backend::{RedisConfig, RedisDatabase},
//! };
//!
//! async fn desired_state(store: &dyn ConfigStore, port: &str) -> Option<String> {
//!     let entry = store.get_entry("MUX_CABLE", port).await.ok()??;
//!     entry.get_field("state").map(str::to_string)
//! }
//! ```

pub mod db;
pub mod error;
pub mod mem;
pub mod platform;
pub mod redis_backend;

// Re-export commonly used items at crate root
pub use db::{ConfigStore, FieldValue, FieldValues, FieldValuesExt, StateStore};
pub use error::{DbError, DbResult, PlatformError, PlatformResult};
pub use mem::MemDb;
pub use platform::{PortMap, PortTopology};
pub use redis_backend::{RedisConfig, RedisDatabase, RedisDb};
