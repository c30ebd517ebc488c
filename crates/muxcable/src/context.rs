//! Per-invocation command context.

use std::fmt;
use std::sync::Arc;

use sonic_cli_common::db::{ConfigStore, StateStore};
use sonic_cli_common::platform::PortTopology;

use crate::error::{CmdError, CmdResult};

/// Store handles for one ASIC namespace.
#[derive(Clone)]
pub struct DbShard {
    asic_id: u32,
    config: Arc<dyn ConfigStore>,
    state: Arc<dyn StateStore>,
}

impl DbShard {
    /// Creates a shard from its store handles.
    pub fn new(asic_id: u32, config: Arc<dyn ConfigStore>, state: Arc<dyn StateStore>) -> Self {
        Self {
            asic_id,
            config,
            state,
        }
    }

    pub fn asic_id(&self) -> u32 {
        self.asic_id
    }

    /// CONFIG_DB handle.
    pub fn config(&self) -> &dyn ConfigStore {
        self.config.as_ref()
    }

    /// STATE_DB handle.
    pub fn state(&self) -> &dyn StateStore {
        self.state.as_ref()
    }
}

// The store handles are trait objects without Debug; the ASIC id is what
// identifies a shard.
impl fmt::Debug for DbShard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbShard")
            .field("asic_id", &self.asic_id)
            .finish_non_exhaustive()
    }
}

/// Everything one command invocation needs: the port topology and the
/// per-ASIC store handles.
///
/// Built once in `main` and passed by reference; commands never reach for
/// process-global state.
pub struct CliContext {
    topology: Arc<dyn PortTopology>,
    shards: Vec<DbShard>,
}

impl CliContext {
    /// Creates a context from a topology and its shards.
    pub fn new(topology: Arc<dyn PortTopology>, shards: Vec<DbShard>) -> Self {
        Self { topology, shards }
    }

    /// Port topology for this platform.
    pub fn topology(&self) -> &dyn PortTopology {
        self.topology.as_ref()
    }

    /// All shards, in ASIC order as provided.
    pub fn shards(&self) -> &[DbShard] {
        &self.shards
    }

    /// Shard for a given ASIC.
    pub fn shard(&self, asic_id: u32) -> Option<&DbShard> {
        self.shards.iter().find(|s| s.asic_id == asic_id)
    }

    /// Shard hosting a logical port.
    pub fn shard_for_port(&self, port: &str) -> CmdResult<&DbShard> {
        let asic_id = self
            .topology
            .asic_id(port)
            .ok_or_else(|| CmdError::unknown_port(port))?;
        self.shard(asic_id)
            .ok_or_else(|| CmdError::invalid_asic(port, asic_id))
    }
}
