//! Logical/physical port topology.
//!
//! Mux-cable commands need to map logical port names (`Ethernet0`) to the
//! physical transceiver positions that cables plug into, and back. The
//! mapping is static per hwsku and ships as `port_config.ini`:
//!
//! ```text
//! # name         lanes            alias      index
//! Ethernet0      29,30,31,32      Etp1/1     1
//! Ethernet4      33,34,35,36      Etp2/1     2
//! ```
//!
//! The `index` column is the physical port. Breakout ports repeat an index;
//! the first logical port listed for a physical port is the "primary" one,
//! the only one wired to the cable's control interface.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::error::{PlatformError, PlatformResult};

/// Default hwsku port config location on a SONiC switch.
pub const DEFAULT_PORT_CONFIG_PATH: &str = "/usr/share/sonic/hwsku/port_config.ini";

/// Resolves logical ports to physical ports, ASICs, and back.
///
/// Injected into command contexts so tests can supply a hand-built map.
/// Returned lists are owned copies; the topology itself is immutable after
/// construction.
pub trait PortTopology: Send + Sync {
    /// All logical ports in definition order.
    fn logical_ports(&self) -> Vec<String>;

    /// ASIC which hosts the logical port, if known.
    fn asic_id(&self, logical_port: &str) -> Option<u32>;

    /// Physical ports backing the logical port (empty when unknown).
    fn logical_to_physical(&self, logical_port: &str) -> Vec<u32>;

    /// Logical ports on a physical port, primary first (empty when unknown).
    fn physical_to_logical(&self, physical_port: u32) -> Vec<String>;
}

/// Port topology backed by a parsed `port_config.ini`.
#[derive(Debug, Default)]
pub struct PortMap {
    ports: Vec<String>,
    asic_ids: HashMap<String, u32>,
    logical_to_physical: HashMap<String, Vec<u32>>,
    physical_to_logical: HashMap<u32, Vec<String>>,
}

impl PortMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one logical port. Insertion order defines both the batch
    /// iteration order and which logical port is primary on its physical
    /// port.
    pub fn add_port(&mut self, logical_port: &str, physical_port: u32, asic_id: u32) {
        if self.asic_ids.contains_key(logical_port) {
            warn!("Duplicate port config entry for {}, keeping first", logical_port);
            return;
        }

        self.ports.push(logical_port.to_string());
        self.asic_ids.insert(logical_port.to_string(), asic_id);
        self.logical_to_physical
            .entry(logical_port.to_string())
            .or_default()
            .push(physical_port);
        self.physical_to_logical
            .entry(physical_port)
            .or_default()
            .push(logical_port.to_string());
    }

    /// Parses a `port_config.ini` file. All ports land on ASIC 0; multi-ASIC
    /// platforms construct one map per namespace file with [`parse_into`].
    ///
    /// [`parse_into`]: PortMap::parse_into
    pub fn from_port_config(path: impl AsRef<Path>) -> PlatformResult<Self> {
        let mut map = Self::new();
        map.parse_into(path, 0)?;
        Ok(map)
    }

    /// Parses a `port_config.ini` file, assigning its ports to `asic_id`.
    pub fn parse_into(&mut self, path: impl AsRef<Path>, asic_id: u32) -> PlatformResult<()> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlatformError::io(path.display().to_string(), e))?;

        for (idx, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 2 {
                return Err(PlatformError::parse(
                    idx + 1,
                    format!("expected at least name and lanes, got '{}'", line),
                ));
            }

            // Column 4 is the physical index; older files omit it and the
            // physical port is positional.
            let physical_port = match columns.get(3) {
                Some(index) => index.parse::<u32>().map_err(|_| {
                    PlatformError::parse(idx + 1, format!("invalid index '{}'", index))
                })?,
                None => self.ports.len() as u32 + 1,
            };

            self.add_port(columns[0], physical_port, asic_id);
        }

        Ok(())
    }
}

impl PortTopology for PortMap {
    fn logical_ports(&self) -> Vec<String> {
        self.ports.clone()
    }

    fn asic_id(&self, logical_port: &str) -> Option<u32> {
        self.asic_ids.get(logical_port).copied()
    }

    fn logical_to_physical(&self, logical_port: &str) -> Vec<u32> {
        self.logical_to_physical
            .get(logical_port)
            .cloned()
            .unwrap_or_default()
    }

    fn physical_to_logical(&self, physical_port: u32) -> Vec<String> {
        self.physical_to_logical
            .get(&physical_port)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_parse_with_index_column() {
        let file = write_config(
            "# name         lanes            alias      index\n\
             Ethernet0      29,30,31,32      Etp1/1     1\n\
             Ethernet4      33,34,35,36      Etp2/1     2\n",
        );

        let map = PortMap::from_port_config(file.path()).unwrap();
        assert_eq!(map.logical_ports(), vec!["Ethernet0", "Ethernet4"]);
        assert_eq!(map.logical_to_physical("Ethernet0"), vec![1]);
        assert_eq!(map.physical_to_logical(2), vec!["Ethernet4"]);
        assert_eq!(map.asic_id("Ethernet4"), Some(0));
    }

    #[test]
    fn test_breakout_ports_share_physical_port() {
        let file = write_config(
            "Ethernet0      29,30    Etp1/1     1\n\
             Ethernet2      31,32    Etp1/2     1\n",
        );

        let map = PortMap::from_port_config(file.path()).unwrap();
        // Primary is the first logical port listed for the physical port.
        assert_eq!(map.physical_to_logical(1), vec!["Ethernet0", "Ethernet2"]);
        assert_eq!(map.logical_to_physical("Ethernet2"), vec![1]);
    }

    #[test]
    fn test_positional_fallback_without_index() {
        let file = write_config("Ethernet0 29,30,31,32\nEthernet4 33,34,35,36\n");

        let map = PortMap::from_port_config(file.path()).unwrap();
        assert_eq!(map.logical_to_physical("Ethernet0"), vec![1]);
        assert_eq!(map.logical_to_physical("Ethernet4"), vec![2]);
    }

    #[test]
    fn test_malformed_lines() {
        let file = write_config("Ethernet0\n");
        assert!(PortMap::from_port_config(file.path()).is_err());

        let file = write_config("Ethernet0 29,30 Etp1/1 not-a-number\n");
        let err = PortMap::from_port_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_unknown_ports_resolve_empty() {
        let map = PortMap::new();
        assert!(map.logical_to_physical("Ethernet0").is_empty());
        assert!(map.physical_to_logical(7).is_empty());
        assert_eq!(map.asic_id("Ethernet0"), None);
    }

    #[test]
    fn test_multi_asic_assembly() {
        let mut map = PortMap::new();
        map.add_port("Ethernet0", 1, 0);
        map.add_port("Ethernet-BP0", 64, 1);

        assert_eq!(map.asic_id("Ethernet0"), Some(0));
        assert_eq!(map.asic_id("Ethernet-BP0"), Some(1));
        assert_eq!(map.logical_ports().len(), 2);
    }
}
