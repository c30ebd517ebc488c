//! The `show muxcable status` and `show muxcable config` flows.
//!
//! Read-only views. `status` reports the observed state and link health from
//! STATE_DB; `config` reports the desired records and the peer ToR from
//! CONFIG_DB. Values are passed through as stored, unparsed.

use crate::context::CliContext;
use crate::error::{CmdError, CmdResult};
use crate::tables::{
    mux_cable_fields, mux_state_fields, peer_fields, CFG_MUX_CABLE_TABLE, CFG_PEER_SWITCH_TABLE,
    STATE_MUX_CABLE_TABLE,
};
use crate::types::require_field;

/// One port's observed state, as stored in STATE_DB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub port: String,
    pub status: String,
    pub health: String,
}

/// One port's desired record, as stored in CONFIG_DB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRow {
    pub port: String,
    pub state: String,
    pub server_ipv4: String,
    pub server_ipv6: String,
}

/// The `config` view: peer ToR addresses plus per-port records.
#[derive(Debug, Clone, Default)]
pub struct ConfigReport {
    /// `(switch name, IPv4 address)` pairs from PEER_SWITCH.
    pub peers: Vec<(String, String)>,
    pub rows: Vec<ConfigRow>,
}

/// Reads the observed status of every mux port, in port order.
pub async fn status_all(ctx: &CliContext) -> CmdResult<Vec<StatusRow>> {
    let mut rows = Vec::new();
    for shard in ctx.shards() {
        let mut ports = shard.state().keys(STATE_MUX_CABLE_TABLE).await?;
        ports.sort();
        for port in ports {
            rows.push(status_row(ctx, &port).await?);
        }
    }
    Ok(rows)
}

/// Reads the observed status of one mux port.
pub async fn status_port(ctx: &CliContext, port: &str) -> CmdResult<Vec<StatusRow>> {
    Ok(vec![status_row(ctx, port).await?])
}

async fn status_row(ctx: &CliContext, port: &str) -> CmdResult<StatusRow> {
    let shard = ctx.shard_for_port(port)?;
    let fvs = shard
        .state()
        .get_all(STATE_MUX_CABLE_TABLE, port)
        .await?
        .ok_or_else(|| CmdError::not_mux_port(port))?;
    let status = require_field(&fvs, STATE_MUX_CABLE_TABLE, port, mux_state_fields::STATE)?;
    let health = require_field(&fvs, STATE_MUX_CABLE_TABLE, port, mux_state_fields::HEALTH)?;
    Ok(StatusRow {
        port: port.to_string(),
        status: status.to_string(),
        health: health.to_string(),
    })
}

/// Reads the desired records of every mux port, in port order.
pub async fn config_all(ctx: &CliContext) -> CmdResult<ConfigReport> {
    let mut report = ConfigReport {
        peers: peer_switches(ctx).await?,
        rows: Vec::new(),
    };
    for shard in ctx.shards() {
        for (port, fvs) in shard.config().get_table(CFG_MUX_CABLE_TABLE).await? {
            report.rows.push(config_row(&port, &fvs)?);
        }
    }
    report.rows.sort_by(|a, b| a.port.cmp(&b.port));
    Ok(report)
}

/// Reads the desired record of one mux port, with the peer ToR block.
pub async fn config_port(ctx: &CliContext, port: &str) -> CmdResult<ConfigReport> {
    let shard = ctx.shard_for_port(port)?;
    let fvs = shard
        .config()
        .get_entry(CFG_MUX_CABLE_TABLE, port)
        .await?
        .ok_or_else(|| CmdError::not_mux_port(port))?;
    Ok(ConfigReport {
        peers: peer_switches(ctx).await?,
        rows: vec![config_row(port, &fvs)?],
    })
}

fn config_row(port: &str, fvs: &sonic_cli_common::FieldValues) -> CmdResult<ConfigRow> {
    let state = require_field(fvs, CFG_MUX_CABLE_TABLE, port, mux_cable_fields::STATE)?;
    let server_ipv4 = require_field(fvs, CFG_MUX_CABLE_TABLE, port, mux_cable_fields::SERVER_IPV4)?;
    let server_ipv6 = require_field(fvs, CFG_MUX_CABLE_TABLE, port, mux_cable_fields::SERVER_IPV6)?;
    Ok(ConfigRow {
        port: port.to_string(),
        state: state.to_string(),
        server_ipv4: server_ipv4.to_string(),
        server_ipv6: server_ipv6.to_string(),
    })
}

// PEER_SWITCH is mirrored into every shard; the first one is authoritative
// for display.
async fn peer_switches(ctx: &CliContext) -> CmdResult<Vec<(String, String)>> {
    let Some(shard) = ctx.shards().first() else {
        return Ok(Vec::new());
    };
    let mut peers = Vec::new();
    for (name, fvs) in shard.config().get_table(CFG_PEER_SWITCH_TABLE).await? {
        let address = require_field(&fvs, CFG_PEER_SWITCH_TABLE, &name, peer_fields::ADDRESS_IPV4)?;
        let address = address.to_string();
        peers.push((name, address));
    }
    peers.sort();
    Ok(peers)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use sonic_cli_common::{field_values, MemDb, PortMap};

    use super::*;
    use crate::context::DbShard;

    fn test_context(db: Arc<MemDb>) -> CliContext {
        let mut ports = PortMap::new();
        ports.add_port("Ethernet0", 1, 0);
        ports.add_port("Ethernet4", 2, 0);
        CliContext::new(Arc::new(ports), vec![DbShard::new(0, db.clone(), db)])
    }

    #[tokio::test]
    async fn test_status_lists_ports_in_order() {
        let db = Arc::new(
            MemDb::new()
                .with_entry(
                    STATE_MUX_CABLE_TABLE,
                    "Ethernet4",
                    field_values! { "state" => "standby", "health" => "unhealthy" },
                )
                .with_entry(
                    STATE_MUX_CABLE_TABLE,
                    "Ethernet0",
                    field_values! { "state" => "active", "health" => "healthy" },
                ),
        );
        let ctx = test_context(db);

        let rows = status_all(&ctx).await.unwrap();
        assert_eq!(
            rows,
            vec![
                StatusRow {
                    port: "Ethernet0".to_string(),
                    status: "active".to_string(),
                    health: "healthy".to_string(),
                },
                StatusRow {
                    port: "Ethernet4".to_string(),
                    status: "standby".to_string(),
                    health: "unhealthy".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_status_for_non_mux_port_fails() {
        let ctx = test_context(Arc::new(MemDb::new()));

        let err = status_port(&ctx, "Ethernet0").await.unwrap_err();
        assert!(matches!(err, CmdError::NotMuxPort { .. }));
    }

    #[tokio::test]
    async fn test_status_requires_health() {
        let db = Arc::new(MemDb::new().with_entry(
            STATE_MUX_CABLE_TABLE,
            "Ethernet0",
            field_values! { "state" => "active" },
        ));
        let ctx = test_context(db);

        let err = status_port(&ctx, "Ethernet0").await.unwrap_err();
        assert!(matches!(
            err,
            CmdError::MissingField { field, .. } if field == "health"
        ));
    }

    #[tokio::test]
    async fn test_config_reports_peer_and_ports() {
        let db = Arc::new(
            MemDb::new()
                .with_entry(
                    CFG_PEER_SWITCH_TABLE,
                    "sonic-switch",
                    field_values! { "address_ipv4" => "10.2.2.2" },
                )
                .with_entry(
                    CFG_MUX_CABLE_TABLE,
                    "Ethernet0",
                    field_values! {
                        "state" => "auto",
                        "server_ipv4" => "10.2.1.1/32",
                        "server_ipv6" => "e800::46/128",
                    },
                )
                .with_entry(
                    CFG_MUX_CABLE_TABLE,
                    "Ethernet4",
                    field_values! {
                        "state" => "active",
                        "server_ipv4" => "10.3.1.1/32",
                        "server_ipv6" => "e801::46/128",
                    },
                ),
        );
        let ctx = test_context(db);

        let report = config_all(&ctx).await.unwrap();
        assert_eq!(
            report.peers,
            vec![("sonic-switch".to_string(), "10.2.2.2".to_string())]
        );
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].port, "Ethernet0");
        assert_eq!(report.rows[0].state, "auto");
        assert_eq!(report.rows[1].port, "Ethernet4");
        assert_eq!(report.rows[1].server_ipv4, "10.3.1.1/32");
    }

    #[tokio::test]
    async fn test_config_for_single_port_keeps_peer_block() {
        let db = Arc::new(
            MemDb::new()
                .with_entry(
                    CFG_PEER_SWITCH_TABLE,
                    "sonic-switch",
                    field_values! { "address_ipv4" => "10.2.2.2" },
                )
                .with_entry(
                    CFG_MUX_CABLE_TABLE,
                    "Ethernet0",
                    field_values! {
                        "state" => "auto",
                        "server_ipv4" => "10.2.1.1/32",
                        "server_ipv6" => "e800::46/128",
                    },
                ),
        );
        let ctx = test_context(db);

        let report = config_port(&ctx, "Ethernet0").await.unwrap();
        assert_eq!(report.peers.len(), 1);
        assert_eq!(report.rows.len(), 1);

        let err = config_port(&ctx, "Ethernet4").await.unwrap_err();
        assert!(matches!(err, CmdError::NotMuxPort { .. }));
    }
}
