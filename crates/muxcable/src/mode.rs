//! The `config muxcable mode` flow.
//!
//! For each selected port this reads the desired record from CONFIG_DB and
//! the observed state from STATE_DB, runs [`reconcile`] over them, and writes
//! the updated record back when the stores disagree with the request. Ports
//! fail independently; a batch run keeps going and collects the failures.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::context::{CliContext, DbShard};
use crate::error::{CmdError, CmdResult};
use crate::reconcile::reconcile;
use crate::tables::{mux_state_fields, CFG_MUX_CABLE_TABLE, STATE_MUX_CABLE_TABLE};
use crate::types::{require_field, ALL_PORTS, ModeOutcome, MuxCableEntry, MuxMode, MuxState};

/// Per-port results of a mode run, in port order.
#[derive(Debug, Default)]
pub struct ModeReport {
    /// Outcome for each port that was reconciled.
    pub outcomes: BTreeMap<String, ModeOutcome>,
    /// Ports that could not be reconciled, with the reason.
    pub errors: Vec<(String, CmdError)>,
}

impl ModeReport {
    /// True when any port failed.
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Sets the mux mode for one port, or for every mux port when `port_arg`
/// is [`ALL_PORTS`].
pub async fn run(ctx: &CliContext, requested: MuxMode, port_arg: &str) -> CmdResult<ModeReport> {
    if port_arg == ALL_PORTS {
        run_all(ctx, requested).await
    } else {
        run_port(ctx, requested, port_arg).await
    }
}

async fn run_port(ctx: &CliContext, requested: MuxMode, port: &str) -> CmdResult<ModeReport> {
    let mut report = ModeReport::default();
    match set_port_mode(ctx, requested, port).await {
        Ok(outcome) => {
            report.outcomes.insert(port.to_string(), outcome);
        }
        Err(err) => report.errors.push((port.to_string(), err)),
    }
    Ok(report)
}

async fn run_all(ctx: &CliContext, requested: MuxMode) -> CmdResult<ModeReport> {
    let mut report = ModeReport::default();
    for shard in ctx.shards() {
        let mut rows = shard.config().get_table(CFG_MUX_CABLE_TABLE).await?;
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (port, fvs) in rows {
            let applied = match MuxCableEntry::from_field_values(&port, &fvs) {
                Ok(entry) => apply_mode(shard, requested, &port, entry).await,
                Err(err) => Err(err),
            };
            match applied {
                Ok(outcome) => {
                    report.outcomes.insert(port, outcome);
                }
                Err(err) => report.errors.push((port, err)),
            }
        }
    }
    Ok(report)
}

async fn set_port_mode(ctx: &CliContext, requested: MuxMode, port: &str) -> CmdResult<ModeOutcome> {
    let shard = ctx.shard_for_port(port)?;
    let fvs = shard
        .config()
        .get_entry(CFG_MUX_CABLE_TABLE, port)
        .await?
        .ok_or_else(|| CmdError::not_mux_port(port))?;
    let entry = MuxCableEntry::from_field_values(port, &fvs)?;
    apply_mode(shard, requested, port, entry).await
}

async fn apply_mode(
    shard: &DbShard,
    requested: MuxMode,
    port: &str,
    entry: MuxCableEntry,
) -> CmdResult<ModeOutcome> {
    let state_fvs = shard
        .state()
        .get_all(STATE_MUX_CABLE_TABLE, port)
        .await?
        .ok_or_else(|| {
            CmdError::missing_field(STATE_MUX_CABLE_TABLE, port, mux_state_fields::STATE)
        })?;
    let raw = require_field(&state_fvs, STATE_MUX_CABLE_TABLE, port, mux_state_fields::STATE)?;
    let observed: MuxState = raw.parse().map_err(|()| {
        CmdError::invalid_field_value(STATE_MUX_CABLE_TABLE, port, mux_state_fields::STATE, raw)
    })?;

    let resolution = reconcile(requested, observed, &entry);
    match &resolution.write {
        Some(update) => {
            shard
                .config()
                .set_entry(CFG_MUX_CABLE_TABLE, port, &update.to_field_values())
                .await?;
            info!(port, state = update.state.as_str(), "updated mux cable mode");
        }
        None => debug!(port, "mux cable mode already {}", requested),
    }
    Ok(resolution.outcome)
}
