//! Table and JSON rendering, and the confirmation prompt.
//!
//! Renderers return the finished text instead of printing so command flows
//! stay testable; `main` owns stdout. Tables are column-aligned with
//! tabwriter, JSON keys come out sorted because the maps are B-trees.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use serde_json::json;
use tabwriter::TabWriter;

use crate::error::CmdResult;
use crate::show::{ConfigReport, StatusRow};
use crate::types::ModeOutcome;

fn finish(tw: TabWriter<Vec<u8>>) -> CmdResult<String> {
    let bytes = tw.into_inner().map_err(io::Error::other)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Renders the `mode` outcome table with `port`/`state` columns.
pub fn render_mode_table(outcomes: &BTreeMap<String, ModeOutcome>) -> CmdResult<String> {
    let mut tw = TabWriter::new(Vec::new());
    writeln!(tw, "port\tstate")?;
    for (port, outcome) in outcomes {
        writeln!(tw, "{}\t{}", port, outcome)?;
    }
    tw.flush()?;
    finish(tw)
}

/// Renders the `mode` outcomes as a JSON object keyed by port.
pub fn render_mode_json(outcomes: &BTreeMap<String, ModeOutcome>) -> CmdResult<String> {
    let map: BTreeMap<&str, &str> = outcomes
        .iter()
        .map(|(port, outcome)| (port.as_str(), outcome.as_str()))
        .collect();
    Ok(serde_json::to_string_pretty(&map)?)
}

/// Renders the `status` table with `PORT`/`STATUS`/`HEALTH` columns.
pub fn render_status_table(rows: &[StatusRow]) -> CmdResult<String> {
    let mut tw = TabWriter::new(Vec::new());
    writeln!(tw, "PORT\tSTATUS\tHEALTH")?;
    for row in rows {
        writeln!(tw, "{}\t{}\t{}", row.port, row.status, row.health)?;
    }
    tw.flush()?;
    finish(tw)
}

/// Renders the `status` rows as `{"MUX_CABLE": {port: {STATUS, HEALTH}}}`.
pub fn render_status_json(rows: &[StatusRow]) -> CmdResult<String> {
    let mut ports = BTreeMap::new();
    for row in rows {
        ports.insert(
            row.port.as_str(),
            json!({ "STATUS": row.status, "HEALTH": row.health }),
        );
    }
    Ok(serde_json::to_string_pretty(&json!({ "MUX_CABLE": ports }))?)
}

/// Renders the `config` view: the peer table followed by the port table.
pub fn render_config_table(report: &ConfigReport) -> CmdResult<String> {
    let mut tw = TabWriter::new(Vec::new());
    writeln!(tw, "SWITCH_NAME\tPEER_TOR")?;
    for (name, addr) in &report.peers {
        writeln!(tw, "{}\t{}", name, addr)?;
    }
    tw.flush()?;
    let peers = finish(tw)?;

    let mut tw = TabWriter::new(Vec::new());
    writeln!(tw, "port\tstate\tipv4\tipv6")?;
    for row in &report.rows {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}",
            row.port, row.state, row.server_ipv4, row.server_ipv6
        )?;
    }
    tw.flush()?;
    Ok(format!("{}\n{}", peers, finish(tw)?))
}

/// Renders the `config` view as nested JSON.
pub fn render_config_json(report: &ConfigReport) -> CmdResult<String> {
    let mut ports = BTreeMap::new();
    for row in &report.rows {
        ports.insert(
            row.port.as_str(),
            json!({
                "STATE": row.state,
                "SERVER": { "IPv4": row.server_ipv4, "IPv6": row.server_ipv6 },
            }),
        );
    }

    let peer_tor = report.peers.first().map(|(_, addr)| addr.as_str());
    Ok(serde_json::to_string_pretty(&json!({
        "MUX_CABLE": { "PEER_TOR": peer_tor, "PORTS": ports }
    }))?)
}

/// Asks the operator to confirm; anything but `y`/`yes` declines.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
