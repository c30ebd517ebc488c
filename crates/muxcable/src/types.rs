//! Type definitions for muxcable

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use sonic_cli_common::db::{FieldValues, FieldValuesExt};
use sonic_cli_common::field_values;

use crate::error::{CmdError, CmdResult};
use crate::tables::{mux_cable_fields, CFG_MUX_CABLE_TABLE};

/// Port argument selecting every mux port on the switch.
pub const ALL_PORTS: &str = "all";

/// Operator-desired disposition of a mux port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MuxMode {
    /// Pin this ToR as the traffic-serving side.
    Active,
    /// Let failover logic decide.
    Auto,
}

impl MuxMode {
    /// CONFIG_DB encoding of this mode.
    pub fn as_str(&self) -> &str {
        match self {
            MuxMode::Active => "active",
            MuxMode::Auto => "auto",
        }
    }
}

impl FromStr for MuxMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MuxMode::Active),
            "auto" => Ok(MuxMode::Auto),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MuxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live cable state as reported by the monitoring daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxState {
    Active,
    Standby,
    Unknown,
}

impl MuxState {
    /// STATE_DB encoding of this state.
    pub fn as_str(&self) -> &str {
        match self {
            MuxState::Active => "active",
            MuxState::Standby => "standby",
            MuxState::Unknown => "unknown",
        }
    }
}

impl FromStr for MuxState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MuxState::Active),
            "standby" => Ok(MuxState::Standby),
            "unknown" => Ok(MuxState::Unknown),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MuxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware toggle target for `hwmode state`.
///
/// Unlike [`MuxMode`] there is no `auto` here: the hardware escape hatch
/// always forces a concrete side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MuxTarget {
    Active,
    Standby,
}

impl MuxTarget {
    pub fn as_str(&self) -> &str {
        match self {
            MuxTarget::Active => "active",
            MuxTarget::Standby => "standby",
        }
    }
}

impl fmt::Display for MuxTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-port result of a mode reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    /// Stores already agree, or the change took effect immediately.
    Ok,
    /// Change written but not yet confirmed by the observed state.
    InProgress,
}

impl ModeOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            ModeOutcome::Ok => "OK",
            ModeOutcome::InProgress => "INPROGRESS",
        }
    }
}

impl fmt::Display for ModeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired-state record of one port in the CONFIG_DB MUX_CABLE table.
///
/// The server IP fields are opaque passthroughs: they are carried verbatim
/// into every write and never parsed or validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxCableEntry {
    pub state: MuxMode,
    pub server_ipv4: String,
    pub server_ipv6: String,
}

impl MuxCableEntry {
    /// Parses a CONFIG_DB entry. All three fields are required.
    pub fn from_field_values(port: &str, fvs: &FieldValues) -> CmdResult<Self> {
        let raw_state = require_field(fvs, CFG_MUX_CABLE_TABLE, port, mux_cable_fields::STATE)?;
        let state = raw_state.parse().map_err(|_| {
            CmdError::invalid_field_value(
                CFG_MUX_CABLE_TABLE,
                port,
                mux_cable_fields::STATE,
                raw_state,
            )
        })?;

        Ok(Self {
            state,
            server_ipv4: require_field(
                fvs,
                CFG_MUX_CABLE_TABLE,
                port,
                mux_cable_fields::SERVER_IPV4,
            )?
            .to_string(),
            server_ipv6: require_field(
                fvs,
                CFG_MUX_CABLE_TABLE,
                port,
                mux_cable_fields::SERVER_IPV6,
            )?
            .to_string(),
        })
    }

    /// Field-value image written back to CONFIG_DB.
    pub fn to_field_values(&self) -> FieldValues {
        field_values! {
            mux_cable_fields::STATE => self.state.as_str(),
            mux_cable_fields::SERVER_IPV4 => self.server_ipv4,
            mux_cable_fields::SERVER_IPV6 => self.server_ipv6,
        }
    }

    /// Copy of this record with a different desired state.
    pub fn with_state(&self, state: MuxMode) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

/// Looks up a required field, mapping absence to the operator-facing error.
pub(crate) fn require_field<'a>(
    fvs: &'a FieldValues,
    table: &'static str,
    port: &str,
    field: &'static str,
) -> CmdResult<&'a str> {
    fvs.get_field(field)
        .ok_or_else(|| CmdError::missing_field(table, port, field))
}
