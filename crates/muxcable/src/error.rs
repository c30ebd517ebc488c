//! Command-level error types.

use std::time::Duration;

use thiserror::Error;

use sonic_cli_common::error::{DbError, PlatformError};
use sonic_y_cable::YCableError;

use crate::types::MuxTarget;

/// Errors raised while running a muxcable command.
///
/// Variants carry the port and the table/field or step involved so the
/// `Display` text is the operator-facing message.
#[derive(Error, Debug)]
pub enum CmdError {
    /// Logical port exists but is not configured as a mux port.
    #[error("Port {port} is not present on mux_cable")]
    NotMuxPort { port: String },

    /// Logical port unknown to the platform topology.
    #[error("Port {port} is not a valid logical port")]
    UnknownPort { port: String },

    /// Topology names an ASIC this invocation has no store handles for.
    #[error("Got invalid ASIC index {asic_id} for port {port}")]
    InvalidAsic { port: String, asic_id: u32 },

    /// Required field missing from a store record.
    #[error("Could not retrieve field '{field}' for port {port} in table {table}")]
    MissingField {
        table: &'static str,
        port: String,
        field: &'static str,
    },

    /// Field present but outside its value domain.
    #[error("Invalid value '{value}' of field '{field}' for port {port} in table {table}")]
    InvalidFieldValue {
        table: &'static str,
        port: String,
        field: &'static str,
        value: String,
    },

    /// No physical port backs the logical port.
    #[error("No physical port found for logical port {port}")]
    NoPhysicalPort { port: String },

    /// More than one physical port backs the logical port.
    #[error("Received multiple physical ports for logical port {port}")]
    AmbiguousPhysicalPort { port: String },

    /// No transceiver is seated, so the port cannot carry a mux cable.
    #[error("No transceiver information for port {port}")]
    NoTransceiver { port: String },

    /// Transceiver is present but not a supported mux cable.
    #[error(
        "Port {port} with manufacturer '{manufacturer}' model '{model}' is not a supported mux cable"
    )]
    UnsupportedCable {
        port: String,
        manufacturer: String,
        model: String,
    },

    /// Only the primary logical port of a physical port may drive a toggle.
    #[error("Port {port} is not the primary logical port of physical port {physical_port}")]
    NotPrimaryPort { port: String, physical_port: u32 },

    /// Vendor call exceeded the configured deadline.
    #[error("Port {port}: {operation} timed out after {} s", timeout.as_secs())]
    VendorTimeout {
        port: String,
        operation: &'static str,
        timeout: Duration,
    },

    /// Firmware accepted the command but refused to switch.
    #[error("Failed to toggle mux cable at port {port} to {target}")]
    ToggleRefused { port: String, target: MuxTarget },

    /// Store failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Platform topology failure.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Cable driver failure.
    #[error(transparent)]
    Cable(#[from] YCableError),

    /// Terminal or pipe I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization failure.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CmdError {
    /// Creates a not-a-mux-port error.
    pub fn not_mux_port(port: impl Into<String>) -> Self {
        Self::NotMuxPort { port: port.into() }
    }

    /// Creates an unknown-logical-port error.
    pub fn unknown_port(port: impl Into<String>) -> Self {
        Self::UnknownPort { port: port.into() }
    }

    /// Creates an invalid-ASIC error.
    pub fn invalid_asic(port: impl Into<String>, asic_id: u32) -> Self {
        Self::InvalidAsic {
            port: port.into(),
            asic_id,
        }
    }

    /// Creates a missing-field error.
    pub fn missing_field(table: &'static str, port: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            table,
            port: port.into(),
            field,
        }
    }

    /// Creates an invalid-field-value error.
    pub fn invalid_field_value(
        table: &'static str,
        port: impl Into<String>,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            table,
            port: port.into(),
            field,
            value: value.into(),
        }
    }

    /// Creates a no-physical-port error.
    pub fn no_physical_port(port: impl Into<String>) -> Self {
        Self::NoPhysicalPort { port: port.into() }
    }

    /// Creates an ambiguous-physical-port error.
    pub fn ambiguous_physical_port(port: impl Into<String>) -> Self {
        Self::AmbiguousPhysicalPort { port: port.into() }
    }

    /// Creates a no-transceiver error.
    pub fn no_transceiver(port: impl Into<String>) -> Self {
        Self::NoTransceiver { port: port.into() }
    }

    /// Creates an unsupported-cable error.
    pub fn unsupported_cable(
        port: impl Into<String>,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::UnsupportedCable {
            port: port.into(),
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }

    /// Creates a not-primary-port error.
    pub fn not_primary_port(port: impl Into<String>, physical_port: u32) -> Self {
        Self::NotPrimaryPort {
            port: port.into(),
            physical_port,
        }
    }

    /// Creates a vendor-timeout error.
    pub fn vendor_timeout(
        port: impl Into<String>,
        operation: &'static str,
        timeout: Duration,
    ) -> Self {
        Self::VendorTimeout {
            port: port.into(),
            operation,
            timeout,
        }
    }

    /// Creates a toggle-refused error.
    pub fn toggle_refused(port: impl Into<String>, target: MuxTarget) -> Self {
        Self::ToggleRefused {
            port: port.into(),
            target,
        }
    }

    /// True for ports that are simply not toggle candidates: a hardware
    /// sweep skips them silently instead of reporting a failure.
    pub fn is_batch_skip(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCable { .. } | Self::NotPrimaryPort { .. } | Self::NoTransceiver { .. }
        )
    }
}

/// Result type for muxcable commands.
pub type CmdResult<T> = std::result::Result<T, CmdError>;
