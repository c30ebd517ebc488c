//! Y-cable (mux cable) control primitives.
//!
//! A mux cable connects one server NIC to two ToR switches; firmware on the
//! cable decides which switch-facing connector carries traffic. This crate
//! defines the control surface over that firmware:
//!
//! - [`TorSide`]: the two switch-facing connector sides (A/B, reported by
//!   firmware as 1/2)
//! - [`YCableDriver`]: async per-physical-port driver trait with read-side
//!   detection, direction readback, and the directional toggle primitives
//! - [`driver::PlatformDriver`]: the build-time seam used when no vendor
//!   library is linked
//!
//! Vendor bindings convert at the raw boundary: firmware answers pass
//! through [`TorSide::from_raw`]/[`TorSide::as_raw`], and out-of-domain
//! values surface as [`YCableError::InvalidValue`].
//!
//! Only one vendor/model pair is currently toggle-capable; callers gate on
//! [`is_supported_cable`] before issuing any driver operation.

use std::fmt;

use thiserror::Error;

pub mod driver;

pub use driver::{PlatformDriver, YCableDriver};

/// Manufacturer string of the supported mux cable, as reported in
/// TRANSCEIVER_INFO.
pub const VENDOR_NAME: &str = "Credo";

/// Model string of the supported mux cable.
pub const VENDOR_MODEL: &str = "CAC125321P2PA0MS";

/// Returns true when the transceiver identity names a toggle-capable cable.
pub fn is_supported_cable(manufacturer: &str, model: &str) -> bool {
    manufacturer == VENDOR_NAME && model == VENDOR_MODEL
}

/// One of the two ToR-facing sides of a Y-cable.
///
/// The cable labels its switch-facing connectors A and B; firmware encodes
/// them as 1 and 2. Which side is "active" is relative: a ToR wired to read
/// side B must toggle the mux toward B to make itself active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorSide {
    A,
    B,
}

impl TorSide {
    /// Decodes the firmware encoding (side A = 1, side B = 2).
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(TorSide::A),
            2 => Some(TorSide::B),
            _ => None,
        }
    }

    /// Firmware encoding of this side.
    pub fn as_raw(self) -> u8 {
        match self {
            TorSide::A => 1,
            TorSide::B => 2,
        }
    }
}

impl fmt::Display for TorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TorSide::A => write!(f, "A"),
            TorSide::B => write!(f, "B"),
        }
    }
}

/// Errors from Y-cable driver operations.
#[derive(Error, Debug)]
pub enum YCableError {
    /// The driver could not complete an operation on a port.
    #[error("Port {physical_port}: {operation} failed: {message}")]
    Operation {
        physical_port: u32,
        operation: &'static str,
        message: String,
    },

    /// Firmware reported a value outside the protocol domain.
    #[error("Port {physical_port}: firmware returned invalid {what} value {raw}")]
    InvalidValue {
        physical_port: u32,
        what: &'static str,
        raw: u8,
    },

    /// No vendor driver is linked into this build.
    #[error("Y-cable driver not available: {message}")]
    NotSupported { message: String },
}

impl YCableError {
    /// Creates an operation failure.
    pub fn operation(
        physical_port: u32,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Operation {
            physical_port,
            operation,
            message: message.into(),
        }
    }

    /// Creates an invalid-firmware-value error.
    pub fn invalid_value(physical_port: u32, what: &'static str, raw: u8) -> Self {
        Self::InvalidValue {
            physical_port,
            what,
            raw,
        }
    }

    /// Creates a driver-not-available error.
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported {
            message: message.into(),
        }
    }
}

/// Result type for Y-cable operations.
pub type YCableResult<T> = std::result::Result<T, YCableError>;
