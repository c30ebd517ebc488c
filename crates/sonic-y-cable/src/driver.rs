//! Vendor driver seam.

use async_trait::async_trait;
use tracing::debug;

use crate::{TorSide, YCableError, YCableResult};

/// Control operations on one physical mux-cable port.
///
/// Implemented per vendor; command logic only sees this trait so tests can
/// substitute recording stubs. All operations talk to cable firmware over
/// the transceiver management interface and may take hundreds of
/// milliseconds; callers bound them with their own timeout policy.
#[async_trait]
pub trait YCableDriver: Send + Sync {
    /// Which connector side this ToR's controller is wired to read.
    async fn check_read_side(&self, physical_port: u32) -> YCableResult<TorSide>;

    /// Which connector side the mux currently points to.
    async fn check_mux_direction(&self, physical_port: u32) -> YCableResult<TorSide>;

    /// Points the mux at side A. `Ok(false)` means the firmware refused.
    async fn toggle_mux_to_tor_a(&self, physical_port: u32) -> YCableResult<bool>;

    /// Points the mux at side B. `Ok(false)` means the firmware refused.
    async fn toggle_mux_to_tor_b(&self, physical_port: u32) -> YCableResult<bool>;
}

/// Driver used when no vendor library is linked into the build.
///
/// Every operation reports [`YCableError::NotSupported`] so commands fail
/// with a clear reason instead of touching hardware they cannot drive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformDriver;

impl PlatformDriver {
    /// Creates the placeholder driver.
    pub fn new() -> Self {
        Self
    }
}

// TODO: dispatch to the vendor y_cable library once its Rust binding lands.
#[async_trait]
impl YCableDriver for PlatformDriver {
    async fn check_read_side(&self, physical_port: u32) -> YCableResult<TorSide> {
        debug!("check_read_side on physical port {}", physical_port);
        Err(YCableError::not_supported("no vendor driver in this build"))
    }

    async fn check_mux_direction(&self, physical_port: u32) -> YCableResult<TorSide> {
        debug!("check_mux_direction on physical port {}", physical_port);
        Err(YCableError::not_supported("no vendor driver in this build"))
    }

    async fn toggle_mux_to_tor_a(&self, physical_port: u32) -> YCableResult<bool> {
        debug!("toggle_mux_to_tor_a on physical port {}", physical_port);
        Err(YCableError::not_supported("no vendor driver in this build"))
    }

    async fn toggle_mux_to_tor_b(&self, physical_port: u32) -> YCableResult<bool> {
        debug!("toggle_mux_to_tor_b on physical port {}", physical_port);
        Err(YCableError::not_supported("no vendor driver in this build"))
    }
}
