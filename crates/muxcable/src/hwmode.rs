//! The `config muxcable hwmode state` flow.
//!
//! Unlike [`mode`](crate::mode), which only edits CONFIG_DB, this drives the
//! y-cable firmware directly. The cable labels its ToR-facing sides A and B
//! without knowing which ToR is which, so the toggle primitive is chosen from
//! the requested state combined with the side this ToR reads from: forcing
//! `active` from read side B means pointing the mux at B.

use std::future::Future;
use std::time::Duration;

use sonic_y_cable::{is_supported_cable, TorSide, YCableDriver};
use tracing::{debug, info, instrument, warn};

use crate::context::CliContext;
use crate::error::{CmdError, CmdResult};
use crate::tables::{transceiver_fields, STATE_TRANSCEIVER_INFO_TABLE};
use crate::types::{require_field, MuxTarget};

/// Cap on each individual y-cable firmware call.
pub const DEFAULT_VENDOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-port results of a hardware toggle sweep, in sweep order.
///
/// Ports skipped because they carry no supported mux cable are not listed.
#[derive(Debug, Default)]
pub struct HwmodeReport {
    pub results: Vec<(String, CmdResult<()>)>,
}

impl HwmodeReport {
    /// True when any attempted port failed.
    pub fn failed(&self) -> bool {
        self.results.iter().any(|(_, result)| result.is_err())
    }
}

/// Executes hardware toggles with a per-call timeout on firmware access.
#[derive(Debug, Clone, Copy)]
pub struct ToggleRunner {
    vendor_timeout: Duration,
}

impl ToggleRunner {
    pub fn new() -> Self {
        Self {
            vendor_timeout: DEFAULT_VENDOR_TIMEOUT,
        }
    }

    pub fn with_vendor_timeout(vendor_timeout: Duration) -> Self {
        Self { vendor_timeout }
    }

    /// Toggles the mux at one port to `target`.
    ///
    /// Rejects ports that do not map to exactly one physical port, carry
    /// anything but a supported y-cable, or are not the primary logical port
    /// of their physical port.
    #[instrument(skip(self, ctx, cable))]
    pub async fn toggle_port(
        &self,
        ctx: &CliContext,
        cable: &dyn YCableDriver,
        port: &str,
        target: MuxTarget,
    ) -> CmdResult<()> {
        let shard = ctx.shard_for_port(port)?;

        let physical_ports = ctx.topology().logical_to_physical(port);
        let physical_port = match physical_ports.as_slice() {
            [] => return Err(CmdError::no_physical_port(port)),
            [one] => *one,
            _ => return Err(CmdError::ambiguous_physical_port(port)),
        };

        let transceiver = shard
            .state()
            .get_all(STATE_TRANSCEIVER_INFO_TABLE, port)
            .await?
            .ok_or_else(|| CmdError::no_transceiver(port))?;
        let manufacturer = require_field(
            &transceiver,
            STATE_TRANSCEIVER_INFO_TABLE,
            port,
            transceiver_fields::MANUFACTURER,
        )?;
        let model = require_field(
            &transceiver,
            STATE_TRANSCEIVER_INFO_TABLE,
            port,
            transceiver_fields::MODEL,
        )?;
        if !is_supported_cable(manufacturer, model) {
            return Err(CmdError::unsupported_cable(port, manufacturer, model));
        }

        // Breakout siblings share one mux; only the first logical port
        // drives it.
        let siblings = ctx.topology().physical_to_logical(physical_port);
        if siblings.first().map(String::as_str) != Some(port) {
            return Err(CmdError::not_primary_port(port, physical_port));
        }

        let read_side = self
            .vendor_call(port, "check_read_side", cable.check_read_side(physical_port))
            .await?;
        let direction = self
            .vendor_call(
                port,
                "check_mux_direction",
                cable.check_mux_direction(physical_port),
            )
            .await?;
        debug!(port, "mux currently points at ToR {}", direction);

        let toggled = match (read_side, target) {
            (TorSide::A, MuxTarget::Active) | (TorSide::B, MuxTarget::Standby) => {
                self.vendor_call(
                    port,
                    "toggle_mux_to_tor_a",
                    cable.toggle_mux_to_tor_a(physical_port),
                )
                .await?
            }
            (TorSide::A, MuxTarget::Standby) | (TorSide::B, MuxTarget::Active) => {
                self.vendor_call(
                    port,
                    "toggle_mux_to_tor_b",
                    cable.toggle_mux_to_tor_b(physical_port),
                )
                .await?
            }
        };
        if !toggled {
            return Err(CmdError::toggle_refused(port, target));
        }

        info!(port, "toggled mux to {} from read side {}", target, read_side);
        Ok(())
    }

    /// Toggles every logical port on the switch to `target`.
    ///
    /// Ports without a supported mux cable are skipped silently; everything
    /// else is attempted and recorded.
    pub async fn toggle_all(
        &self,
        ctx: &CliContext,
        cable: &dyn YCableDriver,
        target: MuxTarget,
    ) -> HwmodeReport {
        let mut report = HwmodeReport::default();
        for port in ctx.topology().logical_ports() {
            match self.toggle_port(ctx, cable, &port, target).await {
                Ok(()) => report.results.push((port, Ok(()))),
                Err(err) if err.is_batch_skip() => {
                    debug!(port = %port, "skipping: {}", err);
                }
                Err(err) => report.results.push((port, Err(err))),
            }
        }
        report
    }

    async fn vendor_call<T>(
        &self,
        port: &str,
        operation: &'static str,
        call: impl Future<Output = sonic_y_cable::YCableResult<T>>,
    ) -> CmdResult<T> {
        match tokio::time::timeout(self.vendor_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(port, operation, "vendor call timed out");
                Err(CmdError::vendor_timeout(port, operation, self.vendor_timeout))
            }
        }
    }
}

impl Default for ToggleRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use sonic_cli_common::{field_values, MemDb, PortMap, PortTopology};
    use sonic_y_cable::{VENDOR_MODEL, VENDOR_NAME, YCableError, YCableResult};

    use super::*;
    use crate::context::DbShard;

    #[derive(Default)]
    struct StubCable {
        read_sides: HashMap<u32, TorSide>,
        refuse: HashSet<u32>,
        delays: HashMap<u32, Duration>,
        calls: Mutex<Vec<(&'static str, u32)>>,
    }

    impl StubCable {
        fn with_read_side(physical_port: u32, side: TorSide) -> Self {
            let mut cable = Self::default();
            cable.read_sides.insert(physical_port, side);
            cable
        }

        async fn record(&self, operation: &'static str, physical_port: u32) {
            if let Some(delay) = self.delays.get(&physical_port) {
                tokio::time::sleep(*delay).await;
            }
            self.calls.lock().unwrap().push((operation, physical_port));
        }

        fn calls(&self) -> Vec<(&'static str, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl YCableDriver for StubCable {
        async fn check_read_side(&self, physical_port: u32) -> YCableResult<TorSide> {
            self.record("check_read_side", physical_port).await;
            self.read_sides.get(&physical_port).copied().ok_or_else(|| {
                YCableError::operation(physical_port, "check_read_side", "link down")
            })
        }

        async fn check_mux_direction(&self, physical_port: u32) -> YCableResult<TorSide> {
            self.record("check_mux_direction", physical_port).await;
            self.read_sides.get(&physical_port).copied().ok_or_else(|| {
                YCableError::operation(physical_port, "check_mux_direction", "link down")
            })
        }

        async fn toggle_mux_to_tor_a(&self, physical_port: u32) -> YCableResult<bool> {
            self.record("toggle_mux_to_tor_a", physical_port).await;
            Ok(!self.refuse.contains(&physical_port))
        }

        async fn toggle_mux_to_tor_b(&self, physical_port: u32) -> YCableResult<bool> {
            self.record("toggle_mux_to_tor_b", physical_port).await;
            Ok(!self.refuse.contains(&physical_port))
        }
    }

    fn credo_info() -> sonic_cli_common::FieldValues {
        field_values! {
            transceiver_fields::MANUFACTURER => VENDOR_NAME,
            transceiver_fields::MODEL => VENDOR_MODEL,
        }
    }

    fn other_vendor_info() -> sonic_cli_common::FieldValues {
        field_values! {
            transceiver_fields::MANUFACTURER => "Acme",
            transceiver_fields::MODEL => "AC-1",
        }
    }

    fn test_context(db: Arc<MemDb>) -> CliContext {
        let mut ports = PortMap::new();
        ports.add_port("Ethernet0", 1, 0);
        ports.add_port("Ethernet4", 2, 0);
        ports.add_port("Ethernet8", 3, 0);
        ports.add_port("Ethernet12", 4, 0);
        CliContext::new(Arc::new(ports), vec![DbShard::new(0, db.clone(), db)])
    }

    #[tokio::test]
    async fn test_active_from_read_side_a_toggles_tor_a() {
        let db = Arc::new(MemDb::new().with_entry(
            STATE_TRANSCEIVER_INFO_TABLE,
            "Ethernet0",
            credo_info(),
        ));
        let ctx = test_context(db);
        let cable = StubCable::with_read_side(1, TorSide::A);

        ToggleRunner::new()
            .toggle_port(&ctx, &cable, "Ethernet0", MuxTarget::Active)
            .await
            .unwrap();

        assert_eq!(
            cable.calls(),
            vec![
                ("check_read_side", 1),
                ("check_mux_direction", 1),
                ("toggle_mux_to_tor_a", 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_side_and_target_select_the_primitive() {
        // Forcing `active` steers the mux toward this ToR's read side;
        // `standby` steers it at the other one.
        let cases = [
            (TorSide::A, MuxTarget::Active, "toggle_mux_to_tor_a"),
            (TorSide::B, MuxTarget::Standby, "toggle_mux_to_tor_a"),
            (TorSide::A, MuxTarget::Standby, "toggle_mux_to_tor_b"),
            (TorSide::B, MuxTarget::Active, "toggle_mux_to_tor_b"),
        ];

        for (side, target, primitive) in cases {
            let db = Arc::new(MemDb::new().with_entry(
                STATE_TRANSCEIVER_INFO_TABLE,
                "Ethernet0",
                credo_info(),
            ));
            let ctx = test_context(db);
            let cable = StubCable::with_read_side(1, side);

            ToggleRunner::new()
                .toggle_port(&ctx, &cable, "Ethernet0", target)
                .await
                .unwrap();

            let toggles: Vec<_> = cable
                .calls()
                .into_iter()
                .filter(|(operation, _)| operation.starts_with("toggle"))
                .collect();
            assert_eq!(
                toggles,
                vec![(primitive, 1)],
                "read side {:?}, target {}",
                side,
                target
            );
        }
    }

    #[tokio::test]
    async fn test_secondary_breakout_port_rejected_without_vendor_calls() {
        let mut ports = PortMap::new();
        ports.add_port("Ethernet0", 1, 0);
        ports.add_port("Ethernet1", 1, 0);
        let db = Arc::new(MemDb::new().with_entry(
            STATE_TRANSCEIVER_INFO_TABLE,
            "Ethernet1",
            credo_info(),
        ));
        let ctx = CliContext::new(Arc::new(ports), vec![DbShard::new(0, db.clone(), db)]);
        let cable = StubCable::with_read_side(1, TorSide::A);

        let err = ToggleRunner::new()
            .toggle_port(&ctx, &cable, "Ethernet1", MuxTarget::Active)
            .await
            .unwrap_err();

        assert!(matches!(err, CmdError::NotPrimaryPort { .. }));
        assert!(cable.calls().is_empty());
    }

    #[tokio::test]
    async fn test_multiple_physical_ports_rejected() {
        struct SplitTopology;

        impl PortTopology for SplitTopology {
            fn logical_ports(&self) -> Vec<String> {
                vec!["Ethernet0".to_string()]
            }

            fn asic_id(&self, logical_port: &str) -> Option<u32> {
                (logical_port == "Ethernet0").then_some(0)
            }

            fn logical_to_physical(&self, _logical_port: &str) -> Vec<u32> {
                vec![1, 2]
            }

            fn physical_to_logical(&self, _physical_port: u32) -> Vec<String> {
                vec!["Ethernet0".to_string()]
            }
        }

        let db = Arc::new(MemDb::new());
        let ctx = CliContext::new(
            Arc::new(SplitTopology),
            vec![DbShard::new(0, db.clone(), db)],
        );
        let cable = StubCable::default();

        let err = ToggleRunner::new()
            .toggle_port(&ctx, &cable, "Ethernet0", MuxTarget::Active)
            .await
            .unwrap_err();

        assert!(matches!(err, CmdError::AmbiguousPhysicalPort { .. }));
        assert!(cable.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_cable_is_a_batch_skip() {
        let db = Arc::new(MemDb::new().with_entry(
            STATE_TRANSCEIVER_INFO_TABLE,
            "Ethernet0",
            other_vendor_info(),
        ));
        let ctx = test_context(db);
        let cable = StubCable::default();

        let err = ToggleRunner::new()
            .toggle_port(&ctx, &cable, "Ethernet0", MuxTarget::Active)
            .await
            .unwrap_err();

        assert!(matches!(err, CmdError::UnsupportedCable { .. }));
        assert!(err.is_batch_skip());
        assert!(cable.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_transceiver_is_a_batch_skip() {
        let ctx = test_context(Arc::new(MemDb::new()));
        let cable = StubCable::default();

        let err = ToggleRunner::new()
            .toggle_port(&ctx, &cable, "Ethernet0", MuxTarget::Active)
            .await
            .unwrap_err();

        assert!(matches!(err, CmdError::NoTransceiver { .. }));
        assert!(err.is_batch_skip());
    }

    #[tokio::test]
    async fn test_firmware_refusal_is_an_error() {
        let db = Arc::new(MemDb::new().with_entry(
            STATE_TRANSCEIVER_INFO_TABLE,
            "Ethernet0",
            credo_info(),
        ));
        let ctx = test_context(db);
        let mut cable = StubCable::with_read_side(1, TorSide::A);
        cable.refuse.insert(1);

        let err = ToggleRunner::new()
            .toggle_port(&ctx, &cable, "Ethernet0", MuxTarget::Active)
            .await
            .unwrap_err();

        assert!(matches!(err, CmdError::ToggleRefused { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to toggle mux cable at port Ethernet0 to active"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_skips_unsupported_and_continues_past_errors() {
        let db = Arc::new(
            MemDb::new()
                .with_entry(STATE_TRANSCEIVER_INFO_TABLE, "Ethernet0", credo_info())
                .with_entry(
                    STATE_TRANSCEIVER_INFO_TABLE,
                    "Ethernet4",
                    other_vendor_info(),
                )
                // Ethernet8 carries a supported cable but its link is down.
                .with_entry(STATE_TRANSCEIVER_INFO_TABLE, "Ethernet8", credo_info())
                // Ethernet12's firmware never answers.
                .with_entry(STATE_TRANSCEIVER_INFO_TABLE, "Ethernet12", credo_info()),
        );
        let ctx = test_context(db);
        let mut cable = StubCable::with_read_side(1, TorSide::A);
        cable.delays.insert(4, Duration::from_secs(60));

        let report = ToggleRunner::new()
            .toggle_all(&ctx, &cable, MuxTarget::Active)
            .await;

        assert!(report.failed());
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].0, "Ethernet0");
        assert!(report.results[0].1.is_ok());
        assert_eq!(report.results[1].0, "Ethernet8");
        assert!(matches!(report.results[1].1, Err(CmdError::Cable(_))));
        assert_eq!(report.results[2].0, "Ethernet12");
        assert!(matches!(
            report.results[2].1,
            Err(CmdError::VendorTimeout { .. })
        ));

        let toggles = cable
            .calls()
            .iter()
            .filter(|(operation, _)| operation.starts_with("toggle"))
            .count();
        assert_eq!(toggles, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_vendor_call_times_out() {
        let db = Arc::new(MemDb::new().with_entry(
            STATE_TRANSCEIVER_INFO_TABLE,
            "Ethernet0",
            credo_info(),
        ));
        let ctx = test_context(db);
        let mut cable = StubCable::with_read_side(1, TorSide::A);
        cable.delays.insert(1, Duration::from_secs(60));

        let err = ToggleRunner::with_vendor_timeout(Duration::from_secs(5))
            .toggle_port(&ctx, &cable, "Ethernet0", MuxTarget::Active)
            .await
            .unwrap_err();

        assert!(matches!(err, CmdError::VendorTimeout { .. }));
        assert_eq!(
            err.to_string(),
            "Port Ethernet0: check_read_side timed out after 5 s"
        );
    }
}
