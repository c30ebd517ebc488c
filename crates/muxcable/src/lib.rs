//! muxcable - mux cable operator CLI for SONiC dual-ToR switches
//!
//! On a dual-ToR rack each server connects to both ToRs through a Y-cable
//! whose mux decides which ToR carries traffic. This crate implements the
//! operator commands for those cables:
//! - Mode reconciliation between CONFIG_DB and STATE_DB (`config muxcable mode`)
//! - Direct firmware toggles through the vendor driver (`config muxcable hwmode state`)
//! - Read-only status and configuration views (`show muxcable status|config`)

pub mod context;
pub mod error;
pub mod hwmode;
pub mod mode;
pub mod output;
pub mod reconcile;
pub mod show;
pub mod tables;
pub mod types;

pub use context::{CliContext, DbShard};
pub use error::{CmdError, CmdResult};
pub use hwmode::ToggleRunner;
pub use types::{ModeOutcome, MuxCableEntry, MuxMode, MuxState, MuxTarget};
