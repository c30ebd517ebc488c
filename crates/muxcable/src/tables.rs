//! Table, field, and exit-code constants for muxcable

// CONFIG_DB tables
pub const CFG_MUX_CABLE_TABLE: &str = "MUX_CABLE";
pub const CFG_PEER_SWITCH_TABLE: &str = "PEER_SWITCH";

// STATE_DB tables (read-only)
pub const STATE_MUX_CABLE_TABLE: &str = "MUX_CABLE_TABLE";
pub const STATE_TRANSCEIVER_INFO_TABLE: &str = "TRANSCEIVER_INFO";

/// MUX_CABLE table fields (CONFIG_DB)
pub mod mux_cable_fields {
    pub const STATE: &str = "state";
    pub const SERVER_IPV4: &str = "server_ipv4";
    pub const SERVER_IPV6: &str = "server_ipv6";
}

/// MUX_CABLE_TABLE fields (STATE_DB)
pub mod mux_state_fields {
    pub const STATE: &str = "state";
    pub const HEALTH: &str = "health";
}

/// TRANSCEIVER_INFO table fields
pub mod transceiver_fields {
    pub const MANUFACTURER: &str = "manufacturer";
    pub const MODEL: &str = "model";
}

/// PEER_SWITCH table fields
pub mod peer_fields {
    pub const ADDRESS_IPV4: &str = "address_ipv4";
}

// Process exit codes, part of the CLI contract consumed by orchestration
// scripts.
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_CONFIG_SUCCESSFUL: u8 = 100;
pub const EXIT_SHOW_CONFIG_SUCCESSFUL: u8 = 101;
pub const EXIT_SHOW_STATUS_SUCCESSFUL: u8 = 102;
pub const EXIT_FAIL: u8 = 1;
