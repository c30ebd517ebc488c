//! Desired-state reconciliation for `muxcable mode`.

use crate::types::{ModeOutcome, MuxCableEntry, MuxMode, MuxState};

/// Decision for one port: what to write back, and what to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Updated desired record, when the stores disagree with the request.
    pub write: Option<MuxCableEntry>,
    /// Outcome reported for the port.
    pub outcome: ModeOutcome,
}

/// Reconciles one port's requested mode against its stores.
///
/// Pure function of its inputs; the caller performs the optional write.
/// Behavior:
///
/// | observed        | desired | requested | write          | outcome    |
/// |-----------------|---------|-----------|----------------|------------|
/// | any             | active  | active    | none           | OK         |
/// | any             | active  | auto      | desired=auto   | OK         |
/// | active          | auto    | active    | desired=active | OK         |
/// | active          | auto    | auto      | none           | OK         |
/// | standby/unknown | auto    | active    | desired=active | INPROGRESS |
/// | standby/unknown | auto    | auto      | none           | OK         |
///
/// Pinning a port `active` while the cable is observed elsewhere is accepted
/// optimistically: the write lands now, the monitoring daemon confirms the
/// failover later, so the result is reported as in progress. Every written
/// record carries the input's server IP fields unchanged.
pub fn reconcile(
    requested: MuxMode,
    observed: MuxState,
    desired: &MuxCableEntry,
) -> Reconciliation {
    match (requested, desired.state) {
        (MuxMode::Active, MuxMode::Active) | (MuxMode::Auto, MuxMode::Auto) => Reconciliation {
            write: None,
            outcome: ModeOutcome::Ok,
        },
        (MuxMode::Auto, MuxMode::Active) => Reconciliation {
            write: Some(desired.with_state(MuxMode::Auto)),
            outcome: ModeOutcome::Ok,
        },
        (MuxMode::Active, MuxMode::Auto) => {
            let outcome = if observed == MuxState::Active {
                ModeOutcome::Ok
            } else {
                ModeOutcome::InProgress
            };
            Reconciliation {
                write: Some(desired.with_state(MuxMode::Active)),
                outcome,
            }
        }
    }
}
