//! Pure scan transition rules.

use crate::types::{Phase, PhaseState, ScanMode, Status, Trigger};

/// What a scan should do to a batch in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// VIEW: read only.
    Read,
    /// IN/OUT on a completed batch.
    Terminal,
    /// The transition would leave the state as it is.
    Same,
    /// Write `to`.
    Move { to: PhaseState, trigger: Trigger },
}

/// IN starts work on `target`. OUT finishes `target`: the batch waits at
/// the next phase, or completes after Packaging.
pub fn plan(current: PhaseState, mode: ScanMode, target: Phase) -> Plan {
    let trigger = match mode {
        ScanMode::View => return Plan::Read,
        ScanMode::In => Trigger::ScanIn,
        ScanMode::Out => Trigger::ScanOut,
    };
    if current.is_terminal() {
        return Plan::Terminal;
    }

    let to = match (mode, target.successor()) {
        (ScanMode::Out, Some(next)) => PhaseState::new(next, Status::Pending),
        (ScanMode::Out, None) => PhaseState::TERMINAL,
        _ => PhaseState::new(target, Status::InProgress),
    };
    if to == current {
        Plan::Same
    } else {
        Plan::Move { to, trigger }
    }
}
