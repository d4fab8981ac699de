//! Production phases, batch status and scanner modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A string that names no variant of one of the enums below.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Fixed, totally ordered production pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Cutting,
    Sewing,
    Packaging,
}

impl Phase {
    pub const SEQUENCE: [Phase; 3] = [Phase::Cutting, Phase::Sewing, Phase::Packaging];

    /// Row id in `production_phases`.
    pub fn id(self) -> i64 {
        match self {
            Self::Cutting => 1,
            Self::Sewing => 2,
            Self::Packaging => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::SEQUENCE.into_iter().find(|p| p.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Cutting => "Cutting",
            Self::Sewing => "Sewing",
            Self::Packaging => "Packaging",
        }
    }

    /// The next phase, or `None` after Packaging.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Cutting => Some(Self::Sewing),
            Self::Sewing => Some(Self::Packaging),
            Self::Packaging => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::SEQUENCE
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "phase",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    /// Label stored in `batches.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// A batch's position in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: Phase,
    pub status: Status,
}

impl PhaseState {
    pub const INITIAL: PhaseState = PhaseState::new(Phase::Cutting, Status::Pending);
    pub const TERMINAL: PhaseState = PhaseState::new(Phase::Packaging, Status::Completed);

    pub const fn new(phase: Phase, status: Status) -> Self {
        Self { phase, status }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    /// `Completed` only ever pairs with `Packaging`.
    pub fn is_consistent(self) -> bool {
        self.status != Status::Completed || self.phase == Phase::Packaging
    }
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.phase, self.status)
    }
}

/// Scanner station mode chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanMode {
    View,
    In,
    Out,
}

impl ScanMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Whether a scan in this mode may write.
    pub fn mutates(self) -> bool {
        !matches!(self, Self::View)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VIEW" => Ok(Self::View),
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            _ => Err(UnknownVariant {
                kind: "scan mode",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_and_successors() {
        assert!(Phase::Cutting < Phase::Sewing && Phase::Sewing < Phase::Packaging);
        assert_eq!(Phase::Cutting.successor(), Some(Phase::Sewing));
        assert_eq!(Phase::Sewing.successor(), Some(Phase::Packaging));
        assert_eq!(Phase::Packaging.successor(), None);
    }

    #[test]
    fn phase_ids_round_trip() {
        for phase in Phase::SEQUENCE {
            assert_eq!(Phase::from_id(phase.id()), Some(phase));
        }
        assert_eq!(Phase::from_id(0), None);
        assert_eq!(Phase::from_id(4), None);
    }

    #[test]
    fn phase_parse_is_case_insensitive() {
        assert_eq!(" sewing ".parse::<Phase>().unwrap(), Phase::Sewing);
        let err = "Ironing".parse::<Phase>().unwrap_err();
        assert_eq!(err.kind, "phase");
    }

    #[test]
    fn status_label_has_space() {
        assert_eq!(Status::InProgress.as_str(), "In Progress");
        assert_eq!("in progress".parse::<Status>().unwrap(), Status::InProgress);
    }

    #[test]
    fn completed_requires_packaging() {
        assert!(PhaseState::TERMINAL.is_consistent());
        assert!(!PhaseState::new(Phase::Sewing, Status::Completed).is_consistent());
        assert!(PhaseState::INITIAL.is_consistent());
    }

    #[test]
    fn scan_mode_parse() {
        assert_eq!("out".parse::<ScanMode>().unwrap(), ScanMode::Out);
        assert!("SIDEWAYS".parse::<ScanMode>().is_err());
        assert!(!ScanMode::View.mutates());
    }

    #[test]
    fn serde_labels_match_stored_text() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"In Progress\"");
        assert_eq!(serde_json::to_string(&ScanMode::Out).unwrap(), "\"OUT\"");
        let state: PhaseState =
            serde_json::from_str(r#"{"phase":"Packaging","status":"Completed"}"#).unwrap();
        assert!(state.is_terminal());
    }
}
