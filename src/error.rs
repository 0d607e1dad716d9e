use thiserror::Error;

use crate::{
    storage::entities::{PomId, PomStatus},
    utils::hours::HoursParseError,
};

/// Precondition violations of pom operations. Any of them aborts the current command and leaves the
/// document as it was.
#[derive(Debug, Error, PartialEq)]
pub enum PomError {
    #[error("no pom with id {0}")]
    UnknownPom(PomId),
    #[error("no archived pom at position {position} of day {day}")]
    UnknownArchivedPom { day: usize, position: usize },
    #[error("pom {id} can't go from {from} to {to}")]
    InvalidTransition {
        id: PomId,
        from: PomStatus,
        to: PomStatus,
    },
    #[error("estimate should be a positive amount of hours, got {0}")]
    InvalidEstimate(f64),
    #[error("pom title can't be empty")]
    EmptyTitle,
    #[error("pom {id} is inconsistent: {reason}")]
    Corrupt { id: PomId, reason: &'static str },
    #[error(transparent)]
    Hours(#[from] HoursParseError),
}
