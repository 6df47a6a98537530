//! Typed engine errors.
//!
//! `ParameterError` covers construction-time misconfiguration only. An
//! unreachable tile is not an error: queries report it through
//! [`IMPOSSIBLE_MC`](crate::IMPOSSIBLE_MC) or `None`.

use std::fmt;

use turnpath_core::Point;

/// A [`SearchParameters`](crate::SearchParameters) value the engine cannot
/// run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// Neither a move-cost nor a combined-cost callback was supplied.
    MissingMoveCost,
    /// `move_rate` must be at least 1.
    NonPositiveMoveRate { move_rate: i32 },
    /// Fuel mode needs a fuel capacity of at least one turn.
    NonPositiveFuel { fuel: i32 },
    /// The start tile lies outside the map.
    StartOutsideMap { start: Point },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMoveCost => {
                write!(f, "no move-cost or combined-cost callback supplied")
            }
            Self::NonPositiveMoveRate { move_rate } => {
                write!(f, "move rate must be positive, got {move_rate}")
            }
            Self::NonPositiveFuel { fuel } => {
                write!(f, "fuel capacity must be positive, got {fuel}")
            }
            Self::StartOutsideMap { start } => {
                write!(f, "start tile {start} is outside the map")
            }
        }
    }
}

impl std::error::Error for ParameterError {}

/// Failure to join two paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The appended path does not start where the first one ends.
    Disjoint { end: Point, start: Point },
    /// Both paths meet on the same tile but disagree on the moves left there.
    MovesMismatch { tile: Point, end: i32, start: i32 },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disjoint { end, start } => {
                write!(f, "path ending at {end} cannot continue from {start}")
            }
            Self::MovesMismatch { tile, end, start } => write!(
                f,
                "paths meet at {tile} with {end} and {start} moves left"
            ),
        }
    }
}

impl std::error::Error for PathError {}
