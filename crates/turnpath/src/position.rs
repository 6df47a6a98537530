use std::fmt;

use turnpath_core::{Direction, Point};

use crate::error::PathError;
use crate::params::SearchParameters;

/// Everything known about reaching one tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub tile: Point,
    /// Turn in which the tile is reached; 0 is the current turn.
    pub turn: i32,
    /// Move fragments left in that turn.
    pub moves_left: i32,
    /// Whole turns of fuel left (always 1 outside fuel mode).
    pub fuel_left: i32,
    /// Move fragments spent since the start, waiting included.
    pub total_mc: i32,
    pub total_ec: u32,
    pub dir_to_here: Option<Direction>,
    /// Direction of the next step; `None` on the last position and where
    /// the agent waits for the next turn.
    pub dir_to_next: Option<Direction>,
}

impl Position {
    /// Turn internal cost bookkeeping into caller-facing fields.
    pub(crate) fn from_cost(
        params: &SearchParameters<'_>,
        tile: Point,
        cost: i32,
        extra_cost: u32,
        dir_to_here: Option<Direction>,
    ) -> Self {
        Self {
            tile,
            turn: params.turns(cost),
            moves_left: params.moves_left(cost),
            fuel_left: 1,
            total_mc: params.external_cost(cost),
            total_ec: extra_cost,
            dir_to_here,
            dir_to_next: None,
        }
    }
}

/// An owned route from the start tile to a destination, both inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    positions: Vec<Position>,
}

impl Path {
    /// Wrap an ordered list of positions.
    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn first(&self) -> Option<&Position> {
        self.positions.first()
    }

    /// The destination.
    #[inline]
    pub fn last(&self) -> Option<&Position> {
        self.positions.last()
    }

    /// Tiles visited in order. A tile appears twice where the agent waits.
    pub fn tiles(&self) -> impl Iterator<Item = Point> + '_ {
        self.positions.iter().map(|p| p.tile)
    }

    /// Append `other`, which must start where `self` ends.
    ///
    /// The shared position is kept once, taking its outgoing direction from
    /// `other`. An empty `self` simply becomes a copy of `other`.
    pub fn concat(&mut self, other: &Path) -> Result<(), PathError> {
        let Some(head) = other.first() else {
            return Ok(());
        };
        let Some(last) = self.positions.last().copied() else {
            self.positions = other.positions.clone();
            return Ok(());
        };
        if last.tile != head.tile {
            return Err(PathError::Disjoint {
                end: last.tile,
                start: head.tile,
            });
        }
        if last.moves_left != head.moves_left {
            return Err(PathError::MovesMismatch {
                tile: last.tile,
                end: last.moves_left,
                start: head.moves_left,
            });
        }
        self.positions.pop();
        self.positions.push(Position {
            dir_to_here: last.dir_to_here,
            ..*head
        });
        self.positions.extend_from_slice(&other.positions[1..]);
        Ok(())
    }

    /// Drop every position before the first one on `tile`.
    ///
    /// Returns `false`, leaving the path untouched, if `tile` is not on it.
    pub fn advance_to(&mut self, tile: Point) -> bool {
        match self.positions.iter().position(|p| p.tile == tile) {
            Some(i) => {
                self.positions.drain(..i);
                true
            }
            None => false,
        }
    }

    /// Write the path to the log at `level`, one line per position.
    pub fn log(&self, level: log::Level) {
        if !log::log_enabled!(level) {
            return;
        }
        log::log!(level, "path consists of {} positions:", self.len());
        for (i, pos) in self.positions.iter().enumerate() {
            log::log!(level, "  {:2}/{:2}: {}", i + 1, self.len(), DisplayPos(pos));
        }
    }
}

struct DisplayPos<'p>(&'p Position);

impl fmt::Display for DisplayPos<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        let dir = p.dir_to_next.map_or("-", Direction::name);
        write!(
            f,
            "{} dir={:<2} cost={} (turn {}, {} left, fuel {}) ec={}",
            p.tile, dir, p.total_mc, p.turn, p.moves_left, p.fuel_left, p.total_ec
        )
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pos) in self.positions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:2}/{:2}: {}", i + 1, self.len(), DisplayPos(pos))?;
        }
        Ok(())
    }
}
