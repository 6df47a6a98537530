//! The [`PathFinder`] handle and the query loop shared by every engine.

use turnpath_core::{Point, Range, TileMap};

use crate::danger::DangerMap;
use crate::error::ParameterError;
use crate::fuel::FuelMap;
use crate::jumbo::JumboMap;
use crate::node::NodeStatus;
use crate::normal::NormalMap;
use crate::params::{IMPOSSIBLE_MC, SearchMode, SearchParameters};
use crate::position::{Path, Position};

/// One search variant.
///
/// `cursor` is the most recently resolved node. `iterate` expands it and
/// moves the cursor to the next resolved node, returning `false` (with
/// the cursor left in place) when nothing is left to resolve.
pub(crate) trait Engine<'a> {
    fn params(&self) -> &SearchParameters<'a>;
    fn lattice_range(&self) -> Range;
    fn cursor(&self) -> usize;
    fn status(&self, idx: usize) -> NodeStatus;
    fn iterate(&mut self) -> bool;

    /// Whether the node holds its final answer.
    fn is_resolved(&self, idx: usize) -> bool;

    /// Whether the node may be a destination at all. May compute the
    /// node's cached facts.
    fn is_destination(&mut self, _idx: usize) -> bool {
        true
    }

    fn position(&self, idx: usize) -> Position;
    fn path(&self, idx: usize) -> Path;
}

/// A lazy, resumable search from one start tile.
///
/// Queries expand the frontier only as far as needed and remember where
/// they stopped, so they may be interleaved in any tile order. Once the
/// frontier is exhausted, queries about unreached tiles answer at once.
///
/// ```
/// use turnpath::{MovementProfile, PathFinder, SearchParameters};
/// use turnpath_core::{Board, PlayerId, Point};
///
/// let board = Board::new(5, 5, 1);
/// let params = SearchParameters::new(Point::ZERO, PlayerId(0), &MovementProfile::new(3))
///     .with_move_cost(|_, _, to, _| board.move_cost(to).unwrap_or(-1));
/// let mut pf = PathFinder::new(&board, params).unwrap();
/// assert_eq!(pf.move_cost(Point::new(4, 0)), 4);
/// ```
pub struct PathFinder<'a> {
    engine: Box<dyn Engine<'a> + 'a>,
    mode: SearchMode,
    exhausted: bool,
}

impl<'a> PathFinder<'a> {
    /// Create a search over `map`, selecting the engine variant from the
    /// callbacks present in `params`.
    pub fn new<M: TileMap + ?Sized + 'a>(
        map: &'a M,
        params: SearchParameters<'a>,
    ) -> Result<Self, ParameterError> {
        if params.move_rate <= 0 {
            return Err(ParameterError::NonPositiveMoveRate {
                move_rate: params.move_rate,
            });
        }
        if params.move_cost.is_none() && params.combined_cost.is_none() {
            return Err(ParameterError::MissingMoveCost);
        }
        let Some(start) = map.range().index_of(params.start_tile) else {
            return Err(ParameterError::StartOutsideMap {
                start: params.start_tile,
            });
        };
        let mode = params.mode();
        if mode == SearchMode::Fuel && params.fuel < 1 {
            return Err(ParameterError::NonPositiveFuel { fuel: params.fuel });
        }
        if params.is_dangerous.is_some() && params.fuel_distance.is_some() {
            log::error!("danger and fuel constraints cannot be combined, ignoring fuel");
        }

        log::debug!("creating {mode} path-finding map from {}", params.start_tile);
        let engine: Box<dyn Engine<'a> + 'a> = match mode {
            SearchMode::Normal => Box::new(NormalMap::new(map, params, start)),
            SearchMode::Danger => Box::new(DangerMap::new(map, params, start)),
            SearchMode::Fuel => Box::new(FuelMap::new(map, params, start)),
            SearchMode::Jumbo => Box::new(JumboMap::new(map, params, start)),
        };
        Ok(Self {
            engine,
            mode,
            exhausted: false,
        })
    }

    #[inline]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    #[inline]
    pub fn parameters(&self) -> &SearchParameters<'a> {
        self.engine.params()
    }

    /// Whether every reachable tile has been resolved.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Resolve one more tile. Returns `false` once the search is
    /// exhausted; the cursor then stays on the last resolved tile.
    pub fn iterate(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if !self.engine.iterate() {
            log::debug!("{} search from {} exhausted", self.mode, self.parameters().start_tile);
            self.exhausted = true;
            return false;
        }
        true
    }

    /// The most recently resolved tile.
    pub fn cursor(&self) -> Point {
        self.engine.lattice_range().point_at(self.engine.cursor())
    }

    pub fn current_position(&self) -> Position {
        self.engine.position(self.engine.cursor())
    }

    pub fn current_path(&self) -> Path {
        self.engine.path(self.engine.cursor())
    }

    /// Search status of `tile`; `Uninit` outside the map.
    pub fn status(&self, tile: Point) -> NodeStatus {
        self.engine
            .lattice_range()
            .index_of(tile)
            .map_or(NodeStatus::Uninit, |idx| self.engine.status(idx))
    }

    /// Move cost of the best route to `tile`, or [`IMPOSSIBLE_MC`].
    pub fn move_cost(&mut self, tile: Point) -> i32 {
        match self.resolve(tile) {
            Some(idx) => self.engine.position(idx).total_mc,
            None => IMPOSSIBLE_MC,
        }
    }

    /// The best route to `tile`, start and destination included.
    pub fn path(&mut self, tile: Point) -> Option<Path> {
        self.resolve(tile).map(|idx| self.engine.path(idx))
    }

    /// What the agent's state will be on reaching `tile`.
    pub fn position(&mut self, tile: Point) -> Option<Position> {
        self.resolve(tile).map(|idx| self.engine.position(idx))
    }

    /// Walk the search one resolved tile at a time, starting with the
    /// current cursor.
    pub fn tiles(&mut self) -> Tiles<'_, 'a> {
        Tiles {
            pf: self,
            started: false,
        }
    }

    /// Iterate until `tile` is resolved. `None` if it never will be.
    fn resolve(&mut self, tile: Point) -> Option<usize> {
        let idx = self.engine.lattice_range().index_of(tile)?;
        if !self.engine.is_destination(idx) {
            return None;
        }
        loop {
            if idx == self.engine.cursor() || self.engine.is_resolved(idx) {
                return Some(idx);
            }
            if !self.iterate() {
                // The last expansion may still have settled it.
                return self.engine.is_resolved(idx).then_some(idx);
            }
        }
    }
}

impl std::fmt::Debug for PathFinder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathFinder")
            .field("mode", &self.mode)
            .field("cursor", &self.cursor())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

/// Iterator over resolved tiles, see [`PathFinder::tiles`].
pub struct Tiles<'f, 'a> {
    pf: &'f mut PathFinder<'a>,
    started: bool,
}

impl Iterator for Tiles<'_, '_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if !self.started {
            self.started = true;
            return Some(self.pf.cursor());
        }
        self.pf.iterate().then(|| self.pf.cursor())
    }
}
