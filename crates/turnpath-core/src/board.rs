//! A dense, in-memory [`TileMap`].
//!
//! [`Board`] stores one [`TileInfo`] per tile in row-major order. It is the
//! map used throughout the test suites and a ready-made collaborator for
//! callers that have no map model of their own.

use std::collections::BTreeMap;

use crate::geom::{Point, Range};
use crate::map::{Known, PlayerId, TileMap};

/// Everything a [`Board`] records about one tile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileInfo {
    /// Cost of entering the tile, or `None` if it is impassable.
    pub move_cost: Option<i32>,
    /// Owner of the units standing here, if any.
    pub units: Option<PlayerId>,
    /// Owner of the city on this tile, if any.
    pub city: Option<PlayerId>,
    pub ocean: bool,
}

impl TileInfo {
    /// A passable, empty land tile with the given entry cost.
    pub const fn land(move_cost: i32) -> Self {
        Self {
            move_cost: Some(move_cost),
            units: None,
            city: None,
            ocean: false,
        }
    }

    /// An impassable tile.
    pub const fn blocked() -> Self {
        Self {
            move_cost: None,
            units: None,
            city: None,
            ocean: false,
        }
    }
}

/// A rectangular map of [`TileInfo`] records.
///
/// Every player knows every tile until [`set_all_known`] switches to
/// per-player knowledge, where tiles start [`Known::Unknown`].
///
/// [`set_all_known`]: Board::set_all_known
#[derive(Debug, Clone)]
pub struct Board {
    bounds: Range,
    tiles: Vec<TileInfo>,
    known: BTreeMap<PlayerId, Vec<Known>>,
    all_known: bool,
}

impl Board {
    /// Create a `width` × `height` board of land tiles with cost `move_cost`.
    pub fn new(width: i32, height: i32, move_cost: i32) -> Self {
        let bounds = Range::new(0, 0, width, height);
        Self {
            bounds,
            tiles: vec![TileInfo::land(move_cost); bounds.len()],
            known: BTreeMap::new(),
            all_known: true,
        }
    }

    /// Build a board from rows of characters.
    ///
    /// `.` is land with cost `move_cost`, `#` is impassable, `~` is ocean
    /// (impassable by cost, exempt from zone of control), `C` is a city and
    /// `U` a unit, both owned by `PlayerId(1)`. Digits `1`-`9` are land with
    /// that entry cost. Rows shorter than the first are padded with land.
    pub fn from_rows(rows: &[&str], move_cost: i32) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        let mut board = Self::new(width, height, move_cost);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                let Some(tile) = board.at_mut(p) else {
                    continue;
                };
                match ch {
                    '#' => *tile = TileInfo::blocked(),
                    '~' => {
                        *tile = TileInfo::blocked();
                        tile.ocean = true;
                    }
                    'C' => tile.city = Some(PlayerId(1)),
                    'U' => tile.units = Some(PlayerId(1)),
                    d @ '1'..='9' => tile.move_cost = d.to_digit(10).map(|v| v as i32),
                    _ => {}
                }
            }
        }
        board
    }

    /// The covered rectangle.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// The tile at `p`, if inside the board.
    pub fn at(&self, p: Point) -> Option<&TileInfo> {
        self.bounds.index_of(p).map(|i| &self.tiles[i])
    }

    /// Mutable access to the tile at `p`, if inside the board.
    pub fn at_mut(&mut self, p: Point) -> Option<&mut TileInfo> {
        self.bounds.index_of(p).map(|i| &mut self.tiles[i])
    }

    /// Replace the tile at `p`. Out-of-range points are ignored.
    pub fn set(&mut self, p: Point, tile: TileInfo) {
        if let Some(slot) = self.at_mut(p) {
            *slot = tile;
        }
    }

    /// Entry cost of `p`, `None` when impassable or outside the board.
    pub fn move_cost(&self, p: Point) -> Option<i32> {
        self.at(p).and_then(|t| t.move_cost)
    }

    /// When `true`, every player knows every tile (the default).
    pub fn set_all_known(&mut self, all_known: bool) {
        self.all_known = all_known;
    }

    /// Record what `player` knows about `p`.
    pub fn set_known(&mut self, p: Point, player: PlayerId, known: Known) {
        let Some(i) = self.bounds.index_of(p) else {
            return;
        };
        let len = self.tiles.len();
        self.known
            .entry(player)
            .or_insert_with(|| vec![Known::Unknown; len])[i] = known;
    }
}

impl TileMap for Board {
    fn range(&self) -> Range {
        self.bounds
    }

    fn known(&self, p: Point, player: PlayerId) -> Known {
        if self.all_known {
            return Known::KnownSeen;
        }
        match (self.bounds.index_of(p), self.known.get(&player)) {
            (Some(i), Some(k)) => k[i],
            _ => Known::Unknown,
        }
    }

    fn is_occupied(&self, p: Point) -> bool {
        self.at(p)
            .is_some_and(|t| t.units.is_some() || t.city.is_some())
    }

    fn is_zoc_exempt(&self, p: Point) -> bool {
        self.at(p).is_some_and(|t| t.city.is_some() || t.ocean)
    }

    fn is_enemy_tile(&self, p: Point, player: PlayerId) -> bool {
        self.at(p).is_some_and(|t| {
            t.units.is_some_and(|o| o != player) || t.city.is_some_and(|o| o != player)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Direction;

    #[test]
    fn from_rows_parses_symbols() {
        let b = Board::from_rows(&[".#~", "C3U"], 1);
        assert_eq!(b.bounds(), Range::new(0, 0, 3, 2));
        assert_eq!(b.move_cost(Point::new(0, 0)), Some(1));
        assert_eq!(b.move_cost(Point::new(1, 0)), None);
        assert!(b.is_zoc_exempt(Point::new(2, 0)));
        assert!(b.is_zoc_exempt(Point::new(0, 1)));
        assert_eq!(b.move_cost(Point::new(1, 1)), Some(3));
        assert!(b.is_occupied(Point::new(2, 1)));
        assert!(!b.is_occupied(Point::new(1, 1)));
    }

    #[test]
    fn enemy_tiles_depend_on_player() {
        let b = Board::from_rows(&["CU."], 1);
        assert!(!b.is_enemy_tile(Point::new(0, 0), PlayerId(1)));
        assert!(b.is_enemy_tile(Point::new(0, 0), PlayerId(2)));
        assert!(b.is_enemy_tile(Point::new(1, 0), PlayerId(2)));
        assert!(!b.is_enemy_tile(Point::new(2, 0), PlayerId(2)));
    }

    #[test]
    fn knowledge_is_per_player() {
        let mut b = Board::new(2, 2, 1);
        assert_eq!(b.known(Point::new(0, 0), PlayerId(3)), Known::KnownSeen);
        b.set_all_known(false);
        assert_eq!(b.known(Point::new(0, 0), PlayerId(3)), Known::Unknown);
        b.set_known(Point::new(0, 0), PlayerId(3), Known::KnownUnseen);
        assert_eq!(b.known(Point::new(0, 0), PlayerId(3)), Known::KnownUnseen);
        assert_eq!(b.known(Point::new(0, 0), PlayerId(4)), Known::Unknown);
    }

    #[test]
    fn step_stops_at_edges() {
        let b = Board::new(2, 2, 1);
        let corner = Point::new(0, 0);
        assert_eq!(b.step(corner, Direction::East), Some(Point::new(1, 0)));
        assert_eq!(b.step(corner, Direction::North), None);
        assert_eq!(b.step(corner, Direction::NorthWest), None);
        assert_eq!(b.step(corner, Direction::SouthEast), Some(Point::new(1, 1)));
    }

    #[test]
    fn set_ignores_out_of_range() {
        let mut b = Board::new(1, 1, 1);
        b.set(Point::new(4, 4), TileInfo::blocked());
        assert_eq!(b.move_cost(Point::new(0, 0)), Some(1));
    }
}
