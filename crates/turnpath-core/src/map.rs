use crate::geom::{Direction, Point, Range};

/// How much a player knows about a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Known {
    /// Never seen: terrain and contents are unknown.
    #[default]
    Unknown,
    /// Seen before but currently fogged.
    KnownUnseen,
    /// Currently in sight.
    KnownSeen,
}

/// Identity of the player owning a searching agent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u32);

/// Map services consumed by the path-finding engine.
///
/// The engine never inspects terrain or rules content directly; it only
/// walks adjacency and asks these questions when a tile is first visited.
pub trait TileMap {
    /// The rectangle covered by the map. Every tile the engine can reach
    /// must lie inside it.
    fn range(&self) -> Range;

    /// The tile adjacent to `p` in direction `dir`, or `None` at the map
    /// edge.
    fn step(&self, p: Point, dir: Direction) -> Option<Point> {
        let n = p.step(dir);
        self.range().contains(n).then_some(n)
    }

    /// What `player` knows about tile `p`.
    fn known(&self, p: Point, player: PlayerId) -> Known;

    /// Whether any unit or a city stands on `p`.
    fn is_occupied(&self, p: Point) -> bool;

    /// Whether zone-of-control never restricts movement from or into `p`
    /// (cities, ocean and the like).
    fn is_zoc_exempt(&self, p: Point) -> bool;

    /// Whether `p` holds units or a city hostile to `player`.
    fn is_enemy_tile(&self, p: Point, player: PlayerId) -> bool;
}
