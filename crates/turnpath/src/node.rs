use turnpath_core::{Direction, Known, Point, Range, TileMap};

use crate::params::{SearchParameters, TileBehavior};

/// Search progress of one lattice node.
///
/// Statuses are ordered and a node only ever moves forward. A hazardous
/// node (dangerous, or out of fuel range) may still be relabelled and
/// expanded again after it was processed; its status stays put.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeStatus {
    /// Never looked at.
    #[default]
    Uninit,
    /// Cached tile facts computed, not reached yet.
    Init,
    /// Reached; the best known route is not confirmed yet.
    New,
    /// Confirmed, and queued again to consider spending a turn here.
    Waiting,
    /// Confirmed optimal.
    Processed,
}

/// Zone-of-control class of a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ZocClass {
    /// Neither free to leave nor free to enter.
    #[default]
    No,
    /// Occupied: may be entered (attacked) freely, not left freely.
    Occupied,
    /// Under our control: free to leave and to enter.
    Mine,
}

/// Per-tile facts computed once, when the node leaves `Uninit`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct NodeFacts {
    pub(crate) known: Known,
    pub(crate) behavior: TileBehavior,
    pub(crate) zoc: ZocClass,
    pub(crate) can_invade: bool,
    /// Extra cost of entering the tile.
    pub(crate) extra_tile: u32,
}

impl NodeFacts {
    pub(crate) fn compute<M: TileMap + ?Sized>(
        map: &M,
        params: &SearchParameters<'_>,
        p: Point,
    ) -> Self {
        let known = if params.omniscience {
            Known::KnownSeen
        } else {
            map.known(p, params.owner)
        };
        let behavior = params
            .tile_behavior
            .as_ref()
            .map_or(TileBehavior::Normal, |f| f(p, known, params));
        let zoc = match &params.zoc {
            Some(f) => {
                if map.is_zoc_exempt(p) || known == Known::Unknown || f(params.owner, p) {
                    ZocClass::Mine
                } else if map.is_occupied(p) {
                    ZocClass::Occupied
                } else {
                    ZocClass::No
                }
            }
            None => ZocClass::Mine,
        };
        let can_invade = params
            .can_invade
            .as_ref()
            .is_none_or(|f| f(params.owner, p));
        let extra_tile = params
            .extra_cost
            .as_ref()
            .map_or(0, |f| f(p, known, params));
        Self {
            known,
            behavior,
            zoc,
            can_invade,
            extra_tile,
        }
    }

    /// Whether a move may end on this tile at all.
    #[inline]
    pub(crate) fn enterable(&self) -> bool {
        self.can_invade && self.behavior != TileBehavior::Ignore
    }
}

/// Zone-of-control gate: an agent may leave a tile freely only if it is
/// ours, and may enter freely only a tile that is not foreign-controlled
/// and empty.
#[inline]
pub(crate) fn zoc_allows(params: &SearchParameters<'_>, from: &NodeFacts, to: &NodeFacts) -> bool {
    params.zoc.is_none() || from.zoc == ZocClass::Mine || to.zoc != ZocClass::No
}

/// Cost of the step into `to`, before any turn adjustment.
#[inline]
pub(crate) fn step_cost(
    params: &SearchParameters<'_>,
    from: Point,
    dir: Direction,
    to: Point,
    facts: &NodeFacts,
) -> i32 {
    if facts.known == Known::Unknown {
        return params.unknown_move_cost;
    }
    match &params.move_cost {
        Some(f) => f(from, dir, to, params),
        None => crate::params::IMPOSSIBLE_MC,
    }
}

/// Fields every node shape carries.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct NodeCore {
    pub(crate) cost: i32,
    pub(crate) extra_cost: u32,
    pub(crate) dir_to_here: Option<Direction>,
    pub(crate) facts: NodeFacts,
}

/// Dense, index-addressed array of search nodes plus their statuses.
pub(crate) struct Lattice<N> {
    pub(crate) rng: Range,
    pub(crate) nodes: Vec<N>,
    pub(crate) status: Vec<NodeStatus>,
}

impl<N: Default + Clone> Lattice<N> {
    pub(crate) fn new(rng: Range) -> Self {
        let len = rng.len();
        Self {
            rng,
            nodes: vec![N::default(); len],
            status: vec![NodeStatus::Uninit; len],
        }
    }
}

impl<N> Lattice<N> {
    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.rng.index_of(p)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        self.rng.point_at(idx)
    }

    /// Lattice index of the tile one step from `idx` in direction `dir`.
    #[inline]
    pub(crate) fn neighbor<M: TileMap + ?Sized>(
        &self,
        map: &M,
        idx: usize,
        dir: Direction,
    ) -> Option<usize> {
        map.step(self.point(idx), dir).and_then(|p| self.idx(p))
    }

    /// Raise a node's status. Lowering it is a bug.
    #[inline]
    pub(crate) fn advance(&mut self, idx: usize, status: NodeStatus) {
        debug_assert!(
            status >= self.status[idx],
            "status of {} regressed from {:?} to {:?}",
            self.point(idx),
            self.status[idx],
            status
        );
        self.status[idx] = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MovementProfile;
    use turnpath_core::{Board, PlayerId};

    fn params<'a>() -> SearchParameters<'a> {
        SearchParameters::new(Point::ZERO, PlayerId(1), &MovementProfile::new(3))
    }

    #[test]
    fn status_order_matches_lifecycle() {
        assert!(NodeStatus::Uninit < NodeStatus::Init);
        assert!(NodeStatus::Init < NodeStatus::New);
        assert!(NodeStatus::New < NodeStatus::Waiting);
        assert!(NodeStatus::Waiting < NodeStatus::Processed);
    }

    #[test]
    fn lattice_indexes_like_its_range() {
        let lat: Lattice<NodeCore> = Lattice::new(Range::new(1, 1, 4, 3));
        assert_eq!(lat.nodes.len(), 6);
        assert_eq!(lat.idx(Point::new(1, 1)), Some(0));
        assert_eq!(lat.idx(Point::new(3, 2)), Some(5));
        assert_eq!(lat.point(4), Point::new(2, 2));
        assert_eq!(lat.idx(Point::new(9, 9)), None);
        assert!(lat.status.iter().all(|&s| s == NodeStatus::Uninit));
    }

    #[test]
    #[should_panic(expected = "regressed")]
    #[cfg(debug_assertions)]
    fn advancing_backwards_panics_in_debug() {
        let mut lat: Lattice<NodeCore> = Lattice::new(Range::new(0, 0, 2, 2));
        lat.advance(0, NodeStatus::Processed);
        lat.advance(0, NodeStatus::New);
    }

    #[test]
    fn facts_classify_zoc() {
        let board = Board::from_rows(&[".C.U"], 1);
        let p = params().with_zoc(|_, p| p == Point::new(2, 0));
        let zoc_of = |x| NodeFacts::compute(&board, &p, Point::new(x, 0)).zoc;
        assert_eq!(zoc_of(0), ZocClass::No);
        assert_eq!(zoc_of(1), ZocClass::Mine);
        assert_eq!(zoc_of(2), ZocClass::Mine);
        assert_eq!(zoc_of(3), ZocClass::Occupied);
    }

    #[test]
    fn facts_use_callbacks_once_per_tile() {
        let board = Board::new(3, 1, 1);
        let p = params()
            .with_tile_behavior(|p, _, _| {
                if p.x == 2 {
                    TileBehavior::Ignore
                } else {
                    TileBehavior::Normal
                }
            })
            .with_extra_cost(|p, _, _| p.x as u32 * 10)
            .with_invasion(|_, p| p.x != 1);
        let f0 = NodeFacts::compute(&board, &p, Point::new(0, 0));
        let f1 = NodeFacts::compute(&board, &p, Point::new(1, 0));
        let f2 = NodeFacts::compute(&board, &p, Point::new(2, 0));
        assert!(f0.enterable());
        assert!(!f1.enterable());
        assert!(!f2.enterable());
        assert_eq!(f2.extra_tile, 20);
    }

    #[test]
    fn unknown_tiles_use_flat_cost() {
        let mut board = Board::new(2, 1, 1);
        board.set_all_known(false);
        let mut p = params().with_move_cost(|_, _, _, _| 1);
        p.unknown_move_cost = 7;
        let facts = NodeFacts::compute(&board, &p, Point::new(1, 0));
        assert_eq!(facts.known, Known::Unknown);
        let c = step_cost(&p, Point::ZERO, Direction::East, Point::new(1, 0), &facts);
        assert_eq!(c, 7);
        p.omniscience = true;
        let facts = NodeFacts::compute(&board, &p, Point::new(1, 0));
        let c = step_cost(&p, Point::ZERO, Direction::East, Point::new(1, 0), &facts);
        assert_eq!(c, 1);
    }
}
