//! Cost-to-target queries for many kinds of agent.
//!
//! A [`ReverseMap`] answers "how long would an agent of kind `K` standing on
//! tile X need to reach the target?". It runs one search per kind outwards
//! from the target, pricing each edge in the direction the agent would
//! actually walk it.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use turnpath_core::{Direction, PlayerId, Point, TileMap};

use crate::params::{Edge, IMPOSSIBLE_MC, MovementProfile, MoveCostFn, SearchParameters};
use crate::pathfinder::PathFinder;
use crate::position::Position;

/// Movement rules of one kind of agent.
pub struct AgentKind<'a> {
    pub profile: MovementProfile,
    /// Forward move cost, as the agent walking `from --dir--> to` pays it.
    pub move_cost: MoveCostFn<'a>,
}

impl<'a> AgentKind<'a> {
    pub fn new(
        profile: MovementProfile,
        move_cost: impl Fn(Point, Direction, Point, &SearchParameters<'a>) -> i32 + 'a,
    ) -> Self {
        Self {
            profile,
            move_cost: Box::new(move_cost),
        }
    }
}

type KindProvider<'a, K> = Box<dyn Fn(&K) -> AgentKind<'a> + 'a>;

/// Searches towards one target tile, one per agent kind, created on first
/// use.
pub struct ReverseMap<'a, M: TileMap + ?Sized, K> {
    map: &'a M,
    target: Point,
    owner: PlayerId,
    max_turns: Option<i32>,
    omniscience: bool,
    provider: KindProvider<'a, K>,
    /// `None` records a kind whose search could not be created.
    finders: FxHashMap<K, Option<PathFinder<'a>>>,
}

impl<'a, M, K> ReverseMap<'a, M, K>
where
    M: TileMap + ?Sized + 'a,
    K: Eq + Hash + Clone,
{
    /// `provider` maps an agent kind to its movement rules. Routes longer
    /// than `max_turns` full turns are not searched.
    ///
    /// The searches price every edge through the kind's move-cost callback
    /// and never consult the map's tile knowledge themselves. `omniscience`
    /// is copied into [`SearchParameters::omniscience`] for those callbacks
    /// to honour.
    pub fn new(
        map: &'a M,
        owner: PlayerId,
        target: Point,
        max_turns: Option<i32>,
        omniscience: bool,
        provider: impl Fn(&K) -> AgentKind<'a> + 'a,
    ) -> Self {
        Self {
            map,
            target,
            owner,
            max_turns,
            omniscience,
            provider: Box::new(provider),
            finders: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Move cost for an agent of `kind` to get from `from` to the target,
    /// or [`IMPOSSIBLE_MC`].
    pub fn move_cost(&mut self, kind: &K, from: Point) -> i32 {
        if from == self.target {
            return 0;
        }
        self.finder(kind)
            .map_or(IMPOSSIBLE_MC, |pf| pf.move_cost(from))
    }

    /// Cost details of the route from `from`; `turn` and `moves_left`
    /// count from a full-moves start on `from`.
    pub fn position(&mut self, kind: &K, from: Point) -> Option<Position> {
        self.finder(kind)?.position(from)
    }

    fn finder(&mut self, kind: &K) -> Option<&mut PathFinder<'a>> {
        if !self.finders.contains_key(kind) {
            let pf = self.create(kind);
            self.finders.insert(kind.clone(), pf);
        }
        self.finders.get_mut(kind).and_then(Option::as_mut)
    }

    fn create(&self, kind: &K) -> Option<PathFinder<'a>> {
        let AgentKind {
            mut profile,
            move_cost: forward,
        } = (self.provider)(kind);
        profile.moves_left_initially = profile.move_rate;
        profile.omniscience = self.omniscience;
        let max_cost = self
            .max_turns
            .map(|turns| turns.saturating_mul(profile.move_rate));

        let params = SearchParameters::new(self.target, self.owner, &profile).with_combined_cost(
            move |edge: &Edge, to_cost: &mut i32, to_extra: &mut u32, params: &SearchParameters<'a>| {
                // The agent walks towards the search origin.
                let step = forward(edge.to, edge.dir.reverse(), edge.from, params);
                if step < 0 {
                    return -1;
                }
                let cost = edge.from_cost.saturating_add(step);
                if max_cost.is_some_and(|max| cost > max) {
                    return -1;
                }
                if *to_cost == IMPOSSIBLE_MC || cost < *to_cost {
                    *to_cost = cost;
                    *to_extra = 0;
                    cost
                } else {
                    -1
                }
            },
        );
        match PathFinder::new(self.map, params) {
            Ok(pf) => {
                log::debug!(
                    "reverse map to {}: new search for move rate {}",
                    self.target,
                    profile.move_rate
                );
                Some(pf)
            }
            Err(e) => {
                log::error!("reverse map to {}: {e}", self.target);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use turnpath_core::Board;

    fn kinds<'a>(board: &'a Board, calls: &'a Cell<u32>) -> impl Fn(&&'static str) -> AgentKind<'a> + 'a {
        move |kind| {
            calls.set(calls.get() + 1);
            match *kind {
                "walker" => AgentKind::new(MovementProfile::new(3), move |_, _, to, _| {
                    board.move_cost(to).unwrap_or(IMPOSSIBLE_MC)
                }),
                "crawler" => AgentKind::new(MovementProfile::new(1), move |_, _, to, _| {
                    board.move_cost(to).map_or(IMPOSSIBLE_MC, |c| 2 * c)
                }),
                _ => AgentKind::new(MovementProfile::new(0), |_, _, _, _| 1),
            }
        }
    }

    #[test]
    fn costs_are_paid_towards_the_target() {
        let board = Board::from_rows(&["..2.."], 1);
        let calls = Cell::new(0);
        let target = Point::new(4, 0);
        let mut rm = ReverseMap::new(&board, PlayerId(0), target, None, false, kinds(&board, &calls));
        assert_eq!(rm.target(), target);
        assert_eq!(rm.move_cost(&"walker", target), 0);
        // Entering (1,0), (2,0), (3,0) and (4,0) costs 1 + 2 + 1 + 1.
        assert_eq!(rm.move_cost(&"walker", Point::ZERO), 5);
        assert_eq!(rm.move_cost(&"crawler", Point::ZERO), 10);
        assert_eq!(rm.move_cost(&"walker", Point::new(2, 0)), 2);

        let pos = rm.position(&"walker", Point::ZERO).unwrap();
        assert_eq!(pos.total_mc, 5);
        assert_eq!(pos.turn, 1);
    }

    #[test]
    fn searches_are_created_once_per_kind() {
        let board = Board::new(4, 4, 1);
        let calls = Cell::new(0);
        let mut rm = ReverseMap::new(
            &board,
            PlayerId(0),
            Point::new(3, 3),
            None,
            true,
            kinds(&board, &calls),
        );
        rm.move_cost(&"walker", Point::ZERO);
        rm.move_cost(&"walker", Point::new(1, 0));
        assert_eq!(calls.get(), 1);
        rm.move_cost(&"crawler", Point::ZERO);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn max_turns_bounds_the_search() {
        let board = Board::new(6, 1, 1);
        let calls = Cell::new(0);
        let mut rm = ReverseMap::new(
            &board,
            PlayerId(0),
            Point::new(5, 0),
            Some(1),
            false,
            kinds(&board, &calls),
        );
        assert_eq!(rm.move_cost(&"walker", Point::new(2, 0)), 3);
        assert_eq!(rm.move_cost(&"walker", Point::new(1, 0)), IMPOSSIBLE_MC);
        assert!(rm.position(&"walker", Point::new(1, 0)).is_none());
    }

    #[test]
    fn omniscience_is_handed_to_the_kind_callbacks() {
        let board = Board::new(3, 1, 1);
        let target = Point::new(2, 0);
        let scout = |_: &u8| {
            AgentKind::new(MovementProfile::new(1), |_, _, _, params| {
                if params.omniscience { 1 } else { IMPOSSIBLE_MC }
            })
        };
        let mut blind = ReverseMap::new(&board, PlayerId(0), target, None, false, scout);
        assert_eq!(blind.move_cost(&0, Point::ZERO), IMPOSSIBLE_MC);
        let mut seeing = ReverseMap::new(&board, PlayerId(0), target, None, true, scout);
        assert_eq!(seeing.move_cost(&0, Point::ZERO), 2);
    }

    #[test]
    fn misconfigured_kind_is_unreachable_and_not_retried() {
        let board = Board::new(3, 1, 1);
        let calls = Cell::new(0);
        let mut rm = ReverseMap::new(
            &board,
            PlayerId(0),
            Point::new(2, 0),
            None,
            false,
            kinds(&board, &calls),
        );
        assert_eq!(rm.move_cost(&"ghost", Point::ZERO), IMPOSSIBLE_MC);
        assert_eq!(rm.move_cost(&"ghost", Point::new(1, 0)), IMPOSSIBLE_MC);
        assert_eq!(calls.get(), 1);
    }
}
