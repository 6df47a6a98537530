//! Search for fuel-limited agents.
//!
//! Moves are tracked on a second, fuel-scaled counter that only refills
//! when a turn ends on a refuel point. A tile is enterable when the agent
//! arrives with enough fuel left to reach the nearest refuel point from
//! there. Tiles other than refuel points, enemy tiles and the start are
//! hazards: they are resolved on demand but never handed out by iteration.
//!
//! A hazard keeps two routes. The one leaving the most fuel is expanded and
//! may improve for as long as the search runs. The cheapest one is what
//! queries report, and it is frozen once the hazard is first processed.

use std::mem;

use turnpath_core::{Direction, Range, TileMap};

use crate::node::{Lattice, NodeCore, NodeFacts, NodeStatus, step_cost, zoc_allows};
use crate::params::{IMPOSSIBLE_MC, SearchParameters, TileBehavior};
use crate::pathfinder::Engine;
use crate::position::{Path, Position};
use crate::queue::Frontier;

#[derive(Copy, Clone, Debug, Default)]
struct FuelPos {
    idx: usize,
    cost: i32,
    extra_cost: u32,
    moves_left: i32,
    dir_to_here: Option<Direction>,
}

#[derive(Clone, Debug, Default)]
struct FuelNode {
    core: NodeCore,
    /// Fuel-scaled moves left on arrival.
    moves_left: i32,
    /// Fuel-scaled moves needed to reach a refuel point from here; 0 on a
    /// refuel point, [`IMPOSSIBLE_MC`] when none is in range.
    moves_left_req: i32,
    is_enemy_tile: bool,
    waited: bool,
    /// Queued for expansion with its current label.
    pending: bool,
    /// Hazard nodes between the last safe node and this one, oldest first.
    segment: Vec<FuelPos>,
    /// Hazards only: the cheapest arrival found before the node was
    /// processed.
    cheapest: Option<FuelRoute>,
}

/// A recorded arrival on a hazard tile.
#[derive(Clone, Debug, Default)]
struct FuelRoute {
    arrival: FuelPos,
    waited: bool,
    segment: Vec<FuelPos>,
}

impl FuelNode {
    #[inline]
    fn is_refuel_point(&self) -> bool {
        self.moves_left_req == 0
    }
}

/// Whether an agent with `moves_left` fuel-scaled moves may attack a tile
/// needing `moves_left_req` to get back to fuel.
fn attack_is_possible(params: &SearchParameters<'_>, moves_left: i32, moves_left_req: i32) -> bool {
    if params.flags.missile {
        true
    } else if params.flags.one_attack {
        // Never attack in the last turn of fuel.
        moves_left > params.move_rate
    } else {
        moves_left - params.single_move >= moves_left_req
    }
}

pub(crate) struct FuelMap<'a, M: TileMap + ?Sized> {
    map: &'a M,
    params: SearchParameters<'a>,
    lattice: Lattice<FuelNode>,
    queue: Frontier,
    hazard_queue: Frontier,
    start: usize,
    cursor: usize,
    trail: Vec<FuelPos>,
}

impl<'a, M: TileMap + ?Sized> FuelMap<'a, M> {
    pub(crate) fn new(map: &'a M, params: SearchParameters<'a>, start: usize) -> Self {
        let mut this = Self {
            map,
            lattice: Lattice::new(map.range()),
            queue: Frontier::new(),
            hazard_queue: Frontier::new(),
            start,
            cursor: start,
            trail: Vec::new(),
            params,
        };
        this.init_node(start);
        let node = &mut this.lattice.nodes[start];
        node.core.cost = this.params.start_cost();
        node.moves_left = this.params.initial_fuel_moves();
        this.lattice.advance(start, NodeStatus::New);
        this
    }

    fn init_node(&mut self, idx: usize) {
        let p = self.lattice.point(idx);
        let facts = NodeFacts::compute(self.map, &self.params, p);
        let req = self
            .params
            .fuel_distance
            .as_ref()
            .map_or(0, |f| f(p, facts.known, &self.params));
        let node = &mut self.lattice.nodes[idx];
        node.core.facts = facts;
        node.moves_left_req = if req < 0 { IMPOSSIBLE_MC } else { req };
        node.is_enemy_tile = self.map.is_enemy_tile(p, self.params.owner);
        self.lattice.advance(idx, NodeStatus::Init);
    }

    fn is_hazard(&self, idx: usize) -> bool {
        let node = &self.lattice.nodes[idx];
        idx != self.start && !node.is_refuel_point() && !node.is_enemy_tile
    }

    fn expand(&mut self) {
        let ci = self.cursor;
        let node = self.lattice.nodes[ci].core;
        if node.facts.behavior == TileBehavior::DontLeave {
            return;
        }
        // Attacking ends the move.
        if ci != self.start && self.lattice.nodes[ci].is_enemy_tile {
            return;
        }
        let from_hazard = self.is_hazard(ci);
        let waiting = self.lattice.status[ci] == NodeStatus::Waiting;
        let (loc_cost, loc_ml) = if waiting {
            (
                node.cost + self.params.moves_left(node.cost),
                self.params.full_fuel_moves(),
            )
        } else {
            (node.cost, self.lattice.nodes[ci].moves_left)
        };
        let moves_left = self.params.moves_left(loc_cost);
        let waited = if from_hazard {
            self.lattice.nodes[ci].waited
        } else {
            waiting
        };

        let mut trail = mem::take(&mut self.trail);
        trail.clear();
        if from_hazard {
            trail.extend_from_slice(&self.lattice.nodes[ci].segment);
            trail.push(FuelPos {
                idx: ci,
                cost: node.cost,
                extra_cost: node.extra_cost,
                moves_left: loc_ml,
                dir_to_here: node.dir_to_here,
            });
        }

        let tile = self.lattice.point(ci);
        for dir in Direction::ALL {
            let Some(ni) = self.lattice.neighbor(self.map, ci, dir) else {
                continue;
            };
            if self.lattice.status[ni] == NodeStatus::Uninit {
                self.init_node(ni);
            }
            let status = self.lattice.status[ni];
            let hazard = self.is_hazard(ni);
            if status >= NodeStatus::Waiting && !hazard {
                continue;
            }
            let next = &self.lattice.nodes[ni];
            let req = next.moves_left_req;
            if req == IMPOSSIBLE_MC
                || !next.core.facts.enterable()
                || !zoc_allows(&self.params, &node.facts, &next.core.facts)
            {
                continue;
            }
            let to = self.lattice.point(ni);
            let step = step_cost(&self.params, tile, dir, to, &next.core.facts);
            if step == IMPOSSIBLE_MC || step < 0 {
                continue;
            }
            let step = step.min(moves_left);
            let cost = loc_cost + step;
            let mut ml = loc_ml - step;
            if next.is_enemy_tile {
                if !attack_is_possible(&self.params, loc_ml, req) {
                    continue;
                }
            } else if ml < req {
                continue;
            }
            if next.is_refuel_point() && self.params.moves_left(cost) == self.params.move_rate {
                // The turn ends here with the tank refilled.
                ml = self.params.full_fuel_moves();
            }
            let extra = if self.params.extra_cost.is_some() {
                node.extra_cost.saturating_add(next.core.facts.extra_tile)
            } else {
                0
            };
            let cc = self.params.total_cc(cost, extra);
            let old_cc = self.params.total_cc(next.core.cost, next.core.extra_cost);

            let better = if hazard {
                // More fuel reaches further; cost breaks ties.
                status == NodeStatus::Init
                    || ml > next.moves_left
                    || (ml == next.moves_left && cc < old_cc)
            } else {
                status == NodeStatus::Init || cc < old_cc
            };

            if hazard && status < NodeStatus::Processed {
                let params = &self.params;
                let n = &mut self.lattice.nodes[ni];
                let cheaper = n.cheapest.as_ref().is_none_or(|route| {
                    cc < params.total_cc(route.arrival.cost, route.arrival.extra_cost)
                });
                if cheaper {
                    let route = n.cheapest.get_or_insert_with(FuelRoute::default);
                    route.arrival = FuelPos {
                        idx: ni,
                        cost,
                        extra_cost: extra,
                        moves_left: ml,
                        dir_to_here: Some(dir),
                    };
                    route.waited = waited;
                    route.segment.clear();
                    route.segment.extend_from_slice(&trail);
                }
            }
            if !better {
                continue;
            }

            let n = &mut self.lattice.nodes[ni];
            n.core.cost = cost;
            n.core.extra_cost = extra;
            n.core.dir_to_here = Some(dir);
            n.moves_left = ml;
            n.waited = waited;
            n.pending = true;
            n.segment.clear();
            n.segment.extend_from_slice(&trail);
            if status < NodeStatus::New {
                self.lattice.advance(ni, NodeStatus::New);
            }
            if hazard {
                self.hazard_queue.push(ni, cc);
            } else {
                self.queue.push(ni, cc);
            }
        }
        self.trail = trail;
    }

    /// A refuel point reached with the turn or the tank not full is queued
    /// once more to consider waiting there.
    fn settle(&mut self) {
        let ci = self.cursor;
        let node = &self.lattice.nodes[ci];
        let moves_left = self.params.moves_left(node.core.cost);
        if node.is_refuel_point()
            && !node.is_enemy_tile
            && self.lattice.status[ci] != NodeStatus::Waiting
            && (moves_left < self.params.move_rate
                || node.moves_left < self.params.full_fuel_moves())
        {
            let cc = self
                .params
                .total_cc(node.core.cost + moves_left, node.core.extra_cost);
            self.lattice.advance(ci, NodeStatus::Waiting);
            self.queue.push(ci, cc);
        } else {
            self.lattice.advance(ci, NodeStatus::Processed);
        }
    }

    fn next_node(&mut self) -> Option<usize> {
        while let Some((idx, priority)) = self.hazard_queue.pop_entry() {
            let node = &mut self.lattice.nodes[idx];
            if node.pending
                && priority == self.params.total_cc(node.core.cost, node.core.extra_cost)
            {
                node.pending = false;
                return Some(idx);
            }
        }
        while let Some((idx, priority)) = self.queue.pop_entry() {
            let core = &self.lattice.nodes[idx].core;
            let expected = match self.lattice.status[idx] {
                NodeStatus::New => self.params.total_cc(core.cost, core.extra_cost),
                NodeStatus::Waiting => self.params.total_cc(
                    core.cost + self.params.moves_left(core.cost),
                    core.extra_cost,
                ),
                _ => continue,
            };
            if priority == expected {
                self.lattice.nodes[idx].pending = false;
                return Some(idx);
            }
        }
        None
    }

    /// Direction into `idx`, whether the route waited on its last safe
    /// node, and the hazards crossed since, as queries report them.
    fn route(&self, idx: usize) -> (Option<Direction>, bool, &[FuelPos]) {
        let node = &self.lattice.nodes[idx];
        match &node.cheapest {
            Some(route) => (route.arrival.dir_to_here, route.waited, route.segment.as_slice()),
            None => (node.core.dir_to_here, node.waited, node.segment.as_slice()),
        }
    }

    fn fuel_position(&self, idx: usize, cost: i32, extra: u32, ml: i32, dir: Option<Direction>) -> Position {
        let mut pos = Position::from_cost(&self.params, self.lattice.point(idx), cost, extra, dir);
        pos.moves_left = pos.moves_left.min(ml);
        pos.fuel_left = self.params.fuel_turns(ml);
        pos
    }
}

impl<'a, M: TileMap + ?Sized> Engine<'a> for FuelMap<'a, M> {
    fn params(&self) -> &SearchParameters<'a> {
        &self.params
    }

    fn lattice_range(&self) -> Range {
        self.lattice.rng
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn status(&self, idx: usize) -> NodeStatus {
        self.lattice.status[idx]
    }

    fn iterate(&mut self) -> bool {
        let returned = self.cursor;
        loop {
            self.expand();
            self.settle();
            let Some(idx) = self.next_node() else {
                self.cursor = returned;
                return false;
            };
            self.cursor = idx;
            if self.lattice.status[idx] == NodeStatus::Waiting {
                log::trace!("considering refuelling at {}", self.lattice.point(idx));
                continue;
            }
            if self.is_hazard(idx) {
                log::trace!("reached tile {} away from fuel", self.lattice.point(idx));
                continue;
            }
            return true;
        }
    }

    fn is_resolved(&self, idx: usize) -> bool {
        self.lattice.status[idx] >= NodeStatus::Waiting
    }

    fn position(&self, idx: usize) -> Position {
        let node = &self.lattice.nodes[idx];
        match &node.cheapest {
            Some(route) => {
                let a = route.arrival;
                self.fuel_position(idx, a.cost, a.extra_cost, a.moves_left, a.dir_to_here)
            }
            None => self.fuel_position(
                idx,
                node.core.cost,
                node.core.extra_cost,
                node.moves_left,
                node.core.dir_to_here,
            ),
        }
    }

    fn path(&self, idx: usize) -> Path {
        let mut positions = vec![self.position(idx)];
        let mut i = idx;
        while i != self.start {
            let (dir_to_here, waited, segment) = self.route(i);
            let mut dir_to_next = dir_to_here;
            let mut last = i;
            for fp in segment.iter().rev() {
                let mut pos =
                    self.fuel_position(fp.idx, fp.cost, fp.extra_cost, fp.moves_left, fp.dir_to_here);
                pos.dir_to_next = dir_to_next;
                positions.push(pos);
                dir_to_next = fp.dir_to_here;
                last = fp.idx;
            }
            let Some(origin) =
                dir_to_next.and_then(|dir| self.lattice.neighbor(self.map, last, dir.reverse()))
            else {
                break;
            };
            let mut pos = self.position(origin);
            if waited {
                let core = &self.lattice.nodes[origin].core;
                let mut after = self.fuel_position(
                    origin,
                    core.cost + self.params.moves_left(core.cost),
                    core.extra_cost,
                    self.params.full_fuel_moves(),
                    None,
                );
                after.dir_to_next = dir_to_next;
                positions.push(after);
            } else {
                pos.dir_to_next = dir_to_next;
            }
            positions.push(pos);
            i = origin;
        }
        positions.reverse();
        Path::from_positions(positions)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use turnpath_core::{Board, PlayerId, Point, Range};

    use super::attack_is_possible;
    use crate::{
        AgentFlags, IMPOSSIBLE_MC, MovementProfile, NodeStatus, Path, PathFinder, SearchMode,
        SearchParameters,
    };

    /// Fuel distance on a uniform-cost board: Chebyshev distance to the
    /// nearest refuel point.
    fn nearest(refuel: &[Point], p: Point) -> i32 {
        refuel
            .iter()
            .map(|r| r.distance(p))
            .min()
            .unwrap_or(IMPOSSIBLE_MC)
    }

    fn fuel_finder<'a>(
        board: &'a Board,
        refuel: &'a [Point],
        profile: MovementProfile,
    ) -> PathFinder<'a> {
        let params = SearchParameters::new(Point::ZERO, PlayerId(0), &profile)
            .with_move_cost(|_, _, to, _| board.move_cost(to).unwrap_or(IMPOSSIBLE_MC))
            .with_fuel_distance(move |p, _, _| nearest(refuel, p));
        PathFinder::new(board, params).unwrap()
    }

    fn profile(move_rate: i32, fuel: i32, fuel_left: i32) -> MovementProfile {
        let mut profile = MovementProfile::new(move_rate);
        profile.fuel = fuel;
        profile.fuel_left_initially = fuel_left;
        profile
    }

    #[test]
    fn range_is_limited_by_the_way_back() {
        let board = Board::new(6, 1, 1);
        let refuel = [Point::ZERO];
        let mut pf = fuel_finder(&board, &refuel, profile(2, 1, 1));
        assert_eq!(pf.mode(), SearchMode::Fuel);
        let pos = pf.position(Point::new(1, 0)).unwrap();
        assert_eq!((pos.total_mc, pos.moves_left, pos.fuel_left), (1, 1, 1));
        assert_eq!(pf.move_cost(Point::new(2, 0)), IMPOSSIBLE_MC);
        assert!(pf.path(Point::new(2, 0)).is_none());
    }

    #[test]
    fn refuel_points_extend_the_range() {
        let board = Board::new(6, 1, 1);
        let refuel = [Point::ZERO, Point::new(3, 0)];
        let mut pf = fuel_finder(&board, &refuel, profile(3, 1, 1));

        let base = pf.position(Point::new(3, 0)).unwrap();
        assert_eq!((base.turn, base.moves_left, base.fuel_left), (1, 3, 1));

        let path = pf.path(Point::new(4, 0)).unwrap();
        let xs: Vec<i32> = path.tiles().map(|p| p.x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3, 4]);
        let costs: Vec<i32> = path.positions().iter().map(|p| p.total_mc).collect();
        assert_eq!(costs, vec![0, 1, 2, 3, 4]);
        assert_eq!(path.positions()[2].fuel_left, 1);
        assert_eq!(pf.move_cost(Point::new(5, 0)), IMPOSSIBLE_MC);

        // With the first refuel point only, (4, 0) is out of range.
        let mut pf = fuel_finder(&board, &refuel[..1], profile(3, 1, 1));
        assert_eq!(pf.move_cost(Point::new(4, 0)), IMPOSSIBLE_MC);
    }

    #[test]
    fn hazard_tiles_are_not_iterated() {
        let board = Board::new(6, 1, 1);
        let refuel = [Point::ZERO, Point::new(3, 0)];
        let mut pf = fuel_finder(&board, &refuel, profile(3, 1, 1));
        let tiles: Vec<Point> = pf.tiles().collect();
        assert_eq!(tiles, vec![Point::ZERO, Point::new(3, 0)]);
    }

    #[test]
    fn attack_rules_by_agent_flags() {
        let board = Board::from_rows(&["..U"], 1);
        let refuel = [Point::ZERO];
        let enemy = Point::new(2, 0);

        // Attacking leaves one move short of the way back.
        let mut pf = fuel_finder(&board, &refuel, profile(3, 1, 1));
        assert_eq!(pf.move_cost(enemy), IMPOSSIBLE_MC);

        let mut missile = profile(3, 1, 1);
        missile.flags = AgentFlags {
            missile: true,
            one_attack: false,
        };
        let mut pf = fuel_finder(&board, &refuel, missile);
        assert_eq!(pf.move_cost(enemy), 2);

        // A bomber in its last turn of fuel refuels for a turn first.
        let mut bomber = profile(3, 2, 1);
        bomber.flags.one_attack = true;
        let mut pf = fuel_finder(&board, &refuel, bomber);
        let path = pf.path(enemy).unwrap();
        let xs: Vec<i32> = path.tiles().map(|p| p.x).collect();
        assert_eq!(xs, vec![0, 0, 1, 2]);
        assert_eq!(path.last().unwrap().total_mc, 5);
        assert_eq!(path.positions()[1].fuel_left, 2);

        bomber.fuel_left_initially = 2;
        let mut pf = fuel_finder(&board, &refuel, bomber);
        assert_eq!(pf.move_cost(enemy), 2);
    }

    #[test]
    fn attack_feasibility() {
        let mut profile = profile(3, 2, 2);
        let check = |profile: &MovementProfile, ml, req| {
            attack_is_possible(&SearchParameters::new(Point::ZERO, PlayerId(0), profile), ml, req)
        };
        assert!(check(&profile, 3, 2));
        assert!(!check(&profile, 2, 2));
        profile.flags.one_attack = true;
        assert!(!check(&profile, 3, 0));
        assert!(check(&profile, 4, 9));
        profile.flags.missile = true;
        assert!(check(&profile, 0, 9));
    }

    #[test]
    fn answers_do_not_depend_on_query_order() {
        // The tile (3, 0) is later reached again with more fuel by waiting
        // on (5, 0) and coming back; the answer must stay the cheap route.
        let board = Board::new(7, 1, 1);
        let refuel = [Point::ZERO, Point::new(5, 0)];
        let near = Point::new(3, 0);
        let far = Point::new(6, 0);
        let xs = |path: Path| path.tiles().map(|p| p.x).collect::<Vec<i32>>();

        let mut pf = fuel_finder(&board, &refuel, profile(3, 2, 2));
        assert_eq!(pf.move_cost(near), 3);
        assert_eq!(pf.move_cost(far), 7);
        assert_eq!(pf.move_cost(near), 3);
        assert_eq!(xs(pf.path(near).unwrap()), vec![0, 1, 2, 3]);
        assert_eq!(xs(pf.path(far).unwrap()), vec![0, 1, 2, 3, 4, 5, 5, 6]);
        assert_eq!(pf.status(near), NodeStatus::Processed);

        let mut pf = fuel_finder(&board, &refuel, profile(3, 2, 2));
        assert_eq!(pf.move_cost(far), 7);
        assert_eq!(pf.move_cost(near), 3);
        let pos = pf.position(near).unwrap();
        assert_eq!((pos.turn, pos.moves_left, pos.fuel_left), (1, 3, 1));
    }

    struct Scenario {
        board: Board,
        refuel: Vec<Point>,
        profile: MovementProfile,
    }

    fn random_scenario(rng: &mut StdRng) -> Scenario {
        let board = Board::new(9, 7, 1);
        let mut refuel = vec![Point::ZERO];
        for p in board.bounds() {
            if p != Point::ZERO && rng.random_range(0..12) == 0 {
                refuel.push(p);
            }
        }
        let fuel = rng.random_range(1..=3);
        Scenario {
            board,
            refuel,
            profile: profile(rng.random_range(1..=3), fuel, fuel),
        }
    }

    impl Scenario {
        fn finder(&self) -> PathFinder<'_> {
            fuel_finder(&self.board, &self.refuel, self.profile)
        }

        /// Replay the fuel gauge along `path` and check it against what
        /// the positions report.
        fn check_fuel(&self, path: &Path) {
            let rate = self.profile.move_rate;
            let full = self.profile.fuel * rate;
            let positions = path.positions();
            let mut ml = full;
            for (i, pos) in positions.iter().enumerate() {
                let req = nearest(&self.refuel, pos.tile);
                if i > 0 {
                    let prev = &positions[i - 1];
                    if prev.tile == pos.tile {
                        // Waited a turn on a refuel point.
                        assert_eq!(req, 0, "waited away from fuel on {}", pos.tile);
                        ml = full;
                    } else {
                        ml -= pos.total_mc - prev.total_mc;
                        if req == 0 && pos.total_mc % rate == 0 {
                            ml = full;
                        }
                    }
                }
                assert!(ml >= req, "stranded on {} with {ml} of {req}", pos.tile);
                assert_eq!(pos.fuel_left, (ml + rate - 1) / rate, "fuel on {}", pos.tile);
                assert_eq!(pos.moves_left, (rate - pos.total_mc % rate).min(ml));
            }
        }
    }

    type Answer = (Point, i32, Option<Vec<Point>>);

    /// Query every tile of `order`, checking that no status ever moves
    /// backwards, and return the answers sorted by tile.
    fn answers(pf: &mut PathFinder<'_>, bounds: Range, order: &[Point]) -> Vec<Answer> {
        let mut last: Vec<NodeStatus> = bounds.iter().map(|p| pf.status(p)).collect();
        let mut out = Vec::with_capacity(order.len());
        for &t in order {
            out.push((t, pf.move_cost(t), pf.path(t).map(|p| p.tiles().collect())));
            for (i, p) in bounds.iter().enumerate() {
                let s = pf.status(p);
                assert!(s >= last[i], "status of {p} regressed");
                last[i] = s;
            }
        }
        out.sort_by_key(|a| (a.0.y, a.0.x));
        out
    }

    #[test]
    fn randomized_paths_keep_enough_fuel() {
        let mut rng = StdRng::seed_from_u64(0xf0e1_0003);
        for _ in 0..20 {
            let sc = random_scenario(&mut rng);
            let mut pf = sc.finder();

            for t in sc.board.bounds() {
                let cost = pf.move_cost(t);
                assert_eq!(pf.move_cost(t), cost);
                let Some(path) = pf.path(t) else {
                    assert_eq!(cost, IMPOSSIBLE_MC);
                    assert!(pf.position(t).is_none());
                    continue;
                };
                assert_eq!(path.last().unwrap().total_mc, cost);
                assert_eq!(path.first().unwrap().tile, Point::ZERO);
                sc.check_fuel(&path);
                for w in path.positions().windows(2) {
                    assert!(w[0].total_mc <= w[1].total_mc);
                    assert!(w[0].turn <= w[1].turn);
                }
            }
        }
    }

    #[test]
    fn randomized_answers_ignore_query_order() {
        let mut rng = StdRng::seed_from_u64(0xf0e1_0004);
        for _ in 0..20 {
            let sc = random_scenario(&mut rng);
            let bounds = sc.board.bounds();
            let forward: Vec<Point> = bounds.iter().collect();
            let reversed: Vec<Point> = forward.iter().rev().copied().collect();
            let mut shuffled = forward.clone();
            for i in (1..shuffled.len()).rev() {
                shuffled.swap(i, rng.random_range(0..=i));
            }

            let expected = answers(&mut sc.finder(), bounds, &forward);
            assert_eq!(answers(&mut sc.finder(), bounds, &reversed), expected);
            assert_eq!(answers(&mut sc.finder(), bounds, &shuffled), expected);
        }
    }
}
