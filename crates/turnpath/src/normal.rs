use turnpath_core::{Direction, Range, TileMap};

use crate::node::{Lattice, NodeCore, NodeFacts, NodeStatus, step_cost, zoc_allows};
use crate::params::{IMPOSSIBLE_MC, SearchParameters, TileBehavior};
use crate::pathfinder::Engine;
use crate::position::{Path, Position};
use crate::queue::Frontier;

/// Plain turn-aware Dijkstra: every reached tile is a valid place to stop.
pub(crate) struct NormalMap<'a, M: TileMap + ?Sized> {
    map: &'a M,
    params: SearchParameters<'a>,
    lattice: Lattice<NodeCore>,
    queue: Frontier,
    start: usize,
    cursor: usize,
}

impl<'a, M: TileMap + ?Sized> NormalMap<'a, M> {
    pub(crate) fn new(map: &'a M, params: SearchParameters<'a>, start: usize) -> Self {
        let mut lattice: Lattice<NodeCore> = Lattice::new(map.range());
        let node = &mut lattice.nodes[start];
        node.facts = NodeFacts::compute(map, &params, params.start_tile);
        node.cost = params.start_cost();
        lattice.advance(start, NodeStatus::Processed);
        Self {
            map,
            params,
            lattice,
            queue: Frontier::new(),
            start,
            cursor: start,
        }
    }

    fn expand(&mut self) {
        let ci = self.cursor;
        let node = self.lattice.nodes[ci];
        if node.facts.behavior == TileBehavior::DontLeave {
            return;
        }
        let tile = self.lattice.point(ci);
        let moves_left = self.params.moves_left(node.cost);

        for dir in Direction::ALL {
            let Some(ni) = self.lattice.neighbor(self.map, ci, dir) else {
                continue;
            };
            let status = self.lattice.status[ni];
            if status == NodeStatus::Processed {
                continue;
            }
            let to = self.lattice.point(ni);
            if status == NodeStatus::Uninit {
                self.lattice.nodes[ni].facts = NodeFacts::compute(self.map, &self.params, to);
                self.lattice.advance(ni, NodeStatus::Init);
            }
            let next = self.lattice.nodes[ni];
            if !next.facts.enterable() || !zoc_allows(&self.params, &node.facts, &next.facts) {
                continue;
            }

            let step = step_cost(&self.params, tile, dir, to, &next.facts);
            if step == IMPOSSIBLE_MC || step < 0 {
                continue;
            }
            let cost = node.cost + step.min(moves_left);
            let extra = if self.params.extra_cost.is_some() {
                node.extra_cost.saturating_add(next.facts.extra_tile)
            } else {
                0
            };
            let cc = self.params.total_cc(cost, extra);
            if status == NodeStatus::Init
                || cc < self.params.total_cc(next.cost, next.extra_cost)
            {
                let n = &mut self.lattice.nodes[ni];
                n.cost = cost;
                n.extra_cost = extra;
                n.dir_to_here = Some(dir);
                self.lattice.advance(ni, NodeStatus::New);
                self.queue.push(ni, cc);
            }
        }
    }
}

impl<'a, M: TileMap + ?Sized> Engine<'a> for NormalMap<'a, M> {
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
        self.expand();
        while let Some(idx) = self.queue.pop() {
            if self.lattice.status[idx] != NodeStatus::New {
                continue;
            }
            self.lattice.advance(idx, NodeStatus::Processed);
            self.cursor = idx;
            return true;
        }
        false
    }

    fn is_resolved(&self, idx: usize) -> bool {
        self.lattice.status[idx] == NodeStatus::Processed
    }

    fn position(&self, idx: usize) -> Position {
        let node = &self.lattice.nodes[idx];
        Position::from_cost(
            &self.params,
            self.lattice.point(idx),
            node.cost,
            node.extra_cost,
            node.dir_to_here,
        )
    }

    fn path(&self, idx: usize) -> Path {
        let mut positions = Vec::new();
        let mut i = idx;
        let mut dir_to_next = None;
        loop {
            let mut pos = self.position(i);
            pos.dir_to_next = dir_to_next;
            positions.push(pos);
            if i == self.start {
                break;
            }
            let Some(dir) = self.lattice.nodes[i].dir_to_here else {
                break;
            };
            let Some(prev) = self.lattice.neighbor(self.map, i, dir.reverse()) else {
                break;
            };
            dir_to_next = Some(dir);
            i = prev;
        }
        positions.reverse();
        Path::from_positions(positions)
    }
}
