use turnpath_core::{Direction, Range, TileMap};

use crate::node::{Lattice, NodeCore, NodeStatus};
use crate::params::{Edge, IMPOSSIBLE_MC, SearchParameters};
use crate::pathfinder::Engine;
use crate::position::{Path, Position};
use crate::queue::Frontier;

/// Search driven entirely by the combined-cost callback.
///
/// The callback owns every rule (known status, zones of control, turn
/// arithmetic); the engine only keeps the frontier and the back-pointers.
pub(crate) struct JumboMap<'a, M: TileMap + ?Sized> {
    map: &'a M,
    params: SearchParameters<'a>,
    lattice: Lattice<NodeCore>,
    queue: Frontier,
    start: usize,
    cursor: usize,
}

impl<'a, M: TileMap + ?Sized> JumboMap<'a, M> {
    pub(crate) fn new(map: &'a M, params: SearchParameters<'a>, start: usize) -> Self {
        let mut lattice: Lattice<NodeCore> = Lattice::new(map.range());
        lattice.nodes[start].cost = params.start_cost();
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
        let Some(price) = self.params.combined_cost.as_ref() else {
            return;
        };
        let ci = self.cursor;
        let from = self.lattice.point(ci);
        let node = self.lattice.nodes[ci];

        for dir in Direction::ALL {
            let Some(ni) = self.lattice.neighbor(self.map, ci, dir) else {
                continue;
            };
            let status = self.lattice.status[ni];
            if status == NodeStatus::Processed {
                continue;
            }
            if status == NodeStatus::Uninit {
                self.lattice.nodes[ni].cost = IMPOSSIBLE_MC;
                self.lattice.advance(ni, NodeStatus::Init);
            }
            let edge = Edge {
                from,
                dir,
                to: self.lattice.point(ni),
                from_cost: node.cost,
                from_extra: node.extra_cost,
            };
            let next = &mut self.lattice.nodes[ni];
            let priority = price(&edge, &mut next.cost, &mut next.extra_cost, &self.params);
            if priority >= 0 {
                next.dir_to_here = Some(dir);
                self.lattice.advance(ni, NodeStatus::New);
                self.queue.push(ni, i64::from(priority));
            }
        }
    }
}

impl<'a, M: TileMap + ?Sized> Engine<'a> for JumboMap<'a, M> {
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
            let Some(prev) = self.lattice.nodes[i]
                .dir_to_here
                .and_then(|dir| self.lattice.neighbor(self.map, i, dir.reverse()))
            else {
                break;
            };
            dir_to_next = self.lattice.nodes[i].dir_to_here;
            i = prev;
        }
        positions.reverse();
        Path::from_positions(positions)
    }
}
