//! Search for agents that must not end a turn on dangerous tiles.
//!
//! Dangerous tiles may be crossed within a turn but never returned as
//! destinations. Every node remembers the dangerous stretch it was reached
//! through, so a route can be rebuilt even after the dangerous nodes on it
//! were relabelled by later, better-provisioned routes.

use std::mem;

use turnpath_core::{Direction, Range, TileMap};

use crate::node::{Lattice, NodeCore, NodeFacts, NodeStatus, step_cost, zoc_allows};
use crate::params::{IMPOSSIBLE_MC, SearchParameters, TileBehavior};
use crate::pathfinder::Engine;
use crate::position::{Path, Position};
use crate::queue::Frontier;

/// One dangerous node of a recorded stretch.
#[derive(Copy, Clone, Debug)]
struct DangerPos {
    idx: usize,
    cost: i32,
    extra_cost: u32,
    dir_to_here: Option<Direction>,
}

#[derive(Clone, Debug, Default)]
struct DangerNode {
    core: NodeCore,
    is_dangerous: bool,
    /// The route leaves its last safe node after waiting there.
    waited: bool,
    /// Queued for expansion with its current label.
    pending: bool,
    /// Dangerous nodes between the last safe node and this one, oldest
    /// first. Empty when the predecessor is safe.
    segment: Vec<DangerPos>,
}

pub(crate) struct DangerMap<'a, M: TileMap + ?Sized> {
    map: &'a M,
    params: SearchParameters<'a>,
    lattice: Lattice<DangerNode>,
    queue: Frontier,
    /// Dangerous nodes, keyed by plain cost. They are always drained
    /// before the safe queue.
    danger_queue: Frontier,
    start: usize,
    cursor: usize,
    trail: Vec<DangerPos>,
}

impl<'a, M: TileMap + ?Sized> DangerMap<'a, M> {
    pub(crate) fn new(map: &'a M, params: SearchParameters<'a>, start: usize) -> Self {
        let mut lattice: Lattice<DangerNode> = Lattice::new(map.range());
        let node = &mut lattice.nodes[start];
        node.core.facts = NodeFacts::compute(map, &params, params.start_tile);
        node.core.cost = params.start_cost();
        // The agent is already standing here.
        node.is_dangerous = false;
        lattice.advance(start, NodeStatus::New);
        Self {
            map,
            params,
            lattice,
            queue: Frontier::new(),
            danger_queue: Frontier::new(),
            start,
            cursor: start,
            trail: Vec::new(),
        }
    }

    fn init_node(&mut self, idx: usize) {
        let p = self.lattice.point(idx);
        let facts = NodeFacts::compute(self.map, &self.params, p);
        let dangerous = self
            .params
            .is_dangerous
            .as_ref()
            .is_some_and(|f| f(p, facts.known, &self.params));
        let node = &mut self.lattice.nodes[idx];
        node.core.facts = facts;
        node.is_dangerous = dangerous;
        self.lattice.advance(idx, NodeStatus::Init);
    }

    /// Per-step cost into a tile, or `None` when the step would end the
    /// turn on a dangerous tile.
    fn adjust_cost(&self, cost: i32, to_danger: bool, moves_left: i32) -> Option<i32> {
        let cost = cost.min(self.params.move_rate);
        if to_danger && cost >= moves_left {
            return None;
        }
        Some(cost.min(moves_left))
    }

    fn expand(&mut self) {
        let ci = self.cursor;
        let node = self.lattice.nodes[ci].core;
        if node.facts.behavior == TileBehavior::DontLeave {
            return;
        }
        let from_danger = self.lattice.nodes[ci].is_dangerous;
        let waiting = self.lattice.status[ci] == NodeStatus::Waiting;
        let loc_cost = if waiting {
            node.cost + self.params.moves_left(node.cost)
        } else {
            node.cost
        };
        let moves_left = self.params.moves_left(loc_cost);
        let waited = if from_danger {
            self.lattice.nodes[ci].waited
        } else {
            waiting
        };

        let mut trail = mem::take(&mut self.trail);
        trail.clear();
        if from_danger {
            trail.extend_from_slice(&self.lattice.nodes[ci].segment);
            trail.push(DangerPos {
                idx: ci,
                cost: node.cost,
                extra_cost: node.extra_cost,
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
            let to_danger = self.lattice.nodes[ni].is_dangerous;
            // Dangerous tiles can be updated even after being processed.
            if status >= NodeStatus::Waiting && !to_danger {
                continue;
            }
            let next = self.lattice.nodes[ni].core;
            if !next.facts.enterable() || !zoc_allows(&self.params, &node.facts, &next.facts) {
                continue;
            }
            let to = self.lattice.point(ni);
            let step = step_cost(&self.params, tile, dir, to, &next.facts);
            if step == IMPOSSIBLE_MC || step < 0 {
                continue;
            }
            let Some(step) = self.adjust_cost(step, to_danger, moves_left) else {
                continue;
            };
            let cost = loc_cost + step;
            let extra = if self.params.extra_cost.is_some() {
                node.extra_cost.saturating_add(next.facts.extra_tile)
            } else {
                0
            };
            let cc = self.params.total_cc(cost, extra);
            let old_cc = self.params.total_cc(next.cost, next.extra_cost);

            let better = if to_danger {
                // First visit, further reach across the danger, or a cheaper
                // route that overwrites nothing still pending.
                status == NodeStatus::Init
                    || self.params.moves_left(cost) > self.params.moves_left(next.cost)
                    || (cc < old_cc && !self.lattice.nodes[ni].pending)
            } else {
                status == NodeStatus::Init || cc < old_cc
            };
            if !better {
                continue;
            }

            let n = &mut self.lattice.nodes[ni];
            n.core.cost = cost;
            n.core.extra_cost = extra;
            n.core.dir_to_here = Some(dir);
            n.waited = waited;
            n.segment.clear();
            n.segment.extend_from_slice(&trail);
            n.pending = true;
            if status < NodeStatus::New {
                self.lattice.advance(ni, NodeStatus::New);
            }
            if to_danger {
                self.danger_queue.push(ni, i64::from(cost));
            } else {
                self.queue.push(ni, cc);
            }
        }
        self.trail = trail;
    }

    /// After expansion a safe node with moves to spare is queued once more
    /// to consider waiting for the next turn there.
    fn settle(&mut self) {
        let ci = self.cursor;
        let node = &self.lattice.nodes[ci];
        let moves_left = self.params.moves_left(node.core.cost);
        if !node.is_dangerous
            && self.lattice.status[ci] != NodeStatus::Waiting
            && moves_left < self.params.move_rate
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
        while let Some((idx, priority)) = self.danger_queue.pop_entry() {
            let node = &mut self.lattice.nodes[idx];
            if node.pending && priority == i64::from(node.core.cost) {
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
}

impl<'a, M: TileMap + ?Sized> Engine<'a> for DangerMap<'a, M> {
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
                log::trace!("considering waiting at {}", self.lattice.point(idx));
                continue;
            }
            if self.lattice.nodes[idx].is_dangerous {
                log::trace!("reached dangerous tile {}", self.lattice.point(idx));
                continue;
            }
            return true;
        }
    }

    fn is_resolved(&self, idx: usize) -> bool {
        !self.lattice.nodes[idx].is_dangerous && self.lattice.status[idx] >= NodeStatus::Waiting
    }

    fn is_destination(&mut self, idx: usize) -> bool {
        if self.lattice.status[idx] == NodeStatus::Uninit {
            self.init_node(idx);
        }
        !self.lattice.nodes[idx].is_dangerous
    }

    fn position(&self, idx: usize) -> Position {
        let core = &self.lattice.nodes[idx].core;
        Position::from_cost(
            &self.params,
            self.lattice.point(idx),
            core.cost,
            core.extra_cost,
            core.dir_to_here,
        )
    }

    fn path(&self, idx: usize) -> Path {
        let mut positions = vec![self.position(idx)];
        let mut i = idx;
        while i != self.start {
            let node = &self.lattice.nodes[i];
            let mut dir_to_next = node.core.dir_to_here;
            let mut last = i;
            for dp in node.segment.iter().rev() {
                let mut pos = Position::from_cost(
                    &self.params,
                    self.lattice.point(dp.idx),
                    dp.cost,
                    dp.extra_cost,
                    dp.dir_to_here,
                );
                pos.dir_to_next = dir_to_next;
                positions.push(pos);
                dir_to_next = dp.dir_to_here;
                last = dp.idx;
            }
            let Some(origin) =
                dir_to_next.and_then(|dir| self.lattice.neighbor(self.map, last, dir.reverse()))
            else {
                break;
            };
            let mut pos = self.position(origin);
            if node.waited {
                let core = &self.lattice.nodes[origin].core;
                let mut after = Position::from_cost(
                    &self.params,
                    pos.tile,
                    core.cost + self.params.moves_left(core.cost),
                    core.extra_cost,
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
