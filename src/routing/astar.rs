// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::model::Rect;

use super::grid::RoutingGrid;

const NO_PARENT: u32 = u32::MAX;

/// Why a search ended without reaching the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchFailure {
    /// Every reachable node was expanded.
    Exhausted,
    /// The expansion budget ran out first.
    IterationCap,
}

/// Reusable buffers for grid A*.
///
/// Per-node state is tagged with a generation counter so consecutive searches
/// on a same-sized grid do not have to clear the buffers.
#[derive(Debug, Default)]
pub(crate) struct SearchScratch {
    grid: Option<RoutingGrid>,
    blocked: Vec<u8>,
    dist_gen: Vec<u32>,
    dist_cost: Vec<u32>,
    came_from: Vec<u32>,
    heap: BinaryHeap<Reverse<(u32, u32, u32, u32)>>,
    path: Vec<usize>,
    gen: u32,
    explored: usize,
}

impl SearchScratch {
    pub(crate) fn configure(&mut self, grid: RoutingGrid, blocking: &[Rect]) {
        let len = grid.len();

        self.grid = Some(grid);
        self.blocked.clear();
        self.blocked.resize(len, 0);
        if self.dist_gen.len() != len {
            self.dist_gen = vec![0u32; len];
            self.dist_cost = vec![0u32; len];
            self.came_from = vec![NO_PARENT; len];
        }

        let reserve_hint = len.min(4096);
        self.heap.reserve(reserve_hint.saturating_sub(self.heap.len()));

        for rect in blocking {
            grid.for_each_overlapping(rect, |idx| self.blocked[idx] = 1);
        }
    }

    /// Nodes expanded by the most recent search.
    pub(crate) fn explored(&self) -> usize {
        self.explored
    }

    pub(crate) fn is_blocked(&self, idx: usize) -> bool {
        self.blocked.get(idx).is_some_and(|b| *b == 1)
    }

    fn begin(&mut self) -> u32 {
        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.dist_gen.fill(0);
            self.gen = 1;
        }
        self.heap.clear();
        self.path.clear();
        self.explored = 0;
        self.gen
    }

    fn dist(&self, idx: usize, gen: u32) -> u32 {
        if self.dist_gen[idx] == gen {
            self.dist_cost[idx]
        } else {
            u32::MAX
        }
    }

    fn set_dist(&mut self, idx: usize, gen: u32, cost: u32, came_from: u32) {
        self.dist_gen[idx] = gen;
        self.dist_cost[idx] = cost;
        self.came_from[idx] = came_from;
    }

    /// 4-directional A* from `start` to `goal` (node indices of the configured
    /// grid). Every step costs one cell and the heuristic is the Manhattan
    /// distance in cells.
    ///
    /// Ties on `f` go to the lower `g`, then to the earlier insertion, so equal
    /// inputs always yield the same path. The start node may be blocked; a
    /// blocked goal is never entered. More than `max_iterations` expansions
    /// abort the search.
    pub(crate) fn shortest_path(
        &mut self,
        start: usize,
        goal: usize,
        max_iterations: usize,
    ) -> Result<&[usize], SearchFailure> {
        let Some(grid) = self.grid else {
            return Err(SearchFailure::Exhausted);
        };
        let gen = self.begin();
        if start >= grid.len() || goal >= grid.len() || self.blocked[goal] == 1 {
            return Err(SearchFailure::Exhausted);
        }

        let (goal_col, goal_row) = grid.cell_of(goal);
        let heuristic = |idx: usize| -> u32 {
            let (col, row) = grid.cell_of(idx);
            (col.abs_diff(goal_col) + row.abs_diff(goal_row)) as u32
        };

        self.set_dist(start, gen, 0, NO_PARENT);
        self.heap.push(Reverse((heuristic(start), 0, 0, start as u32)));
        let mut tie_seq = 1u32;

        while let Some(Reverse((_f_cost, g_cost, _tie, idx))) = self.heap.pop() {
            let idx = idx as usize;
            if g_cost != self.dist(idx, gen) {
                continue;
            }

            self.explored += 1;
            if self.explored > max_iterations {
                return Err(SearchFailure::IterationCap);
            }

            if idx == goal {
                self.reconstruct(start, goal);
                return Ok(&self.path);
            }

            let (col, row) = grid.cell_of(idx);
            for (dc, dr) in neighbor_deltas_towards((col, row), (goal_col, goal_row)) {
                let Some(next_col) = col.checked_add_signed(dc) else {
                    continue;
                };
                let Some(next_row) = row.checked_add_signed(dr) else {
                    continue;
                };
                let Some(next) = grid.idx_of(next_col, next_row) else {
                    continue;
                };
                if self.blocked[next] == 1 {
                    continue;
                }

                let next_cost = g_cost + 1;
                if next_cost < self.dist(next, gen) {
                    self.set_dist(next, gen, next_cost, idx as u32);
                    self.heap.push(Reverse((
                        next_cost + heuristic(next),
                        next_cost,
                        tie_seq,
                        next as u32,
                    )));
                    tie_seq = tie_seq.wrapping_add(1);
                }
            }
        }

        Err(SearchFailure::Exhausted)
    }

    fn reconstruct(&mut self, start: usize, goal: usize) {
        self.path.clear();
        self.path.push(goal);
        let mut cursor = goal;
        while cursor != start {
            let prev = self.came_from[cursor];
            debug_assert_ne!(prev, NO_PARENT);
            cursor = prev as usize;
            self.path.push(cursor);
        }
        self.path.reverse();
    }
}

/// Goal-ward directions first, then the remaining ones in a fixed order
/// (vertical detours before moving horizontally away from the goal).
fn neighbor_deltas_towards(current: (usize, usize), goal: (usize, usize)) -> [(isize, isize); 4] {
    let primary_x = match goal.0.cmp(&current.0) {
        std::cmp::Ordering::Greater => Some((1, 0)),
        std::cmp::Ordering::Less => Some((-1, 0)),
        std::cmp::Ordering::Equal => None,
    };
    let primary_y = match goal.1.cmp(&current.1) {
        std::cmp::Ordering::Greater => Some((0, 1)),
        std::cmp::Ordering::Less => Some((0, -1)),
        std::cmp::Ordering::Equal => None,
    };

    let mut out = [(0, 0); 4];
    let mut idx = 0usize;

    for delta in [primary_x, primary_y].into_iter().flatten() {
        out[idx] = delta;
        idx += 1;
    }

    for delta in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
        if primary_x == Some(delta) || primary_y == Some(delta) {
            continue;
        }
        out[idx] = delta;
        idx += 1;
    }

    debug_assert_eq!(idx, 4);
    out
}
