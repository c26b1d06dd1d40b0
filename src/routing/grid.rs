// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Discretization of the continuous routing plane into a search grid.

use crate::model::{Point, Rect};

use super::options::RouterConfig;

/// Grid cells of free space kept around the search window on every side.
const PADDING_CELLS: f64 = 2.0;
/// Extra cells (beyond the margin) a narrowed search window keeps around the
/// start/end box.
const LOCAL_WINDOW_CELLS: f64 = 4.0;

/// Resolution and extent of one grid search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParameters {
    pub cell_size: f64,
    pub bounds: Rect,
    /// The window was narrowed to the start/end neighbourhood because too many
    /// obstacles crowd it.
    pub dense: bool,
}

/// Picks cell size and search window for a route.
///
/// Sparse scenes search the bounding region of both endpoints and every
/// blocking rectangle. When more than `dense_obstacle_threshold` rectangles
/// crowd the neighbourhood of the endpoints the window shrinks to that
/// neighbourhood. In both cases the cell size is doubled until the grid fits
/// into `max_grid_nodes`.
pub fn choose_grid_parameters(
    start: Point,
    end: Point,
    blocking: &[Rect],
    config: &RouterConfig,
) -> GridParameters {
    let local = local_window(start, end, config);
    let crowding = blocking.iter().filter(|rect| rect.intersects(&local)).count();
    if crowding > config.dense_obstacle_threshold {
        let (cell_size, bounds) = fit_window(local, start, config);
        return GridParameters { cell_size, bounds, dense: true };
    }

    full_grid_parameters(start, end, blocking, config)
}

/// Parameters covering the whole scene, used directly for sparse scenes and
/// as the retry window when a narrowed search fails.
pub fn full_grid_parameters(
    start: Point,
    end: Point,
    blocking: &[Rect],
    config: &RouterConfig,
) -> GridParameters {
    let scene = blocking.iter().fold(Rect::around(start, end), |acc, rect| acc.union(rect));
    let (cell_size, bounds) = fit_window(scene, start, config);
    GridParameters { cell_size, bounds, dense: false }
}

fn local_window(start: Point, end: Point, config: &RouterConfig) -> Rect {
    Rect::around(start, end).expand(config.margin + LOCAL_WINDOW_CELLS * config.grid_size)
}

fn fit_window(base: Rect, anchor: Point, config: &RouterConfig) -> (f64, Rect) {
    let mut cell_size = config.grid_size;
    loop {
        let bounds = base.expand(PADDING_CELLS * cell_size);
        let grid = RoutingGrid::anchored(&bounds, cell_size, anchor);
        if grid.len() <= config.max_grid_nodes || !cell_size.is_finite() {
            return (cell_size, bounds);
        }
        cell_size *= 2.0;
    }
}

/// A rectangular lattice of nodes spaced `cell` apart.
///
/// The lattice is anchored so that one node coincides exactly with the anchor
/// point (the route start); node coordinates are always derived from the
/// anchor so that nodes sharing a row or column share the exact coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RoutingGrid {
    anchor: Point,
    anchor_col: usize,
    anchor_row: usize,
    cell: f64,
    width: usize,
    height: usize,
}

impl RoutingGrid {
    pub(crate) fn anchored(bounds: &Rect, cell: f64, anchor: Point) -> Self {
        let anchor_col = cells_between(bounds.min_x(), anchor.x, cell);
        let anchor_row = cells_between(bounds.min_y(), anchor.y, cell);
        let width = anchor_col
            .saturating_add(cells_between(anchor.x, bounds.max_x(), cell))
            .saturating_add(1);
        let height = anchor_row
            .saturating_add(cells_between(anchor.y, bounds.max_y(), cell))
            .saturating_add(1);
        Self { anchor, anchor_col, anchor_row, cell, width, height }
    }

    pub(crate) fn cell_size(&self) -> f64 {
        self.cell
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub(crate) fn anchor_idx(&self) -> usize {
        self.anchor_row * self.width + self.anchor_col
    }

    pub(crate) fn idx_of(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + col)
    }

    pub(crate) fn cell_of(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }

    pub(crate) fn point_of(&self, idx: usize) -> Point {
        let (col, row) = self.cell_of(idx);
        Point::new(
            self.anchor.x + steps(col, self.anchor_col) * self.cell,
            self.anchor.y + steps(row, self.anchor_row) * self.cell,
        )
    }

    /// The node closest to `p`, clamped into the grid.
    pub(crate) fn nearest_idx(&self, p: Point) -> usize {
        let col = nearest_step(self.anchor.x, p.x, self.cell, self.anchor_col, self.width);
        let row = nearest_step(self.anchor.y, p.y, self.cell, self.anchor_row, self.height);
        row * self.width + col
    }

    /// Calls `mark` for every node whose cell square (the node plus or minus
    /// half a cell) touches `rect`.
    pub(crate) fn for_each_overlapping(&self, rect: &Rect, mut mark: impl FnMut(usize)) {
        let Some((col_lo, col_hi)) = self.span(
            self.anchor.x,
            self.anchor_col,
            self.width,
            rect.min_x(),
            rect.max_x(),
        ) else {
            return;
        };
        let Some((row_lo, row_hi)) = self.span(
            self.anchor.y,
            self.anchor_row,
            self.height,
            rect.min_y(),
            rect.max_y(),
        ) else {
            return;
        };

        for row in row_lo..=row_hi {
            let base = row * self.width;
            for col in col_lo..=col_hi {
                mark(base + col);
            }
        }
    }

    fn span(
        &self,
        anchor: f64,
        anchor_idx: usize,
        len: usize,
        lo: f64,
        hi: f64,
    ) -> Option<(usize, usize)> {
        let half = self.cell / 2.0;
        let first = ((lo - half - anchor) / self.cell).ceil() + anchor_idx as f64;
        let last = ((hi + half - anchor) / self.cell).floor() + anchor_idx as f64;
        if last < 0.0 || first > (len - 1) as f64 || first > last {
            return None;
        }
        Some((first.max(0.0) as usize, last.min((len - 1) as f64) as usize))
    }
}

fn cells_between(lo: f64, hi: f64, cell: f64) -> usize {
    if hi <= lo {
        return 0;
    }
    ((hi - lo) / cell).ceil() as usize
}

fn steps(idx: usize, anchor_idx: usize) -> f64 {
    if idx >= anchor_idx {
        (idx - anchor_idx) as f64
    } else {
        -((anchor_idx - idx) as f64)
    }
}

fn nearest_step(anchor: f64, value: f64, cell: f64, anchor_idx: usize, len: usize) -> usize {
    let offset = ((value - anchor) / cell).round() + anchor_idx as f64;
    offset.clamp(0.0, (len - 1) as f64) as usize
}
