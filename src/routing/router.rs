// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::model::{Obstacle, Point, Rect};

use super::astar::{SearchFailure, SearchScratch};
use super::cache::{route_key, MemoryRouteCache, RouteCache};
use super::collision::{self, Clearance, CollisionDetector};
use super::grid::{choose_grid_parameters, full_grid_parameters, GridParameters, RoutingGrid};
use super::options::{ConfigError, ResolvedOptions, RouteOptions, RouterConfig};
use super::postprocess::{count_bends, path_length, reduce_bends, smooth_corners};

/// Diagnostics of a single routing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub nodes_explored: usize,
    /// Serialized as fractional milliseconds.
    #[serde(serialize_with = "serialize_millis")]
    pub execution_time: Duration,
    /// `euclidean(start, end) / distance`, in `(0, 1]`.
    pub efficiency: f64,
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64() * 1000.0)
}

/// A computed connector path.
///
/// `points` is what a renderer draws: it starts at the requested start and
/// ends at the requested end. `polyline` holds the corners before smoothing
/// and equals `points` when nothing was smoothed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub points: Vec<Point>,
    pub polyline: Vec<Point>,
    pub distance: f64,
    pub smoothed: bool,
    /// The options the route was requested with, as given.
    pub options: RouteOptions,
    pub stats: RouteStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    Horizontal,
    Vertical,
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        let kind = if start.y == end.y {
            SegmentKind::Horizontal
        } else if start.x == end.x {
            SegmentKind::Vertical
        } else {
            SegmentKind::Diagonal
        };
        Self { start, end, kind }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl Route {
    pub(crate) fn direct(start: Point, end: Point, options: RouteOptions, elapsed: Duration) -> Self {
        let points = vec![start, end];
        Self {
            polyline: points.clone(),
            points,
            distance: start.distance(end),
            smoothed: false,
            options,
            stats: RouteStats { nodes_explored: 0, execution_time: elapsed, efficiency: 1.0 },
        }
    }

    fn degenerate(at: Point, options: RouteOptions, elapsed: Duration) -> Self {
        Self {
            points: vec![at],
            polyline: vec![at],
            distance: 0.0,
            smoothed: false,
            options,
            stats: RouteStats { nodes_explored: 0, execution_time: elapsed, efficiency: 1.0 },
        }
    }

    /// Direction changes of the unsmoothed polyline.
    pub fn bends(&self) -> usize {
        count_bends(&self.polyline)
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.polyline.windows(2).map(|pair| Segment::new(pair[0], pair[1])).collect()
    }
}

struct GridPath {
    points: Vec<Point>,
    explored: usize,
    cell_size: f64,
}

/// Obstacle-avoiding connector router.
///
/// A router owns its configuration, a reusable search scratch and a
/// [`RouteCache`]. Routing takes `&mut self`; share a cache between routers
/// (for example `Arc<Mutex<MemoryRouteCache>>`) to route from several
/// threads.
#[derive(Debug)]
pub struct Router<C = MemoryRouteCache> {
    config: RouterConfig,
    detector: CollisionDetector,
    cache: C,
    scratch: SearchScratch,
}

impl Router<MemoryRouteCache> {
    /// A router with the default configuration.
    pub fn new() -> Self {
        let config = RouterConfig::default();
        let cache = MemoryRouteCache::new(config.cache_capacity);
        Self::from_parts(config, cache)
    }

    pub fn with_config(config: RouterConfig) -> Result<Self, ConfigError> {
        let cache = MemoryRouteCache::new(config.cache_capacity);
        Self::with_cache(config, cache)
    }
}

impl Default for Router<MemoryRouteCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RouteCache> Router<C> {
    pub fn with_cache(config: RouterConfig, cache: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, cache))
    }

    pub(crate) fn from_parts(config: RouterConfig, cache: C) -> Self {
        Self {
            detector: CollisionDetector::new(config.margin),
            config,
            cache,
            scratch: SearchScratch::default(),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn grid_size(&self) -> f64 {
        self.config.grid_size
    }

    pub fn margin(&self) -> f64 {
        self.config.margin
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Whether `point` lies within `margin` of any obstacle (boundary
    /// included).
    pub fn has_collision(&self, point: Point, obstacles: &[Obstacle]) -> bool {
        self.detector.has_collision(point, obstacles)
    }

    pub fn calculate_heuristic(&self, a: Point, b: Point) -> f64 {
        collision::calculate_heuristic(a, b)
    }

    /// Rounds the corners of an arbitrary polyline with the grid size as
    /// radius. Endpoints are kept.
    pub fn smooth_path(&self, points: &[Point]) -> Vec<Point> {
        smooth_corners(points, self.config.grid_size)
    }

    /// Routes a connector from `start` to `end` around `obstacles`.
    ///
    /// Returns `None` when no path exists within the iteration budget, when
    /// a `max_bends` limit cannot be met without crossing an obstacle, or
    /// when an endpoint is not finite. Identical inputs give identical
    /// routes; repeated calls are answered from the cache.
    pub fn calculate_route(
        &mut self,
        start: Point,
        end: Point,
        obstacles: &[Obstacle],
        options: Option<&RouteOptions>,
    ) -> Option<Route> {
        let started = Instant::now();
        let options = options.cloned().unwrap_or_default();
        if !start.is_finite() || !end.is_finite() {
            debug!(?start, ?end, "endpoint is not finite, not routing");
            return None;
        }

        let key = route_key(start, end, obstacles, &options, &self.config);
        if let Some(route) = self.cache.get(&key) {
            debug!(?start, ?end, "route cache hit");
            return Some(route);
        }

        let route = self.compute_route(start, end, obstacles, options, started)?;
        self.cache.insert(key, route.clone());
        Some(route)
    }

    fn compute_route(
        &mut self,
        start: Point,
        end: Point,
        obstacles: &[Obstacle],
        options: RouteOptions,
        started: Instant,
    ) -> Option<Route> {
        if start == end {
            return Some(Route::degenerate(start, options, started.elapsed()));
        }

        let resolved = ResolvedOptions::resolve(&self.config, &options);
        let clearance = if resolved.avoid_overlap {
            Clearance::for_endpoints(&self.detector, obstacles, start, end)
        } else {
            Clearance::default()
        };

        if clearance.is_empty()
            || (resolved.prefer_straight_lines && clearance.segment_is_clear(start, end, 0.0))
        {
            debug!(?start, ?end, blocking = clearance.rects().len(), "direct route");
            return Some(Route::direct(start, end, options, started.elapsed()));
        }

        let grid_path = match self.find_grid_path(start, end, &clearance) {
            Ok(path) => path,
            Err(explored) => {
                debug!(
                    ?start,
                    ?end,
                    explored,
                    enclosing = clearance.enclosing(),
                    relaxed = clearance.relaxed(),
                    "no path found"
                );
                return None;
            }
        };

        let padding = grid_path.cell_size / 2.0;
        let Some(polyline) = reduce_bends(&grid_path.points, resolved.max_bends, |a, b| {
            clearance.segment_is_clear(a, b, padding)
        }) else {
            debug!(max_bends = resolved.max_bends, "bend limit cannot be met");
            return None;
        };

        let points = if resolved.smoothing && polyline.len() > 2 {
            smooth_corners(&polyline, resolved.corner_radius.min(grid_path.cell_size))
        } else {
            polyline.clone()
        };
        let smoothed = points.len() != polyline.len();
        let distance = path_length(&points);
        let efficiency = if distance > 0.0 { (start.distance(end) / distance).min(1.0) } else { 1.0 };

        debug!(
            points = points.len(),
            bends = count_bends(&polyline),
            nodes_explored = grid_path.explored,
            distance,
            "route computed"
        );

        Some(Route {
            points,
            polyline,
            distance,
            smoothed,
            options,
            stats: RouteStats {
                nodes_explored: grid_path.explored,
                execution_time: started.elapsed(),
                efficiency,
            },
        })
    }

    /// Runs the grid search; a failed narrowed search is retried once on the
    /// whole scene. The error carries the number of expanded nodes. All
    /// attempts together never expand more than `max_iterations` nodes on
    /// success.
    fn find_grid_path(
        &mut self,
        start: Point,
        end: Point,
        clearance: &Clearance,
    ) -> Result<GridPath, usize> {
        let budget = self.config.max_iterations;
        let params = choose_grid_parameters(start, end, clearance.rects(), &self.config);
        trace!(
            cell_size = params.cell_size,
            dense = params.dense,
            blocking = clearance.rects().len(),
            "grid parameters"
        );

        let explored = match self.search_window(start, end, clearance, &params, budget) {
            Ok(path) => return Ok(path),
            Err(explored) => explored,
        };
        if !params.dense || explored >= budget {
            return Err(explored);
        }

        let full = full_grid_parameters(start, end, clearance.rects(), &self.config);
        trace!(cell_size = full.cell_size, "narrowed search failed, retrying on the full scene");
        match self.search_window(start, end, clearance, &full, budget - explored) {
            Ok(mut path) => {
                path.explored += explored;
                Ok(path)
            }
            Err(more) => Err(explored + more),
        }
    }

    /// Searches one window. Every exit of the start anchors a grid; every exit
    /// of the end is tried as goal until a path is found or the budget runs
    /// out.
    fn search_window(
        &mut self,
        start: Point,
        end: Point,
        clearance: &Clearance,
        params: &GridParameters,
        budget: usize,
    ) -> Result<GridPath, usize> {
        let cell = params.cell_size;
        let start_exits = clearance.exits(start, cell);
        let end_exits = clearance.exits(end, cell);
        let bounds = start_exits
            .iter()
            .chain(&end_exits)
            .fold(params.bounds, |acc, p| acc.union(&Rect::around(*p, *p).expand(cell)));

        let mut explored = 0usize;
        for &anchor in &start_exits {
            let grid = RoutingGrid::anchored(&bounds, cell, anchor);
            self.scratch.configure(grid, clearance.rects());

            for &exit in &end_exits {
                let Some(goal) = pick_goal(&self.scratch, &grid, exit, clearance) else {
                    trace!(?exit, "no free grid node reaches the end");
                    continue;
                };
                let found = self
                    .scratch
                    .shortest_path(grid.anchor_idx(), goal, budget - explored)
                    .map(|path| path.iter().map(|idx| grid.point_of(*idx)).collect::<Vec<_>>());
                explored += self.scratch.explored();

                let mut points = match found {
                    Ok(points) => points,
                    Err(failure) => {
                        trace!(?failure, explored, "grid search failed");
                        if failure == SearchFailure::IterationCap || explored >= budget {
                            return Err(explored);
                        }
                        continue;
                    }
                };

                if anchor != start {
                    points.insert(0, start);
                }
                attach_end(&mut points, exit, clearance);
                if exit != end {
                    points.push(end);
                }
                trim_collinear_ends(&mut points);
                if !clearance.path_is_clear(&points, start, end) {
                    trace!(?anchor, ?exit, "grid path crosses an obstacle, discarded");
                    continue;
                }
                return Ok(GridPath { points, explored, cell_size: cell });
            }
        }
        Err(explored)
    }
}

/// Three points on one horizontal or vertical line.
fn axis_aligned(a: Point, b: Point, c: Point) -> bool {
    (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y)
}

/// Drops the inner points of straight runs (and reversals) touching either
/// end of `points`. For collinear `a, b, c` the leg `a -> c` lies on
/// `a -> b -> c`, so no leg gains new contact with an obstacle.
fn trim_collinear_ends(points: &mut Vec<Point>) {
    while points.len() > 2 && axis_aligned(points[0], points[1], points[2]) {
        points.remove(1);
    }
    while matches!(points.as_slice(), [.., a, b, c] if axis_aligned(*a, *b, *c)) {
        let inner = points.len() - 2;
        points.remove(inner);
    }
}

/// How far around the exit point goal candidates are looked for, in cells.
const GOAL_SEARCH_CELLS: isize = 2;

/// The free grid node closest to `exit` that can be joined to it by clear
/// legs; ties go to the lower node index.
fn pick_goal(
    scratch: &SearchScratch,
    grid: &RoutingGrid,
    exit: Point,
    clearance: &Clearance,
) -> Option<usize> {
    let (col, row) = grid.cell_of(grid.nearest_idx(exit));
    let mut best: Option<(f64, usize)> = None;
    for dr in -GOAL_SEARCH_CELLS..=GOAL_SEARCH_CELLS {
        for dc in -GOAL_SEARCH_CELLS..=GOAL_SEARCH_CELLS {
            let (Some(c), Some(r)) = (col.checked_add_signed(dc), row.checked_add_signed(dr)) else {
                continue;
            };
            let Some(idx) = grid.idx_of(c, r) else {
                continue;
            };
            if scratch.is_blocked(idx) {
                continue;
            }
            let node = grid.point_of(idx);
            if end_connector(node, true, exit, clearance).is_none() {
                continue;
            }
            let distance = node.distance(exit);
            if best.map_or(true, |(d, i)| distance < d || (distance == d && idx < i)) {
                best = Some((distance, idx));
            }
        }
    }
    best.map(|(_, idx)| idx)
}

/// The corner joining `last` to `end`, if one is needed: `Some(None)` for a
/// straight leg, `Some(Some(elbow))` for an elbow. Elbows that keep the
/// incoming direction are tried first, a diagonal last. `None` when no
/// option is clear.
fn end_connector(
    last: Point,
    horizontal_in: bool,
    end: Point,
    clearance: &Clearance,
) -> Option<Option<Point>> {
    if last.x == end.x || last.y == end.y {
        return clearance.segment_is_clear(last, end, 0.0).then_some(None);
    }

    let turn_late = Point::new(end.x, last.y);
    let turn_early = Point::new(last.x, end.y);
    let elbows = if horizontal_in { [turn_late, turn_early] } else { [turn_early, turn_late] };
    elbows
        .into_iter()
        .find(|elbow| {
            clearance.segment_is_clear(last, *elbow, 0.0) && clearance.segment_is_clear(*elbow, end, 0.0)
        })
        .map(Some)
        .or_else(|| clearance.segment_is_clear(last, end, 0.0).then_some(None))
}

/// Connects the last grid node to `end`, with an elbow when they are not
/// axis-aligned. Falls back to a straight leg when nothing is clear; the
/// caller checks the finished path.
fn attach_end(points: &mut Vec<Point>, end: Point, clearance: &Clearance) {
    let Some(&last) = points.last() else {
        points.push(end);
        return;
    };
    if last == end {
        return;
    }

    let horizontal_in = match points.as_slice() {
        [.., before, _] => before.y == last.y,
        _ => true,
    };
    if let Some(Some(elbow)) = end_connector(last, horizontal_in, end, clearance) {
        points.push(elbow);
    }
    points.push(end);
}
