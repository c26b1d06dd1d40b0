// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Route memoization.
//!
//! [`route_key`] derives a structural key from every input of a routing call;
//! the storage policy behind it is pluggable through [`RouteCache`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::model::{Obstacle, Point};

use super::options::{RouteOptions, RouterConfig, DEFAULT_CACHE_CAPACITY};
use super::router::Route;

/// Structural identity of a routing call.
///
/// Coordinates are compared bit-for-bit (with `-0.0` folded onto `0.0`), and
/// the obstacle list is treated as a set: the same obstacles in a different
/// order produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    start: [u64; 2],
    end: [u64; 2],
    obstacles: Vec<(String, [u64; 4])>,
    options: OptionsKey,
    config: ConfigKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OptionsKey {
    avoid_overlap: Option<bool>,
    prefer_straight_lines: Option<bool>,
    max_bends: Option<usize>,
    corner_radius: Option<u64>,
    smoothing: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ConfigKey {
    grid_size: u64,
    margin: u64,
    smoothing: bool,
    avoid_overlap: bool,
    dense_obstacle_threshold: usize,
    max_grid_nodes: usize,
    max_iterations: usize,
}

fn bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

fn point_bits(p: Point) -> [u64; 2] {
    [bits(p.x), bits(p.y)]
}

/// Derives the cache key for one `calculate_route` call.
///
/// The router configuration participates because it supplies the defaults
/// for absent options and bounds the search.
pub fn route_key(
    start: Point,
    end: Point,
    obstacles: &[Obstacle],
    options: &RouteOptions,
    config: &RouterConfig,
) -> RouteKey {
    let mut obstacle_keys = obstacles
        .iter()
        .map(|o| {
            (
                o.id.as_str().to_owned(),
                [
                    bits(o.position.x),
                    bits(o.position.y),
                    bits(o.size.width),
                    bits(o.size.height),
                ],
            )
        })
        .collect::<Vec<_>>();
    obstacle_keys.sort_unstable();

    RouteKey {
        start: point_bits(start),
        end: point_bits(end),
        obstacles: obstacle_keys,
        options: OptionsKey {
            avoid_overlap: options.avoid_overlap,
            prefer_straight_lines: options.prefer_straight_lines,
            max_bends: options.max_bends,
            corner_radius: options.corner_radius.map(bits),
            smoothing: options.smoothing,
        },
        config: ConfigKey {
            grid_size: bits(config.grid_size),
            margin: bits(config.margin),
            smoothing: config.smoothing,
            avoid_overlap: config.avoid_overlap,
            dense_obstacle_threshold: config.dense_obstacle_threshold,
            max_grid_nodes: config.max_grid_nodes,
            max_iterations: config.max_iterations,
        },
    }
}

/// Storage for computed routes.
pub trait RouteCache {
    fn get(&mut self, key: &RouteKey) -> Option<Route>;
    fn insert(&mut self, key: RouteKey, route: Route);
    fn clear(&mut self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// In-memory cache bounded by entry count; the oldest insertion is evicted
/// first.
#[derive(Debug, Clone)]
pub struct MemoryRouteCache {
    entries: HashMap<RouteKey, Route>,
    order: VecDeque<RouteKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for MemoryRouteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl MemoryRouteCache {
    /// A capacity of zero disables storage.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { hits: self.hits, misses: self.misses, entries: self.entries.len() }
    }
}

impl RouteCache for MemoryRouteCache {
    fn get(&mut self, key: &RouteKey) -> Option<Route> {
        match self.entries.get(key) {
            Some(route) => {
                self.hits += 1;
                Some(route.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn insert(&mut self, key: RouteKey, route: Route) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = route;
            return;
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, route);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRouteCache;

impl RouteCache for NoRouteCache {
    fn get(&mut self, _key: &RouteKey) -> Option<Route> {
        None
    }

    fn insert(&mut self, _key: RouteKey, _route: Route) {}

    fn clear(&mut self) {}

    fn len(&self) -> usize {
        0
    }
}

/// Shares one cache between routers, e.g. across worker threads. A poisoned
/// lock is recovered; entries are only ever replaced whole.
impl<C: RouteCache> RouteCache for Arc<Mutex<C>> {
    fn get(&mut self, key: &RouteKey) -> Option<Route> {
        self.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).get(key)
    }

    fn insert(&mut self, key: RouteKey, route: Route) {
        self.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).insert(key, route);
    }

    fn clear(&mut self) {
        self.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }

    fn len(&self) -> usize {
        self.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}
