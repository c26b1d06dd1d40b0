// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Connector routing around rectangular obstacles.
//!
//! A route request goes through a cache lookup, grid discretization sized to
//! obstacle density, a 4-directional A* search and polyline post-processing
//! (bend reduction, optional corner smoothing).

mod astar;
pub mod cache;
pub mod collision;
mod connect;
pub mod grid;
pub mod options;
pub mod postprocess;
mod router;

pub use cache::{route_key, CacheStats, MemoryRouteCache, NoRouteCache, RouteCache, RouteKey};
pub use collision::{calculate_heuristic, euclidean_distance, CollisionDetector};
pub use connect::{
    best_connection_points, validate_connection, ConnectionError, ConnectionRoute, RouteFallback,
};
pub use grid::{choose_grid_parameters, GridParameters};
pub use options::{ConfigError, ResolvedOptions, RouteOptions, RouterConfig};
pub use router::{Route, RouteStats, Router, Segment, SegmentKind};
