// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edgeroute: obstacle-avoiding connector routing for diagram editors.
//!
//! The router is a pure function of `(start, end, obstacles, options)` plus an
//! injectable cache: it owns no diagram state and performs no I/O.
//!
//! ```
//! use edgeroute::model::Point;
//! use edgeroute::routing::Router;
//!
//! let mut router = Router::new();
//! let route = router
//!     .calculate_route(Point::new(0.0, 0.0), Point::new(300.0, 400.0), &[], None)
//!     .expect("unobstructed route");
//! assert_eq!(route.distance, 500.0);
//! ```

pub mod model;
pub mod routing;
pub mod scene;

pub use model::{NodeId, Obstacle, Point, Size};
pub use routing::{Route, RouteOptions, Router, RouterConfig};
