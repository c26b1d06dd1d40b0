// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::model::{NodeId, Obstacle, Point};

use super::cache::RouteCache;
use super::options::RouteOptions;
use super::router::{Route, Router};

/// Centers the side-midpoint choice leans towards vertical connections.
const VERTICAL_BIAS: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("node `{0}` cannot be connected to itself")]
    SelfConnection(NodeId),
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),
}

/// Checks that both ends of a node-to-node connection exist and differ.
pub fn validate_connection<'a>(
    source: &NodeId,
    target: &NodeId,
    nodes: &'a [Obstacle],
) -> Result<(&'a Obstacle, &'a Obstacle), ConnectionError> {
    if source == target {
        return Err(ConnectionError::SelfConnection(source.clone()));
    }
    let find = |id: &NodeId| {
        nodes
            .iter()
            .find(|node| &node.id == id)
            .ok_or_else(|| ConnectionError::UnknownNode(id.clone()))
    };
    Ok((find(source)?, find(target)?))
}

/// Midpoints of the facing sides of two nodes.
///
/// Nodes stacked on top of each other (or mostly displaced vertically)
/// connect bottom to top; nodes side by side connect right to left.
pub fn best_connection_points(source: &Obstacle, target: &Obstacle) -> (Point, Point) {
    let from = source.bounds();
    let to = target.bounds();
    let dx = to.center().x - from.center().x;
    let dy = to.center().y - from.center().y;

    let h_overlap = from.min_x() < to.max_x() && from.max_x() > to.min_x();
    let v_overlap = from.min_y() < to.max_y() && from.max_y() > to.min_y();
    let mostly_vertical = dy.abs() > dx.abs() * VERTICAL_BIAS;

    let vertical = if (h_overlap && !v_overlap) || mostly_vertical {
        true
    } else if v_overlap && !h_overlap {
        false
    } else {
        dy.abs() > dx.abs()
    };

    let (from_c, to_c) = (from.center(), to.center());
    if vertical {
        if dy > 0.0 {
            (Point::new(from_c.x, from.max_y()), Point::new(to_c.x, to.min_y()))
        } else {
            (Point::new(from_c.x, from.min_y()), Point::new(to_c.x, to.max_y()))
        }
    } else if dx > 0.0 {
        (Point::new(from.max_x(), from_c.y), Point::new(to.min_x(), to_c.y))
    } else {
        (Point::new(from.min_x(), from_c.y), Point::new(to.max_x(), to_c.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteFallback {
    /// No obstacle-free path was found; the route is the straight line
    /// between the anchors.
    Direct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRoute {
    pub source_anchor: Point,
    pub target_anchor: Point,
    pub route: Route,
    pub fallback: Option<RouteFallback>,
}

impl<C: RouteCache> Router<C> {
    /// Routes an edge between two nodes of `nodes`, treating every other
    /// node as an obstacle.
    pub fn route_between(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        nodes: &[Obstacle],
        options: Option<&RouteOptions>,
    ) -> Result<ConnectionRoute, ConnectionError> {
        let started = Instant::now();
        let (from, to) = validate_connection(source, target, nodes)?;
        let (source_anchor, target_anchor) = best_connection_points(from, to);

        let obstacles = nodes
            .iter()
            .filter(|node| &node.id != source && &node.id != target)
            .cloned()
            .collect::<Vec<_>>();

        let (route, fallback) =
            match self.calculate_route(source_anchor, target_anchor, &obstacles, options) {
                Some(route) => (route, None),
                None => {
                    debug!(%source, %target, "falling back to a direct connection");
                    let options = options.cloned().unwrap_or_default();
                    let route = Route::direct(source_anchor, target_anchor, options, started.elapsed());
                    (route, Some(RouteFallback::Direct))
                }
            };

        Ok(ConnectionRoute { source_anchor, target_anchor, route, fallback })
    }
}

#[cfg(test)]
mod tests {
    use super::{best_connection_points, validate_connection, ConnectionError, RouteFallback};
    use crate::model::fixtures::{nid, node, three_nodes, walled_pen};
    use crate::model::Point;
    use crate::routing::router::Router;

    #[test]
    fn side_by_side_nodes_connect_right_to_left() {
        let a = node("a", 0.0, 0.0, 100.0, 50.0);
        let b = node("b", 200.0, 10.0, 100.0, 50.0);

        assert_eq!(best_connection_points(&a, &b), (Point::new(100.0, 25.0), Point::new(200.0, 35.0)));
        assert_eq!(best_connection_points(&b, &a), (Point::new(200.0, 35.0), Point::new(100.0, 25.0)));
    }

    #[test]
    fn stacked_nodes_connect_bottom_to_top() {
        let a = node("a", 0.0, 0.0, 100.0, 50.0);
        let b = node("b", 20.0, 150.0, 100.0, 50.0);

        assert_eq!(best_connection_points(&a, &b), (Point::new(50.0, 50.0), Point::new(70.0, 150.0)));
        assert_eq!(best_connection_points(&b, &a), (Point::new(70.0, 150.0), Point::new(50.0, 50.0)));
    }

    #[test]
    fn diagonal_neighbours_follow_the_dominant_axis() {
        let a = node("a", 0.0, 0.0, 50.0, 50.0);
        let far_right = node("b", 300.0, 100.0, 50.0, 50.0);
        let far_down = node("c", 100.0, 300.0, 50.0, 50.0);

        assert_eq!(best_connection_points(&a, &far_right).0, Point::new(50.0, 25.0));
        assert_eq!(best_connection_points(&a, &far_down).0, Point::new(25.0, 50.0));
    }

    #[test]
    fn validation_rejects_self_and_unknown_nodes() {
        let nodes = three_nodes();

        assert_eq!(
            validate_connection(&nid("node-1"), &nid("node-1"), &nodes).map(|_| ()),
            Err(ConnectionError::SelfConnection(nid("node-1")))
        );
        assert_eq!(
            validate_connection(&nid("node-1"), &nid("ghost"), &nodes).map(|_| ()),
            Err(ConnectionError::UnknownNode(nid("ghost")))
        );
        assert_eq!(ConnectionError::UnknownNode(nid("ghost")).to_string(), "unknown node `ghost`");

        let (source, target) = validate_connection(&nid("node-1"), &nid("node-2"), &nodes).expect("valid");
        assert_eq!((source.id.as_str(), target.id.as_str()), ("node-1", "node-2"));
    }

    #[test]
    fn route_between_nodes_starts_and_ends_on_their_sides() {
        let mut router = Router::new();
        let nodes = three_nodes();
        let connection =
            router.route_between(&nid("node-1"), &nid("node-2"), &nodes, None).expect("connection");

        assert_eq!(connection.fallback, None);
        assert_eq!(connection.route.points.first(), Some(&connection.source_anchor));
        assert_eq!(connection.route.points.last(), Some(&connection.target_anchor));
    }

    #[test]
    fn unroutable_connections_fall_back_to_a_straight_line() {
        let mut router = Router::new();
        let mut nodes = walled_pen();
        nodes.push(node("outside", 0.0, 0.0, 40.0, 40.0));
        nodes.push(node("inside", 480.0, 480.0, 40.0, 40.0));

        let connection =
            router.route_between(&nid("outside"), &nid("inside"), &nodes, None).expect("connection");

        assert_eq!(connection.fallback, Some(RouteFallback::Direct));
        assert_eq!(connection.route.points, vec![connection.source_anchor, connection.target_anchor]);
    }
}
