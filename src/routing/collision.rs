// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Obstacle, Point, Rect};

/// Manhattan distance between two points.
///
/// Routing moves are grid aligned and 4-directional, which makes this both
/// admissible and consistent as an A* heuristic.
pub fn calculate_heuristic(a: Point, b: Point) -> f64 {
    a.manhattan(b)
}

pub fn euclidean_distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Point-versus-obstacle predicate with a symmetric clearance margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDetector {
    margin: f64,
}

impl CollisionDetector {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// The obstacle's rectangle grown by the margin on all sides.
    pub fn clearance_rect(&self, obstacle: &Obstacle) -> Rect {
        obstacle.bounds().expand(self.margin)
    }

    /// Points on the expanded boundary collide.
    pub fn collides(&self, point: Point, obstacle: &Obstacle) -> bool {
        self.clearance_rect(obstacle).contains(point)
    }

    pub fn has_collision(&self, point: Point, obstacles: &[Obstacle]) -> bool {
        obstacles.iter().any(|obstacle| self.collides(point, obstacle))
    }

    pub fn segment_collides(&self, a: Point, b: Point, obstacle: &Obstacle) -> bool {
        self.clearance_rect(obstacle).intersects_segment(a, b)
    }
}

/// Exit points are placed this many cells past the enclosing rectangles.
const EXIT_CELLS: f64 = 1.5;

/// Axis directions tried when leaving an enclosed endpoint.
const EXIT_DIRECTIONS: [(f64, f64); 4] = [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];

/// The rectangles a single route has to keep out of.
///
/// Endpoints frequently sit on or inside the nodes they connect. An obstacle
/// whose clearance zone contains an endpoint only blocks its body; every other
/// obstacle blocks its full clearance rectangle. A body that encloses an
/// endpoint stays blocked: the route leaves it through one straight exit leg
/// (see [`Clearance::exits`]) and crosses no other obstacle.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Clearance {
    rects: Vec<Rect>,
    enclosing: usize,
    relaxed: usize,
}

impl Clearance {
    pub(crate) fn for_endpoints(
        detector: &CollisionDetector,
        obstacles: &[Obstacle],
        start: Point,
        end: Point,
    ) -> Self {
        let mut clearance = Self::default();
        for obstacle in obstacles {
            let body = obstacle.bounds();
            if !is_finite_rect(&body) {
                continue;
            }
            let expanded = body.expand(detector.margin());
            if body.contains(start) || body.contains(end) {
                clearance.enclosing += 1;
                clearance.rects.push(body);
            } else if expanded.contains(start) || expanded.contains(end) {
                clearance.relaxed += 1;
                clearance.rects.push(body);
            } else {
                clearance.rects.push(expanded);
            }
        }
        clearance
    }

    pub(crate) fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Obstacles whose body contains an endpoint.
    pub(crate) fn enclosing(&self) -> usize {
        self.enclosing
    }

    pub(crate) fn relaxed(&self) -> usize {
        self.relaxed
    }

    /// Whether `p` lies in or on a blocking rectangle.
    pub(crate) fn encloses(&self, p: Point) -> bool {
        self.rects.iter().any(|rect| rect.contains(p))
    }

    /// Whether the segment keeps strictly more than `padding` away from every
    /// blocking rectangle.
    pub(crate) fn segment_is_clear(&self, a: Point, b: Point, padding: f64) -> bool {
        self.rects.iter().all(|rect| !rect.expand(padding).intersects_segment(a, b))
    }

    /// Free points a route can leave `p` from.
    ///
    /// A free `p` is its own exit. An enclosed `p` gets one candidate per axis
    /// direction, `EXIT_CELLS` cells past every rectangle containing it, as
    /// long as the straight leg from `p` crosses no other rectangle. Shorter
    /// legs come first.
    pub(crate) fn exits(&self, p: Point, cell: f64) -> Vec<Point> {
        if !self.encloses(p) {
            return vec![p];
        }

        let mut exits = EXIT_DIRECTIONS
            .iter()
            .filter_map(|&(dx, dy)| {
                let inside = self
                    .rects
                    .iter()
                    .filter(|rect| rect.contains(p))
                    .map(|rect| {
                        if dx > 0.0 {
                            rect.max_x() - p.x
                        } else if dx < 0.0 {
                            p.x - rect.min_x()
                        } else if dy > 0.0 {
                            rect.max_y() - p.y
                        } else {
                            p.y - rect.min_y()
                        }
                    })
                    .fold(0.0f64, f64::max);
                let reach = inside + EXIT_CELLS * cell;
                let exit = p.offset(dx * reach, dy * reach);
                (exit.is_finite() && self.leg_is_clear(p, exit, p)).then_some((inside, exit))
            })
            .collect::<Vec<_>>();
        exits.sort_by(|a, b| a.0.total_cmp(&b.0));
        exits.into_iter().map(|(_, exit)| exit).collect()
    }

    /// Whether every leg of `points` stays out of the blocking rectangles.
    /// Only the first leg may cross rectangles enclosing `start`, and only the
    /// last leg those enclosing `end`.
    pub(crate) fn path_is_clear(&self, points: &[Point], start: Point, end: Point) -> bool {
        let last = points.len().saturating_sub(2);
        points.windows(2).enumerate().all(|(i, leg)| {
            self.rects.iter().all(|rect| {
                (i == 0 && rect.contains(start))
                    || (i == last && rect.contains(end))
                    || !rect.intersects_segment(leg[0], leg[1])
            })
        })
    }

    /// Segment test that ignores the rectangles containing `host`.
    fn leg_is_clear(&self, a: Point, b: Point, host: Point) -> bool {
        self.rects.iter().all(|rect| rect.contains(host) || !rect.intersects_segment(a, b))
    }
}

fn is_finite_rect(rect: &Rect) -> bool {
    rect.min_x().is_finite()
        && rect.min_y().is_finite()
        && rect.max_x().is_finite()
        && rect.max_y().is_finite()
}

#[cfg(test)]
mod tests {
    use super::{calculate_heuristic, Clearance, CollisionDetector};
    use crate::model::fixtures::{node, three_nodes};
    use crate::model::Point;

    #[test]
    fn detects_point_inside_obstacle() {
        let detector = CollisionDetector::new(20.0);
        let obstacle = node("obstacle", 200.0, 150.0, 80.0, 60.0);

        assert!(detector.has_collision(Point::new(210.0, 160.0), std::slice::from_ref(&obstacle)));
        assert!(!detector.has_collision(Point::new(50.0, 50.0), std::slice::from_ref(&obstacle)));
    }

    #[test]
    fn margin_extends_the_collision_zone() {
        let obstacle = node("obstacle", 200.0, 150.0, 80.0, 60.0);
        let near = Point::new(190.0, 140.0);

        assert!(!CollisionDetector::new(0.0).collides(near, &obstacle));
        assert!(CollisionDetector::new(20.0).collides(near, &obstacle));
        assert!(CollisionDetector::new(50.0).collides(Point::new(150.0, 100.0), &obstacle));
    }

    #[test]
    fn expanded_boundary_is_inclusive() {
        let detector = CollisionDetector::new(20.0);
        let obstacle = node("obstacle", 200.0, 150.0, 80.0, 60.0);

        assert!(detector.collides(Point::new(180.0, 130.0), &obstacle));
        assert!(detector.collides(Point::new(300.0, 230.0), &obstacle));
        assert!(!detector.collides(Point::new(300.001, 230.0), &obstacle));
    }

    #[test]
    fn any_obstacle_in_the_set_counts() {
        let detector = CollisionDetector::new(20.0);
        let nodes = three_nodes();

        assert!(detector.has_collision(Point::new(150.0, 140.0), &nodes));
        assert!(detector.has_collision(Point::new(430.0, 290.0), &nodes));
        assert!(!detector.has_collision(Point::new(0.0, 0.0), &nodes));
        assert!(!detector.has_collision(Point::new(0.0, 0.0), &[]));
    }

    #[test]
    fn collision_is_monotonic_in_margin() {
        let obstacle = node("obstacle", 200.0, 150.0, 80.0, 60.0);
        let samples = (0..40)
            .flat_map(|i| (0..30).map(move |j| Point::new(f64::from(i) * 10.0, f64::from(j) * 10.0)))
            .collect::<Vec<_>>();

        for pair in [0.0, 5.0, 10.0, 20.0, 35.0, 80.0].windows(2) {
            let narrow = CollisionDetector::new(pair[0]);
            let wide = CollisionDetector::new(pair[1]);
            for p in &samples {
                if narrow.collides(*p, &obstacle) {
                    assert!(wide.collides(*p, &obstacle), "margin {} lost {p:?}", pair[1]);
                }
            }
        }
    }

    #[test]
    fn heuristic_is_manhattan_symmetric_and_zero_on_identity() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);

        assert_eq!(calculate_heuristic(a, b), 70.0);
        assert_eq!(calculate_heuristic(b, a), calculate_heuristic(a, b));
        assert_eq!(calculate_heuristic(b, b), 0.0);
    }

    #[test]
    fn clearance_keeps_enclosing_bodies_and_relaxes_near_misses() {
        let detector = CollisionDetector::new(20.0);
        let nodes = three_nodes();

        // Start on node-1's left edge, end inside the obstacle's margin only.
        let clearance =
            Clearance::for_endpoints(&detector, &nodes, Point::new(100.0, 150.0), Point::new(300.0, 150.0));

        assert_eq!(clearance.enclosing(), 1);
        assert_eq!(clearance.relaxed(), 1);
        assert_eq!(clearance.rects().len(), 3);

        let enclosing = clearance.rects()[0];
        assert_eq!((enclosing.min_x(), enclosing.max_x()), (100.0, 220.0));
        let relaxed = clearance.rects()[2];
        assert_eq!((relaxed.min_x(), relaxed.max_x()), (200.0, 280.0));
        assert!(clearance.encloses(Point::new(100.0, 150.0)));
        assert!(!clearance.encloses(Point::new(300.0, 150.0)));
    }

    #[test]
    fn free_points_are_their_own_exit() {
        let detector = CollisionDetector::new(20.0);
        let nodes = vec![node("obstacle", 200.0, 150.0, 80.0, 60.0)];
        let clearance =
            Clearance::for_endpoints(&detector, &nodes, Point::new(0.0, 0.0), Point::new(500.0, 0.0));

        assert_eq!(clearance.exits(Point::new(0.0, 0.0), 10.0), vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn enclosed_points_exit_through_the_nearest_side_first() {
        let detector = CollisionDetector::new(20.0);
        let nodes = vec![node("obstacle", 200.0, 150.0, 80.0, 60.0)];
        let edge = Point::new(280.0, 180.0);
        let clearance = Clearance::for_endpoints(&detector, &nodes, Point::new(50.0, 180.0), edge);

        let exits = clearance.exits(edge, 10.0);
        assert_eq!(exits.len(), 4);
        assert_eq!(exits[0], Point::new(295.0, 180.0));
        assert_eq!(exits[3], Point::new(185.0, 180.0));
        for exit in &exits {
            assert!(!clearance.encloses(*exit), "{exit:?}");
        }
    }

    #[test]
    fn exits_never_cross_other_obstacles() {
        let detector = CollisionDetector::new(0.0);
        // The host node has a neighbour flush against its right side.
        let nodes = vec![node("host", 0.0, 0.0, 100.0, 100.0), node("right", 105.0, 0.0, 50.0, 100.0)];
        let inside = Point::new(90.0, 50.0);
        let clearance = Clearance::for_endpoints(&detector, &nodes, inside, Point::new(500.0, 500.0));

        let exits = clearance.exits(inside, 10.0);
        assert_eq!(exits.len(), 3);
        assert!(exits.iter().all(|exit| exit.x <= 90.0), "{exits:?}");
    }

    #[test]
    fn path_check_lets_only_the_outer_legs_cross_enclosing_nodes() {
        let detector = CollisionDetector::new(20.0);
        let nodes = vec![node("obstacle", 200.0, 150.0, 80.0, 60.0)];
        let (start, end) = (Point::new(50.0, 180.0), Point::new(280.0, 180.0));
        let clearance = Clearance::for_endpoints(&detector, &nodes, start, end);

        let around = [start, Point::new(50.0, 100.0), Point::new(295.0, 100.0), Point::new(295.0, 180.0), end];
        assert!(clearance.path_is_clear(&around, start, end));
        assert!(!clearance.path_is_clear(&[start, end], start, Point::new(600.0, 180.0)));
        let through = [start, Point::new(240.0, 180.0), Point::new(240.0, 100.0), Point::new(295.0, 100.0), Point::new(295.0, 180.0), end];
        assert!(!clearance.path_is_clear(&through, start, end));
    }

    #[test]
    fn segment_clearance_respects_padding() {
        let detector = CollisionDetector::new(20.0);
        let nodes = vec![node("obstacle", 200.0, 150.0, 80.0, 60.0)];
        let clearance =
            Clearance::for_endpoints(&detector, &nodes, Point::new(0.0, 0.0), Point::new(500.0, 0.0));

        let a = Point::new(100.0, 120.0);
        let b = Point::new(400.0, 120.0);
        assert!(clearance.segment_is_clear(a, b, 5.0));
        assert!(!clearance.segment_is_clear(a, b, 10.0));
        assert!(!clearance.segment_is_clear(Point::new(100.0, 150.0), Point::new(400.0, 150.0), 0.0));
    }
}
