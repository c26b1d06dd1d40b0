// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Polyline post-processing: collinear compression, bend reduction and
//! corner smoothing.

use crate::model::Point;

/// Interior samples per smoothed corner (the curve is emitted as
/// `CURVE_SAMPLES + 1` points including both tangent points).
pub const CURVE_SAMPLES: usize = 8;

const LENGTH_EPSILON: f64 = 1e-9;

/// Drops consecutive duplicates and every interior point that continues the
/// previous segment in the same direction.
pub fn compress_to_polyline(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() == Some(&p) {
            continue;
        }
        if let [.., a, b] = out.as_slice() {
            if continues_straight(*a, *b, p) {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

/// Direction changes along the polyline.
pub fn count_bends(points: &[Point]) -> usize {
    compress_to_polyline(points).len().saturating_sub(2)
}

pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

fn continues_straight(a: Point, b: Point, c: Point) -> bool {
    let (ux, uy) = (b.x - a.x, b.y - a.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    ux * vy - uy * vx == 0.0 && ux * vx + uy * vy > 0.0
}

fn is_axis_aligned(a: Point, b: Point) -> bool {
    a.x == b.x || a.y == b.y
}

struct Candidate {
    points: Vec<Point>,
    diagonal: bool,
    length: f64,
    index: usize,
}

/// Compresses `points` and removes bends.
///
/// Merges that do not lengthen the path are always applied: two consecutive
/// corners `b, c` between `a` and `d` are replaced by one L-corner when
/// `is_clear` accepts both new legs. With `max_bends` set, longer merges and
/// finally diagonal shortcuts over a single corner are taken (shortest first,
/// orthogonal before diagonal) until the limit holds. Returns `None` when the
/// limit cannot be met without violating `is_clear`.
pub(crate) fn reduce_bends(
    points: &[Point],
    max_bends: Option<usize>,
    is_clear: impl Fn(Point, Point) -> bool,
) -> Option<Vec<Point>> {
    let mut current = compress_to_polyline(points);
    while let Some(next) = best_merge(&current, false, &is_clear) {
        current = next;
    }

    let Some(limit) = max_bends else {
        return Some(current);
    };
    while count_bends(&current) > limit {
        current = best_merge(&current, true, &is_clear)?;
    }
    Some(current)
}

fn best_merge(
    points: &[Point],
    forced: bool,
    is_clear: &impl Fn(Point, Point) -> bool,
) -> Option<Vec<Point>> {
    let length = path_length(points);
    let bends = count_bends(points);

    merge_candidates(points, forced, is_clear)
        .into_iter()
        .filter(|c| forced || (!c.diagonal && c.length <= length + LENGTH_EPSILON))
        .filter(|c| count_bends(&c.points) < bends)
        .min_by(|a, b| {
            a.diagonal
                .cmp(&b.diagonal)
                .then(a.length.total_cmp(&b.length))
                .then(a.index.cmp(&b.index))
        })
        .map(|c| c.points)
}

fn merge_candidates(
    points: &[Point],
    allow_shortcuts: bool,
    is_clear: &impl Fn(Point, Point) -> bool,
) -> Vec<Candidate> {
    let mut out = Vec::new();

    for (index, window) in points.windows(4).enumerate() {
        let (a, d) = (window[0], window[3]);
        for q in [Point::new(a.x, d.y), Point::new(d.x, a.y)] {
            if !is_clear(a, q) || !is_clear(q, d) {
                continue;
            }
            let mut merged = Vec::with_capacity(points.len() - 1);
            merged.extend_from_slice(&points[..=index]);
            merged.push(q);
            merged.extend_from_slice(&points[index + 3..]);
            let merged = compress_to_polyline(&merged);
            out.push(Candidate {
                diagonal: !is_axis_aligned(a, q) || !is_axis_aligned(q, d),
                length: path_length(&merged),
                points: merged,
                index,
            });
        }
    }

    if allow_shortcuts {
        for (index, window) in points.windows(3).enumerate() {
            let (a, c) = (window[0], window[2]);
            if !is_clear(a, c) {
                continue;
            }
            let mut merged = Vec::with_capacity(points.len() - 1);
            merged.extend_from_slice(&points[..=index]);
            merged.extend_from_slice(&points[index + 2..]);
            let merged = compress_to_polyline(&merged);
            out.push(Candidate {
                diagonal: !is_axis_aligned(a, c),
                length: path_length(&merged),
                points: merged,
                index,
            });
        }
    }

    out
}

/// Rounds every interior corner with a quadratic Bézier arc.
///
/// The arc starts and ends `radius` away from the corner along the adjacent
/// segments (clamped to half of each segment so neighbouring arcs never
/// overlap) and uses the corner itself as the control point. The first and
/// last points are kept exactly.
pub fn smooth_corners(points: &[Point], radius: f64) -> Vec<Point> {
    if points.len() < 3 || !(radius > 0.0) {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(2 + (points.len() - 2) * (CURVE_SAMPLES + 1));
    out.push(points[0]);

    for window in points.windows(3) {
        let (prev, corner, next) = (window[0], window[1], window[2]);
        let into = corner.distance(prev);
        let out_of = corner.distance(next);
        let r = radius.min(into / 2.0).min(out_of / 2.0);
        if !(r > 0.0) {
            push_distinct(&mut out, corner);
            continue;
        }

        let entry = toward(corner, prev, r / into);
        let exit = toward(corner, next, r / out_of);
        for step in 0..=CURVE_SAMPLES {
            let t = step as f64 / CURVE_SAMPLES as f64;
            push_distinct(&mut out, quadratic_bezier(entry, corner, exit, t));
        }
    }

    if let Some(last) = points.last() {
        push_distinct(&mut out, *last);
    }
    out
}

fn toward(from: Point, to: Point, fraction: f64) -> Point {
    from.offset((to.x - from.x) * fraction, (to.y - from.y) * fraction)
}

fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    if t <= 0.0 {
        return p0;
    }
    if t >= 1.0 {
        return p2;
    }
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

fn push_distinct(out: &mut Vec<Point>, p: Point) {
    if out.last() != Some(&p) {
        out.push(p);
    }
}
