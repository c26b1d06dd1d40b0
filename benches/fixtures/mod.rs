// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use edgeroute::model::{NodeId, Obstacle, Point, Size};

pub struct Scenario {
    pub start: Point,
    pub end: Point,
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Three nodes, one of them between the endpoints.
    Sparse,
    /// A long row of nodes the route has to go around.
    Corridor,
    /// A regular 12x12 field of nodes; triggers the narrowed search window.
    DenseField,
    /// Staggered walls with alternating gaps.
    Maze,
}

fn node(id: String, x: f64, y: f64, width: f64, height: f64) -> Obstacle {
    Obstacle::new(NodeId::new(id).expect("valid node id"), Point::new(x, y), Size::new(width, height))
}

pub fn fixture(case: Case) -> Scenario {
    match case {
        Case::Sparse => Scenario {
            start: Point::new(50.0, 150.0),
            end: Point::new(450.0, 250.0),
            obstacles: vec![
                node("node-1".to_owned(), 100.0, 100.0, 120.0, 80.0),
                node("node-2".to_owned(), 300.0, 200.0, 120.0, 80.0),
                node("obstacle".to_owned(), 200.0, 150.0, 80.0, 60.0),
            ],
        },
        Case::Corridor => Scenario {
            start: Point::new(0.0, 300.0),
            end: Point::new(1200.0, 300.0),
            obstacles: (0..10)
                .map(|i| node(format!("row-{i}"), 100.0 + f64::from(i) * 100.0, 200.0, 80.0, 200.0))
                .collect(),
        },
        Case::DenseField => Scenario {
            start: Point::new(-40.0, -40.0),
            end: Point::new(940.0, 940.0),
            obstacles: (0..144)
                .map(|i| {
                    let (col, row) = (i % 12, i / 12);
                    node(
                        format!("cell-{i}"),
                        f64::from(col) * 80.0,
                        f64::from(row) * 80.0,
                        40.0,
                        40.0,
                    )
                })
                .collect(),
        },
        Case::Maze => Scenario {
            start: Point::new(0.0, 250.0),
            end: Point::new(1000.0, 250.0),
            obstacles: (0..8)
                .map(|i| {
                    let y = if i % 2 == 0 { 0.0 } else { 120.0 };
                    node(format!("wall-{i}"), 100.0 + f64::from(i) * 110.0, y, 20.0, 380.0)
                })
                .collect(),
        },
    }
}

/// An orthogonal staircase with `steps` corners, for post-processing benches.
pub fn staircase(steps: usize) -> Vec<Point> {
    let mut points = Vec::with_capacity(steps + 1);
    let mut p = Point::new(0.0, 0.0);
    points.push(p);
    for i in 0..steps {
        p = if i % 2 == 0 { Point::new(p.x + 20.0, p.y) } else { Point::new(p.x, p.y + 20.0) };
        points.push(p);
    }
    points
}

pub fn checksum_points(points: &[Point]) -> u64 {
    points.iter().fold(points.len() as u64, |acc, p| {
        acc.wrapping_mul(131).wrapping_add(p.x.to_bits() ^ p.y.to_bits().rotate_left(17))
    })
}
