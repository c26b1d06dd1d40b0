// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![cfg(test)]

use super::geometry::{Point, Size};
use super::ids::NodeId;
use super::obstacle::Obstacle;

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn node(id: &str, x: f64, y: f64, width: f64, height: f64) -> Obstacle {
    Obstacle::new(nid(id), Point::new(x, y), Size::new(width, height))
}

/// Two regular nodes plus a smaller node sitting between them.
pub(crate) fn three_nodes() -> Vec<Obstacle> {
    vec![
        node("node-1", 100.0, 100.0, 120.0, 80.0),
        node("node-2", 300.0, 200.0, 120.0, 80.0),
        node("obstacle", 200.0, 150.0, 80.0, 60.0),
    ]
}

/// A 5x4 field of 50x50 nodes spaced 100 apart, starting at the origin.
pub(crate) fn dense_field() -> Vec<Obstacle> {
    (0..20)
        .map(|i| {
            let x = f64::from(i % 5) * 100.0;
            let y = f64::from(i / 5) * 100.0;
            node(&format!("dense-{i}"), x, y, 50.0, 50.0)
        })
        .collect()
}

/// Four walls boxing in the area around `(500, 500)`.
pub(crate) fn walled_pen() -> Vec<Obstacle> {
    vec![
        node("wall-top", 400.0, 380.0, 200.0, 20.0),
        node("wall-bottom", 400.0, 600.0, 200.0, 20.0),
        node("wall-left", 380.0, 380.0, 20.0, 240.0),
        node("wall-right", 600.0, 380.0, 20.0, 240.0),
    ]
}
