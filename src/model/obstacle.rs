// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect, Size};
use super::ids::NodeId;

/// Read-only projection of a diagram node: its id and its bounding box.
///
/// Obstacles may overlap or nest; the router treats every one of them
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Obstacle {
    pub id: NodeId,
    /// Top-left corner.
    pub position: Point,
    pub size: Size,
}

impl Obstacle {
    pub fn new(id: NodeId, position: Point, size: Size) -> Self {
        Self { id, position, size }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

#[cfg(test)]
mod tests {
    use super::Obstacle;
    use crate::model::{NodeId, Point, Size};

    #[test]
    fn deserializes_editor_node_shape() {
        let json = r#"{"id":"n1","position":{"x":200,"y":150},"size":{"width":80,"height":60}}"#;
        let obstacle: Obstacle = serde_json::from_str(json).expect("obstacle");

        assert_eq!(
            obstacle,
            Obstacle::new(
                NodeId::new("n1").expect("node id"),
                Point::new(200.0, 150.0),
                Size::new(80.0, 60.0),
            )
        );
        assert_eq!(obstacle.center(), Point::new(240.0, 180.0));
    }
}
