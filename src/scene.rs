// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Batch routing of a whole diagram.
//!
//! A [`Scene`] lists the diagram nodes and the edges to route. Every edge is
//! routed on its own against the full node set; edges are not optimized
//! jointly.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{EdgeId, NodeId, Obstacle, Point};
use crate::routing::{
    ConfigError, MemoryRouteCache, Route, RouteFallback, RouteOptions, Router, RouterConfig,
};

pub type SharedRouteCache = Arc<Mutex<MemoryRouteCache>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Scene {
    pub router: RouterConfig,
    pub nodes: Vec<Obstacle>,
    pub edges: Vec<EdgeRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRequest {
    pub id: EdgeId,
    #[serde(flatten)]
    pub endpoints: EdgeEndpoints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<RouteOptions>,
}

/// Either two free points or two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EdgeEndpoints {
    Points { start: Point, end: Point },
    Nodes { source: NodeId, target: NodeId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EdgeStatus {
    Routed,
    /// Node-to-node edge drawn as a straight line because no path was found.
    DirectFallback,
    /// Point-to-point edge without a path.
    NoPath,
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEdge {
    pub id: EdgeId,
    pub status: EdgeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("invalid scene document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid router configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("duplicate node id `{0}`")]
    DuplicateNode(NodeId),
    #[error("duplicate edge id `{0}`")]
    DuplicateEdge(EdgeId),
}

impl Scene {
    /// Checks the router configuration and id uniqueness.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.router.validate()?;

        let mut nodes = BTreeSet::new();
        for node in &self.nodes {
            if !nodes.insert(&node.id) {
                return Err(SceneError::DuplicateNode(node.id.clone()));
            }
        }
        let mut edges = BTreeSet::new();
        for edge in &self.edges {
            if !edges.insert(&edge.id) {
                return Err(SceneError::DuplicateEdge(edge.id.clone()));
            }
        }
        Ok(())
    }
}

pub fn parse_scene(input: &str) -> Result<Scene, SceneError> {
    let scene: Scene = serde_json::from_str(input)?;
    scene.validate()?;
    Ok(scene)
}

/// Routes every edge of `scene` in parallel.
///
/// Each worker owns a router; all of them share `cache`. The result has one
/// entry per edge, in edge order.
pub fn route_scene(scene: &Scene, cache: &SharedRouteCache) -> Result<Vec<RoutedEdge>, SceneError> {
    scene.validate()?;

    let routed = scene
        .edges
        .par_iter()
        .map_init(
            || Router::from_parts(scene.router.clone(), Arc::clone(cache)),
            |router, edge| route_edge(router, &scene.nodes, edge),
        )
        .collect::<Vec<_>>();

    debug!(
        edges = routed.len(),
        routed = routed.iter().filter(|edge| edge.status == EdgeStatus::Routed).count(),
        "scene routed"
    );
    Ok(routed)
}

fn route_edge(
    router: &mut Router<SharedRouteCache>,
    nodes: &[Obstacle],
    edge: &EdgeRequest,
) -> RoutedEdge {
    let options = edge.options.as_ref();
    let (status, route) = match &edge.endpoints {
        EdgeEndpoints::Points { start, end } => {
            match router.calculate_route(*start, *end, nodes, options) {
                Some(route) => (EdgeStatus::Routed, Some(route)),
                None => (EdgeStatus::NoPath, None),
            }
        }
        EdgeEndpoints::Nodes { source, target } => {
            match router.route_between(source, target, nodes, options) {
                Ok(connection) => {
                    let status = match connection.fallback {
                        None => EdgeStatus::Routed,
                        Some(RouteFallback::Direct) => EdgeStatus::DirectFallback,
                    };
                    (status, Some(connection.route))
                }
                Err(err) => (EdgeStatus::Rejected { reason: err.to_string() }, None),
            }
        }
    };

    RoutedEdge { id: edge.id.clone(), status, route }
}
