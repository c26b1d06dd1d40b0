// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: f64 = 10.0;
pub const DEFAULT_MARGIN: f64 = 20.0;
pub const DEFAULT_DENSE_OBSTACLE_THRESHOLD: usize = 15;
pub const DEFAULT_MAX_GRID_NODES: usize = 40_000;
pub const DEFAULT_MAX_ITERATIONS: usize = 20_000;
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

const MIN_GRID_NODES: usize = 4;
const MAX_GRID_NODES: usize = 1 << 24;

/// Router-instance configuration.
///
/// `grid_size`, `margin`, `smoothing` and `avoid_overlap` are the defaults
/// that per-call [`RouteOptions`] fall back to. The remaining fields bound the
/// search: how crowded the neighbourhood of a route may get before the search
/// window is narrowed, how many grid nodes a single search may allocate, and
/// how many A* expansions are allowed before giving up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RouterConfig {
    pub grid_size: f64,
    pub margin: f64,
    pub smoothing: bool,
    pub avoid_overlap: bool,
    pub dense_obstacle_threshold: usize,
    pub max_grid_nodes: usize,
    pub max_iterations: usize,
    pub cache_capacity: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            margin: DEFAULT_MARGIN,
            smoothing: true,
            avoid_overlap: true,
            dense_obstacle_threshold: DEFAULT_DENSE_OBSTACLE_THRESHOLD,
            max_grid_nodes: DEFAULT_MAX_GRID_NODES,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::InvalidMargin(self.margin));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        if !(MIN_GRID_NODES..=MAX_GRID_NODES).contains(&self.max_grid_nodes) {
            return Err(ConfigError::GridNodeBudget {
                value: self.max_grid_nodes,
                min: MIN_GRID_NODES,
                max: MAX_GRID_NODES,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must be a positive finite number, got {0}")]
    InvalidGridSize(f64),
    #[error("margin must be a non-negative finite number, got {0}")]
    InvalidMargin(f64),
    #[error("iteration cap must be greater than zero")]
    ZeroIterationCap,
    #[error("grid node budget must be within {min}..={max}, got {value}")]
    GridNodeBudget { value: usize, min: usize, max: usize },
}

/// Per-call routing preferences. Absent fields use the router's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RouteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_overlap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_straight_lines: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bends: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<bool>,
}

/// [`RouteOptions`] merged with the router defaults, computed once per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOptions {
    pub avoid_overlap: bool,
    pub prefer_straight_lines: bool,
    pub max_bends: Option<usize>,
    pub corner_radius: f64,
    pub smoothing: bool,
}

impl ResolvedOptions {
    /// A missing, negative or non-finite corner radius falls back to the grid size.
    pub fn resolve(config: &RouterConfig, options: &RouteOptions) -> Self {
        Self {
            avoid_overlap: options.avoid_overlap.unwrap_or(config.avoid_overlap),
            prefer_straight_lines: options.prefer_straight_lines.unwrap_or(false),
            max_bends: options.max_bends,
            corner_radius: options
                .corner_radius
                .filter(|radius| radius.is_finite() && *radius >= 0.0)
                .unwrap_or(config.grid_size),
            smoothing: options.smoothing.unwrap_or(config.smoothing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ResolvedOptions, RouteOptions, RouterConfig};

    #[test]
    fn defaults_match_documented_values() {
        let config = RouterConfig::default();
        assert_eq!(config.grid_size, 10.0);
        assert_eq!(config.margin, 20.0);
        assert!(config.smoothing);
        assert!(config.avoid_overlap);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_broken_structural_values() {
        let bad_grid = RouterConfig { grid_size: -1.0, ..RouterConfig::default() };
        assert_eq!(bad_grid.validate(), Err(ConfigError::InvalidGridSize(-1.0)));

        let zero_grid = RouterConfig { grid_size: 0.0, ..RouterConfig::default() };
        assert_eq!(zero_grid.validate(), Err(ConfigError::InvalidGridSize(0.0)));

        let bad_margin = RouterConfig { margin: -5.0, ..RouterConfig::default() };
        assert_eq!(bad_margin.validate(), Err(ConfigError::InvalidMargin(-5.0)));

        let nan_margin = RouterConfig { margin: f64::NAN, ..RouterConfig::default() };
        assert!(matches!(nan_margin.validate(), Err(ConfigError::InvalidMargin(_))));

        let no_iterations = RouterConfig { max_iterations: 0, ..RouterConfig::default() };
        assert_eq!(no_iterations.validate(), Err(ConfigError::ZeroIterationCap));

        let tiny_grid = RouterConfig { max_grid_nodes: 1, ..RouterConfig::default() };
        assert!(matches!(tiny_grid.validate(), Err(ConfigError::GridNodeBudget { value: 1, .. })));
    }

    #[test]
    fn config_error_messages_name_the_value() {
        let err = ConfigError::InvalidGridSize(-1.0);
        assert_eq!(err.to_string(), "grid size must be a positive finite number, got -1");
    }

    #[test]
    fn config_deserializes_partial_camel_case() {
        let config: RouterConfig =
            serde_json::from_str(r#"{"gridSize":15,"margin":30,"smoothing":false}"#).expect("config");
        assert_eq!(config.grid_size, 15.0);
        assert_eq!(config.margin, 30.0);
        assert!(!config.smoothing);
        assert!(config.avoid_overlap);
        assert_eq!(config.max_iterations, super::DEFAULT_MAX_ITERATIONS);

        assert!(serde_json::from_str::<RouterConfig>(r#"{"gridsize":15}"#).is_err());
    }

    #[test]
    fn resolve_merges_overrides_onto_defaults() {
        let config = RouterConfig { smoothing: false, ..RouterConfig::default() };

        let resolved = ResolvedOptions::resolve(&config, &RouteOptions::default());
        assert!(resolved.avoid_overlap);
        assert!(!resolved.prefer_straight_lines);
        assert_eq!(resolved.max_bends, None);
        assert_eq!(resolved.corner_radius, 10.0);
        assert!(!resolved.smoothing);

        let options = RouteOptions {
            avoid_overlap: Some(false),
            prefer_straight_lines: Some(true),
            max_bends: Some(3),
            corner_radius: Some(15.0),
            smoothing: Some(true),
        };
        let resolved = ResolvedOptions::resolve(&config, &options);
        assert!(!resolved.avoid_overlap);
        assert!(resolved.prefer_straight_lines);
        assert_eq!(resolved.max_bends, Some(3));
        assert_eq!(resolved.corner_radius, 15.0);
        assert!(resolved.smoothing);
    }

    #[test]
    fn invalid_corner_radius_falls_back_to_grid_size() {
        let config = RouterConfig::default();
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            let options = RouteOptions { corner_radius: Some(radius), ..RouteOptions::default() };
            assert_eq!(ResolvedOptions::resolve(&config, &options).corner_radius, 10.0);
        }
    }

    #[test]
    fn route_options_round_trip_skips_absent_fields() {
        let options = RouteOptions { max_bends: Some(2), ..RouteOptions::default() };
        let json = serde_json::to_string(&options).expect("serialize");
        assert_eq!(json, r#"{"maxBends":2}"#);
    }
}
