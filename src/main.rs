// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Edgeroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Edgeroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edgeroute CLI entrypoint.
//!
//! Reads a scene document (JSON) from a file or stdin, routes every edge and
//! prints the routed edges as JSON to stdout. Logs go to stderr.

use std::error::Error;
use std::io::Read;
use std::sync::{Arc, Mutex};

use edgeroute::routing::MemoryRouteCache;
use edgeroute::scene::{self, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "edgeroute=info";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<scene.json>] [--pretty] [--verbose] [--grid-size <n>] [--margin <n>]\n      [--no-smoothing] [--allow-overlap] [--max-iterations <n>]\n  {program} --schema\n\nReads the scene from <scene.json>, or from stdin when omitted or `-`.\nFlags override the scene's `router` settings.\n--schema prints the JSON schema of the scene document.\n\nLogging follows RUST_LOG (default `{DEFAULT_LOG_FILTER}`); --verbose enables debug output."
    );
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CliOptions {
    scene_path: Option<String>,
    pretty: bool,
    verbose: bool,
    schema: bool,
    grid_size: Option<f64>,
    margin: Option<f64>,
    no_smoothing: bool,
    allow_overlap: bool,
    max_iterations: Option<usize>,
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn set_flag(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pretty" => set_flag(&mut options.pretty)?,
            "--verbose" => set_flag(&mut options.verbose)?,
            "--schema" => set_flag(&mut options.schema)?,
            "--no-smoothing" => set_flag(&mut options.no_smoothing)?,
            "--allow-overlap" => set_flag(&mut options.allow_overlap)?,
            "--grid-size" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.grid_size, raw.parse().map_err(|_| ())?)?;
            }
            "--margin" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.margin, raw.parse().map_err(|_| ())?)?;
            }
            "--max-iterations" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.max_iterations, raw.parse().map_err(|_| ())?)?;
            }
            "-" => set_once(&mut options.scene_path, arg)?,
            _ if arg.starts_with('-') => return Err(()),
            _ => set_once(&mut options.scene_path, arg)?,
        }
    }

    if options.schema && options.scene_path.is_some() {
        return Err(());
    }

    Ok(options)
}

/// Applies command-line overrides on top of the scene's router settings.
fn apply_overrides(scene: &mut Scene, options: &CliOptions) {
    let router = &mut scene.router;
    if let Some(grid_size) = options.grid_size {
        router.grid_size = grid_size;
    }
    if let Some(margin) = options.margin {
        router.margin = margin;
    }
    if let Some(max_iterations) = options.max_iterations {
        router.max_iterations = max_iterations;
    }
    if options.no_smoothing {
        router.smoothing = false;
    }
    if options.allow_overlap {
        router.avoid_overlap = false;
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("edgeroute=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_input(path: Option<&str>) -> std::io::Result<String> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "edgeroute".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(options.verbose);

        if options.schema {
            let schema = schemars::schema_for!(Scene);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        let input = read_input(options.scene_path.as_deref())?;
        let mut scene: Scene = serde_json::from_str(&input)?;
        apply_overrides(&mut scene, &options);

        let cache = Arc::new(Mutex::new(MemoryRouteCache::new(scene.router.cache_capacity)));
        let routed = scene::route_scene(&scene, &cache)?;
        info!(edges = routed.len(), nodes = scene.nodes.len(), "routed scene");

        let output = if options.pretty {
            serde_json::to_string_pretty(&routed)?
        } else {
            serde_json::to_string(&routed)?
        };
        println!("{output}");
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("edgeroute: {err}");
        std::process::exit(1);
    }
}
