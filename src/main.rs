// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas Session - headless driver
//!
//! Opens a project from a directory of JSON project files, optionally
//! resizes it, then saves and exports a description of the scene.

use anyhow::{anyhow, Context, Result};
use canvas_session::editor::export::ExportFormat;
use canvas_session::io::serialization;
use canvas_session::models::project::ProjectId;
use canvas_session::services::ai::UnavailableAiService;
use canvas_session::services::entitlement::{Plan, PlanEntitlements};
use canvas_session::services::project_store::FileProjectStore;
use canvas_session::services::storage::{InMemoryObjectStorage, StaticImageProbe};
use canvas_session::services::Services;
use canvas_session::tools::resize::AspectPreset;
use canvas_session::{EditingSession, SessionConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Headless canvas session driver.
#[derive(Parser, Debug)]
#[command(name = "canvas-session", about = "Open, resize, save and export a canvas project")]
struct Args {
    /// Directory holding `<id>.json` project files and their images.
    projects_dir: PathBuf,

    /// Id of the project to open.
    project_id: String,

    /// YAML session configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// New canvas size, e.g. 1600x1200.
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Aspect ratio preset name, e.g. "Instagram Post".
    #[arg(long, value_name = "NAME", conflicts_with = "resize")]
    preset: Option<String>,

    /// Describe an export in this format: png, jpg or webp.
    #[arg(long, value_name = "FORMAT", value_parser = parse_format)]
    export: Option<ExportFormat>,

    /// Write the scene to a .yaml or .json file.
    #[arg(long, value_name = "FILE")]
    export_scene: Option<PathBuf>,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("size must look like 1600x1200, got {}", s))?;
    let w = w.trim().parse().map_err(|e| format!("bad width {:?}: {}", w, e))?;
    let h = h.trim().parse().map_err(|e| format!("bad height {:?}: {}", h, e))?;
    Ok((w, h))
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_extension(s).ok_or_else(|| format!("unknown export format {}", s))
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config = match args.config {
        Some(ref path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let services = Services {
        projects: Arc::new(FileProjectStore::new(&args.projects_dir)),
        ai: Arc::new(UnavailableAiService),
        storage: Arc::new(InMemoryObjectStorage::new()),
        probe: Arc::new(StaticImageProbe::new().with_root(&args.projects_dir)),
        entitlements: Arc::new(PlanEntitlements::new(Plan::Pro, &config)),
    };

    let id = ProjectId::new(args.project_id.as_str());
    let mut session = EditingSession::open(&id, services, config)?;
    log::info!(
        "Scene has {} objects on a {}x{} canvas",
        session.store().len(),
        session.store().width(),
        session.store().height()
    );

    let resized = match (args.resize, args.preset.as_deref()) {
        (Some((w, h)), _) => session.resize(w, h)?,
        (None, Some(name)) => {
            let preset = AspectPreset::find(name).ok_or_else(|| anyhow!("unknown preset {}", name))?;
            session.resize_to_preset(preset)?
        }
        (None, None) => false,
    };
    if resized {
        session = session.reload()?;
    } else {
        session.save_now()?;
    }

    if let Some(format) = args.export {
        let job = session.export(format)?;
        println!("{} {}x{} ({} objects)", job.filename, job.width, job.height, job.scene.objects.len());
    }
    if let Some(ref path) = args.export_scene {
        let graph = session.store().graph().without_paths();
        serialization::export_by_extension(&graph, path)?;
        log::info!("Scene written to {}", path.display());
    }

    for outcome in session.flush_saves(Duration::from_secs(10)) {
        if let Err(e) = outcome.result {
            log::error!("Save failed: {}", e);
        }
    }
    session.close();
    Ok(())
}
