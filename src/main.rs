// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! boxlabel - bounding box labelling for image sequences
//!
//! A desktop tool for drawing, resizing, selecting and deleting
//! axis-aligned boxes over a list of images. Boxes are saved after every
//! edit, either to one JSON map keyed by file name or to a normalized
//! label file next to each image.

mod app;
mod config;
mod io;
mod models;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::{BoxLabelApp, FatalSlot, TOOLBAR_HEIGHT};
use clap::Parser;
use config::{Cli, Config};
use io::media::DiskImages;
use session::Session;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_cli(Cli::parse())?;
    let session = Session::open(config.files.clone(), config.strategy(), DiskImages)?;

    let first = session.view();
    let inner_size = [first.width as f32, first.height as f32 + TOOLBAR_HEIGHT];

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(inner_size)
            .with_min_inner_size([320.0, 240.0])
            .with_title("boxlabel"),
        ..Default::default()
    };

    let fatal = FatalSlot::default();
    let app_fatal = fatal.clone();

    // Run the application
    eframe::run_native(
        "boxlabel",
        options,
        Box::new(move |_cc| Ok(Box::new(BoxLabelApp::new(session, app_fatal)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    if let Some(err) = fatal.borrow_mut().take() {
        return Err(err);
    }
    Ok(())
}
