// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line parsing and startup validation.

use crate::io::{shared_map::SharedMapStore, sidecar::SidecarStore, PersistenceStrategy};
use crate::models::store::basename;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "boxlabel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Draw bounding boxes over a sequence of images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store every image's boxes in one JSON map keyed by file name
    Json {
        /// JSON file to read existing boxes from and write boxes to
        #[arg(short, long)]
        output: PathBuf,

        /// Images to label
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Store boxes in a normalized label file next to each image
    Yolo {
        /// Never write label files; edits stay in memory
        #[arg(long)]
        read_only: bool,

        /// Images to label
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Errors that prevent annotation from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no image files given")]
    NoFiles,
    #[error("image file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("all files must have unique names, {0:?} appears more than once")]
    DuplicateBasename(String),
}

/// Where boxes are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    SharedMap { output: PathBuf },
    Sidecar { read_only: bool },
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub files: Vec<PathBuf>,
    pub format: Format,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let (files, format) = match cli.command {
            Commands::Json { output, files } => (files, Format::SharedMap { output }),
            Commands::Yolo { read_only, files } => (files, Format::Sidecar { read_only }),
        };

        if files.is_empty() {
            return Err(ConfigError::NoFiles);
        }
        if let Some(missing) = files.iter().find(|path| !path.is_file()) {
            return Err(ConfigError::MissingFile(missing.clone()));
        }
        check_unique_basenames(&files)?;

        Ok(Self { files, format })
    }

    /// Build the persistence strategy for the chosen format.
    pub fn strategy(&self) -> Box<dyn PersistenceStrategy> {
        match &self.format {
            Format::SharedMap { output } => Box::new(SharedMapStore::new(output.clone())),
            Format::Sidecar { read_only } => Box::new(SidecarStore::new(*read_only)),
        }
    }
}

/// Both output formats key on the file name, so names must not collide.
pub fn check_unique_basenames(files: &[PathBuf]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for path in files {
        let name = basename(path);
        if !seen.insert(name.clone()) {
            return Err(ConfigError::DuplicateBasename(name));
        }
    }
    Ok(())
}
