//! CLI commands
//!
//! The server plus one-shot commands that run the same pipeline locally.

mod export;
mod features;
mod list;
mod predict;
mod serve;

pub use export::export;
pub use features::features;
pub use list::list;
pub use predict::predict;
pub use serve::serve;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::ServiceConfig;
use crate::engine::PredictionService;
use crate::repository::FsRepository;

/// Tabserve - prediction service for trained tabular models
#[derive(Parser)]
#[command(name = "tabserve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per session
    #[arg(long, global = true)]
    pub sessions_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the prediction server
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Predict one record with a session's model
    Predict {
        /// Session id
        #[arg(long, short)]
        session: String,

        /// Feature map as JSON, or @path to a JSON file
        #[arg(long, short)]
        features: String,
    },

    /// Show the feature schema a session's model expects
    Features {
        /// Session id
        #[arg(long, short)]
        session: String,
    },

    /// Write a session's raw model artifact to disk
    Export {
        /// Session id
        #[arg(long, short)]
        session: String,

        /// Output path (default: model_<session>.<ext> in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List sessions that hold a trained model
    List {
        /// Show detailed information
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Resolve configuration from file, environment and flags, in that order
pub fn load_config(path: Option<&Path>, sessions_dir: Option<PathBuf>) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    }
    .with_env_overrides();

    if let Some(dir) = sessions_dir {
        config.storage.sessions_dir = dir;
    }
    Ok(config)
}

fn build_service(config: &ServiceConfig) -> PredictionService<FsRepository> {
    PredictionService::new(
        FsRepository::new(&config.storage.sessions_dir),
        config.inference.clone(),
    )
}
