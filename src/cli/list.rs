//! List sessions command

use anyhow::Result;

use super::build_service;
use crate::config::ServiceConfig;
use crate::engine::PredictionService;
use crate::loader::{self, ChainStatus};
use crate::repository::{ArtifactRepository, FsRepository};

/// List sessions that hold a trained model
pub fn list(config: &ServiceConfig, verbose: bool) -> Result<()> {
    let sessions_dir = &config.storage.sessions_dir;
    if !sessions_dir.exists() {
        println!("No sessions directory found at: {}", sessions_dir.display());
        println!("\nPass --sessions-dir, set TABSERVE_SESSIONS_DIR, or create ./sessions.");
        return Ok(());
    }

    let service = build_service(config);
    let sessions = service.repository().list_sessions()?;

    println!("Sessions in {}:\n", sessions_dir.display());

    if sessions.is_empty() {
        println!("  No trained models found.");
        println!(
            "\nEach session is a directory in {} holding best_model.json (or .yaml).",
            sessions_dir.display()
        );
        return Ok(());
    }

    for session in &sessions {
        if verbose {
            print_session_details(&service, session);
        } else {
            println!("  {}", session);
        }
    }

    Ok(())
}

fn print_session_details(service: &PredictionService<FsRepository>, session: &str) {
    println!("  {}", session);

    let repo = service.repository();
    let handle = match repo.resolve(session) {
        Ok(handle) => handle,
        Err(e) => {
            println!("    Error: {}", e);
            println!();
            return;
        }
    };
    println!("    Path: {}", handle.location.display());

    match loader::read_model_blob(repo, &handle) {
        Ok(blob) => {
            println!("    Artifact: {} ({} bytes)", blob.file_name, blob.bytes.len());
            match loader::load_model(repo, &handle) {
                Ok(model) => println!("    Family: {}", model.family()),
                Err(e) => println!("    Family: unreadable ({})", e),
            }
        }
        Err(e) => println!("    Artifact: {}", e),
    }

    match service.feature_schema(session) {
        Ok(schema) => {
            println!("    Model: {}", schema.model_name);
            println!("    Features: {}", schema.feature_names.len());
            if !schema.class_labels.is_empty() {
                println!("    Classes: {}", schema.class_labels.len());
            }
        }
        Err(e) => println!("    Metadata: {}", e),
    }

    let transforms = match loader::load_transform_chain(repo, &handle).status {
        ChainStatus::Loaded => "present".to_string(),
        ChainStatus::Absent => "none".to_string(),
        ChainStatus::Corrupt(reason) => format!("corrupt ({})", reason),
    };
    println!("    Transforms: {}", transforms);

    println!();
}
