//! Tabserve - prediction service for trained tabular models
//!
//! Each training session leaves a directory of artifacts behind: the best
//! model, its metadata and an optional preprocessing chain. Tabserve loads
//! those per request and answers single-record predictions, feature schema
//! queries and raw model downloads.
//!
//! # Architecture
//!
//! - **repository**: session lookup and artifact reads
//! - **loader**: locate and decode artifacts by stem and extension
//! - **model**: model families behind the `Predictor` capability traits
//! - **preprocess**: encoder and scaler stages
//! - **engine**: align, transform, predict
//! - **server** / **cli**: HTTP and command-line surfaces
//!
//! # Example
//!
//! ```bash
//! # Start server
//! tabserve serve --sessions-dir ./sessions --port 8080
//!
//! # Predict one record
//! tabserve predict --session abc123 --features '{"age": 42, "plan": "pro"}'
//!
//! # List sessions with a trained model
//! tabserve list
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod loader;
pub mod model;
pub mod preprocess;
pub mod repository;
pub mod server;

// Re-export key types
pub use config::{InferenceConfig, ServerConfig, ServiceConfig};
pub use engine::{PredictionResult, PredictionService};
pub use error::{PredictError, Result};
pub use frame::{FeatureRecord, Scalar};
pub use repository::{ArtifactRepository, FsRepository};
