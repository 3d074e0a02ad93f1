//! Prediction pipeline
//!
//! - align: arrange a caller's record into training column order
//! - transform: run the encoder and scaler, absorbing stage failures
//! - executor: run the model and shape the answer
//! - service: the per-request pipeline over an artifact repository

mod align;
mod executor;
mod service;
mod transform;

pub use align::align_features;
pub use executor::{Executor, PredictionResult};
pub use service::{ModelExport, PredictionOutcome, PredictionService};
pub use transform::{apply_chain, StageOutcome, TransformReport, TransformedRow};
