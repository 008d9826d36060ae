//! Fuel ML - модель расхода топлива: обучение и обслуживание

pub mod artifact;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod preprocessing;
pub mod server;
pub mod service;
pub mod training;
pub mod types;

pub use types::*;

// Re-export для удобства
pub use artifact::{ArtifactStore, ModelArtifact};
pub use error::{ArtifactError, DataError, ForestError, TrainingError, ValidationError};
pub use evaluation::{Evaluator, RegressionMetrics};
pub use service::PredictionService;
pub use training::TrainingOrchestrator;
