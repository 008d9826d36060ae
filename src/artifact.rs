//! Артефакт модели: схема, состояние предобработки и лес в одном файле

use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::data::DatasetSplitter;
use crate::error::ArtifactError;
use crate::evaluation::RegressionMetrics;
use crate::models::{ForestValidParams, RandomForest};
use crate::preprocessing::{FeatureRow, FeatureSchema, PreprocessingState};

pub const ARTIFACT_FORMAT: &str = "fuel-consumption-model";
pub const FORMAT_VERSION: u32 = 1;

/// Сведения о прогоне обучения, сохраняемые вместе с моделью
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub splitter: DatasetSplitter,
    pub forest: ForestValidParams,
    pub fit_rows: usize,
    pub eval_rows: usize,
    pub holdout_metrics: Option<RegressionMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    format: String,
    format_version: u32,
    trained_at: DateTime<Utc>,
    schema: FeatureSchema,
    preprocessing: PreprocessingState,
    model: RandomForest,
    training: TrainingSummary,
}

impl ModelArtifact {
    pub fn new(
        schema: FeatureSchema,
        preprocessing: PreprocessingState,
        model: RandomForest,
        training: TrainingSummary,
    ) -> Self {
        Self {
            format: ARTIFACT_FORMAT.to_string(),
            format_version: FORMAT_VERSION,
            trained_at: Utc::now(),
            schema,
            preprocessing,
            model,
            training,
        }
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn preprocessing(&self) -> &PreprocessingState {
        &self.preprocessing
    }

    pub fn model(&self) -> &RandomForest {
        &self.model
    }

    pub fn training(&self) -> &TrainingSummary {
        &self.training
    }

    /// Предсказание без округления
    pub fn predict_row<R: FeatureRow + ?Sized>(&self, row: &R) -> f64 {
        let features = self.preprocessing.transform(row);
        self.model.infer(features.view())
    }

    /// Части артефакта согласованы между собой
    pub fn check_consistency(&self) -> Result<(), String> {
        if !self.preprocessing.matches(&self.schema) {
            return Err("preprocessing state does not match the feature schema".to_string());
        }
        let width = self.preprocessing.output_width();
        if width != self.model.n_features() {
            return Err(format!(
                "model expects {} features but preprocessing produces {}",
                self.model.n_features(),
                width
            ));
        }
        if !self.model.is_consistent() {
            return Err("model trees reference invalid nodes or features".to_string());
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ArtifactHeader {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    format_version: Option<u32>,
}

pub struct ArtifactStore;

impl ArtifactStore {
    /// Запись во временный файл рядом с целевым и атомарное переименование.
    /// Несогласованный артефакт не записывается.
    pub fn save<P: AsRef<Path>>(artifact: &ModelArtifact, path: P) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        artifact
            .check_consistency()
            .map_err(|reason| ArtifactError::Incompatible {
                path: path.to_path_buf(),
                reason,
            })?;

        let io_error = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_error)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, artifact).map_err(ArtifactError::Encode)?;
            writer.flush().map_err(io_error)?;
        }
        tmp.as_file().sync_all().map_err(io_error)?;
        tmp.persist(path).map_err(|e| io_error(e.error))?;

        info!("Artifact saved to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<ModelArtifact, ArtifactError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let corrupt = |source| ArtifactError::Corrupt {
            path: path.to_path_buf(),
            source,
        };
        let incompatible = |reason: String| ArtifactError::Incompatible {
            path: path.to_path_buf(),
            reason,
        };

        // Сначала только маркер формата, чтобы чужой файл не разбирался целиком
        let header: ArtifactHeader = serde_json::from_slice(&bytes).map_err(corrupt)?;
        match header.format.as_deref() {
            Some(ARTIFACT_FORMAT) => {}
            other => return Err(incompatible(format!("unexpected format tag {:?}", other))),
        }
        if header.format_version != Some(FORMAT_VERSION) {
            return Err(incompatible(format!(
                "format version {:?}, expected {}",
                header.format_version, FORMAT_VERSION
            )));
        }

        let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(corrupt)?;
        artifact.check_consistency().map_err(incompatible)?;

        info!(
            "Artifact loaded from {} (trained at {}, {} trees)",
            path.display(),
            artifact.trained_at,
            artifact.model.trees().len()
        );
        Ok(artifact)
    }
}
