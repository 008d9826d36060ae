//! Обслуживание предсказаний по загруженному артефакту

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::artifact::{ArtifactStore, ModelArtifact};
use crate::data::ColumnKind;
use crate::error::{ArtifactError, FieldIssue, FieldProblem, ValidationError};
use crate::types::{PredictionResponse, Record, Value};

/// Сервис держит один неизменяемый артефакт; клонирование дешевое,
/// параллельные вызовы не требуют блокировок
#[derive(Debug, Clone)]
pub struct PredictionService {
    artifact: Arc<ModelArtifact>,
}

impl PredictionService {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self {
            artifact: Arc::new(artifact),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        ArtifactStore::load(path).map(Self::new)
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Каждое поле схемы присутствует и имеет объявленный тип
    pub fn validate(&self, record: &Record) -> Result<(), ValidationError> {
        let issues: Vec<FieldIssue> = self
            .artifact
            .schema()
            .fields()
            .filter_map(|(field, kind)| {
                let problem = match (kind, record.get(field)) {
                    (_, None) | (_, Some(Value::Missing)) => FieldProblem::Missing,
                    (ColumnKind::Numeric, Some(Value::Number(v))) if v.is_finite() => return None,
                    (ColumnKind::Numeric, Some(_)) => FieldProblem::ExpectedNumber,
                    (_, Some(Value::Text(_))) => return None,
                    (_, Some(_)) => FieldProblem::ExpectedString,
                };
                Some(FieldIssue {
                    field: field.to_string(),
                    problem,
                })
            })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Прогноз расхода топлива, округленный до двух знаков
    pub fn predict(&self, record: &Record) -> Result<f64, ValidationError> {
        self.validate(record)?;
        let raw = self.artifact.predict_row(record);
        debug!("Raw prediction: {}", raw);
        Ok(round2(raw))
    }

    pub fn respond(&self, record: &Record) -> Result<PredictionResponse, ValidationError> {
        self.predict(record).map(|fuel_consumption| PredictionResponse { fuel_consumption })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
