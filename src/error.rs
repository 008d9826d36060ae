//! Ошибки библиотеки

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Ошибки чтения и очистки табличных данных
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write table {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("table has no header row")]
    MissingHeader,

    #[error("required columns missing after cleaning: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row} has no numeric target")]
    InvalidTarget { row: usize },
}

/// Ошибки обучения ансамбля деревьев
#[derive(Debug, Error)]
pub enum ForestError {
    #[error("n_trees must be at least 1")]
    NoTrees,

    #[error("min_samples_split must be at least 2, got {0}")]
    MinSamplesSplit(usize),

    #[error("min_samples_leaf must be at least 1")]
    MinSamplesLeaf,

    #[error("max_depth must be at least 1 when set")]
    MaxDepth,

    #[error("cannot fit on an empty matrix")]
    EmptyDataset,

    #[error("records have {records} rows but targets have {targets}")]
    TargetMismatch { records: usize, targets: usize },

    #[error("non-finite value in training data")]
    NonFinite,

    #[error(transparent)]
    Linfa(#[from] linfa::Error),
}

/// Ошибки загрузки и сохранения артефакта модели
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact {path} is unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {path} is incompatible: {reason}")]
    Incompatible { path: PathBuf, reason: String },

    #[error("failed to encode artifact: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Ошибки запуска обучения
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("training range is empty after cleaning")]
    EmptyPartition,

    #[error("feature schema has no usable columns")]
    EmptySchema,

    #[error(transparent)]
    Model(#[from] ForestError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Что именно не так с полем запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    ExpectedNumber,
    ExpectedString,
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FieldProblem::Missing => "missing",
            FieldProblem::ExpectedNumber => "expected a number",
            FieldProblem::ExpectedString => "expected a string",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub problem: FieldProblem,
}

/// Запрос на предсказание не соответствует схеме признаков
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid request: {}", describe(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.field.as_str())
    }
}

fn describe(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{} ({})", issue.field, issue.problem))
        .collect::<Vec<_>>()
        .join(", ")
}
