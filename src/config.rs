//! Настройки обучения и сервера

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::data::DatasetSplitter;
use crate::models::ForestParams;

/// Параметры одного прогона обучения
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrainingConfig {
    pub splitter: DatasetSplitter,
    pub forest: ForestParams,
}

/// Куда записываются результаты обучения
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingOutputs {
    pub artifact: PathBuf,
    pub validation: PathBuf,
    pub test: PathBuf,
}

impl Default for TrainingOutputs {
    fn default() -> Self {
        Self {
            artifact: PathBuf::from("model/fuel_model.json"),
            validation: PathBuf::from("data/validation_data.csv"),
            test: PathBuf::from("data/test_data.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub artifact: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            artifact: PathBuf::from("model/fuel_model.json"),
        }
    }
}
