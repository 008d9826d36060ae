//! Оценка качества модели на размеченных данных

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifact::ModelArtifact;
use crate::data::{DataCleaner, Frame, Table};
use crate::error::DataError;

/// Метрики регрессии
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub count: usize,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// `None` для пустой выборки
    pub fn compute(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Option<Self> {
        let count = actual.len().min(predicted.len());
        if count == 0 {
            return None;
        }

        let errors = &predicted - &actual;
        let mae = errors.mapv(f64::abs).mean()?;
        let mse = errors.mapv(|e| e * e).mean()?;

        let mean = actual.mean()?;
        let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
        let ss_res = mse * count as f64;
        // как в sklearn: при нулевой дисперсии 1.0 для точного совпадения, иначе 0.0
        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Some(Self {
            count,
            mae,
            rmse: mse.sqrt(),
            r2,
        })
    }
}

impl std::fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n={} MAE={:.4} RMSE={:.4} R2={:.4}",
            self.count, self.mae, self.rmse, self.r2
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub metrics: Option<RegressionMetrics>,
    /// Первые пары (факт, прогноз) для просмотра
    pub samples: Vec<(f64, f64)>,
}

pub struct Evaluator;

impl Evaluator {
    pub const SAMPLE_SIZE: usize = 5;

    /// Очистка таблицы и прогон каждой размеченной строки через артефакт
    pub fn evaluate(artifact: &ModelArtifact, table: Table) -> Result<EvaluationReport, DataError> {
        let table = DataCleaner::clean(table)?;
        Self::score(artifact, &table)
    }

    /// Оценка только последних `rows` строк после очистки
    pub fn evaluate_tail(
        artifact: &ModelArtifact,
        table: Table,
        rows: usize,
    ) -> Result<EvaluationReport, DataError> {
        let table = DataCleaner::clean(table)?.tail(rows);
        info!("Scoring the last {} cleaned rows", table.len());
        Self::score(artifact, &table)
    }

    fn score(artifact: &ModelArtifact, table: &Table) -> Result<EvaluationReport, DataError> {
        let frame = Frame::from_table(table, artifact.schema(), 0..table.len())?;

        let actual = frame.all_targets();
        let predicted: Array1<f64> = frame
            .all_rows()
            .iter()
            .map(|row| artifact.predict_row(row))
            .collect();

        let metrics = RegressionMetrics::compute(actual.view(), predicted.view());
        match &metrics {
            Some(metrics) => info!("Evaluation: {}", metrics),
            None => info!("Evaluation table has no labelled rows"),
        }

        let samples = actual
            .iter()
            .zip(predicted.iter())
            .take(Self::SAMPLE_SIZE)
            .map(|(&a, &p)| (a, p))
            .collect();

        Ok(EvaluationReport { metrics, samples })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn metrics_on_known_values() {
        let actual = array![1.0, 2.0, 3.0, 4.0];
        let predicted = array![1.0, 2.0, 3.0, 6.0];
        let metrics = RegressionMetrics::compute(actual.view(), predicted.view()).unwrap();

        assert_eq!(metrics.count, 4);
        assert_eq!(metrics.mae, 0.5);
        assert_eq!(metrics.rmse, 1.0);
        // ss_tot = 5, ss_res = 4
        assert!((metrics.r2 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn perfect_and_empty() {
        let values = array![3.0, 3.0];
        let metrics = RegressionMetrics::compute(values.view(), values.view()).unwrap();
        assert_eq!(metrics.r2, 1.0);
        assert_eq!(metrics.mae, 0.0);

        let empty = Array1::<f64>::zeros(0);
        assert!(RegressionMetrics::compute(empty.view(), empty.view()).is_none());
    }
}
