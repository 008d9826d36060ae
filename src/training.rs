//! Обучение: очистка, разбиение, предобработка, лес, артефакт

use linfa::traits::{Fit, Predict};
use linfa::{DatasetBase, ParamGuard};
use ndarray::Array1;
use tracing::info;

use crate::artifact::{ArtifactStore, ModelArtifact, TrainingSummary};
use crate::config::{TrainingConfig, TrainingOutputs};
use crate::data::{DataCleaner, Frame, Table};
use crate::error::TrainingError;
use crate::evaluation::RegressionMetrics;
use crate::preprocessing::{FeatureSchema, PreprocessingState};

/// Результат обучения в памяти
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub artifact: ModelArtifact,
    /// Отложенные позиционные диапазоны, в обучении не участвуют
    pub validation: Table,
    pub test: Table,
}

pub struct TrainingOrchestrator {
    config: TrainingConfig,
}

impl TrainingOrchestrator {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn fit(&self, raw: Table) -> Result<TrainingRun, TrainingError> {
        info!("Training started: {} raw rows", raw.len());
        let splitter = self.config.splitter;
        let forest_params = self.config.forest.check()?;

        let table = DataCleaner::clean(raw)?;
        let split = splitter.positional(table.len());
        if split.train.is_empty() {
            return Err(TrainingError::EmptyPartition);
        }
        info!(
            "Positional split: train={} validation={} test={}",
            split.train.len(),
            split.validation.len(),
            split.test.len()
        );

        let schema = FeatureSchema::from_columns(table.headers.iter().map(String::as_str));
        if schema.is_empty() {
            return Err(TrainingError::EmptySchema);
        }
        info!(
            "Feature schema: numeric={:?} categorical={:?}",
            schema.numeric_columns(),
            schema.categorical_columns()
        );

        let frame = Frame::from_table(&table, &schema, split.train.clone())?;
        let holdout = splitter.holdout(frame.len());
        info!(
            "Holdout split (seed {}): fit={} eval={}",
            splitter.seed,
            holdout.fit.len(),
            holdout.eval.len()
        );

        let fit_rows = frame.rows(&holdout.fit);
        let preprocessing = PreprocessingState::fit(&schema, &fit_rows);
        let x_fit = preprocessing.transform_rows(&fit_rows);
        let y_fit = frame.targets(&holdout.fit);
        info!(
            "Preprocessing fitted: {} input columns -> {} features",
            schema.len(),
            preprocessing.output_width()
        );

        info!(
            "Fitting forest: {} trees, max_depth={:?}",
            forest_params.n_trees(),
            forest_params.tree().max_depth
        );
        let model = forest_params.fit(&DatasetBase::new(x_fit, y_fit))?;

        let eval_rows = frame.rows(&holdout.eval);
        let holdout_metrics = if eval_rows.is_empty() {
            None
        } else {
            let x_eval = preprocessing.transform_rows(&eval_rows);
            let predicted: Array1<f64> = model.predict(&x_eval);
            let actual = frame.targets(&holdout.eval);
            RegressionMetrics::compute(actual.view(), predicted.view())
        };
        match &holdout_metrics {
            Some(metrics) => info!("Holdout metrics: {}", metrics),
            None => info!("Holdout is empty, metrics skipped"),
        }

        let training = TrainingSummary {
            splitter,
            forest: forest_params,
            fit_rows: holdout.fit.len(),
            eval_rows: holdout.eval.len(),
            holdout_metrics,
        };
        let artifact = ModelArtifact::new(schema, preprocessing, model, training);

        Ok(TrainingRun {
            artifact,
            validation: table.slice(split.validation),
            test: table.slice(split.test),
        })
    }

    /// Обучение и запись артефакта вместе с отложенными диапазонами
    pub fn run(&self, raw: Table, outputs: &TrainingOutputs) -> Result<ModelArtifact, TrainingError> {
        let run = self.fit(raw)?;

        ArtifactStore::save(&run.artifact, &outputs.artifact)?;
        run.validation.write_csv(&outputs.validation)?;
        run.test.write_csv(&outputs.test)?;
        info!(
            "Held-out ranges written: {} ({} rows), {} ({} rows)",
            outputs.validation.display(),
            run.validation.len(),
            outputs.test.display(),
            run.test.len()
        );

        Ok(run.artifact)
    }
}
