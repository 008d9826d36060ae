//! Обучение модели расхода топлива
//!
//! Читает исходный CSV, обучает предобработку и лес, сохраняет артефакт
//! и отложенные validation/test диапазоны.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fuel_ml::config::{TrainingConfig, TrainingOutputs};
use fuel_ml::data::{DatasetSplitter, Table};
use fuel_ml::TrainingOrchestrator;

#[derive(Parser, Debug)]
#[command(name = "fuel-train", version, about = "Train the fuel consumption model")]
struct Args {
    /// Исходный датасет
    #[arg(short, long, env = "FUEL_TRAINING_DATA", default_value = "data/Automobile_data.csv")]
    input: PathBuf,

    /// Разделитель колонок
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Куда сохранить артефакт
    #[arg(short, long, env = "FUEL_MODEL_PATH", default_value_os_t = TrainingOutputs::default().artifact)]
    output: PathBuf,

    #[arg(long, default_value_os_t = TrainingOutputs::default().validation)]
    validation_out: PathBuf,

    #[arg(long, default_value_os_t = TrainingOutputs::default().test)]
    test_out: PathBuf,

    /// Размер обучающего диапазона (первые строки файла)
    #[arg(long, default_value_t = DatasetSplitter::default().train_rows)]
    train_rows: usize,

    /// Размер validation диапазона (следующие строки)
    #[arg(long, default_value_t = DatasetSplitter::default().validation_rows)]
    validation_rows: usize,

    /// Доля обучающего диапазона, на которой обучается пайплайн
    #[arg(long, default_value_t = DatasetSplitter::default().fit_fraction)]
    fit_fraction: f64,

    /// Число деревьев (по умолчанию 100)
    #[arg(long)]
    trees: Option<usize>,

    #[arg(long)]
    max_depth: Option<usize>,

    #[arg(long)]
    min_samples_split: Option<usize>,

    #[arg(long)]
    min_samples_leaf: Option<usize>,

    /// Seed разбиения и бутстрэпа
    #[arg(long, default_value_t = DatasetSplitter::default().seed)]
    seed: u64,

    /// Подробное логирование
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    anyhow::ensure!(
        args.fit_fraction > 0.0 && args.fit_fraction <= 1.0,
        "fit fraction must be in (0, 1], got {}",
        args.fit_fraction
    );
    anyhow::ensure!(args.delimiter.is_ascii(), "delimiter must be an ASCII character");

    let defaults = TrainingConfig::default();
    let mut forest = defaults.forest.max_depth(args.max_depth).seed(args.seed);
    if let Some(trees) = args.trees {
        forest = forest.n_trees(trees);
    }
    if let Some(min_samples_split) = args.min_samples_split {
        forest = forest.min_samples_split(min_samples_split);
    }
    if let Some(min_samples_leaf) = args.min_samples_leaf {
        forest = forest.min_samples_leaf(min_samples_leaf);
    }

    let config = TrainingConfig {
        splitter: DatasetSplitter {
            train_rows: args.train_rows,
            validation_rows: args.validation_rows,
            fit_fraction: args.fit_fraction,
            seed: args.seed,
        },
        forest,
    };
    let outputs = TrainingOutputs {
        artifact: args.output,
        validation: args.validation_out,
        test: args.test_out,
    };

    info!("Loading dataset from {}", args.input.display());
    let table = Table::read_csv(&args.input, args.delimiter as u8)
        .with_context(|| format!("failed to load dataset {}", args.input.display()))?;

    let artifact = TrainingOrchestrator::new(config)
        .run(table, &outputs)
        .context("training failed")?;

    match &artifact.training().holdout_metrics {
        Some(metrics) => info!("Model trained and saved ({})", metrics),
        None => info!("Model trained and saved"),
    }
    info!("  Artifact: {}", outputs.artifact.display());
    info!("  Validation: {}", outputs.validation.display());
    info!("  Test: {}", outputs.test.display());

    Ok(())
}
