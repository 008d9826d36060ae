//! Оценка сохраненной модели на отложенных данных

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fuel_ml::config::TrainingOutputs;
use fuel_ml::data::Table;
use fuel_ml::{ArtifactStore, Evaluator};

#[derive(Parser, Debug)]
#[command(name = "fuel-evaluate", version, about = "Score a trained model on a labelled table")]
struct Args {
    /// Размеченная таблица (например, validation_data.csv)
    #[arg(short, long, default_value_os_t = TrainingOutputs::default().validation)]
    input: PathBuf,

    #[arg(long, default_value_t = ',')]
    delimiter: char,

    #[arg(short, long, env = "FUEL_MODEL_PATH", default_value_os_t = TrainingOutputs::default().artifact)]
    model: PathBuf,

    /// Оценить только последние N строк после очистки (например, 100000 для сырого датасета)
    #[arg(long)]
    tail: Option<usize>,

    /// Печатать отчет в JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.delimiter.is_ascii(), "delimiter must be an ASCII character");

    let artifact = ArtifactStore::load(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;
    let table = Table::read_csv(&args.input, args.delimiter as u8)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let report = match args.tail {
        Some(rows) => Evaluator::evaluate_tail(&artifact, table, rows),
        None => Evaluator::evaluate(&artifact, table),
    }
    .context("evaluation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.metrics {
        Some(metrics) => info!("{}: {}", args.input.display(), metrics),
        None => info!("{}: no labelled rows", args.input.display()),
    }
    for (actual, predicted) in &report.samples {
        info!("  actual={:.2} predicted={:.2}", actual, predicted);
    }

    Ok(())
}
