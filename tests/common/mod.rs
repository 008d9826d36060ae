#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fuel_ml::config::{TrainingConfig, TrainingOutputs};
use fuel_ml::data::{DatasetSplitter, Table};
use fuel_ml::models::ForestParams;
use fuel_ml::{ModelArtifact, Record, TrainingOrchestrator};

pub const RAW_HEADER: &str = "Unnamed: 0,r,m (kg),Mt,Ewltp (g/km),Ft,Fm,ec (cm3),ep (KW),z (Wh/km),Erwltp (g/km),Fuel consumption ,Electric range (km)";

/// Синтетический датасет в формате исходного файла
pub fn raw_csv(rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut csv = String::from(RAW_HEADER);

    for i in 0..rows {
        let fuel = match rng.gen_range(0..10) {
            0..=4 => "Petrol",
            5..=7 => "Diesel",
            8 => "Petrol/Electric",
            _ => "Electric",
        };
        let mix = ["M", "B", "H"][rng.gen_range(0..3)];
        let mass: f64 = rng.gen_range(900.0..2400.0);
        let power: f64 = rng.gen_range(50.0..250.0);
        let capacity: f64 = if fuel == "Electric" {
            0.0
        } else {
            rng.gen_range(1000.0..3000.0)
        };
        let hybrid = fuel == "Petrol/Electric";
        let electric_range = if hybrid { rng.gen_range(30.0..80.0) } else { 0.0 };
        let energy = if hybrid || fuel == "Electric" {
            rng.gen_range(120.0..220.0)
        } else {
            0.0
        };

        let base = 1.5 + mass / 600.0 + power / 60.0 + capacity / 1500.0;
        let consumption = match fuel {
            "Electric" => String::new(),
            "Diesel" => format!("{:.1}", base * 0.85),
            _ if hybrid => format!("{:.1}", base * 0.4),
            _ => format!("{:.1}", base),
        };
        let co2 = if fuel == "Electric" { 0.0 } else { base * 23.0 };
        // пропуски в отдельных ячейках
        let power_cell = if i % 37 == 5 {
            String::new()
        } else {
            format!("{:.0}", power)
        };

        csv.push_str(&format!(
            "\n{},{},{:.0},{:.3},{:.0},{},{},{:.0},{},{:.0},{:.1},{},{:.0}",
            i,
            if hybrid { 1 } else { 0 },
            mass,
            co2 / 1000.0,
            co2,
            fuel,
            mix,
            capacity,
            power_cell,
            energy,
            if i % 11 == 0 { 1.2 } else { 0.0 },
            consumption,
            electric_range
        ));
    }

    csv
}

pub fn raw_table(rows: usize, seed: u64) -> Table {
    Table::from_reader(raw_csv(rows, seed).as_bytes(), b',').unwrap()
}

pub fn config() -> TrainingConfig {
    TrainingConfig {
        splitter: DatasetSplitter {
            train_rows: 300,
            validation_rows: 60,
            ..DatasetSplitter::default()
        },
        forest: ForestParams::new().n_trees(12),
    }
}

pub fn outputs(dir: &Path) -> TrainingOutputs {
    TrainingOutputs {
        artifact: dir.join("model").join("fuel_model.json"),
        validation: dir.join("data").join("validation_data.csv"),
        test: dir.join("data").join("test_data.csv"),
    }
}

/// Обучение на синтетических данных с записью всех выходов в `dir`
pub fn train(dir: &Path) -> (PathBuf, ModelArtifact) {
    let outputs = outputs(dir);
    let artifact = TrainingOrchestrator::new(config())
        .run(raw_table(500, 7), &outputs)
        .unwrap();
    (outputs.artifact, artifact)
}

/// Запись из сценария end-to-end
pub fn scenario() -> Record {
    Record::new()
        .with("range_km", 0.0)
        .with("mass_kg", 1200.0)
        .with("co2_emission_tons", 0.1)
        .with("co2_wltp_g_per_km", 120.0)
        .with("fuel_type", "Petrol")
        .with("fuel_mix", "M1")
        .with("engine_capacity_cc", 1600.0)
        .with("engine_power_kw", 85.0)
        .with("energy_consumption_whpkm", 0.0)
        .with("co2_reduction_wltp_gpkm", 0.0)
        .with("electric_range_km", 0.0)
}

pub const SCENARIO_JSON: &str = r#"{
    "range_km": 0,
    "mass_kg": 1200,
    "co2_emission_tons": 0.1,
    "co2_wltp_g_per_km": 120,
    "fuel_type": "Petrol",
    "fuel_mix": "M1",
    "engine_capacity_cc": 1600,
    "engine_power_kw": 85,
    "energy_consumption_whpkm": 0,
    "co2_reduction_wltp_gpkm": 0,
    "electric_range_km": 0
}"#;
