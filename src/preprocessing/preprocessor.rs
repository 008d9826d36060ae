//! Предобработка признаков: обучение статистик и их применение к записи.
//!
//! Один и тот же `transform` используется при обучении и при обслуживании
//! запросов, поэтому вход абстрагирован трейтом [`FeatureRow`].

use ndarray::{s, Array1, Array2, ArrayViewMut1};
use serde::{Deserialize, Serialize};

use crate::preprocessing::encoding::CategoricalStats;
use crate::preprocessing::normalization::NumericStats;
use crate::preprocessing::schema::FeatureSchema;
use crate::types::Record;

/// Доступ к значениям одной строки по имени колонки
pub trait FeatureRow {
    /// Конечное число или `None`
    fn number(&self, column: &str) -> Option<f64>;
    /// Строковое значение или `None`
    fn category(&self, column: &str) -> Option<&str>;
}

impl FeatureRow for Record {
    fn number(&self, column: &str) -> Option<f64> {
        self.get(column)
            .and_then(|value| value.as_number())
            .filter(|value| value.is_finite())
    }

    fn category(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(|value| value.as_text())
    }
}

impl<T: FeatureRow + ?Sized> FeatureRow for &T {
    fn number(&self, column: &str) -> Option<f64> {
        (**self).number(column)
    }

    fn category(&self, column: &str) -> Option<&str> {
        (**self).category(column)
    }
}

/// Выученное состояние предобработки, выровненное по схеме
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingState {
    numeric: Vec<NumericStats>,
    categorical: Vec<CategoricalStats>,
}

impl PreprocessingState {
    pub fn fit<R: FeatureRow>(schema: &FeatureSchema, rows: &[R]) -> Self {
        let numeric = schema
            .numeric_columns()
            .iter()
            .map(|column| {
                let values: Vec<Option<f64>> = rows.iter().map(|r| r.number(column)).collect();
                NumericStats::fit(column.as_str(), &values)
            })
            .collect();

        let categorical = schema
            .categorical_columns()
            .iter()
            .map(|column| {
                let values: Vec<Option<&str>> = rows.iter().map(|r| r.category(column)).collect();
                CategoricalStats::fit(column.as_str(), &values)
            })
            .collect();

        Self {
            numeric,
            categorical,
        }
    }

    pub fn numeric(&self) -> &[NumericStats] {
        &self.numeric
    }

    pub fn categorical(&self) -> &[CategoricalStats] {
        &self.categorical
    }

    /// Длина выходного вектора
    pub fn output_width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.width()).sum::<usize>()
    }

    /// Состояние описывает ровно эти колонки в этом порядке
    pub fn matches(&self, schema: &FeatureSchema) -> bool {
        self.numeric.len() == schema.numeric_columns().len()
            && self.categorical.len() == schema.categorical_columns().len()
            && self
                .numeric
                .iter()
                .zip(schema.numeric_columns())
                .all(|(stats, column)| &stats.column == column)
            && self
                .categorical
                .iter()
                .zip(schema.categorical_columns())
                .all(|(stats, column)| &stats.column == column)
    }

    pub fn transform<R: FeatureRow + ?Sized>(&self, row: &R) -> Array1<f64> {
        let mut out = Array1::zeros(self.output_width());
        self.transform_into(row, out.view_mut());
        out
    }

    pub fn transform_rows<R: FeatureRow>(&self, rows: &[R]) -> Array2<f64> {
        let mut out = Array2::zeros((rows.len(), self.output_width()));
        for (row, target) in rows.iter().zip(out.rows_mut()) {
            self.transform_into(row, target);
        }
        out
    }

    /// Числовые колонки в порядке схемы, затем one-hot блоки
    fn transform_into<R: FeatureRow + ?Sized>(&self, row: &R, mut out: ArrayViewMut1<f64>) {
        for (i, stats) in self.numeric.iter().enumerate() {
            out[i] = stats.transform(row.number(&stats.column));
        }

        let mut offset = self.numeric.len();
        for stats in &self.categorical {
            let width = stats.width();
            stats.encode_into(
                row.category(&stats.column),
                out.slice_mut(s![offset..offset + width]),
            );
            offset += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            vec!["mass_kg".into(), "engine_power_kw".into()],
            vec!["fuel_type".into(), "fuel_mix".into()],
        )
    }

    fn record(mass: f64, power: f64, fuel: &str, mix: &str) -> Record {
        Record::new()
            .with("mass_kg", mass)
            .with("engine_power_kw", power)
            .with("fuel_type", fuel)
            .with("fuel_mix", mix)
    }

    fn training_rows() -> Vec<Record> {
        vec![
            record(1000.0, 60.0, "Petrol", "M"),
            record(1500.0, 90.0, "Diesel", "M"),
            record(2000.0, 120.0, "Petrol", "B"),
            record(1200.0, 70.0, "Electric", "M"),
        ]
    }

    #[test]
    fn output_layout_follows_schema() {
        let state = PreprocessingState::fit(&schema(), &training_rows());
        // 2 числовых + 3 fuel_type + 2 fuel_mix
        assert_eq!(state.output_width(), 7);

        let vector = state.transform(&record(1425.0, 85.0, "Petrol", "B"));
        assert_eq!(vector[0], 0.0);
        assert_eq!(vector[1], 0.0);
        // Diesel, Electric, Petrol
        assert_eq!(vector.slice(s![2..5]).to_vec(), vec![0.0, 0.0, 1.0]);
        // B, M
        assert_eq!(vector.slice(s![5..7]).to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn missing_numeric_equals_training_mean() {
        let state = PreprocessingState::fit(&schema(), &training_rows());
        for stats in state.numeric() {
            let mut missing = record(1100.0, 80.0, "Diesel", "M");
            missing.remove(&stats.column);
            let mut at_mean = record(1100.0, 80.0, "Diesel", "M");
            at_mean.insert(stats.column.clone(), stats.impute_mean);

            assert_eq!(state.transform(&missing), state.transform(&at_mean));
        }
    }

    #[test]
    fn missing_category_uses_mode() {
        let state = PreprocessingState::fit(&schema(), &training_rows());
        let mut missing = record(1100.0, 80.0, "Diesel", "M");
        missing.remove("fuel_type");
        let petrol = record(1100.0, 80.0, "Petrol", "M");
        assert_eq!(state.transform(&missing), state.transform(&petrol));
    }

    #[test]
    fn unseen_categories_give_zero_blocks() {
        let state = PreprocessingState::fit(&schema(), &training_rows());
        let vector = state.transform(&record(1100.0, 80.0, "Hydrogen", "Z"));
        assert!(vector.slice(s![2..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn wrong_kind_is_treated_as_missing() {
        let state = PreprocessingState::fit(&schema(), &training_rows());
        let mut odd = record(1100.0, 80.0, "Diesel", "M");
        odd.insert("mass_kg", "heavy");
        let mut missing = record(1100.0, 80.0, "Diesel", "M");
        missing.remove("mass_kg");
        assert_eq!(state.transform(&odd), state.transform(&missing));
    }

    #[test]
    fn batch_and_single_transforms_agree() {
        let rows = training_rows();
        let state = PreprocessingState::fit(&schema(), &rows);
        let matrix = state.transform_rows(&rows);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(matrix.row(i).to_owned(), state.transform(row));
        }
    }

    #[test]
    fn fit_is_deterministic_and_matches_schema() {
        let a = PreprocessingState::fit(&schema(), &training_rows());
        let b = PreprocessingState::fit(&schema(), &training_rows());
        assert_eq!(a, b);
        assert!(a.matches(&schema()));

        let other = FeatureSchema::new(vec!["mass_kg".into()], vec![]);
        assert!(!a.matches(&other));
    }
}
