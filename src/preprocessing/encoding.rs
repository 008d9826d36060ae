//! Импутация модой и one-hot кодирование категориальных колонок

use std::collections::BTreeMap;

use ndarray::ArrayViewMut1;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub column: String,
    /// `None`, если в обучающих данных колонка пустая
    pub impute_mode: Option<String>,
    /// Отсортированный словарь наблюдаемых значений
    pub vocabulary: Vec<String>,
}

impl CategoricalStats {
    pub fn fit(column: impl Into<String>, values: &[Option<&str>]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for &value in values.iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        // При равенстве частот побеждает лексикографически меньшее значение
        let mut impute_mode: Option<(&str, usize)> = None;
        for (&value, &count) in &counts {
            if impute_mode.map_or(true, |(_, best)| count > best) {
                impute_mode = Some((value, count));
            }
        }

        Self {
            column: column.into(),
            impute_mode: impute_mode.map(|(value, _)| value.to_string()),
            vocabulary: counts.keys().map(|v| v.to_string()).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    /// Индикатор значения в словаре. Неизвестное значение дает нулевой блок.
    pub fn encode_into(&self, value: Option<&str>, mut out: ArrayViewMut1<f64>) {
        out.fill(0.0);
        let value = value.or(self.impute_mode.as_deref());
        if let Some(value) = value {
            if let Ok(position) = self
                .vocabulary
                .binary_search_by(|probe| probe.as_str().cmp(value))
            {
                out[position] = 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array1;

    use super::*;

    fn encode(stats: &CategoricalStats, value: Option<&str>) -> Vec<f64> {
        let mut out = Array1::from_elem(stats.width(), 9.0);
        stats.encode_into(value, out.view_mut());
        out.to_vec()
    }

    #[test]
    fn vocabulary_is_sorted_and_mode_is_most_frequent() {
        let stats = CategoricalStats::fit(
            "fuel_type",
            &[Some("Petrol"), Some("Diesel"), Some("Petrol"), None, Some("Electric")],
        );
        assert_eq!(stats.vocabulary, vec!["Diesel", "Electric", "Petrol"]);
        assert_eq!(stats.impute_mode.as_deref(), Some("Petrol"));
    }

    #[test]
    fn mode_ties_pick_smallest_value() {
        let stats = CategoricalStats::fit("c", &[Some("b"), Some("a"), Some("b"), Some("a")]);
        assert_eq!(stats.impute_mode.as_deref(), Some("a"));
    }

    #[test]
    fn one_hot_and_imputation() {
        let stats = CategoricalStats::fit("c", &[Some("x"), Some("y"), Some("y")]);
        assert_eq!(encode(&stats, Some("x")), vec![1.0, 0.0]);
        assert_eq!(encode(&stats, None), vec![0.0, 1.0]);
    }

    #[test]
    fn unseen_value_is_all_zero() {
        let stats = CategoricalStats::fit("c", &[Some("x"), Some("y")]);
        assert_eq!(encode(&stats, Some("hydrogen")), vec![0.0, 0.0]);
    }

    #[test]
    fn empty_column_encodes_nothing() {
        let stats = CategoricalStats::fit("c", &[None, None]);
        assert_eq!(stats.width(), 0);
        assert_eq!(stats.impute_mode, None);
        assert!(encode(&stats, None).is_empty());
    }
}
