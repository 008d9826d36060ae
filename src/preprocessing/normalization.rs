//! Импутация и стандартизация числовых колонок

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Статистики одной числовой колонки, посчитанные на обучающих данных
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub column: String,
    pub impute_mean: f64,
    pub scale_mean: f64,
    pub scale_std: f64,
}

impl NumericStats {
    /// Среднее по наблюдаемым значениям для импутации; среднее и
    /// стандартное отклонение (ddof = 0) по импутированной колонке для масштаба
    pub fn fit(column: impl Into<String>, values: &[Option<f64>]) -> Self {
        let observed: Array1<f64> = values.iter().flatten().copied().collect();
        let impute_mean = observed.mean().filter(|m| m.is_finite()).unwrap_or(0.0);

        let imputed: Array1<f64> = values.iter().map(|v| v.unwrap_or(impute_mean)).collect();
        let scale_mean = imputed.mean().filter(|m| m.is_finite()).unwrap_or(impute_mean);
        let mut scale_std = if imputed.is_empty() {
            1.0
        } else {
            imputed.std(0.0)
        };

        // Избегаем деления на ноль
        if !scale_std.is_finite() || scale_std < 1e-10 {
            scale_std = 1.0;
        }

        Self {
            column: column.into(),
            impute_mean,
            scale_mean,
            scale_std,
        }
    }

    /// Нормализация: (x - mean) / std, пропуск заменяется средним
    pub fn transform(&self, value: Option<f64>) -> f64 {
        let value = value.unwrap_or(self.impute_mean);
        (value - self.scale_mean) / self.scale_std
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_population_std() {
        let stats = NumericStats::fit("x", &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(stats.impute_mean, 2.5);
        assert_eq!(stats.scale_mean, 2.5);
        assert!((stats.scale_std - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn std_is_computed_over_imputed_values() {
        let stats = NumericStats::fit("x", &[Some(0.0), Some(4.0), None, None]);
        assert_eq!(stats.impute_mean, 2.0);
        // значения после импутации: 0, 4, 2, 2
        assert!((stats.scale_std - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn missing_value_maps_to_zero() {
        let stats = NumericStats::fit("x", &[Some(10.0), Some(20.0), None]);
        assert_eq!(stats.transform(None), 0.0);
        assert_eq!(stats.transform(None), stats.transform(Some(stats.impute_mean)));
    }

    #[test]
    fn constant_and_empty_columns_are_safe() {
        let constant = NumericStats::fit("x", &[Some(5.0), Some(5.0)]);
        assert_eq!(constant.scale_std, 1.0);
        assert_eq!(constant.transform(Some(6.0)), 1.0);

        let empty = NumericStats::fit("x", &[None, None]);
        assert_eq!(empty.impute_mean, 0.0);
        assert_eq!(empty.scale_std, 1.0);
        assert_eq!(empty.transform(None), 0.0);
    }
}
