//! Схема признаков: упорядоченные числовые и категориальные колонки

use serde::{Deserialize, Serialize};

use crate::data::columns::{kind_of, ColumnKind};

/// Схема фиксируется при обучении и дальше только читается.
/// Порядок колонок задает порядок выходного вектора.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(numeric_columns: Vec<String>, categorical_columns: Vec<String>) -> Self {
        Self {
            numeric_columns,
            categorical_columns,
        }
    }

    /// Классификация колонок по объявленному типу. Целевая колонка
    /// и колонки вне канонической таблицы пропускаются.
    pub fn from_columns<'a, I>(columns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();

        for name in columns {
            match kind_of(name) {
                Some(ColumnKind::Numeric) if !numeric_columns.iter().any(|c| c == name) => {
                    numeric_columns.push(name.to_string())
                }
                Some(ColumnKind::Categorical) if !categorical_columns.iter().any(|c| c == name) => {
                    categorical_columns.push(name.to_string())
                }
                _ => {}
            }
        }

        Self::new(numeric_columns, categorical_columns)
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    /// Все признаки: сначала числовые, затем категориальные
    pub fn fields(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.numeric_columns
            .iter()
            .map(|c| (c.as_str(), ColumnKind::Numeric))
            .chain(
                self.categorical_columns
                    .iter()
                    .map(|c| (c.as_str(), ColumnKind::Categorical)),
            )
    }

    pub fn len(&self) -> usize {
        self.numeric_columns.len() + self.categorical_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_declared_kind_in_table_order() {
        let schema = FeatureSchema::from_columns([
            "fuel_mix",
            "mass_kg",
            "fuel_consumption",
            "Country",
            "range_km",
            "fuel_type",
        ]);

        assert_eq!(schema.numeric_columns(), ["mass_kg", "range_km"]);
        assert_eq!(schema.categorical_columns(), ["fuel_mix", "fuel_type"]);
        assert_eq!(schema.len(), 4);

        let fields: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(fields, vec!["mass_kg", "range_km", "fuel_mix", "fuel_type"]);
    }

    #[test]
    fn target_only_table_yields_empty_schema() {
        let schema = FeatureSchema::from_columns(["fuel_consumption"]);
        assert!(schema.is_empty());
    }
}
