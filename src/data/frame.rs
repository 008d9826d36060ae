//! Типизированное колоночное представление таблицы по схеме признаков

use std::collections::HashMap;
use std::ops::Range;

use ndarray::Array1;
use tracing::warn;

use crate::data::table::{is_missing_cell, parse_number, Table};
use crate::error::DataError;
use crate::preprocessing::{FeatureRow, FeatureSchema};
use crate::types::TARGET_COLUMN;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// Строки таблицы, разобранные по объявленным типам колонок
#[derive(Debug, Clone)]
pub struct Frame {
    columns: HashMap<String, Column>,
    targets: Vec<f64>,
}

impl Frame {
    /// Разбор диапазона строк очищенной таблицы
    pub fn from_table(
        table: &Table,
        schema: &FeatureSchema,
        rows: Range<usize>,
    ) -> Result<Self, DataError> {
        let rows = &table.rows[rows];
        let index = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| DataError::MissingColumns(vec![name.to_string()]))
        };

        let mut columns = HashMap::with_capacity(schema.len());

        for name in schema.numeric_columns() {
            let position = index(name)?;
            let mut unparsable = 0usize;
            let values = rows
                .iter()
                .map(|row| {
                    let cell = row[position].as_str();
                    let value = parse_number(cell);
                    if value.is_none() && !is_missing_cell(cell) {
                        unparsable += 1;
                    }
                    value
                })
                .collect();
            if unparsable > 0 {
                warn!("{} non-numeric cells in '{}' treated as missing", unparsable, name);
            }
            columns.insert(name.clone(), Column::Numeric(values));
        }

        for name in schema.categorical_columns() {
            let position = index(name)?;
            let values = rows
                .iter()
                .map(|row| {
                    let cell = row[position].as_str();
                    (!is_missing_cell(cell)).then(|| cell.to_string())
                })
                .collect();
            columns.insert(name.clone(), Column::Categorical(values));
        }

        let target = index(TARGET_COLUMN)?;
        let targets = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_number(&row[target]).ok_or(DataError::InvalidTarget { row: i }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn row(&self, index: usize) -> FrameRow<'_> {
        FrameRow { frame: self, index }
    }

    pub fn rows(&self, indices: &[usize]) -> Vec<FrameRow<'_>> {
        indices.iter().map(|&index| self.row(index)).collect()
    }

    pub fn all_rows(&self) -> Vec<FrameRow<'_>> {
        (0..self.len()).map(|index| self.row(index)).collect()
    }

    pub fn targets(&self, indices: &[usize]) -> Array1<f64> {
        indices.iter().map(|&i| self.targets[i]).collect()
    }

    pub fn all_targets(&self) -> Array1<f64> {
        Array1::from(self.targets.clone())
    }
}

/// Ссылка на одну строку фрейма
#[derive(Debug, Clone, Copy)]
pub struct FrameRow<'a> {
    frame: &'a Frame,
    index: usize,
}

impl FeatureRow for FrameRow<'_> {
    fn number(&self, column: &str) -> Option<f64> {
        match self.frame.columns.get(column) {
            Some(Column::Numeric(values)) => values[self.index],
            _ => None,
        }
    }

    fn category(&self, column: &str) -> Option<&str> {
        match self.frame.columns.get(column) {
            Some(Column::Categorical(values)) => values[self.index].as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let csv = "mass_kg,fuel_type,fuel_consumption,notes\n\
                   1200,Petrol,5.5,a\n\
                   ,Diesel,6.0,b\n\
                   heavy,NA,7.0,c\n";
        Table::from_reader(csv.as_bytes(), b',').unwrap()
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec!["mass_kg".into()], vec!["fuel_type".into()])
    }

    #[test]
    fn parses_by_declared_kind() {
        let frame = Frame::from_table(&table(), &schema(), 0..3).unwrap();
        assert_eq!(frame.len(), 3);

        assert_eq!(frame.row(0).number("mass_kg"), Some(1200.0));
        assert_eq!(frame.row(1).number("mass_kg"), None);
        assert_eq!(frame.row(2).number("mass_kg"), None);

        assert_eq!(frame.row(0).category("fuel_type"), Some("Petrol"));
        assert_eq!(frame.row(2).category("fuel_type"), None);

        // колонка вне схемы недоступна
        assert_eq!(frame.row(0).category("notes"), None);
        assert_eq!(frame.all_targets().to_vec(), vec![5.5, 6.0, 7.0]);
    }

    #[test]
    fn subsets_rows_and_targets() {
        let frame = Frame::from_table(&table(), &schema(), 1..3).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.targets(&[1, 0]).to_vec(), vec![7.0, 6.0]);
        assert_eq!(frame.rows(&[1])[0].category("fuel_type"), None);
    }
}
