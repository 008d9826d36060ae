//! Очистка сырого датасета

use std::collections::HashSet;

use tracing::{info, warn};

use crate::data::columns::{canonical_name, required_columns};
use crate::data::table::{is_missing_cell, parse_number, Table};
use crate::error::DataError;
use crate::types::TARGET_COLUMN;

pub struct DataCleaner;

/// Значение ячейки для поиска дубликатов: все маркеры пропуска равны,
/// `1600` и `1600.0` тоже
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Missing,
    Number(u64),
    Text(String),
}

impl CellKey {
    fn of(cell: &str) -> Self {
        if is_missing_cell(cell) {
            return CellKey::Missing;
        }
        match parse_number(cell) {
            // -0.0 == 0.0
            Some(value) if value == 0.0 => CellKey::Number(0.0f64.to_bits()),
            Some(value) => CellKey::Number(value.to_bits()),
            None => CellKey::Text(cell.to_string()),
        }
    }
}

impl DataCleaner {
    /// Нормализация заголовков, удаление индексной колонки, дубликатов
    /// и строк без целевой переменной
    pub fn clean(mut table: Table) -> Result<Table, DataError> {
        for header in table.headers.iter_mut() {
            *header = header.trim().to_string();
        }

        if table.headers.is_empty() {
            return Err(DataError::MissingHeader);
        }

        if Self::is_index_column(&table.headers[0]) {
            let dropped = table.headers.remove(0);
            info!("Dropping unnamed index column '{}'", dropped);
            for row in table.rows.iter_mut() {
                if !row.is_empty() {
                    row.remove(0);
                }
            }
        }

        let mut unknown = Vec::new();
        for header in table.headers.iter_mut() {
            match canonical_name(header) {
                Some(name) => *header = name.to_string(),
                None => unknown.push(header.clone()),
            }
        }
        if !unknown.is_empty() {
            warn!("Columns outside the feature table are ignored: {:?}", unknown);
        }

        let missing: Vec<String> = required_columns()
            .filter(|name| table.column_index(name).is_none())
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(DataError::MissingColumns(missing));
        }

        // Дубликаты сравниваются по значениям; остается первое вхождение
        let before = table.len();
        let mut seen = HashSet::with_capacity(table.len());
        table.rows.retain(|row| seen.insert(Self::row_key(row)));
        let duplicates = before - table.len();

        let target = table
            .column_index(TARGET_COLUMN)
            .ok_or_else(|| DataError::MissingColumns(vec![TARGET_COLUMN.to_string()]))?;
        let before = table.len();
        table
            .rows
            .retain(|row| row.get(target).and_then(|cell| parse_number(cell)).is_some());
        let unlabelled = before - table.len();

        info!(
            "Cleaned table: {} rows kept, {} duplicates and {} rows without target removed",
            table.len(),
            duplicates,
            unlabelled
        );

        Ok(table)
    }

    fn row_key(row: &[String]) -> Vec<CellKey> {
        row.iter().map(|cell| CellKey::of(cell)).collect()
    }

    fn is_index_column(header: &str) -> bool {
        header.is_empty() || header.to_lowercase().starts_with("unnamed")
    }
}
