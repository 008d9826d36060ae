//! Сырые табличные данные: строки CSV без преобразования типов

use std::io;
use std::ops::Range;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::DataError;

/// Маркеры пропущенного значения в ячейке
const MISSING_MARKERS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "NULL", "null", "None"];

pub fn is_missing_cell(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING_MARKERS.contains(&cell)
}

/// Разбор числовой ячейки; пропуски и мусор дают `None`
pub fn parse_number(cell: &str) -> Option<f64> {
    if is_missing_cell(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Таблица в порядке файла. Ячейки хранятся как есть, чтобы
/// отложенные выборки записывались без изменений.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn read_csv<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, DataError> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|source| DataError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv_reader(reader)
    }

    pub fn from_reader<R: io::Read>(reader: R, delimiter: u8) -> Result<Self, DataError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(reader);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, DataError> {
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.is_empty() {
            return Err(DataError::MissingHeader);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Запись через временный файл с атомарной публикацией
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        let path = path.as_ref();
        let io_error = |source: io::Error| DataError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_error)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            writer.write_record(&self.headers)?;
            for row in &self.rows {
                writer.write_record(row)?;
            }
            writer.flush().map_err(io_error)?;
        }
        tmp.as_file().sync_all().map_err(io_error)?;
        tmp.persist(path).map_err(|e| io_error(e.error))?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Копия диапазона строк с теми же заголовками
    pub fn slice(&self, range: Range<usize>) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows[range].to_vec(),
        }
    }

    /// Последние `rows` строк (вся таблица, если строк меньше)
    pub fn tail(mut self, rows: usize) -> Table {
        let start = self.rows.len().saturating_sub(rows);
        self.rows.drain(..start);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows_verbatim() {
        let csv = "a,b\n1, x \n,NA\n";
        let table = Table::from_reader(csv.as_bytes(), b',').unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec!["1", " x "]);
        assert_eq!(table.rows[1], vec!["", "NA"]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "a,b\n1,2,3\n";
        assert!(Table::from_reader(csv.as_bytes(), b',').is_err());
    }

    #[test]
    fn missing_markers() {
        assert!(is_missing_cell(""));
        assert!(is_missing_cell(" NaN "));
        assert!(!is_missing_cell("0"));
        assert_eq!(parse_number(" 1.5"), Some(1.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn write_then_read_preserves_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "x, y".into()], vec!["".into(), "z".into()]],
        );

        table.write_csv(&path).unwrap();
        let back = Table::read_csv(&path, b',').unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn tail_keeps_last_rows() {
        let rows: Vec<Vec<String>> = (0..5).map(|i| vec![i.to_string()]).collect();
        let table = Table::new(vec!["a".into()], rows);

        let last = table.clone().tail(2);
        assert_eq!(last.rows, vec![vec!["3"], vec!["4"]]);
        assert_eq!(last.headers, table.headers);
        assert_eq!(table.clone().tail(10), table);
    }
}
