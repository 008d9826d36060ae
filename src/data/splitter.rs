//! Разбиение датасета: позиционное (train/validation/test)
//! и случайное внутри обучающего диапазона

use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Три смежных диапазона строк в порядке файла
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSplit {
    pub train: Range<usize>,
    pub validation: Range<usize>,
    pub test: Range<usize>,
}

/// Индексы строк обучающего диапазона: на чем обучаемся и на чем проверяем
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutSplit {
    pub fit: Vec<usize>,
    pub eval: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplitter {
    pub train_rows: usize,
    pub validation_rows: usize,
    pub fit_fraction: f64,
    pub seed: u64,
}

impl Default for DatasetSplitter {
    fn default() -> Self {
        Self {
            train_rows: 700_000,
            validation_rows: 200_000,
            fit_fraction: 0.8,
            seed: 42,
        }
    }
}

impl DatasetSplitter {
    /// Первые `train_rows` строк, следующие `validation_rows`, остаток в test.
    /// Границы обрезаются по длине датасета.
    pub fn positional(&self, len: usize) -> PositionalSplit {
        let train_end = self.train_rows.min(len);
        let validation_end = train_end.saturating_add(self.validation_rows).min(len);

        PositionalSplit {
            train: 0..train_end,
            validation: train_end..validation_end,
            test: validation_end..len,
        }
    }

    /// Перемешивание `0..len` с фиксированным seed; первые ⌊fit_fraction·len⌋
    /// индексов идут в обучение (не меньше одного)
    pub fn holdout(&self, len: usize) -> HoldoutSplit {
        let mut indices: Vec<usize> = (0..len).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let fit_len = ((len as f64 * self.fit_fraction).floor() as usize)
            .max(1)
            .min(len);
        let eval = indices.split_off(fit_len);

        HoldoutSplit { fit: indices, eval }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(train_rows: usize, validation_rows: usize) -> DatasetSplitter {
        DatasetSplitter {
            train_rows,
            validation_rows,
            ..DatasetSplitter::default()
        }
    }

    #[test]
    fn positional_ranges_are_contiguous() {
        let split = splitter(6, 3).positional(12);
        assert_eq!(split.train, 0..6);
        assert_eq!(split.validation, 6..9);
        assert_eq!(split.test, 9..12);
    }

    #[test]
    fn positional_ranges_clamp_to_length() {
        let split = splitter(10, 5).positional(7);
        assert_eq!(split.train, 0..7);
        assert!(split.validation.is_empty());
        assert!(split.test.is_empty());

        let split = splitter(0, 5).positional(3);
        assert!(split.train.is_empty());
        assert_eq!(split.validation, 0..3);
    }

    #[test]
    fn holdout_is_a_seeded_partition() {
        let splitter = DatasetSplitter::default();
        let first = splitter.holdout(100);
        let second = splitter.holdout(100);
        assert_eq!(first, second);

        assert_eq!(first.fit.len(), 80);
        assert_eq!(first.eval.len(), 20);

        let mut all: Vec<usize> = first.fit.iter().chain(first.eval.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn holdout_keeps_at_least_one_fit_row() {
        let split = DatasetSplitter::default().holdout(1);
        assert_eq!(split.fit, vec![0]);
        assert!(split.eval.is_empty());

        let split = DatasetSplitter::default().holdout(0);
        assert!(split.fit.is_empty());
    }

    #[test]
    fn different_seed_changes_holdout() {
        let a = DatasetSplitter::default().holdout(50);
        let b = DatasetSplitter {
            seed: 7,
            ..DatasetSplitter::default()
        }
        .holdout(50);
        assert_ne!(a.fit, b.fit);
    }
}
