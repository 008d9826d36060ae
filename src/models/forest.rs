//! Случайный лес регрессии: bootstrap-ансамбль деревьев CART.
//!
//! Модель подключается через трейты linfa: параметры проверяются
//! `ParamGuard`, обучение идет через `Fit`, предсказание через `PredictInplace`.

use linfa::dataset::DatasetBase;
use linfa::traits::{Fit, PredictInplace};
use linfa::ParamGuard;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ForestError;
use crate::models::tree::{RegressionTree, TreeParams};

/// Проверенные гиперпараметры леса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestValidParams {
    n_trees: usize,
    tree: TreeParams,
    seed: u64,
}

impl ForestValidParams {
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn tree(&self) -> &TreeParams {
        &self.tree
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Гиперпараметры леса до проверки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams(ForestValidParams);

impl Default for ForestParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestParams {
    pub fn new() -> Self {
        Self(ForestValidParams {
            n_trees: 100,
            tree: TreeParams::default(),
            seed: 42,
        })
    }

    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.0.n_trees = n_trees;
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.tree.max_depth = max_depth;
        self
    }

    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.tree.min_samples_split = min_samples_split;
        self
    }

    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.0.tree.min_samples_leaf = min_samples_leaf;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl ParamGuard for ForestParams {
    type Checked = ForestValidParams;
    type Error = ForestError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let params = &self.0;
        if params.n_trees == 0 {
            Err(ForestError::NoTrees)
        } else if params.tree.min_samples_split < 2 {
            Err(ForestError::MinSamplesSplit(params.tree.min_samples_split))
        } else if params.tree.min_samples_leaf == 0 {
            Err(ForestError::MinSamplesLeaf)
        } else if params.tree.max_depth == Some(0) {
            Err(ForestError::MaxDepth)
        } else {
            Ok(params)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// Seed дерева зависит только от общего seed и номера дерева,
/// поэтому порядок выполнения потоков на результат не влияет
fn tree_seed(seed: u64, tree: usize) -> u64 {
    seed.wrapping_add((tree as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

impl Fit<Array2<f64>, Array1<f64>, ForestError> for ForestValidParams {
    type Object = RandomForest;

    fn fit(
        &self,
        dataset: &DatasetBase<Array2<f64>, Array1<f64>>,
    ) -> Result<Self::Object, ForestError> {
        let x = dataset.records.view();
        let y = dataset.targets.view();

        if x.nrows() == 0 {
            return Err(ForestError::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(ForestError::TargetMismatch {
                records: x.nrows(),
                targets: y.len(),
            });
        }
        if !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
            return Err(ForestError::NonFinite);
        }

        let n_samples = x.nrows();
        let trees: Vec<RegressionTree> = (0..self.n_trees)
            .into_par_iter()
            .map(|index| {
                let mut rng = StdRng::seed_from_u64(tree_seed(self.seed, index));
                let samples: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                let tree = RegressionTree::fit(x, y, samples, &self.tree);
                debug!("Tree {} fitted: {} nodes", index, tree.nodes().len());
                tree
            })
            .collect();

        Ok(RandomForest {
            n_features: x.ncols(),
            trees,
        })
    }
}

/// Обученный лес; предсказание - среднее по деревьям
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn params() -> ForestParams {
        ForestParams::new()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn infer(&self, features: ArrayView1<f64>) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.predict_row(features)).sum();
        sum / self.trees.len() as f64
    }

    pub fn is_consistent(&self) -> bool {
        !self.trees.is_empty() && self.trees.iter().all(|tree| tree.is_consistent(self.n_features))
    }
}

impl<D: Data<Elem = f64>> PredictInplace<ArrayBase<D, Ix2>, Array1<f64>> for RandomForest {
    fn predict_inplace<'a>(&'a self, x: &'a ArrayBase<D, Ix2>, y: &mut Array1<f64>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.infer(row);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<f64> {
        Array1::zeros(x.nrows())
    }
}
