//! Дерево регрессии (CART)

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Параметры одного дерева
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Узел дерева. Дети адресуются индексами в плоском массиве узлов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Обучение на строках `samples` (индексы могут повторяться, как в bootstrap).
    /// Узлы строятся итеративно, чтобы глубина не упиралась в стек.
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        mut samples: Vec<usize>,
        params: &TreeParams,
    ) -> Self {
        let mut nodes = vec![TreeNode::Leaf { value: 0.0 }];
        let mut stack = vec![(0usize, 0usize, samples.len(), 0usize)];
        let mut scratch: Vec<(f64, f64)> = Vec::with_capacity(samples.len());

        while let Some((node, start, end, depth)) = stack.pop() {
            let slice = &mut samples[start..end];
            let count = slice.len();
            let value = if count == 0 {
                0.0
            } else {
                slice.iter().map(|&i| y[i]).sum::<f64>() / count as f64
            };

            let splittable = count >= params.min_samples_split
                && count >= 2 * params.min_samples_leaf
                && params.max_depth.map_or(true, |max| depth < max)
                && slice.iter().any(|&i| y[i] != y[slice[0]]);

            let split = if splittable {
                Self::best_split(x, y, slice, params.min_samples_leaf, &mut scratch)
            } else {
                None
            };

            let Some(split) = split else {
                nodes[node] = TreeNode::Leaf { value };
                continue;
            };

            // Разделение: x <= threshold уходит влево
            let mut middle = 0;
            for k in 0..slice.len() {
                if x[[slice[k], split.feature]] <= split.threshold {
                    slice.swap(middle, k);
                    middle += 1;
                }
            }

            let left = nodes.len();
            let right = left + 1;
            nodes.push(TreeNode::Leaf { value: 0.0 });
            nodes.push(TreeNode::Leaf { value: 0.0 });
            nodes[node] = TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };

            stack.push((right, start + middle, end, depth + 1));
            stack.push((left, start, start + middle, depth + 1));
        }

        Self { nodes }
    }

    /// Полный перебор порогов по всем признакам. Максимизируем
    /// sum_l²/n_l + sum_r²/n_r, что эквивалентно минимуму суммарного MSE.
    fn best_split(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        samples: &[usize],
        min_samples_leaf: usize,
        scratch: &mut Vec<(f64, f64)>,
    ) -> Option<Split> {
        let count = samples.len();
        let mut best: Option<(f64, Split)> = None;

        for feature in 0..x.ncols() {
            scratch.clear();
            scratch.extend(samples.iter().map(|&i| (x[[i, feature]], y[i])));
            scratch.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

            let total: f64 = scratch.iter().map(|&(_, target)| target).sum();
            let mut left_sum = 0.0;

            for i in 0..count - 1 {
                left_sum += scratch[i].1;
                let (current, next) = (scratch[i].0, scratch[i + 1].0);
                if current == next {
                    continue;
                }

                let left_count = i + 1;
                let right_count = count - left_count;
                if left_count < min_samples_leaf || right_count < min_samples_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / left_count as f64
                    + right_sum * right_sum / right_count as f64;

                if best.map_or(true, |(best_score, _)| score > best_score) {
                    let mut threshold = current / 2.0 + next / 2.0;
                    if threshold >= next || !threshold.is_finite() {
                        threshold = current;
                    }
                    best = Some((score, Split { feature, threshold }));
                }
            }
        }

        best.map(|(_, split)| split)
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    /// Индексы признаков и детей в допустимых пределах, дети идут после родителя
    pub fn is_consistent(&self, n_features: usize) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(index, node)| match node {
                TreeNode::Leaf { value } => value.is_finite(),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    *feature < n_features
                        && threshold.is_finite()
                        && *left > index
                        && *right > index
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
            })
    }
}
