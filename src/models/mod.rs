/// ML модели

pub mod forest;
pub mod tree;

pub use forest::{ForestParams, ForestValidParams, RandomForest};
pub use tree::{RegressionTree, TreeNode, TreeParams};
