/// Модуль предобработки данных

pub mod encoding;
pub mod normalization;
pub mod preprocessor;
pub mod schema;

pub use encoding::CategoricalStats;
pub use normalization::NumericStats;
pub use preprocessor::{FeatureRow, PreprocessingState};
pub use schema::FeatureSchema;
