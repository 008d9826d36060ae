/// Загрузка, очистка и разбиение датасета

pub mod cleaner;
pub mod columns;
pub mod frame;
pub mod splitter;
pub mod table;

pub use cleaner::DataCleaner;
pub use columns::{ColumnKind, CANONICAL_COLUMNS};
pub use frame::{Frame, FrameRow};
pub use splitter::{DatasetSplitter, HoldoutSplit, PositionalSplit};
pub use table::Table;
