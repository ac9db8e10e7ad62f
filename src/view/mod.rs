//! Tree grid data view: pruned aggregation forest, flat rows, sorting and
//! percentage columns.

pub mod extract;
pub mod filter;
pub mod percent;
pub mod sort;
pub mod tree_view;

pub use filter::{ActionFilter, CategoryFilter, Filter};
pub use sort::{SortColumn, SortSpec};
pub use tree_view::{DisplayNode, LineKind, NodeDetails, NodeStatus, TreeLine, TreeView};
