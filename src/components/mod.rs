pub mod status_bar;
pub mod tree_grid;
