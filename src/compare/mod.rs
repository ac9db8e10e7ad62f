//! The comparison tree the view reads from: model, directory scan, and
//! sync direction presets.

pub mod direction;
pub mod model;
pub mod scan;
