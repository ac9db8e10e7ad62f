//! Aggregating tree view over a two-sided folder comparison.
//!
//! [`compare`] builds the comparison tree, [`view`] turns it into a sorted,
//! filterable list of expandable rows with size and percentage totals.

pub mod compare;
pub mod config;
pub mod error;
pub mod view;
