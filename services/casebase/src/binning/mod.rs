//! Discretization of numeric columns into labelled bins
//!
//! Two policies are supported:
//! 1. Equal-width: `n` intervals of equal length over the padded value range
//! 2. Equal-depth: `n` groups of near-equal population over the stable value ranks
//!
//! Labels come from a fixed vocabulary per bin count and are suffixed with the
//! source column name.

pub mod labels;
pub mod binner;
pub mod table;

pub use labels::*;
pub use binner::*;
pub use table::*;
