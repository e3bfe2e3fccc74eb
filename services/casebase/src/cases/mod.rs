//! Discretized rows → canonical facts → fact-tuple histogram → case model
//!
//! Every row of a discretized table becomes one fact-tuple. Identical tuples
//! are counted across the population and each distinct tuple becomes one
//! `Case` weighted by its relative frequency.

pub mod fact;
pub mod normalize;
pub mod histogram;
pub mod model;
pub mod pipeline;

pub use fact::*;
pub use normalize::*;
pub use histogram::*;
pub use model::*;
pub use pipeline::*;
