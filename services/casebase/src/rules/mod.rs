//! Decision rules → arguments
//!
//! This module implements a pipeline for:
//! 1. Parsing conjunctive threshold rules emitted by a trained tree
//! 2. Resolving the leaf conclusion against a class-name table
//! 3. Collecting per-rule failures without aborting a batch

pub mod argument;
pub mod parse;
pub mod batch;

pub use argument::*;
pub use parse::*;
pub use batch::*;
