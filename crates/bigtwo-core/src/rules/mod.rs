//! Stateless Big Two rules: what a group of cards is, and whether it beats
//! what is already on the table.

mod classify;
mod compare;

pub use classify::{ClassifyError, classify};
pub use compare::beats;
