//! Merge module - Kind-dispatched merging of value trees.
//!
//! A [`Merger`] binds ordered pairs of value kinds to [`MergeRule`]s and
//! single kinds to casts. Rules call back into the merger to merge children.

mod error;
mod manager;
mod rules;

#[cfg(test)]
mod merge_test;

pub use error::*;
pub use manager::*;
pub use rules::*;
