//! Value module - In-memory representation of mergeable data trees.
//!
//! Values are built from mappings, sequences, tuples, sets, scalars and null.
//! Each value reports a [`Kind`], which is what the merge registry dispatches on.

mod immutable;
mod kind;
mod set;
mod value;

pub use immutable::*;
pub use kind::*;
pub use set::*;
pub use value::*;
