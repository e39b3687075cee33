//! # Comber
//!
//! Deep merging of nested, configuration-like values.
//!
//! Two values are combined by a rule chosen from the *kinds* of both sides
//! (mapping, sequence, tuple, set, scalar or null). Rules recurse through the
//! same dispatcher, and a per-kind cast can reshape each merged result, for
//! example into an immutable mapping. Neither input is modified.
//!
//! ## Modules
//!
//! - [`value`] - The value tree, kinds and the read-only mapping view
//! - [`merge`] - The [`Merger`] registry and the built-in merge rules
//! - [`configuration`] - Bootstrapping of mergers and file-driven profiles
//!
//! ```
//! use comber::value::from_yaml;
//!
//! let defaults = from_yaml("{a: 1, c: [3, 33]}").unwrap();
//! let overrides = from_yaml("{b: 22, c: [33, 34]}").unwrap();
//! let merged = comber::merge(&defaults, &overrides).unwrap();
//! assert_eq!(merged, from_yaml("{a: 1, b: 22, c: [3, 33, 34]}").unwrap());
//! ```

pub mod configuration;
pub mod merge;
pub mod value;

pub use configuration::{
    merge, merger, Aggregate, Configuration, DefaultConfiguration, ImmutableConfiguration,
    MergeProfile, OverrideConfiguration, PolicyConfiguration, ProfileError,
};
pub use merge::{MergeError, MergeRule, Merger, Policy};
pub use value::{FrozenSet, ImmutableMap, Kind, KindSet, Map, Value};
