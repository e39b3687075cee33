//! Configuration module - Bootstrapping of mergers.
//!
//! A [`Configuration`] registers rules and casts on a [`Merger`]. Rule
//! configurations must run before cast configurations, since a cast can only
//! be registered for a kind some rule already mentions.

mod profile;

pub use profile::*;

use crate::merge::{
    MappingOverride, MappingUnion, MergeError, Merger, NullCoalesce, Policy, ScalarPick,
    SequenceOverride, SequenceUnion, SetOverride, SetUnion, TupleOverride, TupleUnion,
};
use crate::value::{Kind, KindSet, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Configuration sets up rules and casts on a merger.
pub trait Configuration {
    fn configure(&self, merger: &mut Merger) -> Result<(), MergeError>;
}

/// PolicyConfiguration installs the built-in rule table with one policy per
/// collection kind.
///
/// Each collection rule is bound to `(K, K)` and `(K, Null)`. Scalars pick
/// the left side, and any pair with a null side that is not a collection on
/// the left coalesces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfiguration {
    pub sequence: Policy,
    pub tuple: Policy,
    pub set: Policy,
    pub mapping: Policy,
}

impl PolicyConfiguration {
    /// Uses the same policy for every collection kind.
    pub fn uniform(policy: Policy) -> Self {
        PolicyConfiguration {
            sequence: policy,
            tuple: policy,
            set: policy,
            mapping: policy,
        }
    }

    /// Registers the rule table. Rule registration cannot fail.
    pub fn install(&self, merger: &mut Merger) {
        let with_null = |kind: Kind| KindSet::from([kind, Kind::Null]);

        match self.sequence {
            Policy::Union => merger.register_rule_between(
                SequenceUnion,
                Kind::Sequence,
                with_null(Kind::Sequence),
            ),
            Policy::Override => merger.register_rule_between(
                SequenceOverride,
                Kind::Sequence,
                with_null(Kind::Sequence),
            ),
        };
        match self.tuple {
            Policy::Union => {
                merger.register_rule_between(TupleUnion, Kind::Tuple, with_null(Kind::Tuple))
            }
            Policy::Override => {
                merger.register_rule_between(TupleOverride, Kind::Tuple, with_null(Kind::Tuple))
            }
        };
        match self.set {
            Policy::Union => {
                merger.register_rule_between(SetUnion, Kind::Set, with_null(Kind::Set))
            }
            Policy::Override => {
                merger.register_rule_between(SetOverride, Kind::Set, with_null(Kind::Set))
            }
        };
        match self.mapping {
            Policy::Union => {
                merger.register_rule_between(MappingUnion, Kind::Mapping, with_null(Kind::Mapping))
            }
            Policy::Override => merger.register_rule_between(
                MappingOverride,
                Kind::Mapping,
                with_null(Kind::Mapping),
            ),
        };

        merger
            .register_rule(ScalarPick, Kind::Scalar)
            .register_rule_between(NullCoalesce, Kind::Null, KindSet::all())
            .register_rule_between(NullCoalesce, Kind::Scalar, Kind::Null);
    }
}

impl Configuration for PolicyConfiguration {
    fn configure(&self, merger: &mut Merger) -> Result<(), MergeError> {
        self.install(merger);
        Ok(())
    }
}

/// DefaultConfiguration installs union rules for every collection kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfiguration;

impl Configuration for DefaultConfiguration {
    fn configure(&self, merger: &mut Merger) -> Result<(), MergeError> {
        PolicyConfiguration::uniform(Policy::Union).configure(merger)
    }
}

/// OverrideConfiguration installs left-wins rules for every collection kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideConfiguration;

impl Configuration for OverrideConfiguration {
    fn configure(&self, merger: &mut Merger) -> Result<(), MergeError> {
        PolicyConfiguration::uniform(Policy::Override).configure(merger)
    }
}

/// ImmutableConfiguration casts merged sequences to tuples, merged sets to
/// [`crate::value::FrozenSet`] and merged mappings to
/// [`crate::value::ImmutableMap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmutableConfiguration;

impl Configuration for ImmutableConfiguration {
    fn configure(&self, merger: &mut Merger) -> Result<(), MergeError> {
        merger
            .register_cast(Kind::Sequence, freeze_sequence)?
            .register_cast(Kind::Set, freeze_set)?
            .register_cast(Kind::Mapping, freeze_mapping)?;
        Ok(())
    }
}

fn freeze_sequence(value: Value) -> Value {
    match value {
        Value::Sequence(items) => Value::Tuple(items),
        other => other,
    }
}

fn freeze_set(value: Value) -> Value {
    match value {
        Value::Set(members) => Value::FrozenSet(members.into()),
        other => other,
    }
}

fn freeze_mapping(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Frozen(map.into()),
        other => other,
    }
}

/// Aggregate runs several configurations in order.
#[derive(Default)]
pub struct Aggregate {
    inner: Vec<Box<dyn Configuration>>,
}

impl Aggregate {
    pub fn new() -> Self {
        Aggregate::default()
    }

    /// Appends a configuration.
    pub fn with(mut self, configuration: impl Configuration + 'static) -> Self {
        self.inner.push(Box::new(configuration));
        self
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Configuration for Aggregate {
    fn configure(&self, merger: &mut Merger) -> Result<(), MergeError> {
        for configuration in &self.inner {
            configuration.configure(merger)?;
        }
        Ok(())
    }
}

impl Merger {
    /// Creates a merger configured with [`DefaultConfiguration`].
    pub fn with_defaults() -> Self {
        let mut merger = Merger::new();
        PolicyConfiguration::uniform(Policy::Union).install(&mut merger);
        merger
    }

    /// Creates a merger and applies `configuration` to it.
    pub fn configured(configuration: &dyn Configuration) -> Result<Self, MergeError> {
        let mut merger = Merger::new();
        configuration.configure(&mut merger)?;
        Ok(merger)
    }
}

static DEFAULT_MERGER: Lazy<Merger> = Lazy::new(Merger::with_defaults);

/// Returns the shared merger built with [`DefaultConfiguration`].
pub fn merger() -> &'static Merger {
    &DEFAULT_MERGER
}

/// Merges two values with the shared default merger.
pub fn merge(left: &Value, right: &Value) -> Result<Value, MergeError> {
    merger().merge(left, right)
}
