//! Merger: the registry that dispatches merges by kind pair and applies casts.

use super::MergeError;
use crate::value::{Kind, KindSet, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// MergeRule combines two values into a new one.
///
/// The merger is handed in on every call so a rule can recurse into child
/// values through the same dispatch-and-cast pipeline. Rules never own it.
pub trait MergeRule: Send + Sync {
    /// Merges `left` with `right`, producing an uncast result.
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError>;

    /// Short name used in logs and listings.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> MergeRule for F
where
    F: Fn(&Merger, &Value, &Value) -> Result<Value, MergeError> + Send + Sync,
{
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        self(merger, left, right)
    }
}

/// Cast is a post-merge transform bound to a single kind.
pub type Cast = dyn Fn(Value) -> Value + Send + Sync;

/// Merger maps ordered kind pairs to merge rules and kinds to casts.
///
/// Registration needs `&mut Merger`; merging only needs `&Merger`. Once
/// configured, a merger can be shared freely between threads.
#[derive(Default)]
pub struct Merger {
    rules: BTreeMap<(Kind, Kind), Arc<dyn MergeRule>>,
    casts: HashMap<Kind, Arc<Cast>>,
}

impl Merger {
    /// Creates an empty merger with no rules and no casts.
    pub fn new() -> Self {
        Merger::default()
    }

    /// Registers `rule` for every pair in `kinds × kinds`.
    pub fn register_rule<R>(&mut self, rule: R, kinds: impl Into<KindSet>) -> &mut Self
    where
        R: MergeRule + 'static,
    {
        let kinds = kinds.into();
        self.register_rule_between(rule, kinds, kinds)
    }

    /// Registers `rule` for every pair in `left × right`.
    ///
    /// An existing rule for a pair is replaced.
    pub fn register_rule_between<R>(
        &mut self,
        rule: R,
        left: impl Into<KindSet>,
        right: impl Into<KindSet>,
    ) -> &mut Self
    where
        R: MergeRule + 'static,
    {
        let rule: Arc<dyn MergeRule> = Arc::new(rule);
        let (left, right) = (left.into(), right.into());
        for pair in left.product(&right) {
            if let Some(previous) = self.rules.insert(pair, Arc::clone(&rule)) {
                tracing::debug!(
                    left = %pair.0,
                    right = %pair.1,
                    previous = previous.name(),
                    rule = rule.name(),
                    "replaced merge rule"
                );
            }
        }
        tracing::debug!(rule = rule.name(), %left, %right, "registered merge rule");
        self
    }

    /// Registers a cast applied to every merge result of `kind`.
    ///
    /// Fails with [`MergeError::UnknownKind`] unless some registered pair
    /// already mentions `kind`. An existing cast is replaced.
    pub fn register_cast<F>(&mut self, kind: Kind, cast: F) -> Result<&mut Self, MergeError>
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        if !self.knows_kind(kind) {
            return Err(MergeError::UnknownKind(kind));
        }
        if self.casts.insert(kind, Arc::new(cast)).is_some() {
            tracing::debug!(%kind, "replaced cast");
        } else {
            tracing::debug!(%kind, "registered cast");
        }
        Ok(self)
    }

    /// Returns true if any registered pair has `kind` on either side.
    pub fn knows_kind(&self, kind: Kind) -> bool {
        self.rules.keys().any(|(l, r)| *l == kind || *r == kind)
    }

    /// Returns the rule bound to `(left, right)`.
    pub fn resolve_rule(&self, left: Kind, right: Kind) -> Result<&dyn MergeRule, MergeError> {
        self.rules
            .get(&(left, right))
            .map(|rule| rule.as_ref())
            .ok_or(MergeError::NoRuleForPair { left, right })
    }

    /// Returns the cast bound to `kind`, if any.
    pub fn resolve_cast(&self, kind: Kind) -> Option<&Cast> {
        self.casts.get(&kind).map(|cast| cast.as_ref())
    }

    /// Merges `left` with `right`.
    ///
    /// The rule is chosen by the kinds of both values; its result is then
    /// passed through the cast registered for the result's kind.
    pub fn merge(&self, left: &Value, right: &Value) -> Result<Value, MergeError> {
        let (lk, rk) = (left.kind(), right.kind());
        let rule = self.resolve_rule(lk, rk).inspect_err(|err| {
            tracing::debug!(error = %err, "merge dispatch failed");
        })?;
        tracing::trace!(left = %lk, right = %rk, rule = rule.name(), "dispatching merge");
        let raw = rule.merge(self, left, right)?;
        Ok(self.apply_cast(raw))
    }

    /// Routes a lone value through dispatch and casting by merging it with null.
    pub fn cast_only(&self, value: &Value) -> Result<Value, MergeError> {
        self.merge(value, &Value::Null)
    }

    /// Lists the registered bindings ordered by kind pair.
    pub fn rules(&self) -> impl Iterator<Item = (Kind, Kind, &'static str)> + '_ {
        self.rules.iter().map(|((l, r), rule)| (*l, *r, rule.name()))
    }

    /// Lists the kinds that carry a cast, in kind order.
    pub fn cast_kinds(&self) -> Vec<Kind> {
        let mut kinds: Vec<Kind> = self.casts.keys().copied().collect();
        kinds.sort();
        kinds
    }

    fn apply_cast(&self, raw: Value) -> Value {
        match self.resolve_cast(raw.kind()) {
            Some(cast) => cast(raw),
            None => raw,
        }
    }
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merger")
            .field(
                "rules",
                &self
                    .rules()
                    .map(|(l, r, name)| format!("({}, {}) => {}", l, r, name))
                    .collect::<Vec<_>>(),
            )
            .field("casts", &self.cast_kinds())
            .finish()
    }
}
