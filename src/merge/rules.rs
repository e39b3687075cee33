//! Built-in merge rules.
//!
//! Collection rules treat a null side as empty, so registering them for
//! `(K, Null)` lets [`Merger::cast_only`] rebuild and cast nested values.
//! A side of any other unsupported kind is rejected with
//! [`MergeError::UnexpectedKind`].

use super::{MergeError, MergeRule, Merger};
use crate::value::{Map, Value, ValueSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Policy selects how collection rules treat the right-hand side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Combine both sides and deduplicate.
    #[default]
    Union,
    /// Keep the left side only.
    Override,
}

/// Sequence union: deduplicated concatenation, every element cast.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceUnion;

/// Sequence override: deduplicated left side, every element cast.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceOverride;

/// Tuple union: as [`SequenceUnion`], packed as a tuple.
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleUnion;

/// Tuple override: as [`SequenceOverride`], packed as a tuple.
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleOverride;

/// Set union.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetUnion;

/// Set override: left members only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOverride;

/// Mapping union: keys on both sides are merged recursively.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingUnion;

/// Mapping override: on a shared key the left value wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingOverride;

/// Scalar pick: always the left value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarPick;

/// Null coalesce: the left value unless it is null, else the right value cast
/// the same way a lone value is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCoalesce;

impl MergeRule for SequenceUnion {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_elements(merger, self.name(), left, right, Policy::Union).map(Value::Sequence)
    }

    fn name(&self) -> &'static str {
        "sequence-union"
    }
}

impl MergeRule for SequenceOverride {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_elements(merger, self.name(), left, right, Policy::Override).map(Value::Sequence)
    }

    fn name(&self) -> &'static str {
        "sequence-override"
    }
}

impl MergeRule for TupleUnion {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_elements(merger, self.name(), left, right, Policy::Union).map(Value::Tuple)
    }

    fn name(&self) -> &'static str {
        "tuple-union"
    }
}

impl MergeRule for TupleOverride {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_elements(merger, self.name(), left, right, Policy::Override).map(Value::Tuple)
    }

    fn name(&self) -> &'static str {
        "tuple-override"
    }
}

impl MergeRule for SetUnion {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_set(merger, self.name(), left, right, Policy::Union)
    }

    fn name(&self) -> &'static str {
        "set-union"
    }
}

impl MergeRule for SetOverride {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_set(merger, self.name(), left, right, Policy::Override)
    }

    fn name(&self) -> &'static str {
        "set-override"
    }
}

impl MergeRule for MappingUnion {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_mapping(merger, self.name(), left, right, Policy::Union)
    }

    fn name(&self) -> &'static str {
        "mapping-union"
    }
}

impl MergeRule for MappingOverride {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        merge_mapping(merger, self.name(), left, right, Policy::Override)
    }

    fn name(&self) -> &'static str {
        "mapping-override"
    }
}

impl MergeRule for ScalarPick {
    fn merge(&self, _merger: &Merger, left: &Value, _right: &Value) -> Result<Value, MergeError> {
        Ok(left.clone())
    }

    fn name(&self) -> &'static str {
        "scalar-pick"
    }
}

impl MergeRule for NullCoalesce {
    fn merge(&self, merger: &Merger, left: &Value, right: &Value) -> Result<Value, MergeError> {
        match (left, right) {
            (Value::Null, Value::Null) => Ok(Value::Null),
            (Value::Null, right) => merger.cast_only(right),
            (left, _) => Ok(left.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "null-coalesce"
    }
}

/// Returns the members of a sequence-like side; null counts as empty.
fn elements<'a>(rule: &'static str, value: &'a Value) -> Result<&'a [Value], MergeError> {
    match value {
        Value::Null => Ok(&[]),
        other => other
            .elements()
            .ok_or_else(|| MergeError::unexpected_kind(rule, other.kind())),
    }
}

/// Returns the entries of a mapping side; null yields `None`.
fn fields<'a>(
    rule: &'static str,
    value: &'a Value,
) -> Result<Option<&'a BTreeMap<String, Value>>, MergeError> {
    match value {
        Value::Null => Ok(None),
        other => other
            .fields()
            .map(Some)
            .ok_or_else(|| MergeError::unexpected_kind(rule, other.kind())),
    }
}

/// Removes structural duplicates, keeping first occurrences.
///
/// Orderable values come first and non-orderable values (containers, complex
/// numbers, NaN) after them; each group keeps its relative order.
pub fn unique<'a>(items: impl IntoIterator<Item = &'a Value>) -> Vec<&'a Value> {
    let mut orderable: Vec<&Value> = Vec::new();
    let mut unordered: Vec<&Value> = Vec::new();
    for item in items {
        // Equal values always share orderability, so one bucket is enough.
        let bucket = if item.is_orderable() {
            &mut orderable
        } else {
            &mut unordered
        };
        if !bucket.contains(&item) {
            bucket.push(item);
        }
    }
    orderable.extend(unordered);
    orderable
}

fn merge_elements(
    merger: &Merger,
    rule: &'static str,
    left: &Value,
    right: &Value,
    policy: Policy,
) -> Result<Vec<Value>, MergeError> {
    let left = elements(rule, left)?;
    let right: &[Value] = match policy {
        Policy::Union => elements(rule, right)?,
        Policy::Override => {
            elements(rule, right)?;
            &[]
        }
    };
    unique(left.iter().chain(right))
        .into_iter()
        .map(|item| merger.cast_only(item))
        .collect()
}

fn merge_set(
    merger: &Merger,
    rule: &'static str,
    left: &Value,
    right: &Value,
    policy: Policy,
) -> Result<Value, MergeError> {
    let left = elements(rule, left)?;
    let right = elements(rule, right)?;
    let left: ValueSet = left.iter().cloned().collect();
    let members = match policy {
        Policy::Union => left.union(&right.iter().cloned().collect()),
        Policy::Override => left,
    };
    members
        .iter()
        .map(|item| merger.cast_only(item))
        .collect::<Result<ValueSet, _>>()
        .map(Value::Set)
}

fn merge_mapping(
    merger: &Merger,
    rule: &'static str,
    left: &Value,
    right: &Value,
    policy: Policy,
) -> Result<Value, MergeError> {
    let empty = BTreeMap::new();
    let left = fields(rule, left)?.unwrap_or(&empty);
    let right = fields(rule, right)?.unwrap_or(&empty);

    let mut out = Map::new();
    for (key, value) in left {
        let merged = match (policy, right.get(key)) {
            (Policy::Union, Some(other)) => merger.merge(value, other)?,
            _ => merger.cast_only(value)?,
        };
        out.fields.insert(key.clone(), merged);
    }
    for (key, value) in right {
        if !left.contains_key(key) {
            out.fields.insert(key.clone(), merger.cast_only(value)?);
        }
    }
    Ok(Value::Mapping(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;
    use pretty_assertions::assert_eq;

    fn seq(items: Vec<Value>) -> Value {
        Value::Sequence(items)
    }

    /// Merger that sends every (K, Null) pair to null-coalesce, so elements
    /// come back from `cast_only` unchanged.
    fn passthrough() -> Merger {
        let mut merger = Merger::new();
        merger.register_rule_between(NullCoalesce, Kind::ALL, Kind::Null);
        merger
    }

    #[test]
    fn test_sequence_union_dedups_in_order() {
        let merger = passthrough();
        let out = SequenceUnion
            .merge(
                &merger,
                &seq(vec![3.into(), 33.into()]),
                &seq(vec![33.into(), 34.into()]),
            )
            .unwrap();
        assert_eq!(out, seq(vec![3.into(), 33.into(), 34.into()]));
    }

    #[test]
    fn test_sequence_override_keeps_unique_left() {
        let merger = passthrough();
        let out = SequenceOverride
            .merge(
                &merger,
                &seq(vec![1.into(), 1.into(), 2.into()]),
                &seq(vec![9.into()]),
            )
            .unwrap();
        assert_eq!(out, seq(vec![1.into(), 2.into()]));
    }

    #[test]
    fn test_sequence_union_null_right_is_empty() {
        let merger = passthrough();
        let out = SequenceUnion
            .merge(&merger, &seq(vec![1.into(), 1.into()]), &Value::Null)
            .unwrap();
        assert_eq!(out, seq(vec![1.into()]));
    }

    #[test]
    fn test_non_orderable_elements_follow_orderable_ones() {
        let merger = passthrough();
        let left = seq(vec![
            Value::complex(1.0, 1.0),
            seq(vec![1.into()]),
            2.into(),
            Value::from(f64::NAN),
        ]);
        let right = seq(vec![
            Value::from(f64::NAN),
            "a".into(),
            Value::complex(1.0, 1.0),
            seq(vec![1.into()]),
        ]);
        let out = SequenceUnion.merge(&merger, &left, &right).unwrap();
        assert_eq!(
            out,
            seq(vec![
                2.into(),
                "a".into(),
                Value::complex(1.0, 1.0),
                seq(vec![1.into()]),
                Value::from(f64::NAN),
            ])
        );
    }

    #[test]
    fn test_tuple_rules_pack_tuples() {
        let merger = passthrough();
        let left = Value::tuple(vec![5.into(), 55.into()]);
        let right = Value::tuple(vec![55.into(), 56.into()]);
        assert_eq!(
            TupleUnion.merge(&merger, &left, &right).unwrap(),
            Value::tuple(vec![5.into(), 55.into(), 56.into()])
        );
        assert_eq!(
            TupleOverride.merge(&merger, &left, &right).unwrap(),
            Value::tuple(vec![5.into(), 55.into()])
        );
    }

    #[test]
    fn test_set_rules() {
        let merger = passthrough();
        let left = Value::set(vec![4.into()]);
        let right = Value::set(vec![44.into()]);
        assert_eq!(
            SetUnion.merge(&merger, &left, &right).unwrap(),
            Value::set(vec![4.into(), 44.into()])
        );
        assert_eq!(
            SetOverride.merge(&merger, &left, &right).unwrap(),
            Value::set(vec![4.into()])
        );
    }

    #[test]
    fn test_collection_rule_rejects_mapping() {
        let merger = passthrough();
        let err = SequenceUnion
            .merge(&merger, &seq(vec![]), &Value::Mapping(Map::new()))
            .unwrap_err();
        assert_eq!(err, MergeError::unexpected_kind("sequence-union", Kind::Mapping));
    }

    #[test]
    fn test_mapping_rule_rejects_scalar() {
        let merger = passthrough();
        let err = MappingUnion
            .merge(&merger, &Value::from(1), &Value::Null)
            .unwrap_err();
        assert_eq!(err, MergeError::unexpected_kind("mapping-union", Kind::Scalar));
    }

    #[test]
    fn test_scalar_pick_returns_left() {
        let merger = Merger::new();
        assert_eq!(
            ScalarPick.merge(&merger, &1.into(), &2.into()).unwrap(),
            Value::from(1)
        );
        assert_eq!(
            ScalarPick.merge(&merger, &"a".into(), &Value::Null).unwrap(),
            Value::from("a")
        );
    }

    #[test]
    fn test_null_coalesce() {
        let merger = passthrough();
        assert_eq!(
            NullCoalesce.merge(&merger, &Value::Null, &"b".into()).unwrap(),
            Value::from("b")
        );
        assert_eq!(
            NullCoalesce.merge(&merger, &"a".into(), &Value::Null).unwrap(),
            Value::from("a")
        );
        assert_eq!(
            NullCoalesce.merge(&merger, &"a".into(), &"b".into()).unwrap(),
            Value::from("a")
        );
        assert_eq!(
            NullCoalesce.merge(&merger, &Value::Null, &Value::Null).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_unique_collapses_equal_unordered_values() {
        let nan = Value::from(f64::NAN);
        let items = [nan.clone(), Value::from(1), nan.clone()];
        let out = unique(items.iter());
        assert_eq!(out, vec![&Value::from(1), &nan]);
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(serde_json::to_string(&Policy::Override).unwrap(), "\"override\"");
        let policy: Policy = serde_json::from_str("\"union\"").unwrap();
        assert_eq!(policy, Policy::Union);
    }
}
