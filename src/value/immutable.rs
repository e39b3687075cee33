//! Read-only containers produced by immutability casts.

use super::{Map, Value, ValueSet};
use crate::merge::MergeError;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// ImmutableMap is a shared, read-only view over string-keyed entries.
///
/// Cloning is cheap. Every mutating method fails with [`MergeError::Immutable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImmutableMap {
    inner: Arc<BTreeMap<String, Value>>,
}

impl ImmutableMap {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        ImmutableMap {
            inner: Arc::new(fields),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.inner.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.inner.iter()
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.inner
    }

    pub fn insert(
        &mut self,
        _key: impl Into<String>,
        _value: Value,
    ) -> Result<Option<Value>, MergeError> {
        Err(MergeError::Immutable)
    }

    pub fn remove(&mut self, _key: &str) -> Result<Option<Value>, MergeError> {
        Err(MergeError::Immutable)
    }

    pub fn clear(&mut self) -> Result<(), MergeError> {
        Err(MergeError::Immutable)
    }
}

impl From<Map> for ImmutableMap {
    fn from(map: Map) -> Self {
        ImmutableMap::new(map.fields)
    }
}

impl<'a> IntoIterator for &'a ImmutableMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl Serialize for ImmutableMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.inner.iter())
    }
}

/// FrozenSet is a shared, read-only set of values.
///
/// It is the Set kind's counterpart of [`ImmutableMap`]: reads mirror
/// [`ValueSet`] and every mutating method fails with [`MergeError::Immutable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrozenSet {
    inner: Arc<ValueSet>,
}

impl FrozenSet {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.inner.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        self.inner.as_slice()
    }

    pub fn members(&self) -> &ValueSet {
        &self.inner
    }

    pub fn insert(&mut self, _value: Value) -> Result<bool, MergeError> {
        Err(MergeError::Immutable)
    }

    pub fn clear(&mut self) -> Result<(), MergeError> {
        Err(MergeError::Immutable)
    }
}

impl From<ValueSet> for FrozenSet {
    fn from(set: ValueSet) -> Self {
        FrozenSet {
            inner: Arc::new(set),
        }
    }
}

impl<'a> IntoIterator for &'a FrozenSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl Serialize for FrozenSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.inner.iter())
    }
}
