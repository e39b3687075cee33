//! Core value types and operations.

use super::{FrozenSet, ImmutableMap, Kind, ValueSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value is a node of an arbitrarily nested data tree.
///
/// Tuples, sets, complex numbers and frozen containers are never produced by
/// deserialization; they only come from code or from merge casts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Scalar(Scalar),
    Sequence(Vec<Value>),
    #[serde(skip_deserializing)]
    Tuple(Vec<Value>),
    #[serde(skip_deserializing)]
    Set(ValueSet),
    /// Read-only representation of the Set kind.
    #[serde(skip_deserializing)]
    FrozenSet(FrozenSet),
    Mapping(Map),
    /// Read-only representation of the Mapping kind.
    #[serde(skip_deserializing)]
    Frozen(ImmutableMap),
}

/// Scalar is a non-container leaf value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    #[serde(skip_deserializing)]
    Complex(Complex),
}

/// Complex is a complex number. It has no total order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

/// Map is a mutable mapping from string keys to values, iterated in key order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl Value {
    /// Returns the kind this value is dispatched on.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Scalar(_) => Kind::Scalar,
            Value::Sequence(_) => Kind::Sequence,
            Value::Tuple(_) => Kind::Tuple,
            Value::Set(_) | Value::FrozenSet(_) => Kind::Set,
            Value::Mapping(_) | Value::Frozen(_) => Kind::Mapping,
        }
    }

    /// Creates a tuple value.
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// Creates a set value; duplicates collapse.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    /// Creates a complex scalar.
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Scalar(Scalar::Complex(Complex { re, im }))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, Value::Frozen(_) | Value::FrozenSet(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Returns the members of a sequence, tuple or set.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) | Value::Tuple(items) => Some(items),
            Value::Set(set) => Some(set.as_slice()),
            Value::FrozenSet(set) => Some(set.as_slice()),
            _ => None,
        }
    }

    /// Returns the members of a set in either representation.
    pub fn members(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            Value::FrozenSet(set) => Some(set.members()),
            _ => None,
        }
    }

    /// Returns the entries of a mapping in either representation.
    pub fn fields(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(&m.fields),
            Value::Frozen(m) => Some(m.fields()),
            _ => None,
        }
    }

    /// Looks up a key in a mapping value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields().and_then(|f| f.get(key))
    }

    /// Reports whether this value takes part in the orderable prefix when
    /// collections are deduplicated.
    ///
    /// Null, booleans, integers, strings and non-NaN floats are orderable.
    /// Complex numbers, NaN and all containers are not.
    pub fn is_orderable(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Scalar(s) => s.is_orderable(),
            _ => false,
        }
    }
}

impl Scalar {
    pub fn is_orderable(&self) -> bool {
        match self {
            Scalar::Float(f) => !f.is_nan(),
            Scalar::Complex(_) => false,
            _ => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (a, b) if a.kind() == Kind::Set && b.kind() == Kind::Set => {
                a.members() == b.members()
            }
            (a, b) if a.kind() == Kind::Mapping && b.kind() == Kind::Mapping => {
                a.fields() == b.fields()
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => float_eq(*a, *b),
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Complex(a), Scalar::Complex(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        float_eq(self.re, other.re) && float_eq(self.im, other.im)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Map {}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Map {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Mapping(m)
    }
}

impl From<ValueSet> for Value {
    fn from(s: ValueSet) -> Self {
        Value::Set(s)
    }
}

impl From<ImmutableMap> for Value {
    fn from(m: ImmutableMap) -> Self {
        Value::Frozen(m)
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}
