//! Structural-equality value sets.

use super::Value;
use serde::Serialize;

/// ValueSet holds values that are unique under structural equality.
///
/// Members keep insertion order, so iteration is deterministic even for
/// values that have no total order. Equality ignores order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValueSet {
    members: Vec<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        ValueSet {
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|m| m == value)
    }

    /// Inserts a value. Returns false if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.members.push(value);
        true
    }

    /// Returns the union; members of `self` come first.
    pub fn union(&self, other: &ValueSet) -> ValueSet {
        let mut out = self.clone();
        for member in &other.members {
            out.insert(member.clone());
        }
        out
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.members.iter()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.members.iter().all(|m| other.contains(m))
    }
}

impl Eq for ValueSet {}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let set: ValueSet = vec![Value::from(1), Value::from(2), Value::from(1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), &[Value::from(1), Value::from(2)]);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: ValueSet = vec![Value::from(1), Value::from(2)].into_iter().collect();
        let b: ValueSet = vec![Value::from(2), Value::from(1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_union_keeps_left_first() {
        let a: ValueSet = vec![Value::from(4)].into_iter().collect();
        let b: ValueSet = vec![Value::from(44), Value::from(4)].into_iter().collect();
        let u = a.union(&b);
        assert_eq!(u.as_slice(), &[Value::from(4), Value::from(44)]);
    }

    #[test]
    fn test_holds_unhashable_members() {
        let mut set = ValueSet::new();
        assert!(set.insert(Value::Sequence(vec![1.into()])));
        assert!(!set.insert(Value::Sequence(vec![1.into()])));
        assert!(set.insert(Value::from(f64::NAN)));
        assert!(!set.insert(Value::from(f64::NAN)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Value::from(f64::NAN)));
    }
}
