//! End-to-end merge scenarios against configured mergers.

#[cfg(test)]
mod tests {
    use crate::configuration::{
        Aggregate, DefaultConfiguration, ImmutableConfiguration, OverrideConfiguration,
    };
    use crate::merge::{MappingOverride, MergeError, Merger, NullCoalesce, SequenceUnion};
    use crate::value::{from_yaml, Kind, Map, Value};
    use pretty_assertions::assert_eq;

    fn seq(items: Vec<Value>) -> Value {
        Value::Sequence(items)
    }

    fn yaml(text: &str) -> Value {
        from_yaml(text).unwrap()
    }

    fn defaults() -> Merger {
        Merger::with_defaults()
    }

    fn immutable() -> Merger {
        let config = Aggregate::new()
            .with(DefaultConfiguration)
            .with(ImmutableConfiguration);
        Merger::configured(&config).unwrap()
    }

    /// Equality treats frozen and mutable containers alike, so walk the tree.
    fn assert_deeply_frozen(value: &Value) {
        match value {
            Value::Sequence(_) | Value::Set(_) | Value::Mapping(_) => {
                panic!("mutable {} in {:?}", value.kind(), value)
            }
            Value::Tuple(items) => items.iter().for_each(assert_deeply_frozen),
            Value::FrozenSet(members) => members.iter().for_each(assert_deeply_frozen),
            Value::Frozen(map) => map.iter().for_each(|(_, v)| assert_deeply_frozen(v)),
            _ => {}
        }
    }

    #[test]
    fn test_union_is_idempotent_for_sequences() {
        let merger = defaults();
        let a = seq(vec![1.into(), "x".into(), seq(vec![2.into()]), 1.into()]);
        let b = seq(vec![seq(vec![2.into()]), 3.into(), "x".into()]);
        let once = merger.merge(&a, &b).unwrap();
        let twice = merger.merge(&once, &b).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            seq(vec![1.into(), "x".into(), 3.into(), seq(vec![2.into()])])
        );
    }

    #[test]
    fn test_union_is_idempotent_for_sets() {
        let merger = defaults();
        let a = Value::set(vec![1.into(), 2.into()]);
        let b = Value::set(vec![2.into(), 3.into()]);
        let once = merger.merge(&a, &b).unwrap();
        let twice = merger.merge(&once, &b).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, Value::set(vec![1.into(), 2.into(), 3.into()]));
    }

    #[test]
    fn test_null_coalesce_totality() {
        let merger = defaults();
        assert_eq!(merger.merge(&Value::Null, &5.into()).unwrap(), Value::from(5));
        assert_eq!(merger.merge(&5.into(), &Value::Null).unwrap(), Value::from(5));
        assert_eq!(merger.merge(&Value::Null, &Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_scalar_merge_is_not_commutative() {
        let merger = defaults();
        assert_eq!(merger.merge(&1.into(), &2.into()).unwrap(), Value::from(1));
        assert_eq!(merger.merge(&2.into(), &1.into()).unwrap(), Value::from(2));
        assert_eq!(
            merger
                .merge(&Value::complex(1.0, 2.0), &Value::from(true))
                .unwrap(),
            Value::complex(1.0, 2.0)
        );
    }

    #[test]
    fn test_mapping_union_merges_recursively() {
        let merger = defaults();
        let left = yaml("{a: 1, c: [3, 33]}");
        let right = yaml("{b: 22, c: [33, 34]}");
        let out = merger.merge(&left, &right).unwrap();
        assert_eq!(out, yaml("{a: 1, b: 22, c: [3, 33, 34]}"));
    }

    #[test]
    fn test_mapping_override_discards_right_on_conflict() {
        let merger = Merger::configured(&OverrideConfiguration).unwrap();
        let out = merger.merge(&yaml("{a: 1}"), &yaml("{a: 2}")).unwrap();
        assert_eq!(out, yaml("{a: 1}"));
    }

    #[test]
    fn test_mapping_override_keeps_right_only_keys() {
        let mut merger = defaults();
        merger.register_rule_between(MappingOverride, Kind::Mapping, [Kind::Mapping, Kind::Null]);
        let out = merger
            .merge(&yaml("{a: [1], b: 2}"), &yaml("{a: [9], c: 3}"))
            .unwrap();
        assert_eq!(out, yaml("{a: [1], b: 2, c: 3}"));
    }

    #[test]
    fn test_missing_rule_fails_fast() {
        let merger = defaults();
        let left = seq(vec![1.into()]);
        let right = yaml("{x: 1}");
        assert_eq!(
            merger.merge(&left, &right),
            Err(MergeError::NoRuleForPair {
                left: Kind::Sequence,
                right: Kind::Mapping,
            })
        );
    }

    #[test]
    fn test_missing_rule_deep_in_recursion_aborts_whole_merge() {
        let merger = defaults();
        let left = yaml("{ok: 1, nested: {inner: [1, 2]}}");
        let right = yaml("{ok: 2, nested: {inner: {y: 1}}}");
        assert_eq!(
            merger.merge(&left, &right).unwrap_err(),
            MergeError::no_rule_for_pair(Kind::Sequence, Kind::Mapping)
        );
    }

    #[test]
    fn test_missing_rule_for_lone_element_cast() {
        // Only (Sequence, Sequence) is known, so casting an element fails.
        let mut merger = Merger::new();
        merger.register_rule(SequenceUnion, Kind::Sequence);
        assert_eq!(
            merger.merge(&seq(vec![1.into()]), &seq(vec![])).unwrap_err(),
            MergeError::no_rule_for_pair(Kind::Scalar, Kind::Null)
        );
    }

    #[test]
    fn test_cast_ordering_invariant() {
        let mut merger = Merger::new();
        assert_eq!(
            merger.register_cast(Kind::Set, |v| v).err(),
            Some(MergeError::UnknownKind(Kind::Set))
        );
        merger.register_rule_between(NullCoalesce, Kind::Set, Kind::Null);
        assert!(merger.register_cast(Kind::Set, |v| v).is_ok());
    }

    #[test]
    fn test_mixed_document_merge() {
        let merger = defaults();
        let mut a = Map::new();
        a.set("a", 1);
        a.set("b", 2);
        a.set("c", seq(vec![3.into(), 33.into()]));
        a.set("e", Value::set(vec![4.into()]));
        a.set("f", Value::tuple(vec![5.into(), 55.into()]));
        let mut b = Map::new();
        b.set("b", 22);
        b.set("c", seq(vec![33.into(), 34.into()]));
        b.set("d", Value::Null);
        b.set("e", Value::set(vec![44.into()]));
        b.set("f", Value::tuple(vec![55.into(), 56.into()]));
        let (a, b) = (Value::Mapping(a), Value::Mapping(b));

        let m1 = merger.merge(&a, &b).unwrap();
        assert_eq!(m1.get("a"), Some(&Value::from(1)));
        assert_eq!(m1.get("b"), Some(&Value::from(2)));
        assert_eq!(m1.get("c"), Some(&seq(vec![3.into(), 33.into(), 34.into()])));
        assert_eq!(m1.get("d"), Some(&Value::Null));
        assert_eq!(m1.get("e"), Some(&Value::set(vec![4.into(), 44.into()])));
        assert_eq!(
            m1.get("f"),
            Some(&Value::tuple(vec![5.into(), 55.into(), 56.into()]))
        );

        let m2 = merger.merge(&b, &a).unwrap();
        assert_eq!(m2.get("a"), Some(&Value::from(1)));
        assert_eq!(m2.get("b"), Some(&Value::from(22)));
        assert_eq!(m2.get("c"), Some(&seq(vec![33.into(), 34.into(), 3.into()])));
        assert_eq!(m2.get("d"), Some(&Value::Null));
        assert_eq!(m2.get("e"), Some(&Value::set(vec![4.into(), 44.into()])));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let merger = defaults();
        let left = yaml("{a: [1, 1], b: {c: 2}}");
        let right = yaml("{a: [2], b: {d: 3}}");
        let (left_before, right_before) = (left.clone(), right.clone());
        merger.merge(&left, &right).unwrap();
        assert_eq!(left, left_before);
        assert_eq!(right, right_before);
    }

    #[test]
    fn test_immutable_result_rejects_mutation() {
        let merger = immutable();
        let out = merger.merge(&yaml("{a: [1]}"), &yaml("{a: [2]}")).unwrap();
        let Value::Frozen(mut frozen) = out else {
            panic!("expected a frozen mapping");
        };
        assert_eq!(frozen.get("a"), Some(&Value::tuple(vec![1.into(), 2.into()])));
        assert_eq!(frozen.insert("b", Value::Null), Err(MergeError::Immutable));
        assert_eq!(frozen.len(), 1);
    }

    #[test]
    fn test_frozen_results_merge_again() {
        let merger = immutable();
        let first = merger.merge(&yaml("{a: 1}"), &yaml("{b: 2}")).unwrap();
        let second = merger.merge(&first, &yaml("{a: 9, c: 3}")).unwrap();
        assert!(second.is_frozen());
        assert_eq!(second, yaml("{a: 1, b: 2, c: 3}"));
    }

    #[test]
    fn test_null_left_side_is_cast_like_null_right_side() {
        let merger = immutable();
        let doc = yaml("{a: [1], b: {c: [2]}}");
        let from_left = merger.merge(&doc, &Value::Null).unwrap();
        let from_right = merger.merge(&Value::Null, &doc).unwrap();
        assert_eq!(from_right, from_left);
        assert_deeply_frozen(&from_left);
        assert_deeply_frozen(&from_right);
    }

    #[test]
    fn test_null_field_takes_cast_right_value() {
        let merger = immutable();
        let out = merger.merge(&yaml("{k: ~}"), &yaml("{k: [[1]]}")).unwrap();
        assert_eq!(
            out.get("k"),
            Some(&Value::tuple(vec![Value::tuple(vec![1.into()])]))
        );
        assert_deeply_frozen(&out);
    }

    #[test]
    fn test_immutable_sets_are_frozen() {
        let merger = immutable();
        let out = merger
            .merge(&Value::set(vec![1.into(), 2.into()]), &Value::set(vec![2.into(), 3.into()]))
            .unwrap();
        assert_eq!(out.kind(), Kind::Set);
        assert_eq!(out, Value::set(vec![1.into(), 2.into(), 3.into()]));
        let Value::FrozenSet(mut frozen) = out.clone() else {
            panic!("expected a frozen set");
        };
        assert_eq!(frozen.insert(4.into()), Err(MergeError::Immutable));
        assert_eq!(frozen.len(), 3);

        let again = merger.merge(&out, &Value::set(vec![4.into()])).unwrap();
        assert!(again.is_frozen());
        assert_eq!(again, Value::set(vec![1.into(), 2.into(), 3.into(), 4.into()]));

        let mut doc = Map::new();
        doc.set("tags", Value::set(vec![seq(vec!["x".into()])]));
        let nested = merger.merge(&Value::Mapping(doc), &Value::Null).unwrap();
        assert_deeply_frozen(&nested);
    }

    #[test]
    fn test_shared_merger_across_threads() {
        let merger = defaults();
        let left = yaml("{a: [1, 2], b: {x: 1}}");
        let right = yaml("{a: [2, 3], b: {y: 2}}");
        let expected = yaml("{a: [1, 2, 3], b: {x: 1, y: 2}}");
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| merger.merge(&left, &right)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), expected);
            }
        });
    }
}
