//! Property-based tests for section resolution.

use proptest::prelude::*;

use crate::section::additional::AdditionalInfo;
use crate::section::kind::{SectionKind, resolve};
use procura_shared::types::RequestNumber;

/// Pairs named by one of the rule groups.
const RULE_PAIRS: [(i32, i32); 6] = [(6, 2), (8, 4), (2, 1), (2, 3), (4, 3), (3, 4)];

fn is_listed(type_id: i32, sub_type_id: Option<i32>) -> bool {
    matches!(type_id, 5 | 7)
        || sub_type_id.is_some_and(|sub| {
            RULE_PAIRS.contains(&(type_id, sub)) || (type_id, sub) == (3, 5)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The resolver is deterministic.
    #[test]
    fn prop_resolve_deterministic(
        type_id in proptest::option::of(-5i32..20),
        sub_type_id in proptest::option::of(-5i32..20)
    ) {
        prop_assert_eq!(resolve(type_id, sub_type_id), resolve(type_id, sub_type_id));
    }

    /// Any pair outside the rule groups resolves to None.
    #[test]
    fn prop_unlisted_pairs_are_none(
        type_id in -5i32..20,
        sub_type_id in proptest::option::of(-5i32..20)
    ) {
        prop_assume!(!is_listed(type_id, sub_type_id));
        prop_assert_eq!(resolve(Some(type_id), sub_type_id), SectionKind::None);
    }

    /// Subscription types ignore the sub-type entirely.
    #[test]
    fn prop_subscription_ignores_sub_type(
        type_id in prop_oneof![Just(5i32), Just(7i32)],
        sub_type_id in proptest::option::of(any::<i32>())
    ) {
        prop_assert_eq!(resolve(Some(type_id), sub_type_id), SectionKind::Subscription);
    }

    /// A missing type always yields None.
    #[test]
    fn prop_missing_type_is_none(sub_type_id in proptest::option::of(any::<i32>())) {
        prop_assert_eq!(resolve(None, sub_type_id), SectionKind::None);
    }

    /// An empty section of the resolved kind reports that kind back, and its
    /// payload only ever carries the request number.
    #[test]
    fn prop_empty_section_matches_kind(
        type_id in proptest::option::of(0i32..10),
        sub_type_id in proptest::option::of(0i32..10)
    ) {
        let kind = resolve(type_id, sub_type_id);
        match AdditionalInfo::empty(kind) {
            None => prop_assert_eq!(kind, SectionKind::None),
            Some(info) => {
                prop_assert_eq!(info.kind(), kind);
                let payload = info.to_payload(&RequestNumber::new("PR-X"));
                prop_assert_eq!(payload.as_object().map(serde_json::Map::len), Some(1));
            }
        }
    }
}
