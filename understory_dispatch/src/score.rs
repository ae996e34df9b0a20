// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overload scoring.
//!
//! ## Costs
//!
//! [`cost`] measures how far an actual argument type is from a declared
//! parameter type:
//!
//! - `0` for the same type, or for a scalar and its boxed form.
//! - The number of lineage steps when the parameter is an ancestor.
//! - `None` when the argument cannot be passed at all.
//!
//! ## Comparing candidates
//!
//! [`is_better`] prefers the lower total. On equal totals the challenger wins
//! if it is strictly lower at any position, scanning left to right; a higher
//! cost elsewhere does not count against it. The rule is not symmetric, so
//! the outcome depends on enumeration order, which [`Methods`] keeps fixed:
//! own handlers in declaration order, then inherited levels nearest first.
//! Equal vectors keep the incumbent.
//!
//! [`Methods`]: crate::methods::Methods

use alloc::vec::Vec;

use crate::types::TypeKey;

/// Conversion cost from `actual` to `formal`, or `None` if incompatible.
pub fn cost(actual: TypeKey, formal: TypeKey) -> Option<u32> {
    if actual == formal {
        return Some(0);
    }
    if let (Some(a), Some(f)) = (actual.primitive(), formal.primitive())
        && a == f
    {
        return Some(0);
    }
    if !actual.is_subtype_of(formal) {
        return None;
    }

    let mut distance = 0;
    let mut current = actual;
    loop {
        distance += 1;
        let superclass = current.superclass();
        let interfaces = current.interfaces();
        if superclass == Some(formal) || interfaces.contains(&formal) {
            return Some(distance);
        }
        // Superclass first, then the first interface that still leads to `formal`.
        current = match superclass.filter(|s| s.is_subtype_of(formal)) {
            Some(s) => s,
            None => interfaces.into_iter().find(|i| i.is_subtype_of(formal))?,
        };
    }
}

/// Per-parameter costs of passing `actual` to `formal`.
///
/// `None` if the arities differ or any position is incompatible.
pub fn score(actual: &[TypeKey], formal: &[TypeKey]) -> Option<Vec<u32>> {
    if actual.len() != formal.len() {
        return None;
    }
    actual
        .iter()
        .zip(formal)
        .map(|(&a, &f)| cost(a, f))
        .collect()
}

/// Whether `new` beats `old`.
pub fn is_better(old: &[u32], new: &[u32]) -> bool {
    let old_total: u32 = old.iter().sum();
    let new_total: u32 = new.iter().sum();
    if new_total != old_total {
        return new_total < old_total;
    }
    old.iter().zip(new).any(|(o, n)| n < o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Typed;
    use alloc::boxed::Box;
    use alloc::vec;

    struct Animal;
    impl Typed for Animal {}

    struct Pet;
    impl Typed for Pet {}

    struct Companion;
    impl Typed for Companion {
        fn interfaces() -> Vec<TypeKey> {
            vec![TypeKey::of::<Pet>()]
        }
    }

    struct Dog;
    impl Typed for Dog {
        fn superclass() -> Option<TypeKey> {
            Some(TypeKey::of::<Animal>())
        }
        fn interfaces() -> Vec<TypeKey> {
            vec![TypeKey::of::<Companion>()]
        }
    }

    struct Puppy;
    impl Typed for Puppy {
        fn superclass() -> Option<TypeKey> {
            Some(TypeKey::of::<Dog>())
        }
    }

    fn k<T: Typed>() -> TypeKey {
        TypeKey::of::<T>()
    }

    #[test]
    fn exact_and_boxed_are_free() {
        assert_eq!(cost(k::<Dog>(), k::<Dog>()), Some(0));
        assert_eq!(cost(k::<Box<i32>>(), k::<i32>()), Some(0));
        assert_eq!(cost(k::<i32>(), k::<Box<i32>>()), Some(0));
        assert_eq!(cost(k::<Box<f64>>(), k::<i32>()), None);
    }

    #[test]
    fn superclass_distance_counts_steps() {
        assert_eq!(cost(k::<Dog>(), k::<Animal>()), Some(1));
        assert_eq!(cost(k::<Puppy>(), k::<Dog>()), Some(1));
        assert_eq!(cost(k::<Puppy>(), k::<Animal>()), Some(2));
    }

    #[test]
    fn interfaces_are_walked_after_superclass() {
        assert_eq!(cost(k::<Dog>(), k::<Companion>()), Some(1));
        assert_eq!(cost(k::<Dog>(), k::<Pet>()), Some(2));
        assert_eq!(cost(k::<Puppy>(), k::<Pet>()), Some(3));
    }

    #[test]
    fn unrelated_types_are_incompatible() {
        assert_eq!(cost(k::<Animal>(), k::<Dog>()), None);
        assert_eq!(cost(k::<Dog>(), k::<i32>()), None);
    }

    #[test]
    fn score_requires_matching_arity() {
        assert_eq!(score(&[k::<Dog>()], &[k::<Animal>(), k::<Dog>()]), None);
        assert_eq!(
            score(&[k::<Dog>(), k::<i32>()], &[k::<Animal>(), k::<i32>()]),
            Some(vec![1, 0])
        );
        assert_eq!(score(&[], &[]), Some(vec![]));
    }

    #[test]
    fn lower_total_wins() {
        assert!(is_better(&[1, 1], &[0, 1]));
        assert!(!is_better(&[0, 1], &[1, 1]));
    }

    #[test]
    fn equal_totals_favor_any_strictly_lower_position() {
        assert!(is_better(&[1, 0], &[0, 1]));
        // A higher cost at position 0 does not veto a lower one later.
        assert!(is_better(&[0, 1], &[1, 0]));
        assert!(is_better(&[2, 0, 0], &[1, 1, 0]));
        assert!(is_better(&[1, 1, 0], &[2, 0, 0]));
        assert!(!is_better(&[0, 0], &[0, 1]));
    }

    #[test]
    fn later_candidate_wins_mirrored_tie() {
        // handle(Dog, Animal) enumerated first, handle(Animal, Dog) second,
        // called with (Dog, Dog).
        let args = [k::<Dog>(), k::<Dog>()];
        let first = score(&args, &[k::<Dog>(), k::<Animal>()]).unwrap();
        let second = score(&args, &[k::<Animal>(), k::<Dog>()]).unwrap();
        assert_eq!(first, vec![0, 1]);
        assert_eq!(second, vec![1, 0]);
        assert!(is_better(&first, &second));
    }

    #[test]
    fn equal_vectors_keep_incumbent() {
        assert!(!is_better(&[1, 2], &[1, 2]));
        assert!(!is_better(&[], &[]));
    }
}
