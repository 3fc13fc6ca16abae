//! Property-based tests for rebase

use proptest::prelude::*;
use xfpad::shared::ot::{apply_diff, compute_diff, rebase, SENTINEL};
use xfpad::shared::{EditScript, Operation};

/// Apply `mine`, then `theirs` rebased over it
fn merge(base: &str, mine: &EditScript, theirs: &EditScript) -> String {
    let after_mine = apply_diff(base, mine).unwrap();
    apply_diff(&after_mine, &rebase(mine, theirs).unwrap()).unwrap()
}

/// Whether both scripts insert at some common base position
fn insert_at_same_position(d1: &EditScript, d2: &EditScript) -> bool {
    let positions: Vec<usize> = d1.iter().filter(|op| op.is_insert()).map(|op| op.index()).collect();
    d2.iter().any(|op| op.is_insert() && positions.contains(&op.index()))
}

proptest! {
    #[test]
    fn test_edits_to_separate_regions_converge(
        left in "[ab]{0,8}",
        right in "[ab]{0,8}",
        left_edit in "[ab]{0,8}",
        right_edit in "[ab]{0,8}",
    ) {
        let base = format!("{}|{}", left, right);
        let d1 = compute_diff(&base, &format!("{}|{}", left_edit, right));
        let d2 = compute_diff(&base, &format!("{}|{}", left, right_edit));

        let expected = format!("{}|{}", left_edit, right_edit);
        prop_assert_eq!(merge(&base, &d1, &d2), expected.clone());
        prop_assert_eq!(merge(&base, &d2, &d1), expected);
    }

    #[test]
    fn test_arbitrary_edits_converge(
        base in "[abc]{0,7}",
        a in "[abc]{0,7}",
        b in "[abc]{0,7}",
    ) {
        let d1 = compute_diff(&base, &a);
        let d2 = compute_diff(&base, &b);
        // only the order of same-position inserts depends on who goes first
        if insert_at_same_position(&d1, &d2) {
            return Ok(());
        }
        prop_assert_eq!(merge(&base, &d1, &d2), merge(&base, &d2, &d1));
    }

    #[test]
    fn test_rebase_over_nothing_keeps_text(base in "[ab]{0,10}", edited in "[ab]{0,10}") {
        let d2 = compute_diff(&base, &edited);
        prop_assert_eq!(merge(&base, &EditScript::new(), &d2), edited);
    }

    #[test]
    fn test_rebase_of_nothing_is_nothing(base in "[ab]{0,10}", edited in "[ab]{0,10}") {
        let d1 = compute_diff(&base, &edited);
        prop_assert!(rebase(&d1, &EditScript::new()).unwrap().is_empty());
    }

    #[test]
    fn test_cursor_sentinels_survive_any_edit(
        (base, at) in "[ab]{0,10}".prop_flat_map(|s| {
            let len = s.chars().count();
            (Just(s), 0..=len)
        }),
        edited in "[ab]{0,10}",
    ) {
        let d1 = compute_diff(&base, &edited);
        let cursor: EditScript = vec![Operation::insert(at, "\0\0")].into();

        let merged = merge(&base, &d1, &cursor);
        prop_assert_eq!(merged.chars().filter(|&c| c == SENTINEL).count(), 2);

        let stripped: String = merged.chars().filter(|&c| c != SENTINEL).collect();
        prop_assert_eq!(stripped, edited);
    }
}
