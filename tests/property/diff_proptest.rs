//! Property-based tests for diff and apply

use proptest::prelude::*;
use xfpad::shared::ot::{apply_diff, compute_diff};

fn lcs_len(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table[a.len()][b.len()]
}

proptest! {
    #[test]
    fn test_diff_then_apply_reproduces_target(a in "[abc]{0,16}", b in "[abc]{0,16}") {
        let script = compute_diff(&a, &b);
        prop_assert_eq!(apply_diff(&a, &script).unwrap(), b);
    }

    #[test]
    fn test_diff_handles_multibyte_text(a in "[aé€]{0,10}", b in "[aé€]{0,10}") {
        let script = compute_diff(&a, &b);
        prop_assert!(script.validate(a.chars().count()).is_ok());
        prop_assert_eq!(apply_diff(&a, &script).unwrap(), b);
    }

    #[test]
    fn test_diff_of_identical_text_is_empty(a in "[a-z ]{0,24}") {
        prop_assert!(compute_diff(&a, &a).is_empty());
    }

    #[test]
    fn test_diff_is_minimal(a in "[ab]{0,12}", b in "[ab]{0,12}") {
        let (deleted, inserted) = compute_diff(&a, &b).footprint();
        let common = lcs_len(&a, &b);
        prop_assert_eq!(deleted, a.chars().count() - common);
        prop_assert_eq!(inserted, b.chars().count() - common);
    }
}
