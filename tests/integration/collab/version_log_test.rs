//! Version log tests through the document registry

use crate::common::*;
use crate::{assert_err, assert_ok, assert_script};
use pretty_assertions::assert_eq;
use std::time::Duration;
use uuid::Uuid;
use xfpad::backend::collab::{CollabState, LogError};
use xfpad::shared::ot::{apply_diff, compute_diff};
use xfpad::shared::{CommitRequest, Operation};

fn request(parent: usize, base: &str, edited: &str) -> CommitRequest {
    CommitRequest {
        origin: Uuid::new_v4(),
        seq: None,
        parent,
        diff: compute_diff(base, edited),
    }
}

#[tokio::test]
async fn test_concurrent_edits_on_same_parent_merge() {
    let collab = CollabState::new();
    seed(&collab, "doc", "ab").await;

    // both writers saw "ab" at commit 1
    assert_ok!(collab.submit_commit("doc", request(1, "ab", "ad")).await);
    let receipt = assert_ok!(collab.submit_commit("doc", request(1, "ab", "cb")).await);
    assert_eq!(receipt.index, 3);
    assert_eq!(receipt.commit.parent, Some(2));

    let snapshot = assert_ok!(collab.init_document("doc").await);
    assert_eq!(snapshot, xfpad::shared::DocumentSnapshot {
        head: 3,
        content: "cd".to_string(),
    });
}

#[tokio::test]
async fn test_history_replays_to_content() {
    let collab = CollabState::new();
    seed(&collab, "doc", "the quick brown fox").await;

    // several writers, each working from the seed only
    let edits = [
        "the quick brown fox jumps",
        "a quick brown fox",
        "the quick red fox",
        "the slow brown fox",
    ];
    for edited in edits {
        assert_ok!(
            collab
                .submit_commit("doc", request(1, "the quick brown fox", edited))
                .await
        );
    }

    let snapshot = assert_ok!(collab.init_document("doc").await);
    let mut replayed = String::new();
    for index in 1..=snapshot.head {
        let commit = assert_ok!(collab.fetch_commit("doc", index).await);
        assert_eq!(commit.parent, Some(index - 1));
        replayed = assert_ok!(apply_diff(&replayed, &commit.diff));
    }
    assert_eq!(replayed, snapshot.content);
}

#[tokio::test]
async fn test_fetch_waits_for_next_commit() {
    let collab = CollabState::new();
    seed(&collab, "doc", "x").await;

    let waiter = {
        let collab = collab.clone();
        tokio::spawn(async move { collab.fetch_commit("doc", 2).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    assert_ok!(collab.submit_commit("doc", request(1, "x", "xy")).await);
    let commit = assert_ok!(assert_ok!(waiter.await));
    assert_script!(commit.diff, [Operation::insert(1, "y")]);
}

#[tokio::test]
async fn test_stale_and_malformed_submissions_leave_log_untouched() {
    let collab = CollabState::new();
    seed(&collab, "doc", "abc").await;

    assert_err!(
        collab.submit_commit("doc", request(7, "abc", "abcd")).await,
        LogError::StaleParent { parent: 7, head: 1 }
    );

    let past_end = CommitRequest {
        origin: Uuid::new_v4(),
        seq: None,
        parent: 1,
        diff: vec![Operation::delete(2, 5)].into(),
    };
    assert_err!(collab.submit_commit("doc", past_end).await, LogError::Malformed(_));

    let metadata = collab.metadata("doc").await.expect("document exists");
    assert_eq!(metadata.head, 1);
    assert_eq!(metadata.length, 3);
}

#[tokio::test]
async fn test_registry_lists_and_closes_documents() {
    let collab = CollabState::new();
    seed(&collab, "beta", "b").await;
    seed(&collab, "alpha", "a").await;

    let ids: Vec<String> = collab
        .list_documents()
        .await
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["alpha", "beta"]);

    let waiter = {
        let collab = collab.clone();
        tokio::spawn(async move { collab.fetch_commit("alpha", 2).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(collab.close_document("alpha").await);
    assert_err!(assert_ok!(waiter.await), LogError::DocumentClosed { .. });
    assert!(!collab.close_document("alpha").await);
    assert!(collab.metadata("alpha").await.is_none());

    // the id starts over
    let snapshot = assert_ok!(collab.init_document("alpha").await);
    assert_eq!(snapshot.head, 0);
    assert_eq!(snapshot.content, "");
}

#[tokio::test]
async fn test_repeated_submission_is_appended_once() {
    let collab = CollabState::new();
    let origin = Uuid::new_v4();
    let request = CommitRequest {
        origin,
        seq: Some(3),
        parent: 0,
        diff: vec![Operation::insert(0, "once")].into(),
    };

    let first = assert_ok!(collab.submit_commit("doc", request.clone()).await);
    let second = assert_ok!(collab.submit_commit("doc", request).await);
    assert_eq!(first, second);

    let snapshot = assert_ok!(collab.init_document("doc").await);
    assert_eq!(snapshot.head, 1);
    assert_eq!(snapshot.content, "once");
}
