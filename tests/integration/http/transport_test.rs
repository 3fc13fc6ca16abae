//! HttpTransport against a live server

use crate::common::*;
use crate::{assert_err, assert_ok, assert_script};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use xfpad::client::{
    CommitTransport, HttpTransport, Phase, SharedBuffer, SyncSession, TransportError,
};
use xfpad::shared::{CommitRequest, Operation};

fn request(parent: usize, ops: Vec<Operation>) -> CommitRequest {
    CommitRequest {
        origin: Uuid::new_v4(),
        seq: None,
        parent,
        diff: ops.into_iter().collect(),
    }
}

#[tokio::test]
async fn test_submit_and_fetch_over_http() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    let transport = HttpTransport::new(server.client_config());

    let snapshot = assert_ok!(transport.init("notes").await);
    assert_eq!(snapshot.head, 0);
    assert_eq!(snapshot.content, "");

    let receipt = assert_ok!(
        transport
            .submit("notes", request(0, vec![Operation::insert(0, "hello")]))
            .await
    );
    assert_eq!(receipt.index, 1);

    let fetched = assert_ok!(transport.fetch("notes", 1).await);
    assert_eq!(fetched, Some(receipt.commit));

    let snapshot = assert_ok!(transport.init("notes").await);
    assert_eq!(snapshot.content, "hello");
}

#[tokio::test]
async fn test_long_poll_times_out_with_nothing() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    let transport = HttpTransport::new(server.client_config());
    assert_ok!(transport.init("quiet").await);

    let fetched = assert_ok!(transport.fetch("quiet", 1).await);
    assert_eq!(fetched, None);
}

#[tokio::test]
async fn test_long_poll_wakes_on_submit() {
    let server = TestServer::start(Duration::from_secs(5)).await;
    let transport = Arc::new(HttpTransport::new(server.client_config()));
    assert_ok!(transport.init("notes").await);

    let waiter = {
        let transport = transport.clone();
        tokio::spawn(async move { transport.fetch("notes", 1).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_ok!(
        transport
            .submit("notes", request(0, vec![Operation::insert(0, "ping")]))
            .await
    );
    let fetched = assert_ok!(assert_ok!(waiter.await));
    let commit = fetched.expect("commit delivered before the long-poll expired");
    assert_script!(commit.diff, [Operation::insert(0, "ping")]);
}

#[tokio::test]
async fn test_error_statuses_map_to_transport_errors() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    let transport = HttpTransport::new(server.client_config());
    assert_ok!(transport.init("notes").await);

    assert_err!(
        transport.submit("notes", request(3, vec![])).await,
        TransportError::StaleParent(_)
    );
    assert_err!(
        transport
            .submit("notes", request(0, vec![Operation::delete(0, 4)]))
            .await,
        TransportError::Rejected { status: 422, .. }
    );
    assert_err!(
        transport.fetch("notes", 0).await,
        TransportError::Rejected { status: 400, .. }
    );

    server.state.collab.document("notes").await.close().await;
    assert_err!(transport.fetch("notes", 1).await, TransportError::Closed(_));
}

#[tokio::test]
async fn test_unreachable_server_is_retryable() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    let config = server.client_config();
    drop(server);
    // give the aborted listener a moment to go away
    tokio::time::sleep(Duration::from_millis(50)).await;

    let transport = HttpTransport::new(config);
    let err = transport.init("notes").await.expect_err("server is gone");
    assert!(err.is_retryable(), "unexpected error: {:?}", err);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sessions_converge_over_http() {
    let server = TestServer::start(Duration::from_secs(1)).await;
    let transport = Arc::new(HttpTransport::new(server.client_config()));

    let left = SharedBuffer::default();
    let right = SharedBuffer::default();
    let left_handle = assert_ok!(
        SyncSession::attach("pair", transport.clone(), left.clone(), server.client_config()).await
    );
    let right_handle = assert_ok!(
        SyncSession::attach("pair", transport.clone(), right.clone(), server.client_config()).await
    );

    left.edit(|b| b.type_text("left"));
    assert_ok!(left_handle.notify_edit());
    let (l, r) = (&left_handle, &right_handle);
    eventually("right to see left's text", || async move {
        l.status().head == 1 && r.status().head == 1
    })
    .await;
    assert_eq!(right.text(), "left");

    right.edit(|b| {
        b.move_cursor(4);
        b.type_text(" right");
    });
    assert_ok!(right_handle.notify_edit());

    let (lb, rb) = (&left, &right);
    eventually("both buffers to match", || async move {
        l.status().phase == Phase::Idle
            && r.status().phase == Phase::Idle
            && l.status().head == 2
            && r.status().head == 2
            && lb.text() == rb.text()
    })
    .await;
    assert_eq!(left.text(), "left right");

    let snapshot = assert_ok!(transport.init("pair").await);
    assert_eq!(snapshot.content, "left right");

    assert_ok!(left_handle.detach().await);
    assert_ok!(right_handle.detach().await);
}
