//! Many clients editing one document converge on the log's content

use crate::assert_ok;
use crate::common::*;
use std::sync::Arc;
use xfpad::backend::collab::CollabState;
use xfpad::client::{LocalTransport, Phase, SharedBuffer, SyncHandle, SyncSession};

const CLIENTS: usize = 10;
const ROUNDS: usize = 5;

struct Client {
    buffer: SharedBuffer,
    handle: SyncHandle,
}

async fn attach_clients(collab: &CollabState, doc_id: &str, count: usize) -> Vec<Client> {
    let transport = Arc::new(LocalTransport::new(collab.clone()));
    let mut clients = Vec::with_capacity(count);
    for _ in 0..count {
        let buffer = SharedBuffer::default();
        let handle = assert_ok!(
            SyncSession::attach(doc_id, transport.clone(), buffer.clone(), fast_config()).await
        );
        clients.push(Client { buffer, handle });
    }
    clients
}

/// Wait until every client shows the log's content and has nothing in flight
async fn wait_for_quiescence(collab: &CollabState, doc_id: &str, clients: &[Client]) -> String {
    eventually("clients to converge", || async move {
        let Some(metadata) = collab.metadata(doc_id).await else {
            return false;
        };
        let Ok(snapshot) = collab.init_document(doc_id).await else {
            return false;
        };
        clients.iter().all(|client| {
            let status = client.handle.status();
            status.phase == Phase::Idle
                && status.head == metadata.head
                && client.buffer.text() == snapshot.content
        })
    })
    .await;
    assert_ok!(collab.init_document(doc_id).await).content
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_clients_editing_own_lines_converge() {
    let collab = CollabState::new();
    seed(&collab, "lines", &numbered_lines(CLIENTS)).await;
    let clients = attach_clients(&collab, "lines", CLIENTS).await;

    for round in 0..ROUNDS {
        for (i, client) in clients.iter().enumerate() {
            client.buffer.edit(|b| {
                let end = line_end(b.text(), i);
                b.move_cursor(end);
                b.type_text(&format!(" r{}", round));
            });
            assert_ok!(client.handle.notify_edit());
        }
        tokio::task::yield_now().await;
    }

    let content = wait_for_quiescence(&collab, "lines", &clients).await;
    let expected: String = (0..CLIENTS)
        .map(|i| {
            let edits: String = (0..ROUNDS).map(|round| format!(" r{}", round)).collect();
            format!("line {}{}\n", i, edits)
        })
        .collect();
    assert_eq!(content, expected);

    for client in clients {
        assert_ok!(client.handle.detach().await);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_edits_converge() {
    let collab = CollabState::new();
    seed(&collab, "shared", "The quick brown fox jumps over the lazy dog").await;
    let clients = attach_clients(&collab, "shared", 4).await;

    // everyone rewrites the same region at once
    let rewrites = [
        (4, 9, "slow"),
        (4, 15, "red"),
        (10, 19, "cat"),
        (0, 3, "A"),
    ];
    for (client, (start, end, text)) in clients.iter().zip(rewrites) {
        client.buffer.edit(|b| {
            b.select(start, end);
            b.type_text(text);
        });
        assert_ok!(client.handle.notify_edit());
    }

    let content = wait_for_quiescence(&collab, "shared", &clients).await;
    assert!(!content.contains('\0'));
    assert!(!content.is_empty());

    for client in clients {
        assert_ok!(client.handle.detach().await);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_late_joiner_sees_current_content() {
    let collab = CollabState::new();
    let clients = attach_clients(&collab, "late", 2).await;

    clients[0].buffer.edit(|b| b.type_text("hello"));
    assert_ok!(clients[0].handle.notify_edit());
    wait_for_quiescence(&collab, "late", &clients).await;

    let late = attach_clients(&collab, "late", 1).await;
    assert_eq!(late[0].buffer.text(), "hello");

    late[0].buffer.edit(|b| {
        b.move_cursor(5);
        b.type_text(" world");
    });
    assert_ok!(late[0].handle.notify_edit());

    let everyone: Vec<Client> = clients.into_iter().chain(late).collect();
    let content = wait_for_quiescence(&collab, "late", &everyone).await;
    assert_eq!(content, "hello world");
}
