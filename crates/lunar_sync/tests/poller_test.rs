//! Tests for the polling push source.

mod common;

use common::{fresh_state, placed, FakeApi};
use lunar_core::PlayerId;
use lunar_sync::{ClientInput, PushMessage, StatePoller};
use std::time::Duration;
use tokio::sync::mpsc;

fn expect_state(input: Option<ClientInput>) -> lunar_core::GameState {
    match input {
        Some(ClientInput::Push(PushMessage::StateUpdated(payload))) => payload.state,
        other => panic!("expected a snapshot, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_emits_only_changes_and_connection_edges() {
    let initial = fresh_state(PlayerId::ONE);
    let api = FakeApi::new(initial.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = StatePoller::new(api.clone(), tx, Duration::from_secs(1));
    let task = tokio::spawn(poller.run());

    assert_eq!(expect_state(rx.recv().await), initial);

    // Unchanged polls stay silent; the next message is the failure.
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    api.set_unreachable(true);
    assert_eq!(rx.recv().await, Some(ClientInput::Push(PushMessage::Disconnected)));

    let moved = placed(&initial, "a", 2).with_current_player(PlayerId::TWO);
    api.set_state(moved.clone());
    api.set_unreachable(false);
    assert_eq!(rx.recv().await, Some(ClientInput::Push(PushMessage::Connected)));
    assert_eq!(expect_state(rx.recv().await), moved);

    drop(rx);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(task.is_finished());
}
