use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use huddle_common::{ErrorKind, ParticipantId};

use super::*;
use crate::identity::Identity;
use crate::protocol::{InboundEvent, OutboundIntent};
use crate::store::{ChatStore, MemoryStore, MessageDraft};
use crate::test_support::{FailingStore, MockRuntime};
use crate::transport::{ConnectionState, LinkStatus, TransportEvent};

fn settings() -> SessionSettings {
    SessionSettings::default()
}

fn session_with(
    store: Arc<dyn ChatStore>,
    runtime: Arc<MockRuntime>,
) -> (ChatSession, tokio::sync::watch::Receiver<ChatView>) {
    ChatSession::new(Identity::named("alice"), settings(), runtime, store)
}

async fn started() -> (ChatSession, Arc<MemoryStore>, Arc<MockRuntime>) {
    let store = Arc::new(MemoryStore::new());
    let runtime = Arc::new(MockRuntime::new());
    let (mut session, _view) = session_with(store.clone(), runtime.clone());
    session.start().await.unwrap();
    session
        .handle_transport_event(TransportEvent::Link(LinkStatus::Connected))
        .await;
    (session, store, runtime)
}

fn inbound(event: InboundEvent) -> TransportEvent {
    TransportEvent::Inbound(event)
}

// =============================================================================
// Bootstrap
// =============================================================================

#[tokio::test]
async fn start_connects_once_and_binds_listeners() {
    let (mut session, _store, runtime) = started().await;
    for _ in 0..4 {
        session.start().await.unwrap();
    }
    assert_eq!(runtime.open_count(), 1);
    assert!(session.events.is_some());
    assert_eq!(session.view().connection, ConnectionState::Connected);
}

#[tokio::test]
async fn load_failure_surfaces_once_as_notice() {
    let store = Arc::new(MemoryStore::new());
    let runtime = Arc::new(MockRuntime::failing("bad endpoint"));
    let (mut session, view) = session_with(store, runtime.clone());

    let err = session.start().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportLoadFailure);
    assert_eq!(runtime.open_count(), 0);

    let err = session.start().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportLoadFailure);
    assert_eq!(runtime.load_count(), 1);

    let view = view.borrow().clone();
    assert_eq!(view.connection, ConnectionState::Unconnected);
    assert!(view.notice.unwrap().is_error());
}

// =============================================================================
// Typing
// =============================================================================

#[tokio::test]
async fn first_input_publishes_typing_start_only_once() {
    let (mut session, _store, runtime) = started().await;
    for text in ["h", "he", "hel"] {
        session.on_input(text.to_string()).await;
    }
    let transport = runtime.transport();
    assert_eq!(transport.count(OutboundIntent::TypingStart), 1);
    assert_eq!(transport.count(OutboundIntent::TypingStop), 0);
    let view = session.view();
    assert!(view.local_typing);
    assert_eq!(view.input, "hel");
}

#[tokio::test(start_paused = true)]
async fn typing_burst_in_run_loop_emits_one_start_and_one_stop() {
    let (session, _store, runtime) = started().await;
    let (tx, rx) = mpsc::channel(16);
    let task = tokio::spawn(session.run(rx));

    for i in 0..6 {
        tx.send(SessionCommand::Input("x".repeat(i + 1))).await.unwrap();
        sleep(Duration::from_millis(300)).await;
    }
    let transport = runtime.transport();
    assert_eq!(transport.count(OutboundIntent::TypingStart), 1);
    assert_eq!(transport.count(OutboundIntent::TypingStop), 0);

    sleep(Duration::from_millis(1200)).await;
    assert_eq!(transport.count(OutboundIntent::TypingStart), 1);
    assert_eq!(transport.count(OutboundIntent::TypingStop), 1);

    // A new burst after the quiet period starts again.
    tx.send(SessionCommand::Input("again".into())).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(transport.count(OutboundIntent::TypingStart), 2);

    tx.send(SessionCommand::Shutdown).await.unwrap();
    task.await.unwrap();
    assert_eq!(transport.count(OutboundIntent::TypingStop), 2);
    assert!(transport.is_closed());
}

#[tokio::test]
async fn shutdown_without_burst_sends_no_stop() {
    let (mut session, _store, runtime) = started().await;
    session.shutdown().await;
    let transport = runtime.transport();
    assert_eq!(transport.count(OutboundIntent::TypingStop), 0);
    assert!(transport.is_closed());
    assert_eq!(session.view().connection, ConnectionState::Unconnected);
}

#[tokio::test]
async fn self_remote_typing_is_ignored() {
    let (mut session, _store, _runtime) = started().await;
    session
        .handle_transport_event(inbound(InboundEvent::RemoteTypingStart {
            participant_id: ParticipantId::from("alice"),
        }))
        .await;
    assert!(!session.view().remote_typing);

    session
        .handle_transport_event(inbound(InboundEvent::RemoteTypingStart {
            participant_id: ParticipantId::from("bob"),
        }))
        .await;
    let view = session.view();
    assert!(view.remote_typing);
    assert_eq!(view.typing_peers, vec![ParticipantId::from("bob")]);

    session
        .handle_transport_event(inbound(InboundEvent::RemoteTypingStop {
            participant_id: ParticipantId::from("bob"),
        }))
        .await;
    assert!(!session.view().remote_typing);
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn empty_submission_has_no_side_effects() {
    let (mut session, store, runtime) = started().await;
    for raw in ["", "   "] {
        let err = session.submit(raw).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }
    assert_eq!(store.message_count().await, 0);
    assert!(runtime.transport().published().is_empty());
}

#[tokio::test]
async fn successful_submission_stores_transmits_and_refreshes() {
    let (mut session, store, runtime) = started().await;
    session.submit("hello room").await.unwrap();

    assert_eq!(store.message_count().await, 1);
    assert_eq!(runtime.transport().published(), vec![OutboundIntent::Transmit]);
    let view = session.view();
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.messages[0].content, "hello room");
    assert_eq!(view.messages[0].author_id, ParticipantId::from("alice"));
}

#[tokio::test]
async fn storage_failure_leaves_presence_and_transport_untouched() {
    let runtime = Arc::new(MockRuntime::new());
    let (mut session, _view) = session_with(Arc::new(FailingStore), runtime.clone());
    let _ = session.start().await;
    let before = session.presence.state().clone();

    let err = session.submit("hello").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    assert!(runtime.transport().published().is_empty());
    assert_eq!(session.presence.state(), &before);
    assert!(session.view().notice.unwrap().is_error());
}

#[tokio::test]
async fn room_updated_refetches_from_store() {
    let (mut session, store, _runtime) = started().await;
    store
        .create_message(MessageDraft {
            author_id: ParticipantId::from("bob"),
            content: "from bob".into(),
        })
        .await
        .unwrap();
    assert!(session.view().messages.is_empty());

    session
        .handle_transport_event(inbound(InboundEvent::RoomUpdated))
        .await;
    assert_eq!(session.view().messages.len(), 1);
}

#[tokio::test]
async fn message_broadcast_is_persisted_and_republished() {
    let (mut session, store, runtime) = started().await;
    session
        .handle_transport_event(inbound(InboundEvent::MessageBroadcast {
            author_id: ParticipantId::from("bob"),
            content: "relayed".into(),
        }))
        .await;

    assert_eq!(store.message_count().await, 1);
    assert_eq!(runtime.transport().published(), vec![OutboundIntent::Transmit]);
    let view = session.view();
    assert_eq!(view.messages[0].author_id, ParticipantId::from("bob"));
}

// =============================================================================
// Membership
// =============================================================================

#[tokio::test]
async fn entering_twice_keeps_one_roster_entry() {
    let (mut session, store, runtime) = started().await;
    session.enter_chat().await.unwrap();
    session.enter_chat().await.unwrap();

    let view = session.view();
    assert!(view.in_chat);
    assert_eq!(view.active_participants, vec![ParticipantId::from("alice")]);
    assert_eq!(
        runtime.transport().count(OutboundIntent::ParticipantEntered),
        2
    );
    assert!(store
        .fetch_participant(&ParticipantId::from("alice"))
        .await
        .unwrap()
        .unwrap()
        .active);
}

#[tokio::test]
async fn leaving_when_not_a_member_changes_nothing() {
    let (mut session, _store, _runtime) = started().await;
    let before = session.view().active_participants;
    session.leave_chat().await.unwrap();
    assert_eq!(session.view().active_participants, before);
    assert!(!session.view().in_chat);
}

#[tokio::test]
async fn membership_persistence_failure_publishes_nothing() {
    let runtime = Arc::new(MockRuntime::new());
    let (mut session, _view) = session_with(Arc::new(FailingStore), runtime.clone());
    let _ = session.start().await;

    let err = session.enter_chat().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    assert!(runtime.transport().published().is_empty());
    assert!(!session.view().in_chat);
}

#[tokio::test]
async fn participants_updated_refetches_roster() {
    let (mut session, store, _runtime) = started().await;
    store
        .set_participant_active(&ParticipantId::from("bob"), true)
        .await
        .unwrap();
    session
        .handle_transport_event(inbound(InboundEvent::ParticipantsUpdated))
        .await;
    assert_eq!(
        session.view().active_participants,
        vec![ParticipantId::from("bob")]
    );
}

// =============================================================================
// Ack, time and link events
// =============================================================================

#[tokio::test]
async fn ack_clears_input_and_shows_detail() {
    let (mut session, _store, _runtime) = started().await;
    session.on_input("draft".into()).await;
    session
        .handle_transport_event(inbound(InboundEvent::Ack {
            ok: true,
            detail: "Sent".into(),
        }))
        .await;

    let view = session.view();
    assert_eq!(view.input, "");
    let notice = view.notice.unwrap();
    assert_eq!(notice.text, "Sent");
    assert_eq!(notice.level, NoticeLevel::Info);
}

#[tokio::test(start_paused = true)]
async fn ack_notice_clears_after_window() {
    let (session, _store, runtime) = started().await;
    let mut view = session.view_tx.subscribe();
    let (tx, rx) = mpsc::channel(4);
    let task = tokio::spawn(session.run(rx));

    runtime
        .events()
        .send(inbound(InboundEvent::Ack {
            ok: true,
            detail: "Sent".into(),
        }))
        .await
        .unwrap();

    sleep(Duration::from_millis(500)).await;
    assert_eq!(
        view.borrow_and_update().notice.as_ref().map(|n| n.text.clone()),
        Some("Sent".to_string())
    );

    sleep(Duration::from_millis(600)).await;
    assert!(view.borrow_and_update().notice.is_none());

    tx.send(SessionCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn time_is_advisory() {
    let (mut session, _store, _runtime) = started().await;
    session
        .handle_transport_event(inbound(InboundEvent::Time("12:00:00".into())))
        .await;
    assert_eq!(session.view().server_time.as_deref(), Some("12:00:00"));
}

#[tokio::test]
async fn reconnect_resyncs_and_clears_remote_typing() {
    let (mut session, store, _runtime) = started().await;
    session
        .handle_transport_event(inbound(InboundEvent::RemoteTypingStart {
            participant_id: ParticipantId::from("bob"),
        }))
        .await;

    session
        .handle_transport_event(TransportEvent::Link(LinkStatus::Disconnected))
        .await;
    assert_eq!(session.view().connection, ConnectionState::Unconnected);
    assert!(!session.view().remote_typing);

    store
        .create_message(MessageDraft {
            author_id: ParticipantId::from("bob"),
            content: "while you were away".into(),
        })
        .await
        .unwrap();

    session
        .handle_transport_event(TransportEvent::Link(LinkStatus::Connected))
        .await;
    let view = session.view();
    assert_eq!(view.connection, ConnectionState::Connected);
    assert_eq!(view.messages.len(), 1);
}

#[tokio::test]
async fn auto_enter_marks_participant_active_on_start() {
    let store = Arc::new(MemoryStore::new());
    let runtime = Arc::new(MockRuntime::new());
    let settings = SessionSettings {
        auto_enter: true,
        ..SessionSettings::default()
    };
    let (mut session, view) =
        ChatSession::new(Identity::named("alice"), settings, runtime.clone(), store);
    session.start().await.unwrap();

    assert!(view.borrow().in_chat);
    assert_eq!(
        runtime.transport().count(OutboundIntent::ParticipantEntered),
        1
    );
}

#[tokio::test]
async fn auto_enter_before_link_up_is_announced_once_connected() {
    let store = Arc::new(MemoryStore::new());
    let runtime = Arc::new(MockRuntime::offline());
    let settings = SessionSettings {
        auto_enter: true,
        ..SessionSettings::default()
    };
    let (mut session, view) =
        ChatSession::new(Identity::named("alice"), settings, runtime.clone(), store);
    session.start().await.unwrap();

    assert!(view.borrow().in_chat);
    assert_eq!(
        runtime.transport().count(OutboundIntent::ParticipantEntered),
        0
    );

    runtime.transport().set_online(true);
    session
        .handle_transport_event(TransportEvent::Link(LinkStatus::Connected))
        .await;
    assert_eq!(
        runtime.transport().count(OutboundIntent::ParticipantEntered),
        1
    );

    // A reconnect announces membership again.
    session
        .handle_transport_event(TransportEvent::Link(LinkStatus::Disconnected))
        .await;
    session
        .handle_transport_event(TransportEvent::Link(LinkStatus::Connected))
        .await;
    assert_eq!(
        runtime.transport().count(OutboundIntent::ParticipantEntered),
        2
    );
}

#[tokio::test]
async fn link_up_without_membership_announces_nothing() {
    let (_session, _store, runtime) = started().await;
    assert!(runtime.transport().published().is_empty());
}

