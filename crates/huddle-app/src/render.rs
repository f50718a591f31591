//! Projects `ChatView` changes onto terminal lines.

use huddle_chat::{ChatMessage, ChatView, ConnectionState, NoticeLevel};
use huddle_common::ParticipantId;

/// Lines describing what changed between two views.
pub fn diff(prev: &ChatView, next: &ChatView) -> Vec<String> {
    let mut lines = Vec::new();

    if prev.connection != next.connection {
        lines.push(format!("-- {}", connection_label(next.connection)));
    }

    for message in next
        .messages
        .iter()
        .filter(|m| !prev.messages.iter().any(|p| p.id == m.id))
    {
        lines.push(message_line(message, &next.me));
    }

    if prev.in_chat != next.in_chat {
        lines.push(if next.in_chat {
            "-- you entered the chat".to_string()
        } else {
            "-- you left the chat".to_string()
        });
    }

    if prev.active_participants != next.active_participants {
        lines.push(format!(
            "-- in chat: {}",
            participant_list(&next.active_participants)
        ));
    }

    if prev.typing_peers != next.typing_peers {
        if next.typing_peers.is_empty() {
            if prev.remote_typing {
                lines.push("-- nobody is typing".to_string());
            }
        } else {
            lines.push(format!(
                "-- {} typing...",
                participant_list(&next.typing_peers)
            ));
        }
    }

    if prev.notice != next.notice {
        if let Some(notice) = &next.notice {
            let marker = match notice.level {
                NoticeLevel::Info => '*',
                NoticeLevel::Error => '!',
            };
            lines.push(format!("{marker} {}", notice.text));
        }
    }

    lines
}

fn connection_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Unconnected => "offline",
        ConnectionState::Connecting => "connecting",
        ConnectionState::Connected => "connected",
    }
}

fn message_line(message: &ChatMessage, me: &ParticipantId) -> String {
    let author = if &message.author_id == me {
        "you".to_string()
    } else {
        message.author_id.to_string()
    };
    let local = message.created_at.with_timezone(&chrono::Local);
    format!("[{}] {author}: {}", local.format("%H:%M"), message.content)
}

fn participant_list(ids: &[ParticipantId]) -> String {
    if ids.is_empty() {
        return "nobody".to_string();
    }
    ids.iter()
        .map(ParticipantId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use huddle_chat::Notice;
    use huddle_common::RecordId;

    fn me() -> ParticipantId {
        ParticipantId::from("alice")
    }

    fn message(author: &str, content: &str) -> ChatMessage {
        ChatMessage {
            id: RecordId::new(),
            author_id: ParticipantId::from(author),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn identical_views_render_nothing() {
        let view = ChatView::empty(me());
        assert!(diff(&view, &view.clone()).is_empty());
    }

    #[test]
    fn only_new_messages_are_printed() {
        let old = message("bob", "first");
        let mut prev = ChatView::empty(me());
        prev.messages = vec![old.clone()];
        let mut next = prev.clone();
        next.messages = vec![old, message("alice", "second")];

        let lines = diff(&prev, &next);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("you: second"));
    }

    #[test]
    fn connection_and_roster_changes() {
        let prev = ChatView::empty(me());
        let mut next = prev.clone();
        next.connection = ConnectionState::Connected;
        next.in_chat = true;
        next.active_participants = vec![me(), ParticipantId::from("bob")];

        let lines = diff(&prev, &next);
        assert_eq!(
            lines,
            vec![
                "-- connected".to_string(),
                "-- you entered the chat".to_string(),
                "-- in chat: alice, bob".to_string(),
            ]
        );
    }

    #[test]
    fn typing_indicator_appears_and_clears() {
        let prev = ChatView::empty(me());
        let mut typing = prev.clone();
        typing.remote_typing = true;
        typing.typing_peers = vec![ParticipantId::from("bob")];

        assert_eq!(diff(&prev, &typing), vec!["-- bob typing...".to_string()]);
        assert_eq!(diff(&typing, &prev), vec!["-- nobody is typing".to_string()]);
    }

    #[test]
    fn notice_shown_once_with_level_marker() {
        let prev = ChatView::empty(me());
        let mut next = prev.clone();
        next.notice = Some(Notice {
            level: NoticeLevel::Info,
            text: "Sent".into(),
        });
        assert_eq!(diff(&prev, &next), vec!["* Sent".to_string()]);
        // Clearing the notice prints nothing.
        assert!(diff(&next, &prev).is_empty());

        next.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: "failed to persist: store unavailable: down".into(),
        });
        assert_eq!(
            diff(&prev, &next),
            vec!["! failed to persist: store unavailable: down".to_string()]
        );
    }
}
