//! Room registry: maps room names to their connected members.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use huddle_common::ParticipantId;

/// Connection-scoped member id. One participant may hold several.
pub type MemberId = u64;

static NEXT_MEMBER: AtomicU64 = AtomicU64::new(1);

pub struct Member {
    pub participant_id: ParticipantId,
    pub tx: mpsc::Sender<String>,
}

/// Thread-safe room registry.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, HashMap<MemberId, Member>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to `room`, creating the room if needed.
    pub async fn join(
        &self,
        room: &str,
        participant_id: ParticipantId,
        tx: mpsc::Sender<String>,
    ) -> MemberId {
        let id = NEXT_MEMBER.fetch_add(1, Ordering::Relaxed);
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room.to_string())
            .or_default()
            .insert(id, Member { participant_id, tx });
        id
    }

    /// Remove a member. Returns true if the room is now gone.
    pub async fn leave(&self, room: &str, member: MemberId) -> bool {
        let mut rooms = self.rooms.write().await;
        remove_member(&mut rooms, room, member)
    }

    /// Queue `frame` for one member.
    pub async fn send_to(&self, room: &str, member: MemberId, frame: &str) -> bool {
        let target = {
            let rooms = self.rooms.read().await;
            rooms
                .get(room)
                .and_then(|members| members.get(&member))
                .map(|m| (member, m.tx.clone()))
        };
        match target {
            Some(target) => self.deliver(room, vec![target], frame).await == 1,
            None => false,
        }
    }

    /// Send `frame` to every member of `room` except `sender`.
    pub async fn broadcast_except(&self, room: &str, sender: MemberId, frame: &str) -> usize {
        let targets: Vec<(MemberId, mpsc::Sender<String>)> = {
            let rooms = self.rooms.read().await;
            match rooms.get(room) {
                Some(members) => members
                    .iter()
                    .filter(|(id, _)| **id != sender)
                    .map(|(id, m)| (*id, m.tx.clone()))
                    .collect(),
                None => return 0,
            }
        };
        self.deliver(room, targets, frame).await
    }

    /// Send `frame` to every member of every room.
    pub async fn broadcast_all(&self, frame: &str) {
        let rooms: Vec<(String, Vec<(MemberId, mpsc::Sender<String>)>)> = {
            let rooms = self.rooms.read().await;
            rooms
                .iter()
                .map(|(name, members)| {
                    let targets = members.iter().map(|(id, m)| (*id, m.tx.clone())).collect();
                    (name.clone(), targets)
                })
                .collect()
        };
        for (room, targets) in rooms {
            self.deliver(&room, targets, frame).await;
        }
    }

    /// Queue `frame` for each target without waiting. A member whose queue
    /// is full or closed is evicted; dropping its sender ends its handler.
    async fn deliver(
        &self,
        room: &str,
        targets: Vec<(MemberId, mpsc::Sender<String>)>,
        frame: &str,
    ) -> usize {
        let mut delivered = 0;
        let mut stalled = Vec::new();
        for (id, tx) in targets {
            match tx.try_send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(_) => stalled.push(id),
            }
        }
        if !stalled.is_empty() {
            let mut rooms = self.rooms.write().await;
            for id in stalled {
                if let Some(m) = rooms.get(room).and_then(|members| members.get(&id)) {
                    tracing::warn!(
                        room = %room,
                        member = id,
                        participant = %m.participant_id,
                        "Evicting member with a full queue"
                    );
                }
                remove_member(&mut rooms, room, id);
            }
        }
        delivered
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn member_count(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|members| members.len())
            .unwrap_or(0)
    }
}

/// Remove `member` from `room`, dropping the room once empty. Returns true
/// if the room is now gone.
fn remove_member(
    rooms: &mut HashMap<String, HashMap<MemberId, Member>>,
    room: &str,
    member: MemberId,
) -> bool {
    if let Some(members) = rooms.get_mut(room) {
        members.remove(&member);
        if members.is_empty() {
            rooms.remove(room);
            tracing::debug!(room = %room, "Room emptied");
            return true;
        }
    }
    false
}
