//! Per-user active conversation, keyed by platform user id.
//!
//! Each user owns one slot behind its own async mutex. The dispatcher holds
//! that lock for the whole of a step, so messages from the same user are
//! handled one at a time while different users proceed in parallel.
//! Conversations older than the TTL are treated as absent and removed.

use crate::flows::Conversation;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Debug)]
struct Slot {
    touched: Instant,
    conversation: Option<Conversation>,
}

impl Slot {
    fn live(&self, ttl: Duration) -> Option<&Conversation> {
        self.conversation
            .as_ref()
            .filter(|_| self.touched.elapsed() < ttl)
    }
}

pub struct SessionStore {
    ttl: Duration,
    slots: Mutex<HashMap<i64, Arc<Mutex<Slot>>>>,
}

/// Exclusive access to one user's slot; dropping it lets that user's next message in.
pub struct SessionGuard {
    platform_id: i64,
    ttl: Duration,
    slot: OwnedMutexGuard<Slot>,
}

impl SessionGuard {
    /// Removes and returns the live conversation, if any.
    pub fn take(&mut self) -> Option<Conversation> {
        let conversation = self.slot.conversation.take()?;
        if self.slot.touched.elapsed() < self.ttl {
            Some(conversation)
        } else {
            debug!(target = "session", platform_id = self.platform_id, flow = conversation.name(), "conversation expired");
            None
        }
    }

    pub fn put(&mut self, conversation: Conversation) {
        self.slot.touched = Instant::now();
        self.slot.conversation = Some(conversation);
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, platform_id: i64) -> Arc<Mutex<Slot>> {
        let mut slots = self.slots.lock().await;
        slots
            .entry(platform_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(Slot {
                    touched: Instant::now(),
                    conversation: None,
                }))
            })
            .clone()
    }

    /// Waits until no other message from this user is being handled.
    pub async fn lock(&self, platform_id: i64) -> SessionGuard {
        let slot = self.slot(platform_id).await;
        SessionGuard {
            platform_id,
            ttl: self.ttl,
            slot: slot.lock_owned().await,
        }
    }

    /// Copy of the caller's live conversation, without consuming it.
    pub async fn peek(&self, platform_id: i64) -> Option<Conversation> {
        let slot = self.slots.lock().await.get(&platform_id).cloned()?;
        let slot = slot.lock().await;
        slot.live(self.ttl).cloned()
    }

    /// Drops idle slots whose conversation is gone or expired; busy slots are kept.
    /// Returns how many expired conversations were discarded.
    pub async fn purge_expired(&self) -> usize {
        let mut slots = self.slots.lock().await;
        let mut purged = 0;
        slots.retain(|_, slot| match slot.try_lock() {
            Ok(slot) if slot.conversation.is_none() => false,
            Ok(slot) if slot.live(self.ttl).is_none() => {
                purged += 1;
                false
            }
            _ => true,
        });
        if purged > 0 {
            debug!(target = "session", purged, "expired conversations purged");
        }
        purged
    }

    /// Number of users with a conversation in progress (or a step running).
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots
            .values()
            .filter(|slot| match slot.try_lock() {
                Ok(slot) => slot.live(self.ttl).is_some(),
                Err(_) => true,
            })
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::search::SearchState;

    #[tokio::test]
    async fn take_removes_the_entry() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        sessions.lock(1).await.put(Conversation::Search(SearchState::Filters));
        assert!(sessions.peek(1).await.is_some());
        let mut guard = sessions.lock(1).await;
        assert_eq!(guard.take(), Some(Conversation::Search(SearchState::Filters)));
        assert!(guard.take().is_none());
    }

    #[tokio::test]
    async fn expired_entries_are_absent_and_purged() {
        let sessions = SessionStore::new(Duration::ZERO);
        sessions.lock(1).await.put(Conversation::Search(SearchState::Filters));
        sessions.lock(2).await.put(Conversation::Search(SearchState::Filters));
        assert!(sessions.peek(1).await.is_none());
        assert_eq!(sessions.purge_expired().await, 2);
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn second_lock_waits_for_the_first() {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(60)));
        let mut first = sessions.lock(7).await;

        let waiter = {
            let sessions = sessions.clone();
            tokio::spawn(async move { sessions.lock(7).await.take() })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        first.put(Conversation::Search(SearchState::Filters));
        drop(first);
        assert_eq!(
            waiter.await.unwrap(),
            Some(Conversation::Search(SearchState::Filters))
        );
    }

    #[tokio::test]
    async fn busy_slots_survive_a_purge() {
        let sessions = SessionStore::new(Duration::ZERO);
        let _held = sessions.lock(3).await;
        assert_eq!(sessions.purge_expired().await, 0);
        assert_eq!(sessions.len().await, 1);
    }
}
