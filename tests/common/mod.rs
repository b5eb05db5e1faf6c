//! Shared harness: a dispatcher over `MemoryStore` with a notifier that records messages.
#![allow(dead_code)]

use async_trait::async_trait;
use rental_board_bot::database::MemoryStore;
use rental_board_bot::database::models::Listing;
use rental_board_bot::dispatcher::Marketplace;
use rental_board_bot::flows::{Caller, Moderators, Services};
use rental_board_bot::notify::{NotifyError, Notifier};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MODERATOR: &str = "mod_anna";

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
    failing: Mutex<HashSet<i64>>,
}

impl RecordingNotifier {
    pub fn fail_for(&self, platform_id: i64) {
        self.failing.lock().unwrap().insert(platform_id);
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, platform_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| *id == platform_id)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, platform_id: i64, text: &str) -> Result<(), NotifyError> {
        if self.failing.lock().unwrap().contains(&platform_id) {
            return Err(NotifyError::Rejected(format!("blocked by {platform_id}")));
        }
        self.sent.lock().unwrap().push((platform_id, text.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub market: Marketplace,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(3600))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let services = Services {
            store: store.clone(),
            notifier: notifier.clone(),
            moderators: Moderators::new([format!("@{MODERATOR}")]),
        };
        Self {
            store,
            notifier,
            market: Marketplace::new(services, ttl),
        }
    }

    pub async fn send(&self, caller: &Caller, text: &str) -> Vec<String> {
        self.market.dispatch(caller, text).await
    }

    /// Sends `text` and returns the single reply.
    pub async fn reply(&self, caller: &Caller, text: &str) -> String {
        let mut replies = self.send(caller, text).await;
        assert_eq!(replies.len(), 1, "expected one reply to {text:?}, got {replies:?}");
        replies.remove(0)
    }

    /// Runs the whole submit flow and returns the new listing.
    pub async fn submit(&self, caller: &Caller, title: &str, price: &str, location: &str) -> Listing {
        let before = self.store.all_listings().len();
        for step in ["/submit_ad", title, price, location, "@owner", "/confirm"] {
            self.send(caller, step).await;
        }
        let listings = self.store.all_listings();
        assert_eq!(listings.len(), before + 1, "submit did not create a listing");
        listings.into_iter().last().unwrap()
    }

    /// Submits and approves a listing as the moderator.
    pub async fn publish(&self, caller: &Caller, title: &str, price: &str, location: &str) -> Listing {
        let listing = self.submit(caller, title, price, location).await;
        self.send(&moderator(), &format!("/add {}", listing.id)).await;
        listing
    }

    pub async fn has_session(&self, caller: &Caller) -> bool {
        self.market.sessions().peek(caller.platform_id).await.is_some()
    }
}

pub fn user(platform_id: i64, username: &str) -> Caller {
    Caller {
        platform_id,
        username: Some(username.to_string()),
        first_name: Some(username.to_uppercase()),
        last_name: None,
    }
}

pub fn moderator() -> Caller {
    user(9000, MODERATOR)
}
