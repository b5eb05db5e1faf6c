mod common;

use common::{Harness, user};
use rental_board_bot::commands::help::{GREETING, all_command_names};
use std::time::Duration;

#[tokio::test]
async fn start_upserts_without_duplicating() {
    let h = Harness::new();
    let bob = user(100, "bob");
    assert_eq!(h.reply(&bob, "/start").await, GREETING);
    assert_eq!(h.reply(&bob, "/start").await, GREETING);
    assert_eq!(h.store.user_count(), 1);

    let renamed = user(100, "robert");
    h.send(&renamed, "/start").await;
    assert_eq!(h.store.user_count(), 1);
}

#[tokio::test]
async fn expired_sessions_are_treated_as_absent() {
    let h = Harness::with_ttl(Duration::ZERO);
    let bob = user(100, "bob");
    h.send(&bob, "/submit_ad").await;
    assert!(h.send(&bob, "Dress").await.is_empty());
    assert_eq!(h.market.sessions().purge_expired().await, 0);
}

#[tokio::test]
async fn sessions_are_per_user() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let alice = user(200, "alice");
    h.send(&bob, "/submit_ad").await;
    h.send(&alice, "/search_ads").await;

    assert_eq!(h.reply(&bob, "Dress").await, "Enter the rental price.");
    assert_eq!(h.reply(&alice, "2").await, "Enter a location:");
    assert_eq!(h.market.sessions().len().await, 2);
}

#[tokio::test(start_paused = true)]
async fn messages_from_one_user_are_handled_in_order() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;
    h.store.set_read_latency(Duration::from_millis(200));

    let open = format!("/edit_ad {}", listing.id);
    let (menu, prompt) = tokio::join!(h.send(&bob, &open), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.send(&bob, "2").await
    });
    assert!(menu[0].contains("Choose the field"), "{menu:?}");
    assert_eq!(prompt, vec!["Enter the new rental price.".to_string()]);

    h.store.set_read_latency(Duration::ZERO);
    assert!(h.reply(&bob, "900").await.starts_with("Listing updated"));
}

#[test]
fn help_command_names_unique_and_present() {
    let names = all_command_names();
    let mut sorted = names.clone();
    sorted.sort();
    for w in sorted.windows(2) {
        assert_ne!(w[0], w[1], "Duplicate help command name: {}", w[0]);
    }
    for expected in ["submit_ad", "edit_ad", "delete_ad", "search_ads", "report", "reviews", "add", "deny"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}
