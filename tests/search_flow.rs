mod common;

use common::{Harness, user};

#[tokio::test]
async fn keyword_then_price_skips_location() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let alice = user(200, "alice");
    let listing = h.publish(&bob, "Summer dress", "1500", "Moscow").await;
    h.publish(&bob, "Summer dress", "2500", "Moscow").await;
    h.publish(&bob, "Winter coat", "1500", "Moscow").await;

    assert!(h.reply(&alice, "/search_ads").await.starts_with("Search filters"));
    assert_eq!(h.reply(&alice, "13").await, "Enter a keyword:");
    assert_eq!(h.reply(&alice, "DRESS").await, "Enter the rental price (a single number):");
    let results = h.reply(&alice, "1500").await;
    assert!(results.starts_with("Search results"), "{results}");
    assert!(results.contains(&format!("ID: {}\n", listing.id)), "{results}");
    assert_eq!(results.matches("ID: ").count(), 1, "{results}");
    assert!(!h.has_session(&alice).await);

    let saved = h.store.all_searches();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].keyword.as_deref(), Some("DRESS"));
    assert_eq!(saved[0].location, None);
    assert_eq!(saved[0].min_price, Some(1500.0));
    assert_eq!(saved[0].max_price, Some(1500.0));
}

#[tokio::test]
async fn listings_awaiting_moderation_are_not_searchable() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let alice = user(200, "alice");
    h.submit(&bob, "Dress", "1500", "Moscow").await;

    for step in ["/search_ads", "2"] {
        h.send(&alice, step).await;
    }
    assert_eq!(h.reply(&alice, "moscow").await, "No listings found.");
}

#[tokio::test]
async fn bad_filter_codes_and_prices_reprompt() {
    let h = Harness::new();
    let alice = user(200, "alice");
    h.send(&alice, "/search_ads").await;
    assert!(h.reply(&alice, "14").await.starts_with("Invalid filters"));
    assert!(h.reply(&alice, "").await.starts_with("Invalid filters"));
    assert_eq!(h.reply(&alice, "3").await, "Enter the rental price (a single number):");
    assert!(h.reply(&alice, "cheap").await.starts_with("Invalid price"));
    assert!(h.has_session(&alice).await);
    assert_eq!(h.reply(&alice, "10").await, "No listings found.");
}

#[tokio::test]
async fn search_is_saved_even_when_nothing_matches() {
    let h = Harness::new();
    let alice = user(200, "alice");
    for step in ["/search_ads", "21", "Kazan"] {
        h.send(&alice, step).await;
    }
    assert_eq!(h.reply(&alice, "boots").await, "No listings found.");
    let saved = h.store.all_searches();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].location.as_deref(), Some("Kazan"));
    assert_eq!(saved[0].keyword.as_deref(), Some("boots"));
    assert_eq!(saved[0].min_price, None);
}

#[tokio::test]
async fn blank_answers_leave_filters_unset() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let alice = user(200, "alice");
    for step in ["/search_ads", "12", "   "] {
        h.send(&alice, step).await;
    }
    assert_eq!(h.reply(&alice, "").await, "No listings found.");

    let saved = h.store.all_searches();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].keyword, None);
    assert_eq!(saved[0].location, None);

    h.publish(&bob, "Dress", "1500", "Moscow").await;
    assert!(h.notifier.sent_to(alice.platform_id).is_empty());
}
