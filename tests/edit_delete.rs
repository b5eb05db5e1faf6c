mod common;

use common::{Harness, user};
use rental_board_bot::database::Store;
use rental_board_bot::database::models::ReviewTarget;
use rental_board_bot::flows::NOT_FOUND_OR_FOREIGN;

#[tokio::test]
async fn edit_price_rejects_garbage_then_persists() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;

    let overview = h.reply(&bob, "/edit_ad").await;
    assert!(overview.contains(&format!("ID: {} | Dress", listing.id)), "{overview}");

    let menu = h.reply(&bob, &format!("/edit_ad {}", listing.id)).await;
    assert!(menu.contains("Choose the field"), "{menu}");
    assert!(h.reply(&bob, "7").await.starts_with("Invalid choice"));
    assert_eq!(h.reply(&bob, "2").await, "Enter the new rental price.");

    assert!(h.reply(&bob, "abc").await.starts_with("Invalid price"));
    assert_eq!(h.store.listing(listing.id).await.unwrap().unwrap().price, 1500.0);
    assert!(h.has_session(&bob).await);

    assert!(h.reply(&bob, "900").await.starts_with("Listing updated"));
    assert_eq!(h.store.listing(listing.id).await.unwrap().unwrap().price, 900.0);
    assert!(!h.has_session(&bob).await);
}

#[tokio::test]
async fn edit_shortcut_with_id_skips_overview() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;

    h.send(&bob, &format!("/edit_ad{}", listing.id)).await;
    h.send(&bob, "4").await;
    assert!(h.reply(&bob, "bob").await.starts_with("Invalid contact"));
    h.send(&bob, "@bobby").await;
    assert_eq!(h.store.listing(listing.id).await.unwrap().unwrap().contact, "@bobby");
}

#[tokio::test]
async fn editing_someone_elses_listing_is_refused() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let eve = user(200, "eve");
    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;

    assert_eq!(h.reply(&eve, &format!("/edit_ad {}", listing.id)).await, NOT_FOUND_OR_FOREIGN);
    assert!(!h.has_session(&eve).await);
    assert_eq!(h.reply(&eve, "/edit_ad").await, "You have no listings.");
}

#[tokio::test]
async fn deleting_foreign_listing_leaves_it_untouched() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let eve = user(200, "eve");
    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;
    h.send(&eve, &format!("/report_ad {}", listing.id)).await;
    h.send(&eve, "Lovely dress").await;

    assert_eq!(h.reply(&eve, &format!("/delete_ad {}", listing.id)).await, NOT_FOUND_OR_FOREIGN);
    assert!(h.store.listing(listing.id).await.unwrap().is_some());
    assert_eq!(h.store.all_reviews().len(), 1);
}

#[tokio::test]
async fn owner_delete_removes_listing_and_its_reviews() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let eve = user(200, "eve");
    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;
    h.send(&eve, &format!("/report_ad {}", listing.id)).await;
    h.send(&eve, "Lovely dress").await;
    h.send(&eve, "/report_bot").await;
    h.send(&eve, "Nice bot").await;

    h.send(&bob, "/edit_ad").await;
    assert_eq!(h.reply(&bob, &format!("/delete_ad {}", listing.id)).await, "Listing deleted.");
    assert!(h.store.all_listings().is_empty());
    let remaining = h.store.all_reviews();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].target, ReviewTarget::Bot);
    assert!(!h.has_session(&bob).await);
}

#[tokio::test]
async fn delete_requires_an_id() {
    let h = Harness::new();
    let bob = user(100, "bob");
    assert_eq!(h.reply(&bob, "/delete_ad").await, "Use: /delete_ad [ID]");
    assert_eq!(h.reply(&bob, "/delete_ad 77").await, NOT_FOUND_OR_FOREIGN);
}

#[tokio::test]
async fn delete_without_id_inside_edit_keeps_the_flow() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;

    h.send(&bob, "/edit_ad").await;
    assert_eq!(h.reply(&bob, "/delete_ad").await, "Use: /delete_ad [ID]");
    assert!(h.has_session(&bob).await);
    assert_eq!(h.reply(&bob, "/delete_ad abc").await, "Use: /delete_ad [ID]");
    assert!(h.has_session(&bob).await);

    assert!(h.reply(&bob, &format!("/edit_ad {}", listing.id)).await.contains("Choose the field"));
    assert!(h.store.listing(listing.id).await.unwrap().is_some());
}
