mod common;

use common::{Harness, user};
use rental_board_bot::database::models::ReviewTarget;

#[tokio::test]
async fn bot_feedback_is_stored_and_listed() {
    let h = Harness::new();
    let eve = user(500, "eve");
    assert_eq!(h.reply(&eve, "/reviews_bot").await, "There are no reviews of the bot yet.");

    assert_eq!(h.reply(&eve, "/report_bot").await, "Leave your feedback about the bot:");
    assert_eq!(h.reply(&eve, "Works great").await, "Thank you for your feedback about the bot!");
    assert!(!h.has_session(&eve).await);

    let listing = h.reply(&eve, "/reviews_bot").await;
    assert!(listing.contains("- Works great"), "{listing}");
}

#[tokio::test]
async fn listing_review_requires_an_existing_listing() {
    let h = Harness::new();
    let bob = user(100, "bob");
    let eve = user(500, "eve");

    assert!(h.reply(&eve, "/report_ad").await.starts_with("Use: /report_ad [ID]"));
    assert_eq!(h.reply(&eve, "/report_ad 42").await, "Item 42 not found.");
    assert!(!h.has_session(&eve).await);

    let listing = h.submit(&bob, "Dress", "1500", "Moscow").await;
    h.send(&eve, &format!("/report_ad {}", listing.id)).await;
    assert_eq!(
        h.reply(&eve, "Clean and fits well").await,
        format!("Thank you for your review of item {}!", listing.id)
    );

    let reviews = h.store.all_reviews();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].target, ReviewTarget::Listing(listing.id));

    let shown = h.reply(&eve, &format!("/reviews_ad {}", listing.id)).await;
    assert!(shown.contains("- Clean and fits well"), "{shown}");
    assert_eq!(
        h.reply(&eve, "/reviews_ad 42").await,
        "There are no reviews of item 42 yet."
    );
}

#[tokio::test]
async fn menus_point_at_the_sub_commands() {
    let h = Harness::new();
    let eve = user(500, "eve");
    assert!(h.reply(&eve, "/report").await.contains("/report_content"));
    assert!(h.reply(&eve, "/reviews").await.contains("/reviews_ad"));
}

#[tokio::test]
async fn complaint_text_ends_up_as_content_review() {
    let h = Harness::new();
    let eve = user(500, "eve");
    h.send(&eve, "/report_content").await;
    assert!(h.reply(&eve, "Fake listing").await.contains("moderators"));
    let reviews = h.store.all_reviews();
    assert_eq!(reviews[0].target, ReviewTarget::Content);
    assert_eq!(reviews[0].text, "Fake listing");
}
