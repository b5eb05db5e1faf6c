//! Feedback: `/report_*` collects one free-text review, `/reviews_*` lists them.

use super::{Caller, Input, Services, Step, command_id, store_failure};
use crate::database::models::{Review, ReviewKind, ReviewTarget};
use std::fmt::Write as _;
use tracing::{info, instrument};

pub const REPORT_MENU: &str = "Choose what you want to send:\n\n\
1. Bot feedback - /report_bot\n\
2. Item review - /report_ad [item ID]\n\
3. Content complaint - /report_content\n\n\
Example: /report_ad 5 leaves a review for item 5.";

pub const REVIEWS_MENU: &str =
    "Choose which reviews to read:\n/reviews_bot - about the bot\n/reviews_ad [ID] - about an item";

/// Waiting for the review text; the target was fixed by the entry command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportState {
    pub target: ReviewTarget,
}

pub fn start_bot() -> Step<ReportState> {
    Step::next(
        ReportState {
            target: ReviewTarget::Bot,
        },
        "Leave your feedback about the bot:",
    )
}

pub fn start_content() -> Step<ReportState> {
    Step::next(
        ReportState {
            target: ReviewTarget::Content,
        },
        "Describe the problem (spam, fraud, etc.):",
    )
}

/// `/report_ad ID`; refuses to start for unknown listings so listing reviews always reference one.
pub async fn start_listing(svc: &Services, args: &str) -> Step<ReportState> {
    let Some(listing_id) = command_id(args) else {
        return Step::done("Use: /report_ad [ID]\nExample: /report_ad 5");
    };
    match svc.store.listing(listing_id).await {
        Ok(Some(_)) => Step::next(
            ReportState {
                target: ReviewTarget::Listing(listing_id),
            },
            "Leave your review of the item:",
        ),
        Ok(None) => Step::done(format!("Item {listing_id} not found.")),
        Err(e) => Step::done(store_failure("report", "listing", &e)),
    }
}

fn thank_you(target: ReviewTarget) -> String {
    match target {
        ReviewTarget::Bot => "Thank you for your feedback about the bot!".to_string(),
        ReviewTarget::Listing(id) => format!("Thank you for your review of item {id}!"),
        ReviewTarget::Content => {
            "Thank you for your complaint! The moderators will look into it.".to_string()
        }
    }
}

impl ReportState {
    pub fn accepts(&self, input: &Input<'_>) -> bool {
        matches!(input, Input::Text(_))
    }

    /// Stores the review; the flow ends whatever the outcome.
    #[instrument(level = "debug", skip_all, fields(platform_id = caller.platform_id, kind = ?self.target.kind()))]
    pub async fn handle(self, svc: &Services, caller: &Caller, input: Input<'_>) -> Step<Self> {
        let Input::Text(text) = input else {
            return Step {
                replies: Vec::new(),
                next: Some(self),
            };
        };
        let user = match svc.resolve_user(caller).await {
            Ok(user) => user,
            Err(e) => return Step::done(store_failure("report", "resolve_user", &e)),
        };
        match svc.store.create_review(user.id, self.target, text).await {
            Ok(id) => {
                info!(target = "flow.report", review_id = id, "review stored");
                Step::done(thank_you(self.target))
            }
            Err(e) => Step::done(store_failure("report", "create_review", &e)),
        }
    }
}

fn render_reviews(title: &str, reviews: &[Review]) -> String {
    let mut out = format!("{title}:\n\n");
    for review in reviews {
        let _ = writeln!(out, "- {}", review.text);
    }
    out
}

pub async fn bot_reviews(svc: &Services) -> String {
    match svc.store.reviews_by_kind(ReviewKind::Bot).await {
        Ok(reviews) if reviews.is_empty() => "There are no reviews of the bot yet.".to_string(),
        Ok(reviews) => render_reviews("Reviews of the bot", &reviews),
        Err(e) => store_failure("reviews", "reviews_by_kind", &e),
    }
}

pub async fn listing_reviews(svc: &Services, args: &str) -> String {
    let Some(listing_id) = command_id(args) else {
        return "Use: /reviews_ad [ID]\nExample: /reviews_ad 5".to_string();
    };
    match svc.store.listing_reviews(listing_id).await {
        Ok(reviews) if reviews.is_empty() => {
            format!("There are no reviews of item {listing_id} yet.")
        }
        Ok(reviews) => render_reviews(&format!("Reviews of item {listing_id}"), &reviews),
        Err(e) => store_failure("reviews", "listing_reviews", &e),
    }
}
