//! Moderator-only commands: review the queue, approve/deny listings, read
//! content complaints. Approval also fans out notifications to the owner and
//! to every user whose saved search matches the listing.

use super::{Caller, GENERIC_FAILURE, Services, command_id, store_failure};
use crate::database::models::{Listing, ListingStatus, ReviewKind};
use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::{info, instrument, warn};

pub const PERMISSION_DENIED: &str = "You do not have permission to do that.";

fn authorize(svc: &Services, caller: &Caller) -> Result<(), String> {
    if svc.moderators.contains(caller.username.as_deref()) {
        Ok(())
    } else {
        warn!(target = "moderation", platform_id = caller.platform_id, "unauthorized moderator command");
        Err(PERMISSION_DENIED.to_string())
    }
}

/// `/moderated`
pub async fn pending(svc: &Services, caller: &Caller) -> String {
    if let Err(denied) = authorize(svc, caller) {
        return denied;
    }
    let listings = match svc.store.listings_by_status(ListingStatus::Moderation).await {
        Ok(listings) => listings,
        Err(e) => return store_failure("moderation", "listings_by_status", &e),
    };
    if listings.is_empty() {
        return "No listings are waiting for moderation.".to_string();
    }
    let mut out = String::from("Listings waiting for moderation:\n\n");
    for l in &listings {
        let _ = write!(
            out,
            "ID: {}\nItem: {}\nPrice: {}\nLocation: {}\n\nApprove: /add {}\nReject: /deny {}\n\n",
            l.id, l.title, l.price, l.location, l.id, l.id
        );
    }
    out
}

/// Outcome of the post-approval notification fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    pub owner_notified: bool,
    pub searchers_notified: usize,
    pub failures: usize,
}

/// `/add ID`
#[instrument(level = "debug", skip(svc, caller), fields(moderator = caller.platform_id))]
pub async fn approve(svc: &Services, caller: &Caller, args: &str) -> String {
    if let Err(denied) = authorize(svc, caller) {
        return denied;
    }
    let Some(listing_id) = command_id(args) else {
        return "Use: /add [ID]".to_string();
    };
    match svc.store.set_listing_status(listing_id, ListingStatus::Active).await {
        Ok(true) => {}
        Ok(false) => return format!("Listing {listing_id} not found."),
        Err(e) => return store_failure("moderation", "set_listing_status", &e),
    }
    info!(target = "moderation", listing_id, "listing approved");

    let fan_out = match svc.store.listing(listing_id).await {
        Ok(Some(listing)) => notify_approval(svc, &listing).await,
        Ok(None) => FanOut::default(),
        Err(e) => {
            warn!(target = "moderation.notify", listing_id, error = %e, "could not reload approved listing");
            FanOut::default()
        }
    };
    format!(
        "Listing {listing_id} published. Notified {} matching searcher(s).",
        fan_out.searchers_notified
    )
}

/// Best-effort notifications; each failure is logged and the rest still go out.
pub async fn notify_approval(svc: &Services, listing: &Listing) -> FanOut {
    let mut fan_out = FanOut::default();

    match svc.store.user(listing.user_id).await {
        Ok(Some(owner)) => {
            let text = format!("Your listing (ID: {}) has been published.", listing.id);
            match svc.notifier.notify(owner.platform_id, &text).await {
                Ok(()) => fan_out.owner_notified = true,
                Err(e) => {
                    fan_out.failures += 1;
                    warn!(target = "moderation.notify", listing_id = listing.id, error = %e, "owner notification failed");
                }
            }
        }
        Ok(None) => warn!(target = "moderation.notify", listing_id = listing.id, "listing owner missing"),
        Err(e) => {
            fan_out.failures += 1;
            warn!(target = "moderation.notify", listing_id = listing.id, error = %e, "owner lookup failed");
        }
    }

    let searches = match svc.store.saved_searches().await {
        Ok(searches) => searches,
        Err(e) => {
            warn!(target = "moderation.notify", error = %e, "saved search scan failed");
            fan_out.failures += 1;
            return fan_out;
        }
    };
    let text = format!(
        "A new item matches your search: {} (ID: {})\nRepeat the search: /search_ads",
        listing.title, listing.id
    );
    let mut seen = HashSet::new();
    for search in searches.iter().filter(|s| s.matches(listing)) {
        if !seen.insert(search.user_id) {
            continue;
        }
        let user = match svc.store.user(search.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => continue,
            Err(e) => {
                fan_out.failures += 1;
                warn!(target = "moderation.notify", search_id = search.id, error = %e, "searcher lookup failed");
                continue;
            }
        };
        match svc.notifier.notify(user.platform_id, &text).await {
            Ok(()) => fan_out.searchers_notified += 1,
            Err(e) => {
                fan_out.failures += 1;
                warn!(target = "moderation.notify", search_id = search.id, error = %e, "search notification failed");
            }
        }
    }
    info!(
        target = "moderation.notify",
        listing_id = listing.id,
        owner = fan_out.owner_notified,
        searchers = fan_out.searchers_notified,
        failures = fan_out.failures,
        "approval notifications sent"
    );
    fan_out
}

/// `/deny ID`
#[instrument(level = "debug", skip(svc, caller), fields(moderator = caller.platform_id))]
pub async fn reject(svc: &Services, caller: &Caller, args: &str) -> String {
    if let Err(denied) = authorize(svc, caller) {
        return denied;
    }
    let Some(listing_id) = command_id(args) else {
        return "Use: /deny [ID]".to_string();
    };
    match svc.store.set_listing_status(listing_id, ListingStatus::Rejected).await {
        Ok(true) => {
            info!(target = "moderation", listing_id, "listing rejected");
            format!("Listing {listing_id} rejected.")
        }
        Ok(false) => format!("Listing {listing_id} not found."),
        Err(e) => store_failure("moderation", "set_listing_status", &e),
    }
}

/// `/reviews_content`
pub async fn content_reports(svc: &Services, caller: &Caller) -> String {
    if let Err(denied) = authorize(svc, caller) {
        return denied;
    }
    let reports = match svc.store.reviews_by_kind(ReviewKind::Content).await {
        Ok(reports) => reports,
        Err(e) => return store_failure("moderation", "reviews_by_kind", &e),
    };
    if reports.is_empty() {
        return "There are no content complaints.".to_string();
    }
    let mut out = String::from("Content complaints:\n\n");
    for report in &reports {
        let author = match svc.store.user(report.user_id).await {
            Ok(Some(user)) => user.display_handle(),
            Ok(None) => format!("user #{}", report.user_id),
            Err(e) => {
                warn!(target = "moderation", error = %e, "author lookup failed");
                return GENERIC_FAILURE.to_string();
            }
        };
        let _ = write!(out, "User: {}\nText: {}\n\n", author, report.text);
    }
    out
}
