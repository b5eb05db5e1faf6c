//! `/delete_ad ID`, standalone or from the edit flow.

use super::{Caller, NOT_FOUND_OR_FOREIGN, Services, command_id, store_failure};
use tracing::{info, instrument};

pub const USAGE: &str = "Use: /delete_ad [ID]";

#[instrument(level = "debug", skip(svc, caller), fields(platform_id = caller.platform_id))]
pub async fn run(svc: &Services, caller: &Caller, args: &str) -> String {
    let Some(listing_id) = command_id(args) else {
        return USAGE.to_string();
    };
    let user = match svc.resolve_user(caller).await {
        Ok(user) => user,
        Err(e) => return store_failure("delete", "resolve_user", &e),
    };
    match svc.store.listing(listing_id).await {
        Ok(Some(listing)) if listing.user_id == user.id => {}
        Ok(_) => return NOT_FOUND_OR_FOREIGN.to_string(),
        Err(e) => return store_failure("delete", "listing", &e),
    }
    match svc.store.delete_listing(listing_id).await {
        Ok(true) => {
            info!(target = "flow.delete", listing_id, user_id = user.id, "listing deleted");
            "Listing deleted.".to_string()
        }
        Ok(false) => NOT_FOUND_OR_FOREIGN.to_string(),
        Err(e) => store_failure("delete", "delete_listing", &e),
    }
}
