//! `/edit_ad`: list own listings, pick one (`/edit_ad ID`) or delete one
//! (`/delete_ad ID`), choose a field 1-4, send the new value.

use super::{Caller, Input, NOT_FOUND_OR_FOREIGN, Services, Step, command_id, delete, store_failure};
use crate::database::models::{Listing, ListingField, ListingUpdate};
use crate::dispatcher::Command;
use crate::validation::{parse_contact, parse_field_choice, parse_price, require_text};
use std::fmt::Write as _;
use tracing::{info, instrument};

const ACTION_HINT: &str =
    "Send one of:\n/edit_ad [ID] - edit a listing\n/delete_ad [ID] - delete a listing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Action,
    ChooseField { listing_id: i64 },
    GetValue { listing_id: i64, field: ListingField },
}

/// Lists the caller's listings and waits for an edit/delete command.
#[instrument(level = "debug", skip_all, fields(platform_id = caller.platform_id))]
pub async fn start(svc: &Services, caller: &Caller) -> Step<EditState> {
    let user = match svc.resolve_user(caller).await {
        Ok(user) => user,
        Err(e) => return Step::done(store_failure("edit", "resolve_user", &e)),
    };
    let listings = match svc.store.listings_by_owner(user.id).await {
        Ok(listings) => listings,
        Err(e) => return Step::done(store_failure("edit", "listings_by_owner", &e)),
    };
    if listings.is_empty() {
        return Step::done("You have no listings.");
    }
    let mut reply = String::from("Your listings:\n");
    for listing in &listings {
        let _ = writeln!(
            reply,
            "ID: {} | {} | Status: {}",
            listing.id, listing.title, listing.status
        );
    }
    reply.push('\n');
    reply.push_str(ACTION_HINT);
    Step::next(EditState::Action, reply)
}

/// Handles `/edit_ad ID`: checks ownership and shows the field menu.
pub async fn open(svc: &Services, caller: &Caller, listing_id: i64) -> Step<EditState> {
    let user = match svc.resolve_user(caller).await {
        Ok(user) => user,
        Err(e) => return Step::done(store_failure("edit", "resolve_user", &e)),
    };
    match svc.store.listing(listing_id).await {
        Ok(Some(listing)) if listing.user_id == user.id => {
            Step::next(EditState::ChooseField { listing_id }, field_menu(&listing))
        }
        Ok(_) => Step::done(NOT_FOUND_OR_FOREIGN),
        Err(e) => Step::done(store_failure("edit", "listing", &e)),
    }
}

pub fn field_menu(listing: &Listing) -> String {
    let mut menu = String::new();
    for field in ListingField::ALL {
        let _ = writeln!(
            menu,
            "{} | {:<16} | {}",
            field.index(),
            field.label(),
            field.value_of(listing)
        );
    }
    menu.push_str("\nChoose the field to change (1-4):");
    menu
}

fn value_prompt(field: ListingField) -> &'static str {
    match field {
        ListingField::Title => "Enter the new item name.",
        ListingField::Price => "Enter the new rental price.",
        ListingField::Location => "Enter the new location.",
        ListingField::Contact => "Enter the new contact details (89111111111 or @username).",
    }
}

impl EditState {
    pub fn accepts(&self, input: &Input<'_>) -> bool {
        match (self, input) {
            (_, Input::Text(_)) => true,
            (Self::Action, Input::Command(cmd, _)) => {
                matches!(cmd, Command::EditAd | Command::DeleteAd)
            }
            _ => false,
        }
    }

    #[instrument(level = "debug", skip_all, fields(platform_id = caller.platform_id))]
    pub async fn handle(self, svc: &Services, caller: &Caller, input: Input<'_>) -> Step<Self> {
        match (self, input) {
            (Self::Action, Input::Command(Command::EditAd, args)) => match command_id(args) {
                Some(id) => open(svc, caller, id).await,
                None => Step::next(Self::Action, "Invalid format. Use: /edit_ad [ID]"),
            },
            (Self::Action, Input::Command(Command::DeleteAd, args)) => match command_id(args) {
                Some(_) => Step::done(delete::run(svc, caller, args).await),
                None => Step::next(Self::Action, delete::USAGE),
            },
            (Self::Action, _) => Step::next(Self::Action, ACTION_HINT),
            (Self::ChooseField { listing_id }, Input::Text(text)) => {
                match parse_field_choice(text) {
                    Ok(field) => {
                        Step::next(Self::GetValue { listing_id, field }, value_prompt(field))
                    }
                    Err(e) => Step::next(Self::ChooseField { listing_id }, e.to_string()),
                }
            }
            (Self::GetValue { listing_id, field }, Input::Text(text)) => {
                let update = match field {
                    ListingField::Title => require_text(text).map(ListingUpdate::Title),
                    ListingField::Price => parse_price(text).map(ListingUpdate::Price),
                    ListingField::Location => Ok(ListingUpdate::Location(text.to_string())),
                    ListingField::Contact => parse_contact(text).map(ListingUpdate::Contact),
                };
                match update {
                    Ok(update) => Step::done(apply(svc, listing_id, &update).await),
                    Err(e) => Step::next(Self::GetValue { listing_id, field }, e.to_string()),
                }
            }
            (state, _) => Step {
                replies: Vec::new(),
                next: Some(state),
            },
        }
    }
}

async fn apply(svc: &Services, listing_id: i64, update: &ListingUpdate) -> String {
    match svc.store.update_listing_field(listing_id, update).await {
        Ok(true) => {
            info!(target = "flow.edit", listing_id, field = ?update.field(), "listing updated");
            "Listing updated. To change another field, send /edit_ad [ID] again.".to_string()
        }
        Ok(false) => NOT_FOUND_OR_FOREIGN.to_string(),
        Err(e) => store_failure("edit", "update_listing_field", &e),
    }
}
