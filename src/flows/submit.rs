//! `/submit_ad`: Title -> Price -> Location -> Contact -> Confirm.

use super::{Caller, Input, Services, Step, store_failure};
use crate::database::models::ListingDraft;
use crate::dispatcher::Command;
use crate::validation::{parse_contact, parse_price, require_text};
use tracing::{info, instrument};

const PROMPT_TITLE: &str = "Enter the item name.";
const PROMPT_PRICE: &str = "Enter the rental price.";
const PROMPT_LOCATION: &str = "Enter where the item is located.";
const PROMPT_CONTACT: &str = "Enter your contact details (phone 89111111111 or @username).";
const CONFIRM_HINT: &str = "Confirm the listing:\n/confirm - send\n/cancel - discard";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    Title,
    Price {
        title: String,
    },
    Location {
        title: String,
        price: f64,
    },
    Contact {
        title: String,
        price: f64,
        location: String,
    },
    Confirm(ListingDraft),
}

pub fn start() -> Step<SubmitState> {
    Step::next(SubmitState::Title, PROMPT_TITLE)
}

pub fn summary(draft: &ListingDraft) -> String {
    format!(
        "Item name: {}\nRental price: {}\nLocation: {}\nContact: {}\n\n{}",
        draft.title, draft.price, draft.location, draft.contact, CONFIRM_HINT
    )
}

impl SubmitState {
    pub fn accepts(&self, input: &Input<'_>) -> bool {
        match (self, input) {
            (_, Input::Text(_)) => true,
            (Self::Confirm(_), Input::Command(cmd, _)) => {
                matches!(cmd, Command::Confirm | Command::Cancel)
            }
            _ => false,
        }
    }

    #[instrument(level = "debug", skip_all, fields(platform_id = caller.platform_id))]
    pub async fn handle(self, svc: &Services, caller: &Caller, input: Input<'_>) -> Step<Self> {
        match (self, input) {
            (Self::Title, Input::Text(text)) => match require_text(text) {
                Ok(title) => Step::next(Self::Price { title }, PROMPT_PRICE),
                Err(e) => Step::next(Self::Title, e.to_string()),
            },
            (Self::Price { title }, Input::Text(text)) => match parse_price(text) {
                Ok(price) => Step::next(Self::Location { title, price }, PROMPT_LOCATION),
                Err(e) => Step::next(Self::Price { title }, e.to_string()),
            },
            (Self::Location { title, price }, Input::Text(text)) => Step::next(
                Self::Contact {
                    title,
                    price,
                    location: text.to_string(),
                },
                PROMPT_CONTACT,
            ),
            (
                Self::Contact {
                    title,
                    price,
                    location,
                },
                Input::Text(text),
            ) => match parse_contact(text) {
                Ok(contact) => {
                    let draft = ListingDraft {
                        title,
                        price,
                        location,
                        contact,
                    };
                    let reply = summary(&draft);
                    Step::next(Self::Confirm(draft), reply)
                }
                Err(e) => Step::next(
                    Self::Contact {
                        title,
                        price,
                        location,
                    },
                    e.to_string(),
                ),
            },
            (Self::Confirm(draft), Input::Command(Command::Confirm, _)) => {
                Step::done(persist(svc, caller, &draft).await)
            }
            (Self::Confirm(_), Input::Command(Command::Cancel, _)) => {
                Step::done("Listing discarded.")
            }
            (Self::Confirm(draft), _) => Step::next(Self::Confirm(draft), CONFIRM_HINT),
            // The dispatcher only routes accepted input; anything else keeps the state.
            (state, _) => Step {
                replies: Vec::new(),
                next: Some(state),
            },
        }
    }
}

async fn persist(svc: &Services, caller: &Caller, draft: &ListingDraft) -> String {
    let user = match svc.resolve_user(caller).await {
        Ok(user) => user,
        Err(e) => return store_failure("submit", "resolve_user", &e),
    };
    match svc.store.create_listing(user.id, draft).await {
        Ok(id) => {
            info!(target = "flow.submit", listing_id = id, user_id = user.id, "listing submitted");
            "Sent to moderation. You will get a message once it is published.".to_string()
        }
        Err(e) => store_failure("submit", "create_listing", &e),
    }
}
