//! `/search_ads`: the caller types filter codes (e.g. `13`), then answers one
//! prompt per code in the typed order. The search is saved for new-listing alerts.

use super::{Caller, Input, Services, Step, store_failure};
use crate::database::models::{Listing, PriceRange, SearchFilters};
use crate::validation::{FilterCode, parse_filter_codes, parse_price};
use std::fmt::Write as _;
use tracing::{info, instrument, warn};

pub const PROMPT_FILTERS: &str = "Search filters:\n1 - Keyword\n2 - Location\n3 - Price\n\nSend the filter numbers (for example: 123):";

/// Filters collected so far and the position of the next code to ask about.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchProgress {
    pub codes: Vec<FilterCode>,
    pub cursor: usize,
    pub filters: SearchFilters,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Filters,
    Keyword(SearchProgress),
    Location(SearchProgress),
    Price(SearchProgress),
}

pub fn start() -> Step<SearchState> {
    Step::next(SearchState::Filters, PROMPT_FILTERS)
}

impl SearchState {
    pub fn accepts(&self, input: &Input<'_>) -> bool {
        matches!(input, Input::Text(_))
    }

    #[instrument(level = "debug", skip_all, fields(platform_id = caller.platform_id))]
    pub async fn handle(self, svc: &Services, caller: &Caller, input: Input<'_>) -> Step<Self> {
        let Input::Text(text) = input else {
            return Step {
                replies: Vec::new(),
                next: Some(self),
            };
        };
        match self {
            Self::Filters => match parse_filter_codes(text) {
                Ok(codes) => {
                    let progress = SearchProgress {
                        codes,
                        cursor: 0,
                        filters: SearchFilters::default(),
                    };
                    next_filter(svc, caller, progress).await
                }
                Err(e) => Step::next(Self::Filters, e.to_string()),
            },
            Self::Keyword(mut progress) => {
                progress.filters.keyword = filter_text(text);
                next_filter(svc, caller, progress).await
            }
            Self::Location(mut progress) => {
                progress.filters.location = filter_text(text);
                next_filter(svc, caller, progress).await
            }
            Self::Price(mut progress) => match parse_price(text) {
                Ok(price) => {
                    progress.filters.price = PriceRange::exact(price);
                    next_filter(svc, caller, progress).await
                }
                Err(e) => Step::next(Self::Price(progress), e.to_string()),
            },
        }
    }
}

/// Blank answers leave the filter unset; an empty pattern would match every listing.
fn filter_text(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Prompts for the code under the cursor, or runs the search once every code is answered.
async fn next_filter(svc: &Services, caller: &Caller, mut progress: SearchProgress) -> Step<SearchState> {
    let Some(code) = progress.codes.get(progress.cursor).copied() else {
        return Step::done(execute(svc, caller, &progress.filters).await);
    };
    progress.cursor += 1;
    match code {
        FilterCode::Keyword => Step::next(SearchState::Keyword(progress), "Enter a keyword:"),
        FilterCode::Location => Step::next(SearchState::Location(progress), "Enter a location:"),
        FilterCode::Price => Step::next(
            SearchState::Price(progress),
            "Enter the rental price (a single number):",
        ),
    }
}

async fn execute(svc: &Services, caller: &Caller, filters: &SearchFilters) -> String {
    // Saving the search is best-effort; the caller still gets results.
    match svc.resolve_user(caller).await {
        Ok(user) => {
            if let Err(e) = svc.store.create_search(user.id, filters).await {
                warn!(target = "flow.search", error = %e, "saving search failed");
            }
        }
        Err(e) => warn!(target = "flow.search", error = %e, "resolve_user failed; search not saved"),
    }
    match svc.store.search_listings(filters).await {
        Ok(listings) => {
            info!(target = "flow.search", results = listings.len(), "search executed");
            render_results(&listings)
        }
        Err(e) => store_failure("search", "search_listings", &e),
    }
}

pub fn render_results(listings: &[Listing]) -> String {
    if listings.is_empty() {
        return "No listings found.".to_string();
    }
    let mut out = String::from("Search results:\n\n");
    for listing in listings {
        let _ = write!(
            out,
            "ID: {}\nItem: {}\nPrice: {}\nLocation: {}\nContact: {}\n\n",
            listing.id, listing.title, listing.price, listing.location, listing.contact
        );
    }
    out
}
