//! Routes one inbound message to the caller's active flow step or to a global command.

use crate::commands::help;
use crate::flows::{
    Caller, Conversation, Input, Services, Step, command_id, delete, edit, moderation, report,
    search, store_failure, submit,
};
use crate::session::{SessionGuard, SessionStore};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    SubmitAd,
    EditAd,
    DeleteAd,
    SearchAds,
    Reviews,
    ReviewsBot,
    ReviewsAd,
    Report,
    ReportBot,
    ReportAd,
    ReportContent,
    Confirm,
    Cancel,
    Moderated,
    Add,
    Deny,
    ReviewsContent,
    Unknown,
}

impl FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Command::Start),
            "help" => Ok(Command::Help),
            "submit_ad" => Ok(Command::SubmitAd),
            "edit_ad" => Ok(Command::EditAd),
            "delete_ad" => Ok(Command::DeleteAd),
            "search_ads" => Ok(Command::SearchAds),
            "reviews" => Ok(Command::Reviews),
            "reviews_bot" => Ok(Command::ReviewsBot),
            "reviews_ad" => Ok(Command::ReviewsAd),
            "report" => Ok(Command::Report),
            "report_bot" => Ok(Command::ReportBot),
            "report_ad" => Ok(Command::ReportAd),
            "report_content" => Ok(Command::ReportContent),
            "confirm" => Ok(Command::Confirm),
            "cancel" => Ok(Command::Cancel),
            "moderated" => Ok(Command::Moderated),
            "add" => Ok(Command::Add),
            "deny" => Ok(Command::Deny),
            "reviews_content" => Ok(Command::ReviewsContent),
            _ => Ok(Command::Unknown),
        }
    }
}

/// Splits `/name[@bot] args` into a command and its argument text; anything else is free text.
/// The name stops at the first character that is not a letter or `_`, so `/edit_ad5` reads as
/// `edit_ad` with argument `5`.
pub fn parse_input(text: &str) -> Input<'_> {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Input::Text(text);
    };
    let name_end = body
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(body.len());
    let (name, mut rest) = body.split_at(name_end);
    if let Some(mention) = rest.strip_prefix('@') {
        rest = mention
            .find(char::is_whitespace)
            .map_or("", |idx| &mention[idx..]);
    }
    let command = Command::from_str(&name.to_ascii_lowercase()).unwrap_or(Command::Unknown);
    Input::Command(command, rest.trim())
}

/// Shared entry point for the transport: owns the flow services and the session store.
pub struct Marketplace {
    services: Services,
    sessions: SessionStore,
}

impl Marketplace {
    pub fn new(services: Services, session_ttl: Duration) -> Self {
        Self {
            services,
            sessions: SessionStore::new(session_ttl),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one message and returns the replies to send back, in order.
    /// The caller's session stays locked until the step has finished, so a
    /// second message from the same user waits instead of missing the flow.
    #[instrument(level = "debug", skip(self, caller, text), fields(platform_id = caller.platform_id))]
    pub async fn dispatch(&self, caller: &Caller, text: &str) -> Vec<String> {
        let input = parse_input(text);
        let mut session = self.sessions.lock(caller.platform_id).await;
        match session.take() {
            Some(conversation) if conversation.accepts(&input) => {
                let flow = conversation.name();
                let step = conversation.handle(&self.services, caller, input).await;
                store_step(&mut session, caller, flow, step)
            }
            active => self.global(&mut session, caller, input, active).await,
        }
    }

    /// Input the active step (if any) did not take. Entry commands and `/cancel`
    /// drop `active`; everything else leaves it in place.
    async fn global(
        &self,
        session: &mut SessionGuard,
        caller: &Caller,
        input: Input<'_>,
        active: Option<Conversation>,
    ) -> Vec<String> {
        let svc = &self.services;
        let Input::Command(command, args) = input else {
            if let Some(conversation) = active {
                session.put(conversation);
            }
            return Vec::new();
        };

        let entry = match command {
            Command::SubmitAd => submit::start().map(Conversation::Submit),
            Command::EditAd => {
                let step = match command_id(args) {
                    Some(id) => edit::open(svc, caller, id).await,
                    None => edit::start(svc, caller).await,
                };
                step.map(Conversation::Edit)
            }
            Command::SearchAds => search::start().map(Conversation::Search),
            Command::ReportBot => report::start_bot().map(Conversation::Report),
            Command::ReportAd => report::start_listing(svc, args).await.map(Conversation::Report),
            Command::ReportContent => report::start_content().map(Conversation::Report),
            Command::Cancel => {
                return match active {
                    Some(previous) => {
                        debug!(target = "session", platform_id = caller.platform_id, flow = previous.name(), "flow cancelled");
                        vec!["Cancelled.".to_string()]
                    }
                    None => vec!["Nothing to cancel.".to_string()],
                };
            }
            other => {
                if let Some(conversation) = active {
                    session.put(conversation);
                }
                return self.stateless(other, caller, args).await.into_iter().collect();
            }
        };
        if let Some(previous) = active {
            debug!(target = "session", platform_id = caller.platform_id, replaced = previous.name(), "flow replaced");
        }
        let flow = entry.next.as_ref().map_or("none", Conversation::name);
        store_step(session, caller, flow, entry)
    }

    /// Commands that never open a flow.
    async fn stateless(&self, command: Command, caller: &Caller, args: &str) -> Option<String> {
        let svc = &self.services;
        let reply = match command {
            Command::Start => match svc.resolve_user(caller).await {
                Ok(_) => help::GREETING.to_string(),
                Err(e) => store_failure("start", "resolve_user", &e),
            },
            Command::Help => help::help_text(svc.moderators.contains(caller.username.as_deref())),
            Command::DeleteAd => delete::run(svc, caller, args).await,
            Command::Reviews => report::REVIEWS_MENU.to_string(),
            Command::ReviewsBot => report::bot_reviews(svc).await,
            Command::ReviewsAd => report::listing_reviews(svc, args).await,
            Command::Report => report::REPORT_MENU.to_string(),
            Command::Confirm => "Nothing to confirm.".to_string(),
            Command::Moderated => moderation::pending(svc, caller).await,
            Command::Add => moderation::approve(svc, caller, args).await,
            Command::Deny => moderation::reject(svc, caller, args).await,
            Command::ReviewsContent => moderation::content_reports(svc, caller).await,
            _ => return None,
        };
        Some(reply)
    }
}

fn store_step(
    session: &mut SessionGuard,
    caller: &Caller,
    flow: &'static str,
    step: Step<Conversation>,
) -> Vec<String> {
    match step.next {
        Some(next) => session.put(next),
        None => debug!(target = "session", platform_id = caller.platform_id, flow, "flow finished"),
    }
    step.replies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_input("/edit_ad 5"), Input::Command(Command::EditAd, "5"));
        assert_eq!(parse_input("/edit_ad5"), Input::Command(Command::EditAd, "5"));
        assert_eq!(parse_input("/ADD 7 "), Input::Command(Command::Add, "7"));
        assert_eq!(
            parse_input("/delete_ad@rental_bot 3"),
            Input::Command(Command::DeleteAd, "3")
        );
        assert_eq!(parse_input("/confirm"), Input::Command(Command::Confirm, ""));
    }

    #[test]
    fn unknown_commands_and_text() {
        assert_eq!(parse_input("/nope"), Input::Command(Command::Unknown, ""));
        assert_eq!(parse_input("Dress"), Input::Text("Dress"));
        assert_eq!(parse_input(" 12 "), Input::Text(" 12 "));
    }
}
