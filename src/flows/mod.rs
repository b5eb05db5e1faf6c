//! Conversation flows. Each multi-step flow is a sum type whose variants carry
//! exactly the data collected so far; a handler consumes the current variant
//! and returns a `Step` holding the replies and the next variant (or `None`
//! when the flow is over).

pub mod delete;
pub mod edit;
pub mod moderation;
pub mod report;
pub mod search;
pub mod submit;

use crate::database::models::{NewUser, User};
use crate::database::{Store, StoreError, StoreResult};
use crate::notify::Notifier;
use std::collections::HashSet;
use std::sync::Arc;

pub const GENERIC_FAILURE: &str = "Something went wrong on our side. Please try again later.";
pub const NOT_FOUND_OR_FOREIGN: &str = "Listing not found or it does not belong to you.";

/// The sender of the message being handled, as reported by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub platform_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Caller {
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            platform_id: self.platform_id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// One parsed inbound message: either a `/command` with its raw argument text or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Command(crate::dispatcher::Command, &'a str),
    Text(&'a str),
}

/// Allow-list of moderator handles, stored without `@` and lower-cased.
#[derive(Debug, Clone, Default)]
pub struct Moderators(HashSet<String>);

impl Moderators {
    pub fn new<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            handles
                .into_iter()
                .map(|h| normalize_handle(h.as_ref()))
                .filter(|h| !h.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, handle: Option<&str>) -> bool {
        handle.is_some_and(|h| self.0.contains(&normalize_handle(h)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_lowercase()
}

/// Everything a flow handler may touch besides the caller's own conversation.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn Store>,
    pub notifier: Arc<dyn Notifier>,
    pub moderators: Moderators,
}

impl Services {
    /// Upserts the caller so every flow can rely on a `users` row existing.
    pub async fn resolve_user(&self, caller: &Caller) -> StoreResult<User> {
        self.store.upsert_user(&caller.to_new_user()).await
    }
}

/// Result of feeding one input to a flow.
#[derive(Debug)]
pub struct Step<S> {
    pub replies: Vec<String>,
    pub next: Option<S>,
}

impl<S> Step<S> {
    pub fn next(state: S, reply: impl Into<String>) -> Self {
        Self {
            replies: vec![reply.into()],
            next: Some(state),
        }
    }

    pub fn done(reply: impl Into<String>) -> Self {
        Self {
            replies: vec![reply.into()],
            next: None,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Step<T> {
        Step {
            replies: self.replies,
            next: self.next.map(f),
        }
    }
}

/// The caller's active multi-step flow and its current step.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversation {
    Submit(submit::SubmitState),
    Edit(edit::EditState),
    Search(search::SearchState),
    Report(report::ReportState),
}

impl Conversation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::Edit(_) => "edit",
            Self::Search(_) => "search",
            Self::Report(_) => "report",
        }
    }

    /// Whether the current step consumes `input` (otherwise it is a global command).
    pub fn accepts(&self, input: &Input<'_>) -> bool {
        match self {
            Self::Submit(state) => state.accepts(input),
            Self::Edit(state) => state.accepts(input),
            Self::Search(state) => state.accepts(input),
            Self::Report(state) => state.accepts(input),
        }
    }

    pub async fn handle(self, svc: &Services, caller: &Caller, input: Input<'_>) -> Step<Self> {
        match self {
            Self::Submit(state) => state.handle(svc, caller, input).await.map(Self::Submit),
            Self::Edit(state) => state.handle(svc, caller, input).await.map(Self::Edit),
            Self::Search(state) => state.handle(svc, caller, input).await.map(Self::Search),
            Self::Report(state) => state.handle(svc, caller, input).await.map(Self::Report),
        }
    }
}

/// Logs a store failure and returns the generic message shown to the user.
pub(crate) fn store_failure(flow: &'static str, op: &'static str, err: &StoreError) -> String {
    tracing::error!(target = "flow", flow, op, error = %err, "store operation failed");
    GENERIC_FAILURE.to_string()
}

/// Extracts the first whitespace-separated token of a command's arguments as an id.
pub(crate) fn command_id(args: &str) -> Option<i64> {
    args.split_whitespace()
        .next()
        .and_then(crate::validation::parse_id)
}
