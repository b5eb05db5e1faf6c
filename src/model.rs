//! Shared state stored in serenity's `TypeMap` so the event handler can reach it.

use crate::dispatcher::Marketplace;
use serenity::model::id::GuildId;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;

/// The central, shared state of the application.
pub struct AppState {
    /// Flow services plus the per-user session store.
    pub marketplace: Arc<Marketplace>,
    /// Guild whose channels the bot listens in; `None` means every guild.
    pub allowed_guild: Option<GuildId>,
}

impl AppState {
    pub async fn from_ctx(ctx: &serenity::prelude::Context) -> Option<Arc<Self>> {
        ctx.data.read().await.get::<AppState>().cloned()
    }

    /// Direct messages are always accepted; guild messages only from the allowed guild.
    pub fn accepts_guild(&self, guild_id: Option<GuildId>) -> bool {
        match (guild_id, self.allowed_guild) {
            (None, _) | (Some(_), None) => true,
            (Some(got), Some(allowed)) => got == allowed,
        }
    }
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}
