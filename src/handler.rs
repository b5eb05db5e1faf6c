use crate::AppState;
use crate::flows::Caller;
use crate::util::chunk_message;
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::{channel::Message, gateway::Ready};
use serenity::prelude::EventHandler;
use tracing::{debug, error, info, warn};

pub struct Handler;

impl Handler {
    fn caller(msg: &Message) -> Caller {
        Caller {
            platform_id: msg.author.id.get() as i64,
            username: Some(msg.author.name.clone()),
            first_name: msg.author.global_name.clone(),
            last_name: None,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(app_state) = AppState::from_ctx(&ctx).await else {
            error!(target = "handler", "AppState missing from TypeMap");
            return;
        };
        if !app_state.accepts_guild(msg.guild_id) {
            return;
        }

        let caller = Self::caller(&msg);
        let replies = app_state.marketplace.dispatch(&caller, &msg.content).await;
        if replies.is_empty() {
            return;
        }
        debug!(target = "handler", platform_id = caller.platform_id, replies = replies.len(), "sending replies");
        for reply in &replies {
            for chunk in chunk_message(reply) {
                if let Err(e) = msg.channel_id.say(&ctx.http, chunk).await {
                    warn!(target = "handler", channel = %msg.channel_id, error = ?e, "failed to send reply");
                    return;
                }
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(target = "handler", user = %ready.user.name, guilds = ready.guilds.len(), "connected and ready");
    }
}
