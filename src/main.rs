use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rental_board_bot::config::Config;
use rental_board_bot::database::{PgStore, init};
use rental_board_bot::dispatcher::Marketplace;
use rental_board_bot::flows::{Moderators, Services};
use rental_board_bot::handler::Handler;
use rental_board_bot::notify::DiscordNotifier;
use rental_board_bot::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the variables may come from the real environment.
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let moderators = Moderators::new(&config.moderators);
    if moderators.is_empty() {
        info!(target = "startup", "MODERATORS is empty; moderation commands are disabled");
    }

    let pool = init::connect(&config.database_url, config.db_max_connections)
        .await
        .context("connecting to Postgres")?;
    init::init_schema(&pool).await.context("creating schema")?;
    info!(target = "startup", max_connections = config.db_max_connections, "database ready");

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .await
        .context("creating the Discord client")?;

    let services = Services {
        store: Arc::new(PgStore::new(pool)),
        notifier: Arc::new(DiscordNotifier::new(client.http.clone())),
        moderators,
    };
    let marketplace = Arc::new(Marketplace::new(services, config.session_ttl));

    let sweeper = marketplace.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            sweeper.sessions().purge_expired().await;
        }
    });

    {
        let mut data = client.data.write().await;
        data.insert::<AppState>(Arc::new(AppState {
            marketplace,
            allowed_guild: config.allowed_guild,
        }));
    }

    info!(target = "startup", guild = ?config.allowed_guild, "starting gateway client");
    if let Err(why) = client.start().await {
        error!(target = "startup", error = ?why, "client error");
        return Err(why).context("running the Discord client");
    }
    Ok(())
}
