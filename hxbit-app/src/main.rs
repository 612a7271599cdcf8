mod events;

use std::env;
use std::time::Duration;

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use hxbit_commands::{Data, Reply};
use hxbit_database::{
    CacheService, Database, MIGRATOR, cache::DEFAULT_LEADERBOARD_CACHE_TTL,
    database::DEFAULT_MAX_CONNECTIONS,
};
use hxbit_service::{AuthEvent, ServiceClient, ServiceConfig, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter_fn(|metadata| {
            let within_info_level = *metadata.level() <= tracing::Level::INFO;
            within_info_level && !metadata.target().starts_with("sqlx::query")
        }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let service_config = ServiceConfig::from_env()?;
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "hxbit:prod".to_string());

    let mut cache = if redis_enabled {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                    CacheService::disabled(redis_key_prefix.clone())
                }
            },
            Err(_) => {
                warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
                CacheService::disabled(redis_key_prefix.clone())
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(redis_key_prefix.clone())
    };

    let leaderboard_ttl_seconds = env_u64(
        "LEADERBOARD_CACHE_TTL_SECONDS",
        DEFAULT_LEADERBOARD_CACHE_TTL.as_secs(),
    );
    cache.configure_leaderboard_ttl(Duration::from_secs(leaderboard_ttl_seconds));
    info!(
        leaderboard_ttl_seconds = cache.leaderboard_ttl().as_secs(),
        "Leaderboard cache configured."
    );

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let db = Database::connect(&database_url, DEFAULT_MAX_CONNECTIONS, cache).await?;
    info!("PostgreSQL connection established.");

    let auto_run_migrations = env_bool("AUTO_RUN_MIGRATIONS", true);
    if auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let service = ServiceClient::new(service_config)?;
    info!(service_url = %service.config().service_url(), "Hosted service configured.");

    let session = SessionStore::global();
    session.init(None);
    let auth_subscription = session.subscribe(|event| match event {
        AuthEvent::SignedIn(session) => info!(user_id = %session.user_id(), "signed in"),
        AuthEvent::TokenRefreshed(session) => {
            debug!(user_id = %session.user_id(), "access token refreshed")
        }
        AuthEvent::SignedOut => info!("signed out"),
    });

    let data = Data {
        db,
        service,
        session: session.clone(),
    };

    info!("HXBIT is ready. Type !help to list commands.");
    let result = console_loop(&data).await;

    session.unsubscribe(auth_subscription);
    session.teardown();
    data.db.pool().close().await;
    info!("HXBIT shut down.");

    result
}

async fn console_loop(data: &Data) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received.");
                return Ok(());
            }
        };

        let Some(line) = line else {
            return Ok(());
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed, "quit" | "exit" | "!quit" | "!exit") {
            return Ok(());
        }

        match hxbit_commands::run(data, trimmed).await {
            Some(reply) => print_reply(data, reply).await,
            None => println!(
                "Commands start with `{}`. Try `{}help`.",
                hxbit_utils::COMMAND_PREFIX,
                hxbit_utils::COMMAND_PREFIX
            ),
        }
    }
}

async fn print_reply(data: &Data, reply: Reply) {
    for line in &reply.lines {
        println!("{line}");
    }
    for toast in &reply.toasts {
        println!("{toast}");
    }
    for line in events::progress::handle_progress_events(data, &reply.events).await {
        println!("{line}");
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}
