use tracing::warn;

use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Checks that the database and cache are reachable.",
    category: "utility",
    usage: "!ping",
    failure: "Database is unreachable",
};

pub async fn ping(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<(), Error> {
    let db = ctx.db();
    db.health_check().await?;

    let cache = db.cache();
    let cache_status = if !cache.is_redis_enabled() {
        "disabled"
    } else if let Err(err) = cache.ping().await {
        warn!(?err, "cache ping failed");
        "unreachable"
    } else {
        "ok"
    };

    ctx.say(format!("Pong! database: ok, cache: {cache_status}"));
    Ok(())
}
