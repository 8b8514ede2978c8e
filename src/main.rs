//! Feed inspection CLI.
//! Reads a saved challenge-listing response and prints the canonical records.
//!
//! Usage: `ctf-feed-ingest <platform|feed-name> <file>`

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ctf_feed_ingest::ingest::config::load_feed_config_default;
use ctf_feed_ingest::{parse_feed_str, Platform};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ctf_feed_ingest=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// A platform identifier, or else a feed name from the feed config.
fn resolve_platform(selector: &str) -> Result<Platform> {
    if let Ok(p) = selector.parse::<Platform>() {
        return Ok(p);
    }
    let cfg = load_feed_config_default()?;
    cfg.platform_for(selector)
        .ok_or_else(|| anyhow!("{selector:?} is neither a platform nor a configured feed"))
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [selector, path] = args.as_slice() else {
        bail!("usage: ctf-feed-ingest <platform|feed-name> <file>");
    };

    let platform = resolve_platform(selector)?;
    let body = fs::read_to_string(path).with_context(|| format!("reading feed body from {path}"))?;

    let records = parse_feed_str(platform, &body)
        .with_context(|| format!("parsing {path} as {platform}"))?;
    tracing::info!(platform = platform.id(), count = records.len(), "feed parsed");

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
