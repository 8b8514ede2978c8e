// src/ingest/config.rs
//! Which adapter each configured feed uses. Selection is explicit
//! configuration; nothing here looks at payloads.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::registry::Platform;

pub const ENV_PATH: &str = "CTF_FEED_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedEntry {
    pub name: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

impl FeedConfig {
    /// Platform configured for `name` (case-insensitive).
    pub fn platform_for(&self, name: &str) -> Option<Platform> {
        let name = name.trim();
        self.feeds
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.platform)
    }
}

/// Load feed config from an explicit path. Supports TOML or JSON formats.
pub fn load_feed_config_from(path: &Path) -> Result<FeedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_feed_config(&content, ext.as_str())
        .with_context(|| format!("parsing feed config {}", path.display()))
}

/// Load feed config using env var + fallbacks:
/// 1) $CTF_FEED_CONFIG_PATH
/// 2) config/feeds.toml
/// 3) config/feeds.json
pub fn load_feed_config_default() -> Result<FeedConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_feed_config_from(&pb);
        } else {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/feeds.toml");
    if toml_p.exists() {
        return load_feed_config_from(&toml_p);
    }
    let json_p = PathBuf::from("config/feeds.json");
    if json_p.exists() {
        return load_feed_config_from(&json_p);
    }
    Ok(FeedConfig::default())
}

fn parse_feed_config(s: &str, hint_ext: &str) -> Result<FeedConfig> {
    let cfg: FeedConfig = match hint_ext {
        "toml" => toml::from_str(s)?,
        "json" => serde_json::from_str(s)?,
        // No usable extension: JSON first, then TOML.
        _ => match serde_json::from_str(s) {
            Ok(c) => c,
            Err(_) => toml::from_str(s).map_err(|_| anyhow!("unsupported feed config format"))?,
        },
    };
    Ok(clean(cfg))
}

/// Trim names, drop blank ones; a repeated name keeps its last platform.
fn clean(cfg: FeedConfig) -> FeedConfig {
    let mut feeds: Vec<FeedEntry> = Vec::with_capacity(cfg.feeds.len());
    for mut f in cfg.feeds {
        f.name = f.name.trim().to_string();
        if f.name.is_empty() {
            continue;
        }
        feeds.retain(|existing| !existing.name.eq_ignore_ascii_case(&f.name));
        feeds.push(f);
    }
    FeedConfig { feeds }
}
