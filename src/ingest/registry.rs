//! Adapter selection. The caller names the platform (usually via
//! [`crate::ingest::config::FeedConfig`]); payloads are never sniffed, since
//! rCTF, picoCTF and generic feeds are too alike to tell apart reliably.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ingest::error::FeedError;
use crate::ingest::providers::{
    ctfd::CtfdAdapter, generic::GenericAdapter, gzctf::GzctfAdapter, picoctf::PicoCtfAdapter,
    pointer_overflow::PointerOverflowAdapter, rctf::RctfAdapter, zero7ctf::Zero7CtfAdapter,
};
use crate::ingest::types::{ChallengeAdapter, ChallengeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    Ctfd,
    Gzctf,
    Rctf,
    PicoCtf,
    Zero7Ctf,
    PointerOverflow,
    Generic,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Ctfd,
        Platform::Gzctf,
        Platform::Rctf,
        Platform::PicoCtf,
        Platform::Zero7Ctf,
        Platform::PointerOverflow,
        Platform::Generic,
    ];

    /// Stable config identifier.
    pub fn id(self) -> &'static str {
        match self {
            Platform::Ctfd => "ctfd",
            Platform::Gzctf => "gzctf",
            Platform::Rctf => "rctf",
            Platform::PicoCtf => "picoctf",
            Platform::Zero7Ctf => "07ctf",
            Platform::PointerOverflow => "pointer-overflow",
            Platform::Generic => "generic",
        }
    }

    /// Human-facing name, used as the error message prefix.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Ctfd => "CTFd",
            Platform::Gzctf => "GzCTF",
            Platform::Rctf => "rCTF",
            Platform::PicoCtf => "picoCTF",
            Platform::Zero7Ctf => "07CTF",
            Platform::PointerOverflow => "Pointer Overflow CTF",
            Platform::Generic => "Generic",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown platform identifier: {0:?}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(*c, '-' | '_' | ' '))
            .collect();
        let p = match key.as_str() {
            "ctfd" => Platform::Ctfd,
            "gzctf" | "gz" => Platform::Gzctf,
            "rctf" => Platform::Rctf,
            "picoctf" | "pico" => Platform::PicoCtf,
            "07ctf" | "zero7ctf" => Platform::Zero7Ctf,
            "pointeroverflow" | "pointeroverflowctf" | "poctf" => Platform::PointerOverflow,
            "generic" => Platform::Generic,
            _ => return Err(UnknownPlatform(s.to_string())),
        };
        Ok(p)
    }
}

impl TryFrom<String> for Platform {
    type Error = UnknownPlatform;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.id().to_string()
    }
}

/// Adapters keyed by platform.
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Box<dyn ChallengeAdapter>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry with all built-in adapters.
    pub fn with_defaults() -> Self {
        let mut r = Self::empty();
        r.register(Box::new(CtfdAdapter));
        r.register(Box::new(GzctfAdapter));
        r.register(Box::new(RctfAdapter));
        r.register(Box::new(PicoCtfAdapter));
        r.register(Box::new(Zero7CtfAdapter));
        r.register(Box::new(PointerOverflowAdapter));
        r.register(Box::new(GenericAdapter));
        r
    }

    /// Insert or replace the adapter for its platform.
    pub fn register(&mut self, adapter: Box<dyn ChallengeAdapter>) {
        self.adapters.insert(adapter.platform(), adapter);
    }

    pub fn get(&self, platform: Platform) -> Option<&dyn ChallengeAdapter> {
        self.adapters.get(&platform).map(|a| a.as_ref())
    }

    /// Parse with the adapter registered for `platform`. A missing
    /// registration is reported as a format mismatch for that platform.
    pub fn parse(&self, platform: Platform, raw: &Value) -> Result<Vec<ChallengeRecord>, FeedError> {
        match self.get(platform) {
            Some(adapter) => adapter.parse(raw),
            None => Err(FeedError::mismatch(platform, "No adapter registered")),
        }
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip_and_accept_aliases() {
        for p in Platform::ALL {
            assert_eq!(p.id().parse::<Platform>(), Ok(p));
        }
        assert_eq!("Pointer_Overflow".parse::<Platform>(), Ok(Platform::PointerOverflow));
        assert_eq!("zero7ctf".parse::<Platform>(), Ok(Platform::Zero7Ctf));
        assert!("hackthebox".parse::<Platform>().is_err());
    }

    #[test]
    fn unknown_identifier_is_a_std_error() {
        let err = "hackthebox".parse::<Platform>().unwrap_err();
        assert_eq!(err, UnknownPlatform("hackthebox".into()));
        assert_eq!(err.to_string(), "unknown platform identifier: \"hackthebox\"");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn defaults_cover_every_platform() {
        let r = AdapterRegistry::with_defaults();
        for p in Platform::ALL {
            assert_eq!(r.get(p).map(|a| a.platform()), Some(p));
        }
    }

    #[test]
    fn empty_registry_reports_mismatch() {
        let r = AdapterRegistry::empty();
        let err = r.parse(Platform::Rctf, &serde_json::json!([])).unwrap_err();
        assert_eq!(err.to_string(), "rCTF format error: No adapter registered");
    }
}
