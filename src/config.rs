use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::aggregator::{ScoreWeights, SeasonOrder};
use crate::errors::ConfigError;

pub const TOKEN_ENV: &str = "CLAN_API_TOKEN";
pub const CLAN_TAG_ENV: &str = "CLAN_TAG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,           // base URL, no trailing slash needed
    pub clan_tag: Option<String>,  // with or without the leading '#'
    pub timeout_secs: u64,
    pub season_order: SeasonOrder,
    pub weights: ScoreWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.royaleapi.com".to_string(),
            clan_tag: None,
            timeout_secs: 10,
            season_order: SeasonOrder::FirstSeen,
            weights: ScoreWeights::default(),
        }
    }
}

impl Config {
    /// `config.toml` from the working directory, then `CLAN_TAG` on top.
    pub fn load() -> Self {
        let mut cfg = Self::load_from(Path::new("config.toml"));
        if let Ok(tag) = std::env::var(CLAN_TAG_ENV) {
            if !tag.trim().is_empty() {
                cfg.clan_tag = Some(tag);
            }
        }
        cfg
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// The configured clan tag, normalized.
    pub fn clan_tag(&self) -> Result<String, ConfigError> {
        let raw = self.clan_tag.as_deref().ok_or(ConfigError::MissingClanTag)?;
        normalize_clan_tag(raw)
    }
}

pub fn api_token() -> Result<String, ConfigError> {
    match std::env::var(TOKEN_ENV) {
        Ok(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
        _ => Err(ConfigError::MissingToken),
    }
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Tags only ever use these 14 characters.
    RE.get_or_init(|| Regex::new(r"^[0289PYLQGRJCUV]{3,14}$").expect("valid tag pattern"))
}

/// Strip the leading `#`, uppercase, and check against the tag alphabet.
pub fn normalize_clan_tag(raw: &str) -> Result<String, ConfigError> {
    let tag = raw.trim().trim_start_matches('#').to_ascii_uppercase();
    if tag_pattern().is_match(&tag) {
        Ok(tag)
    } else {
        Err(ConfigError::InvalidClanTag(raw.to_string()))
    }
}
