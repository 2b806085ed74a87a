//! # Bot Configuration Module
//!
//! Settings read from the environment at startup (a `.env` file is honoured
//! by `main`). Only the bot token is mandatory, plus `CHANNEL_URL` when the
//! channel is addressed by numeric id.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_CHANNEL: &str = "@ride_share_de";
pub const DEFAULT_CHANNEL_URL: &str = "https://t.me/ride_share_de";
pub const DEFAULT_BOT_TAG: &str = "@TakeWithBot";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_LOCALES_DIR: &str = "./locales";

/// Destination of published listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelId {
    /// Public channel addressed by `@username`
    Username(String),
    /// Numeric chat id (private channels)
    Id(i64),
}

impl ChannelId {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.starts_with('@') && value.len() > 1 {
            return Ok(ChannelId::Username(value.to_string()));
        }
        value
            .parse::<i64>()
            .map(ChannelId::Id)
            .with_context(|| format!("CHANNEL_ID must be @username or a numeric chat id, got '{value}'"))
    }

    /// Public link to the channel, only known for username channels
    pub fn public_url(&self) -> Option<String> {
        match self {
            ChannelId::Username(name) => Some(format!("https://t.me/{}", name.trim_start_matches('@'))),
            ChannelId::Id(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub channel: ChannelId,
    /// Link behind the "go to channel" button
    pub channel_url: String,
    /// Last line of every channel post
    pub bot_tag: String,
    /// Ask for the language before the welcome message
    pub ask_language: bool,
    pub default_language: String,
    pub locales_dir: PathBuf,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("channel", &self.channel)
            .field("channel_url", &self.channel_url)
            .field("bot_tag", &self.bot_tag)
            .field("ask_language", &self.ask_language)
            .field("default_language", &self.default_language)
            .field("locales_dir", &self.locales_dir)
            .finish()
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name} must be a boolean, got '{other}'"),
    }
}

impl BotConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bot_token = var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let channel = match var("CHANNEL_ID") {
            Some(value) => ChannelId::parse(&value)?,
            None => ChannelId::Username(DEFAULT_CHANNEL.to_string()),
        };
        // Numeric channels have no public link to derive
        let channel_url = match var("CHANNEL_URL").or_else(|| channel.public_url()) {
            Some(url) => url,
            None => bail!("CHANNEL_URL must be set when CHANNEL_ID is a numeric chat id"),
        };

        let ask_language = match var("ASK_LANGUAGE") {
            Some(value) => parse_bool("ASK_LANGUAGE", &value)?,
            None => true,
        };

        Ok(Self {
            bot_token,
            channel,
            channel_url,
            bot_tag: var("BOT_TAG").unwrap_or_else(|| DEFAULT_BOT_TAG.to_string()),
            ask_language,
            default_language: var("DEFAULT_LANGUAGE")
                .map(|lang| lang.to_lowercase())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            locales_dir: var("LOCALES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCALES_DIR)),
        })
    }
}
