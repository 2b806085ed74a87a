//! # Configuration Tests

use rideshare_bot::config::{BotConfig, ChannelId};
use std::collections::HashMap;
use std::path::PathBuf;

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<BotConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("TELEGRAM_BOT_TOKEN", "123:abc")]).unwrap();

        assert_eq!(config.channel, ChannelId::Username("@ride_share_de".to_string()));
        assert_eq!(config.channel_url, "https://t.me/ride_share_de");
        assert_eq!(config.bot_tag, "@TakeWithBot");
        assert!(config.ask_language);
        assert_eq!(config.default_language, "en");
        assert_eq!(config.locales_dir, PathBuf::from("./locales"));
    }

    #[test]
    fn test_missing_token_is_an_error() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("TELEGRAM_BOT_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn test_numeric_channel_requires_link() {
        let result = config_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("CHANNEL_ID", "-1001234567890"),
        ]);
        assert!(result.is_err());

        let config = config_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("CHANNEL_ID", "-1001234567890"),
            ("CHANNEL_URL", "https://t.me/+private"),
        ])
        .unwrap();

        assert_eq!(config.channel, ChannelId::Id(-1001234567890));
        assert_eq!(config.channel_url, "https://t.me/+private");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("CHANNEL_ID", "@rides_test"),
            ("CHANNEL_URL", "https://t.me/+invite"),
            ("BOT_TAG", "@TestBot"),
            ("ASK_LANGUAGE", "no"),
            ("DEFAULT_LANGUAGE", "DE"),
            ("LOCALES_DIR", "/srv/locales"),
        ])
        .unwrap();

        assert_eq!(config.channel, ChannelId::Username("@rides_test".to_string()));
        assert_eq!(config.channel_url, "https://t.me/+invite");
        assert_eq!(config.bot_tag, "@TestBot");
        assert!(!config.ask_language);
        assert_eq!(config.default_language, "de");
        assert_eq!(config.locales_dir, PathBuf::from("/srv/locales"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("TELEGRAM_BOT_TOKEN", "t"), ("ASK_LANGUAGE", "maybe")]).is_err());
        assert!(config_from(&[("TELEGRAM_BOT_TOKEN", "t"), ("CHANNEL_ID", "rides")]).is_err());
    }

    #[test]
    fn test_debug_output_hides_token() {
        let config = config_from(&[("TELEGRAM_BOT_TOKEN", "123:secret")]).unwrap();
        let debug = format!("{config:?}");

        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
