//! Inbound events from the messaging platform and the outbound actions the
//! conversation engine asks the platform to perform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of the user (the private chat the bot talks in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextMessage {
        user_id: UserId,
        text: String,
        /// Language reported by the client, e.g. "de-AT"
        language_hint: Option<String>,
    },
    ButtonPress {
        user_id: UserId,
        callback_token: String,
        language_hint: Option<String>,
    },
}

impl InboundEvent {
    pub fn text(user_id: UserId, text: impl Into<String>) -> Self {
        InboundEvent::TextMessage {
            user_id,
            text: text.into(),
            language_hint: None,
        }
    }

    pub fn button(user_id: UserId, callback_token: impl Into<String>) -> Self {
        InboundEvent::ButtonPress {
            user_id,
            callback_token: callback_token.into(),
            language_hint: None,
        }
    }

    pub fn user_id(&self) -> UserId {
        match self {
            InboundEvent::TextMessage { user_id, .. } | InboundEvent::ButtonPress { user_id, .. } => {
                *user_id
            }
        }
    }

    pub fn language_hint(&self) -> Option<&str> {
        match self {
            InboundEvent::TextMessage { language_hint, .. }
            | InboundEvent::ButtonPress { language_hint, .. } => language_hint.as_deref(),
        }
    }
}

/// Commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Disclaimer,
}

impl Command {
    /// Parse a command message. Accepts the `/start@SomeBot` form used in groups.
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        match name {
            "/start" => Some(Command::Start),
            "/disclaimer" => Some(Command::Disclaimer),
            _ => None,
        }
    }
}

const LANGUAGE_TOKEN_PREFIX: &str = "lang:";

/// Callback data attached to inline buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackToken {
    StartPublication,
    GoToChannel,
    NeedRide,
    OfferRide,
    Language(String),
}

impl CallbackToken {
    pub fn parse(token: &str) -> Option<CallbackToken> {
        match token {
            "start_publication" => Some(CallbackToken::StartPublication),
            "go_to_channel" => Some(CallbackToken::GoToChannel),
            "need_ride" => Some(CallbackToken::NeedRide),
            "offer_ride" => Some(CallbackToken::OfferRide),
            other => other
                .strip_prefix(LANGUAGE_TOKEN_PREFIX)
                .filter(|tag| !tag.is_empty())
                .map(|tag| CallbackToken::Language(tag.to_lowercase())),
        }
    }

    pub fn as_token(&self) -> String {
        match self {
            CallbackToken::StartPublication => "start_publication".to_string(),
            CallbackToken::GoToChannel => "go_to_channel".to_string(),
            CallbackToken::NeedRide => "need_ride".to_string(),
            CallbackToken::OfferRide => "offer_ride".to_string(),
            CallbackToken::Language(tag) => format!("{LANGUAGE_TOKEN_PREFIX}{tag}"),
        }
    }
}

/// An inbound event reduced to what the engine reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Button(CallbackToken),
    Text(String),
}

impl Input {
    /// Returns `None` for events the engine never reacts to
    /// (unknown commands, unknown callback tokens).
    pub fn from_event(event: &InboundEvent) -> Option<Input> {
        match event {
            InboundEvent::TextMessage { text, .. } => {
                if text.trim_start().starts_with('/') {
                    Command::parse(text).map(Input::Command)
                } else {
                    Some(Input::Text(text.clone()))
                }
            }
            InboundEvent::ButtonPress { callback_token, .. } => {
                CallbackToken::parse(callback_token).map(Input::Button)
            }
        }
    }
}

/// What an inline button does when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonTarget {
    Callback(CallbackToken),
    Link(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub target: ButtonTarget,
}

impl Button {
    pub fn callback(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Callback(token),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Link(url.into()),
        }
    }
}

/// Request to the transport produced by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    SendText {
        user_id: UserId,
        text: String,
    },
    SendTextWithButtons {
        user_id: UserId,
        text: String,
        buttons: Vec<Button>,
    },
    /// Post to the configured channel
    PublishToChannel { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/start@TakeWithBot"), Some(Command::Start));
        assert_eq!(Command::parse("/disclaimer please"), Some(Command::Disclaimer));
        assert_eq!(Command::parse("/help"), None);
        assert_eq!(Command::parse("start"), None);
    }

    #[test]
    fn test_callback_token_parsing() {
        assert_eq!(
            CallbackToken::parse("need_ride"),
            Some(CallbackToken::NeedRide)
        );
        assert_eq!(
            CallbackToken::parse("lang:DE"),
            Some(CallbackToken::Language("de".to_string()))
        );
        assert_eq!(CallbackToken::parse("lang:"), None);
        assert_eq!(CallbackToken::parse("edit_3"), None);
    }

    #[test]
    fn test_callback_token_as_token_is_parseable() {
        for token in [
            CallbackToken::StartPublication,
            CallbackToken::GoToChannel,
            CallbackToken::NeedRide,
            CallbackToken::OfferRide,
            CallbackToken::Language("en".to_string()),
        ] {
            assert_eq!(CallbackToken::parse(&token.as_token()), Some(token));
        }
    }

    #[test]
    fn test_unknown_command_is_dropped() {
        let event = InboundEvent::text(UserId(1), "/unknown");
        assert_eq!(Input::from_event(&event), None);

        let event = InboundEvent::text(UserId(1), "Berlin");
        assert_eq!(Input::from_event(&event), Some(Input::Text("Berlin".to_string())));
    }
}
