//! Delivery of engine actions through the Telegram Bot API

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::{debug, error, info};

use crate::config::{BotConfig, ChannelId};
use crate::events::OutboundAction;

use super::ui_builder::create_keyboard;

/// Sends outbound actions; owns the fixed channel destination
#[derive(Debug, Clone)]
pub struct Delivery {
    channel: Recipient,
}

impl Delivery {
    pub fn new(channel: &ChannelId) -> Self {
        let channel = match channel {
            ChannelId::Username(name) => Recipient::ChannelUsername(name.clone()),
            ChannelId::Id(id) => Recipient::Id(ChatId(*id)),
        };
        Self { channel }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(&config.channel)
    }

    /// Perform a single action
    pub async fn deliver(&self, bot: &Bot, action: OutboundAction) -> Result<()> {
        match action {
            OutboundAction::SendText { user_id, text } => {
                bot.send_message(ChatId(user_id.0), text).await?;
            }
            OutboundAction::SendTextWithButtons {
                user_id,
                text,
                buttons,
            } => {
                bot.send_message(ChatId(user_id.0), text)
                    .reply_markup(create_keyboard(&buttons))
                    .await?;
            }
            OutboundAction::PublishToChannel { text } => {
                bot.send_message(self.channel.clone(), text).await?;
                info!(channel = ?self.channel, "Published listing to channel");
            }
        }
        Ok(())
    }

    /// Perform actions in order. Failures are logged and do not stop the
    /// remaining actions; conversation state is already committed.
    pub async fn deliver_all(&self, bot: &Bot, actions: Vec<OutboundAction>) {
        debug!(actions = actions.len(), "Delivering actions");
        for action in actions {
            let description = describe(&action);
            if let Err(e) = self.deliver(bot, action).await {
                error!(action = %description, error = %e, "Failed to deliver action");
            }
        }
    }
}

fn describe(action: &OutboundAction) -> String {
    match action {
        OutboundAction::SendText { user_id, .. } => format!("send_text to {user_id}"),
        OutboundAction::SendTextWithButtons { user_id, .. } => {
            format!("send_text_with_buttons to {user_id}")
        }
        OutboundAction::PublishToChannel { .. } => "publish_to_channel".to_string(),
    }
}
