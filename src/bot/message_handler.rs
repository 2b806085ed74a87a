//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::engine::ConversationEngine;
use crate::events::{self, InboundEvent};

use super::delivery::Delivery;

/// Build the engine event for a text message, `None` for other message kinds
pub fn text_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;

    // Extract user's language code from Telegram
    let language_hint = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.clone());

    Some(InboundEvent::TextMessage {
        user_id: events::UserId(msg.chat.id.0),
        text: text.to_string(),
        language_hint,
    })
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    engine: Arc<ConversationEngine>,
    delivery: Arc<Delivery>,
) -> Result<()> {
    let Some(event) = text_event(&msg) else {
        debug!(user_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };
    debug!(user_id = %msg.chat.id, "Received text message from user");

    let actions = engine.handle(&event);
    delivery.deliver_all(&bot, actions).await;

    Ok(())
}
