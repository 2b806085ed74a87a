//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error};

use crate::engine::ConversationEngine;
use crate::events::{self, InboundEvent};

use super::delivery::Delivery;

/// Build the engine event for a button press, `None` when it carries no data
pub fn button_event(q: &CallbackQuery) -> Option<InboundEvent> {
    let data = q.data.as_deref()?;
    // Sessions are keyed by chat; private chats share the user's id
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));

    Some(InboundEvent::ButtonPress {
        user_id: events::UserId(chat_id.0),
        callback_token: data.to_string(),
        language_hint: q.from.language_code.clone(),
    })
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    engine: Arc<ConversationEngine>,
    delivery: Arc<Delivery>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    if let Some(event) = button_event(&q) {
        let actions = engine.handle(&event);
        delivery.deliver_all(&bot, actions).await;
    }

    // Answer the callback query to remove the loading state
    if let Err(e) = bot.answer_callback_query(q.id).await {
        error!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
    }

    Ok(())
}
