//! UI Builder module for creating keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;
use url::Url;

use crate::events::{Button, ButtonTarget};

/// Convert one engine button into a Telegram inline button
pub fn create_inline_button(button: &Button) -> Option<InlineKeyboardButton> {
    match &button.target {
        ButtonTarget::Callback(token) => Some(InlineKeyboardButton::callback(
            button.label.clone(),
            token.as_token(),
        )),
        ButtonTarget::Link(link) => match Url::parse(link) {
            Ok(url) => Some(InlineKeyboardButton::url(button.label.clone(), url)),
            Err(e) => {
                warn!(link = %link, error = %e, "Dropping button with invalid URL");
                None
            }
        },
    }
}

/// Create an inline keyboard with one button per row, in the given order
pub fn create_keyboard(buttons: &[Button]) -> InlineKeyboardMarkup {
    let rows = buttons
        .iter()
        .filter_map(create_inline_button)
        .map(|button| vec![button])
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CallbackToken;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_keyboard_keeps_button_order() {
        let keyboard = create_keyboard(&[
            Button::callback("Need a ride", CallbackToken::NeedRide),
            Button::callback("Offer a ride", CallbackToken::OfferRide),
        ]);

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Need a ride");
        assert!(matches!(
            &keyboard.inline_keyboard[1][0].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "offer_ride"
        ));
    }

    #[test]
    fn test_link_button() {
        let keyboard = create_keyboard(&[Button::link("Go to Channel", "https://t.me/ride_share_de")]);

        assert!(matches!(
            &keyboard.inline_keyboard[0][0].kind,
            InlineKeyboardButtonKind::Url(url) if url.as_str() == "https://t.me/ride_share_de"
        ));
    }

    #[test]
    fn test_invalid_link_is_dropped() {
        let keyboard = create_keyboard(&[Button::link("Broken", "not a url")]);
        assert!(keyboard.inline_keyboard.is_empty());
    }
}
