//! Conversation engine: the per-user dialogue controller.
//!
//! [`ConversationEngine::transition`] is a pure function from the current
//! session and one input to the next session and the actions to perform.
//! [`ConversationEngine::handle`] runs it under the user's exclusive session
//! lock and commits the new state before the caller delivers any action, so
//! a failed delivery never rolls the conversation back.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::channel_post::render_channel_post;
use crate::config::{BotConfig, DEFAULT_BOT_TAG, DEFAULT_CHANNEL_URL};
use crate::dialogue::{Session, Step};
use crate::events::{Button, CallbackToken, Command, InboundEvent, Input, OutboundAction, UserId};
use crate::listing::{Field, Listing, Role};
use crate::localization::LocalizationManager;
use crate::session_store::SessionStore;
use crate::validation::{ValidationError, MAX_ANSWER_LENGTH};

/// Engine behaviour that comes from configuration
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Ask for the language before the welcome message on `/start`
    pub ask_language: bool,
    /// Last line of every channel post
    pub bot_tag: String,
    /// Link behind the "go to channel" button
    pub channel_url: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ask_language: true,
            bot_tag: DEFAULT_BOT_TAG.to_string(),
            channel_url: DEFAULT_CHANNEL_URL.to_string(),
        }
    }
}

impl From<&BotConfig> for EngineSettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            ask_language: config.ask_language,
            bot_tag: config.bot_tag.clone(),
            channel_url: config.channel_url.clone(),
        }
    }
}

/// Next session state plus the actions produced by one input
pub type Transition = (Session, Vec<OutboundAction>);

pub struct ConversationEngine {
    settings: EngineSettings,
    localization: Arc<LocalizationManager>,
    sessions: SessionStore,
}

fn prompt_key(role: Role, field: Field) -> &'static str {
    match (field, role) {
        (Field::FromCity, _) => "prompt-from-city",
        (Field::ToCity, _) => "prompt-to-city",
        (Field::Date, _) => "prompt-date",
        (Field::Time, _) => "prompt-time",
        (Field::PartySize, Role::Passenger) => "prompt-party-size-passenger",
        (Field::PartySize, Role::Driver) => "prompt-party-size-driver",
        (Field::Price, _) => "prompt-price",
        (Field::Vehicle, _) => "prompt-vehicle",
        (Field::Contact, Role::Passenger) => "prompt-contact-passenger",
        (Field::Contact, Role::Driver) => "prompt-contact-driver",
    }
}

fn thanks_key(role: Role) -> &'static str {
    match role {
        Role::Passenger => "thanks-passenger",
        Role::Driver => "thanks-driver",
    }
}

const DISCLAIMER_ITEMS: [&str; 4] = [
    "disclaimer-platform",
    "disclaimer-risk",
    "disclaimer-privacy",
    "disclaimer-law",
];

impl ConversationEngine {
    pub fn new(settings: EngineSettings, localization: Arc<LocalizationManager>) -> Self {
        Self {
            settings,
            localization,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process one inbound event and return the actions for the transport.
    ///
    /// The user's session is updated before this returns.
    pub fn handle(&self, event: &InboundEvent) -> Vec<OutboundAction> {
        let user_id = event.user_id();
        let Some(input) = Input::from_event(event) else {
            debug!(user_id = %user_id, event = ?event, "Ignoring unrecognized event");
            return Vec::new();
        };

        self.sessions.with_session(user_id, |session| {
            if session.language.is_none() {
                if let Some(hint) = event.language_hint() {
                    session.language = Some(self.localization.detect_language(Some(hint)));
                }
            }

            let from = session.step;
            let (next, actions) = self.transition(user_id, std::mem::take(session), input);
            debug!(
                user_id = %user_id,
                from = ?from,
                to = ?next.step,
                actions = actions.len(),
                "Conversation transition"
            );
            *session = next;
            actions
        })
    }

    /// Pure transition function: no I/O, no shared state
    pub fn transition(&self, user_id: UserId, session: Session, input: Input) -> Transition {
        match input {
            Input::Command(Command::Start) => self.start(user_id, session),
            Input::Command(Command::Disclaimer) => {
                let text = self.disclaimer(&self.language_of(&session));
                (session, vec![OutboundAction::SendText { user_id, text }])
            }
            Input::Button(CallbackToken::GoToChannel) => {
                let action = self.channel_link(user_id, &self.language_of(&session));
                (session, vec![action])
            }
            Input::Button(CallbackToken::StartPublication) => self.ask_role(user_id, session),
            Input::Button(CallbackToken::NeedRide) => self.choose_role(user_id, session, Role::Passenger),
            Input::Button(CallbackToken::OfferRide) => self.choose_role(user_id, session, Role::Driver),
            Input::Button(CallbackToken::Language(tag)) => match session.step {
                Step::AwaitingLanguage => self.select_language(user_id, session, &tag),
                _ => ignore(user_id, session, "language button outside language selection"),
            },
            Input::Text(text) => self.handle_text(user_id, session, &text),
        }
    }

    fn language_of(&self, session: &Session) -> String {
        session
            .language_or(self.localization.default_language())
            .to_string()
    }

    fn t(&self, key: &str, language: &str) -> String {
        self.localization.t(key, language)
    }

    fn start(&self, user_id: UserId, mut session: Session) -> Transition {
        // A new flow always discards unfinished answers
        session.listing = None;

        if self.settings.ask_language {
            session.step = Step::AwaitingLanguage;
            let action = self.language_prompt(user_id);
            (session, vec![action])
        } else {
            session.step = Step::ChoosingRole;
            let action = self.welcome(user_id, &self.language_of(&session));
            (session, vec![action])
        }
    }

    fn language_prompt(&self, user_id: UserId) -> OutboundAction {
        let languages = self.localization.supported_languages();
        let text = languages
            .iter()
            .map(|language| self.t("language-prompt", language))
            .collect::<Vec<_>>()
            .join("\n\n");
        let buttons = languages
            .iter()
            .map(|language| {
                Button::callback(
                    self.t("language-name", language),
                    CallbackToken::Language(language.clone()),
                )
            })
            .collect();

        OutboundAction::SendTextWithButtons {
            user_id,
            text,
            buttons,
        }
    }

    fn welcome(&self, user_id: UserId, language: &str) -> OutboundAction {
        OutboundAction::SendTextWithButtons {
            user_id,
            text: self.t("welcome", language),
            buttons: vec![
                Button::callback(self.t("button-find-ride", language), CallbackToken::GoToChannel),
                Button::callback(
                    self.t("button-give-publication", language),
                    CallbackToken::StartPublication,
                ),
            ],
        }
    }

    fn select_language(&self, user_id: UserId, mut session: Session, tag: &str) -> Transition {
        if !self.localization.is_supported(tag) {
            return ignore(user_id, session, "unsupported language");
        }

        let language = tag.to_lowercase();
        info!(user_id = %user_id, language = %language, "User selected language");
        let action = self.welcome(user_id, &language);
        session.language = Some(language);
        session.step = Step::ChoosingRole;
        (session, vec![action])
    }

    fn ask_role(&self, user_id: UserId, mut session: Session) -> Transition {
        let language = self.language_of(&session);
        session.listing = None;
        session.step = Step::ChoosingRole;

        let action = OutboundAction::SendTextWithButtons {
            user_id,
            text: self.t("role-question", &language),
            buttons: vec![
                Button::callback(self.t("button-need-ride", &language), CallbackToken::NeedRide),
                Button::callback(self.t("button-offer-ride", &language), CallbackToken::OfferRide),
            ],
        };
        (session, vec![action])
    }

    fn choose_role(&self, user_id: UserId, session: Session, role: Role) -> Transition {
        match session.step {
            Step::Idle | Step::ChoosingRole => self.begin_listing(user_id, session, role),
            _ => ignore(user_id, session, "role button outside role selection"),
        }
    }

    fn begin_listing(&self, user_id: UserId, mut session: Session, role: Role) -> Transition {
        info!(user_id = %user_id, role = ?role, "Starting new listing");
        let step = Step::first_for(role);
        session.listing = Some(Listing::new(role));
        session.step = step;

        let actions = self.prompt_for(user_id, &session);
        (session, actions)
    }

    fn prompt_for(&self, user_id: UserId, session: &Session) -> Vec<OutboundAction> {
        match session.step {
            Step::Collecting { role, field } => vec![OutboundAction::SendText {
                user_id,
                text: self.t(prompt_key(role, field), &self.language_of(session)),
            }],
            _ => Vec::new(),
        }
    }

    /// Match a typed answer against the role button labels in every language
    fn role_from_label(&self, text: &str) -> Option<Role> {
        let text = text.trim().to_lowercase();
        self.localization
            .supported_languages()
            .iter()
            .find_map(|language| {
                if self.t("button-need-ride", language).to_lowercase() == text {
                    Some(Role::Passenger)
                } else if self.t("button-offer-ride", language).to_lowercase() == text {
                    Some(Role::Driver)
                } else {
                    None
                }
            })
    }

    fn handle_text(&self, user_id: UserId, session: Session, text: &str) -> Transition {
        match session.step {
            Step::Idle => ignore(user_id, session, "text while idle"),
            Step::AwaitingLanguage => {
                let tag = text.trim();
                if self.localization.is_supported(tag) {
                    self.select_language(user_id, session, tag)
                } else {
                    ignore(user_id, session, "unrecognized language")
                }
            }
            Step::ChoosingRole => match self.role_from_label(text) {
                Some(role) => self.begin_listing(user_id, session, role),
                None => ignore(user_id, session, "unrecognized role"),
            },
            Step::Collecting { role, field } => self.collect(user_id, session, role, field, text),
        }
    }

    fn collect(
        &self,
        user_id: UserId,
        mut session: Session,
        role: Role,
        field: Field,
        text: &str,
    ) -> Transition {
        let language = self.language_of(&session);

        let mut listing = match session.listing.take() {
            Some(listing) if listing.role() == role => listing,
            _ => {
                warn!(user_id = %user_id, role = ?role, "Collecting step without a matching listing");
                return self.abandon(user_id, session, &language);
            }
        };
        let recorded = listing.record(field, text);
        session.listing = Some(listing);

        if let Err(error) = recorded {
            debug!(user_id = %user_id, field = %field, error = %error, "Rejected answer");
            let text = self.validation_message(error, &language);
            return (session, vec![OutboundAction::SendText { user_id, text }]);
        }

        match session.step.advance() {
            Some(next) => {
                session.step = next;
                let actions = self.prompt_for(user_id, &session);
                (session, actions)
            }
            None => self.publish(user_id, session, &language),
        }
    }

    fn validation_message(&self, error: ValidationError, language: &str) -> String {
        match error {
            ValidationError::TooLong => self.localization.t_args(
                error.message_key(),
                &[("max", MAX_ANSWER_LENGTH.to_string().as_str())],
                language,
            ),
            _ => self.t(error.message_key(), language),
        }
    }

    /// Finalize the listing, thank the user and post to the channel
    fn publish(&self, user_id: UserId, mut session: Session, language: &str) -> Transition {
        session.step = Step::Idle;
        let Some(listing) = session.listing.take() else {
            return self.abandon(user_id, session, language);
        };

        match listing.finalize() {
            Ok(finalized) => {
                let text = render_channel_post(
                    &finalized,
                    language,
                    &self.settings.bot_tag,
                    &self.localization,
                );
                info!(user_id = %user_id, role = ?finalized.role(), "Publishing listing to channel");

                let thanks = OutboundAction::SendText {
                    user_id,
                    text: self.t(thanks_key(finalized.role()), language),
                };
                (session, vec![thanks, OutboundAction::PublishToChannel { text }])
            }
            Err(missing) => {
                warn!(user_id = %user_id, error = %missing, "Refusing to publish incomplete listing");
                self.abandon(user_id, session, language)
            }
        }
    }

    fn abandon(&self, user_id: UserId, mut session: Session, language: &str) -> Transition {
        session.step = Step::Idle;
        session.listing = None;
        let text = self.t("error-listing-incomplete", language);
        (session, vec![OutboundAction::SendText { user_id, text }])
    }

    fn disclaimer(&self, language: &str) -> String {
        let items = DISCLAIMER_ITEMS
            .iter()
            .map(|key| self.t(key, language))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\n{}\n\n{}",
            self.t("disclaimer-title", language),
            items,
            self.t("disclaimer-agree", language)
        )
    }

    fn channel_link(&self, user_id: UserId, language: &str) -> OutboundAction {
        OutboundAction::SendTextWithButtons {
            user_id,
            text: self.t("channel-link-text", language),
            buttons: vec![Button::link(
                self.t("button-go-to-channel", language),
                self.settings.channel_url.clone(),
            )],
        }
    }
}

fn ignore(user_id: UserId, session: Session, reason: &str) -> Transition {
    debug!(user_id = %user_id, step = ?session.step, reason = %reason, "Ignoring input");
    (session, Vec::new())
}
