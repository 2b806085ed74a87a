//! Dialogue steps and per-user session state.

use serde::{Deserialize, Serialize};

use crate::listing::{Field, Listing, Role};

/// Questions asked to a passenger, in order
pub const PASSENGER_FIELDS: [Field; 4] = [
    Field::FromCity,
    Field::ToCity,
    Field::PartySize,
    Field::Contact,
];

/// Questions asked to a driver, in order
pub const DRIVER_FIELDS: [Field; 8] = [
    Field::FromCity,
    Field::ToCity,
    Field::Date,
    Field::Time,
    Field::PartySize,
    Field::Price,
    Field::Vehicle,
    Field::Contact,
];

impl Role {
    pub fn fields(self) -> &'static [Field] {
        match self {
            Role::Passenger => &PASSENGER_FIELDS,
            Role::Driver => &DRIVER_FIELDS,
        }
    }

    /// The field asked after `current`, or `None` when `current` is the last one
    pub fn next_field(self, current: Field) -> Option<Field> {
        let fields = self.fields();
        let position = fields.iter().position(|field| *field == current)?;
        fields.get(position + 1).copied()
    }
}

/// Where a user is in the conversation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    AwaitingLanguage,
    ChoosingRole,
    Collecting {
        role: Role,
        field: Field,
    },
}

impl Step {
    /// First data-collection step for `role`
    pub fn first_for(role: Role) -> Step {
        Step::Collecting {
            role,
            field: role.fields()[0],
        }
    }

    /// Step following a successful answer, `None` once the contact is in
    pub fn advance(self) -> Option<Step> {
        match self {
            Step::Collecting { role, field } => role
                .next_field(field)
                .map(|field| Step::Collecting { role, field }),
            _ => None,
        }
    }
}

/// Ephemeral conversational context of one user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub step: Step,
    /// Language chosen by (or detected for) the user
    pub language: Option<String>,
    /// Listing being filled in; at most one per user
    pub listing: Option<Listing>,
}

impl Session {
    pub fn language_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.language.as_deref().unwrap_or(fallback)
    }
}
