//! The listing record: one user's ride request or ride offer, accumulated
//! one answer per conversational turn.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

use crate::validation::{
    parse_party_size, parse_price, validate_contact, validate_free_text, ValidationError,
};

/// Whether the user is looking for a ride or offering one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Passenger,
    Driver,
}

/// A piece of information collected from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FromCity,
    ToCity,
    Date,
    Time,
    PartySize,
    Price,
    Vehicle,
    Contact,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::FromCity => "from_city",
            Field::ToCity => "to_city",
            Field::Date => "date",
            Field::Time => "time",
            Field::PartySize => "party_size",
            Field::Price => "price",
            Field::Vehicle => "vehicle",
            Field::Contact => "contact",
        };
        f.write_str(name)
    }
}

/// A role-required field was not collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("listing is missing required field `{0}`")]
pub struct MissingField(pub Field);

/// In-progress answers of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    role: Role,
    origin_city: Option<String>,
    destination_city: Option<String>,
    scheduled_date: Option<String>,
    scheduled_time: Option<String>,
    party_size: Option<NonZeroU32>,
    price_per_person: Option<Decimal>,
    vehicle_model: Option<String>,
    contact: Option<String>,
}

impl Listing {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            origin_city: None,
            destination_city: None,
            scheduled_date: None,
            scheduled_time: None,
            party_size: None,
            price_per_person: None,
            vehicle_model: None,
            contact: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn origin_city(&self) -> Option<&str> {
        self.origin_city.as_deref()
    }

    pub fn destination_city(&self) -> Option<&str> {
        self.destination_city.as_deref()
    }

    pub fn scheduled_date(&self) -> Option<&str> {
        self.scheduled_date.as_deref()
    }

    pub fn scheduled_time(&self) -> Option<&str> {
        self.scheduled_time.as_deref()
    }

    pub fn party_size(&self) -> Option<NonZeroU32> {
        self.party_size
    }

    pub fn price_per_person(&self) -> Option<Decimal> {
        self.price_per_person
    }

    pub fn vehicle_model(&self) -> Option<&str> {
        self.vehicle_model.as_deref()
    }

    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    /// Parse `input` for `field` and store it. On error the listing is unchanged.
    pub fn record(&mut self, field: Field, input: &str) -> Result<(), ValidationError> {
        match field {
            Field::FromCity => self.origin_city = Some(validate_free_text(input)?),
            Field::ToCity => self.destination_city = Some(validate_free_text(input)?),
            Field::Date => self.scheduled_date = Some(validate_free_text(input)?),
            Field::Time => self.scheduled_time = Some(validate_free_text(input)?),
            Field::PartySize => self.party_size = Some(parse_party_size(input)?),
            Field::Price => self.price_per_person = Some(parse_price(input)?),
            Field::Vehicle => self.vehicle_model = Some(validate_free_text(input)?),
            Field::Contact => self.contact = Some(validate_contact(input)?),
        }
        Ok(())
    }

    fn require<T: Clone>(value: &Option<T>, field: Field) -> Result<T, MissingField> {
        value.clone().ok_or(MissingField(field))
    }

    /// Check that every field the role requires is present and freeze the listing
    pub fn finalize(&self) -> Result<FinalizedListing, MissingField> {
        let origin_city = Self::require(&self.origin_city, Field::FromCity)?;
        let destination_city = Self::require(&self.destination_city, Field::ToCity)?;

        let details = match self.role {
            Role::Passenger => RoleDetails::Passenger,
            Role::Driver => RoleDetails::Driver {
                scheduled_date: Self::require(&self.scheduled_date, Field::Date)?,
                scheduled_time: Self::require(&self.scheduled_time, Field::Time)?,
                price_per_person: Self::require(&self.price_per_person, Field::Price)?,
                vehicle_model: Self::require(&self.vehicle_model, Field::Vehicle)?,
            },
        };

        let party_size = Self::require(&self.party_size, Field::PartySize)?;
        let contact = Self::require(&self.contact, Field::Contact)?;

        Ok(FinalizedListing {
            origin_city,
            destination_city,
            party_size,
            contact,
            details,
        })
    }
}

/// Fields only some roles carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleDetails {
    Passenger,
    Driver {
        scheduled_date: String,
        scheduled_time: String,
        price_per_person: Decimal,
        vehicle_model: String,
    },
}

/// A listing with every role-required field present, ready for the channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedListing {
    pub origin_city: String,
    pub destination_city: String,
    pub party_size: NonZeroU32,
    pub contact: String,
    pub details: RoleDetails,
}

impl FinalizedListing {
    pub fn role(&self) -> Role {
        match self.details {
            RoleDetails::Passenger => Role::Passenger,
            RoleDetails::Driver { .. } => Role::Driver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(role: Role, answers: &[(Field, &str)]) -> Listing {
        let mut listing = Listing::new(role);
        for (field, answer) in answers {
            listing.record(*field, answer).unwrap();
        }
        listing
    }

    #[test]
    fn test_record_rejects_invalid_and_keeps_previous_value() {
        let mut listing = Listing::new(Role::Passenger);
        listing.record(Field::PartySize, "3").unwrap();

        assert_eq!(
            listing.record(Field::PartySize, "three"),
            Err(ValidationError::InvalidNumber)
        );
        assert_eq!(listing.party_size().map(NonZeroU32::get), Some(3));
    }

    #[test]
    fn test_passenger_finalize_does_not_need_driver_fields() {
        let listing = filled(
            Role::Passenger,
            &[
                (Field::FromCity, "Berlin"),
                (Field::ToCity, "Munich"),
                (Field::PartySize, "2"),
                (Field::Contact, "@alice"),
            ],
        );

        let finalized = listing.finalize().unwrap();
        assert_eq!(finalized.role(), Role::Passenger);
        assert_eq!(finalized.details, RoleDetails::Passenger);
        assert_eq!(finalized.origin_city, "Berlin");
    }

    #[test]
    fn test_driver_finalize_requires_price_and_vehicle() {
        let listing = filled(
            Role::Driver,
            &[
                (Field::FromCity, "Berlin"),
                (Field::ToCity, "Munich"),
                (Field::Date, "12.05"),
                (Field::Time, "10:00"),
                (Field::PartySize, "3"),
                (Field::Contact, "@bob"),
            ],
        );

        assert_eq!(listing.finalize(), Err(MissingField(Field::Price)));

        let mut listing = listing;
        listing.record(Field::Price, "20").unwrap();
        assert_eq!(listing.finalize(), Err(MissingField(Field::Vehicle)));

        listing.record(Field::Vehicle, "VW Golf").unwrap();
        let finalized = listing.finalize().unwrap();
        assert_eq!(finalized.role(), Role::Driver);
    }

    #[test]
    fn test_missing_field_message() {
        let error = Listing::new(Role::Passenger).finalize().unwrap_err();
        assert_eq!(error.to_string(), "listing is missing required field `from_city`");
    }
}
