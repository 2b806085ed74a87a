//! Channel post templates for finalized listings

use crate::listing::{FinalizedListing, RoleDetails};
use crate::localization::LocalizationManager;

/// Cities are posted as hashtags, so inner whitespace becomes `_`
pub fn hashtag(city: &str) -> String {
    city.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Render a finalized listing into the text posted to the channel.
///
/// Drivers get departure, price and car model lines; passengers do not.
/// The last line is always `bot_tag`.
pub fn render_channel_post(
    listing: &FinalizedListing,
    language: &str,
    bot_tag: &str,
    localization: &LocalizationManager,
) -> String {
    let t = |key: &str| localization.t(key, language);
    let t_args = |key: &str, args: &[(&str, &str)]| localization.t_args(key, args, language);

    let party_size = listing.party_size.to_string();
    let origin = hashtag(&listing.origin_city);
    let destination = hashtag(&listing.destination_city);
    let mut lines = Vec::with_capacity(10);

    match &listing.details {
        RoleDetails::Passenger => {
            lines.push(t("post-passenger-header"));
            lines.push(t_args("post-from", &[("city", origin.as_str())]));
            lines.push(t_args("post-to", &[("city", destination.as_str())]));
            lines.push(t_args("post-persons", &[("count", party_size.as_str())]));
        }
        RoleDetails::Driver {
            scheduled_date,
            scheduled_time,
            price_per_person,
            vehicle_model,
        } => {
            let price = price_per_person.to_string();
            lines.push(t("post-driver-header"));
            lines.push(t_args("post-from", &[("city", origin.as_str())]));
            lines.push(t_args("post-to", &[("city", destination.as_str())]));
            lines.push(t_args(
                "post-departure",
                &[("date", scheduled_date.as_str()), ("time", scheduled_time.as_str())],
            ));
            lines.push(t_args("post-persons", &[("count", party_size.as_str())]));
            lines.push(t_args("post-price", &[("price", price.as_str())]));
            lines.push(t_args("post-vehicle", &[("model", vehicle_model.as_str())]));
        }
    }

    lines.push(t_args("post-contact", &[("contact", listing.contact.as_str())]));
    lines.push(bot_tag.to_string());

    lines.join("\n")
}
