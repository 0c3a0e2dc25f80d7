//! Human-readable titles.
//!
//! Service request titles pick a template by `address_type`; each arm of
//! [`AddressKind`] has its own formatting function and unknown values fall
//! through to [`AddressKind::Other`], which applies no case changes.

use crate::transform::types::{field_text, Record};

/// Placeholder for an absent intersection street.
pub const UNKNOWN_STREET: &str = "unknown";

/// Location discriminant carried in `address_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Address,
    Intersection,
    Blockface,
    Other,
}

impl AddressKind {
    /// Case-insensitive exact match; anything else is `Other`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("ADDRESS") => AddressKind::Address,
            Some(s) if s.eq_ignore_ascii_case("INTERSECTION") => AddressKind::Intersection,
            Some(s) if s.eq_ignore_ascii_case("BLOCKFACE") => AddressKind::Blockface,
            _ => AddressKind::Other,
        }
    }

    pub fn of(record: &Record) -> Self {
        Self::parse(field_text(record, "address_type").as_deref())
    }

    /// The location sentence, starting with the formatted time.
    pub fn location_sentence(self, time: &str, record: &Record) -> String {
        match self {
            AddressKind::Address => address_sentence(time, record),
            AddressKind::Intersection => intersection_sentence(time, record),
            AddressKind::Blockface => blockface_sentence(time, record),
            AddressKind::Other => other_sentence(time, record),
        }
    }
}

fn text(record: &Record, field: &str) -> String {
    field_text(record, field).unwrap_or_default()
}

fn address_sentence(time: &str, record: &Record) -> String {
    format!(
        "{} - A new 311 case has been opened at {} in {}.",
        time,
        titleize(&text(record, "incident_address")),
        titleize(&text(record, "city")),
    )
}

fn intersection_sentence(time: &str, record: &Record) -> String {
    let street = |field: &str| field_text(record, field).unwrap_or_else(|| UNKNOWN_STREET.to_string());
    format!(
        "{} - A new 311 case has been opened at the intersection of {} and {} in {}.",
        time,
        titleize(&street("intersection_street_1")),
        titleize(&street("intersection_street_2")),
        titleize(&text(record, "city")),
    )
}

fn blockface_sentence(time: &str, record: &Record) -> String {
    format!(
        "{} - A new 311 case has been opened on {}, between {} and {} in {}.",
        time,
        titleize(&text(record, "street_name")),
        titleize(&text(record, "cross_street_1")),
        titleize(&text(record, "cross_street_2")),
        titleize(&text(record, "city")),
    )
}

fn other_sentence(time: &str, record: &Record) -> String {
    format!(
        "{} - A new 311 case has been opened on {} in {}.",
        time,
        text(record, "street_name"),
        text(record, "city"),
    )
}

/// Complaint sentence appended to every service request title.
pub fn complaint_sentence(record: &Record) -> String {
    format!(
        " The complaint type is {} - {} and the assigned agency is {}",
        text(record, "complaint_type").to_lowercase(),
        text(record, "descriptor"),
        text(record, "agency"),
    )
}

/// Full title for a 311 service request.
pub fn service_request_title(time: &str, record: &Record) -> String {
    let location = AddressKind::of(record).location_sentence(time, record);
    location + &complaint_sentence(record)
}

/// Title for a mobile food facility permit.
pub fn food_facility_title(record: &Record) -> String {
    format!("A food truck is serving {}.", text(record, "fooditems"))
}

/// Upper-case the first letter of each whitespace-delimited word and
/// lower-case the rest. Whitespace is kept as-is.
pub fn titleize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut word_start = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            word_start = true;
            out.push(ch);
        } else if word_start {
            word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
