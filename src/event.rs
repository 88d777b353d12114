//! Event records, as stored in the backend table

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::error::Error;

use serde::{Deserialize, Serialize};

/// The identifier of an event, assigned by the data source and never changed afterwards
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}
impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
impl FromStr for EventId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// A reference to a venue.
///
/// Venues read from the backend are integers, but values typed by a user are kept verbatim (they are validated by the backend, not here).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VenueId {
    Number(i64),
    Raw(String),
    /// No venue (`null` in the table)
    Unset,
}

impl VenueId {
    /// Keep a user input as is
    pub fn from_input<S: ToString>(input: S) -> Self {
        VenueId::Raw(input.to_string())
    }
}
impl Default for VenueId {
    fn default() -> Self {
        VenueId::Raw(String::new())
    }
}
impl From<i64> for VenueId {
    fn from(id: i64) -> Self {
        VenueId::Number(id)
    }
}
impl Display for VenueId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueId::Number(n) => write!(f, "{}", n),
            VenueId::Raw(s) => write!(f, "{}", s),
            VenueId::Unset => Ok(()),
        }
    }
}


/// The user-editable part of an event.
///
/// This is also the content of the "new event" form, whose default value is the empty form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFields {
    pub name: String,
    /// An ISO-8601 date (e.g. `2024-05-01`). This is never parsed by this crate.
    pub date: String,
    pub venue_id: VenueId,
    pub is_starred: bool,
    #[serde(rename = "private")]
    pub is_private: bool,
    #[serde(rename = "cancelled")]
    pub is_cancelled: bool,
}

impl EventFields {
    /// Apply a single field change
    pub fn apply(&mut self, change: FieldChange) {
        match change {
            FieldChange::Name(name) => self.name = name,
            FieldChange::Date(date) => self.date = date,
            FieldChange::VenueId(venue) => self.venue_id = VenueId::from_input(venue),
            FieldChange::Starred(checked) => self.is_starred = checked,
            FieldChange::Private(checked) => self.is_private = checked,
            FieldChange::Cancelled(checked) => self.is_cancelled = checked,
        }
    }
}


/// An event, as stored in the backend table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    id: EventId,
    #[serde(flatten)]
    fields: EventFields,
}

impl EventRecord {
    pub fn new(id: EventId, fields: EventFields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> &EventId          { &self.id     }
    pub fn fields(&self) -> &EventFields  { &self.fields }
    pub fn name(&self) -> &str            { &self.fields.name }
    pub fn date(&self) -> &str            { &self.fields.date }
    pub fn venue_id(&self) -> &VenueId    { &self.fields.venue_id }
    pub fn is_starred(&self) -> bool      { self.fields.is_starred }
    pub fn is_private(&self) -> bool      { self.fields.is_private }
    pub fn is_cancelled(&self) -> bool    { self.fields.is_cancelled }

    /// Change one field. The `id` cannot be changed.
    pub fn apply(&mut self, change: FieldChange) {
        self.fields.apply(change)
    }

    pub fn into_fields(self) -> EventFields {
        self.fields
    }
}


/// A change of a single field, as produced by an input of the edit form
#[derive(Clone, Debug, PartialEq)]
pub enum FieldChange {
    Name(String),
    Date(String),
    VenueId(String),
    Starred(bool),
    Private(bool),
    Cancelled(bool),
}

impl FieldChange {
    /// Build a change from a field name and a raw user input.
    ///
    /// Field names are the table column names (`venue_id`, `private`...), camelCase names (`venueId`, `isPrivate`...) are accepted as well.
    /// Checkbox fields accept `true/false`, `yes/no`, `on/off` and `1/0`.
    pub fn parse(field: &str, raw: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        match field {
            "name" => Ok(FieldChange::Name(raw.to_string())),
            "date" => Ok(FieldChange::Date(raw.to_string())),
            "venue_id" | "venueId" | "venue" => Ok(FieldChange::VenueId(raw.to_string())),
            "is_starred" | "isStarred" | "starred" => Ok(FieldChange::Starred(parse_checked(raw)?)),
            "private" | "is_private" | "isPrivate" => Ok(FieldChange::Private(parse_checked(raw)?)),
            "cancelled" | "is_cancelled" | "isCancelled" => Ok(FieldChange::Cancelled(parse_checked(raw)?)),
            other => Err(format!("Unknown field {:?}", other).into()),
        }
    }
}

fn parse_checked(raw: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "y" => Ok(true),
        "false" | "no" | "off" | "0" | "n" => Ok(false),
        other => Err(format!("{:?} is not a checkbox value", other).into()),
    }
}
