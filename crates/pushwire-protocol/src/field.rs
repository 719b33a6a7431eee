//! Optional event fields.
//!
//! An event's `id` and `event` fields can be absent, or present with an
//! empty value, and the two mean different things on the wire: an absent
//! field produces no line at all, an empty one produces `id: \n`. An
//! `Option<String>` would model this too, but [`FieldValue`] keeps the
//! value and its "set" flag together so the empty-but-set case reads
//! explicitly at every use site.

use std::fmt;

use pushwire_parser::is_single_line;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::FieldError;

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A tri-state string: unset, set to `""`, or set to a value.
///
/// Equality compares both the value and the flag, so
/// `FieldValue::unset() != FieldValue::new("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldValue {
    value: String,
    set: bool,
}

impl FieldValue {
    /// A value that was never set.
    pub const fn unset() -> Self {
        Self {
            value: String::new(),
            set: false,
        }
    }

    /// A set value. Performs no validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            set: true,
        }
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    /// The value, or `""` when unset.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// `None` when unset, otherwise the value (possibly empty).
    pub fn get(&self) -> Option<&str> {
        self.set.then_some(self.value.as_str())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Unset serializes as `null`.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

/// `null` deserializes as unset.
impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(Self::new)
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// EventId / EventName
// ---------------------------------------------------------------------------

/// The `id` field of an event.
///
/// Clients echo the last ID they saw when reconnecting, so a valid ID must
/// fit on one line and must not contain NUL (clients ignore such IDs).
///
/// ```
/// use pushwire_protocol::{EventId, FieldError};
///
/// let id = EventId::new("42").unwrap();
/// assert_eq!(id.as_str(), "42");
///
/// assert_eq!(EventId::new("4\n2"), Err(FieldError::Newline { field: "id" }));
/// assert_eq!(EventId::new("4\02"), Err(FieldError::Nul { field: "id" }));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(FieldValue);

impl EventId {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        if !is_single_line(&value) {
            return Err(FieldError::Newline { field: "id" });
        }
        if value.contains('\0') {
            return Err(FieldError::Nul { field: "id" });
        }
        Ok(Self(FieldValue::new(value)))
    }

    pub const fn unset() -> Self {
        Self(FieldValue::unset())
    }

    /// Builds an ID from a tokenized field, which is single-line already.
    /// The caller is responsible for rejecting NUL.
    pub(crate) fn from_wire(value: &str) -> Self {
        Self(FieldValue::new(value))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_set()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn get(&self) -> Option<&str> {
        self.0.get()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) => Self::new(value).map_err(de::Error::custom),
            None => Ok(Self::unset()),
        }
    }
}

/// The `event` field of an event: its type, as seen by the client.
///
/// Must fit on one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EventName(FieldValue);

impl EventName {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        if !is_single_line(&value) {
            return Err(FieldError::Newline { field: "event" });
        }
        Ok(Self(FieldValue::new(value)))
    }

    pub const fn unset() -> Self {
        Self(FieldValue::unset())
    }

    pub(crate) fn from_wire(value: &str) -> Self {
        Self(FieldValue::new(value))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_set()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn get(&self) -> Option<&str> {
        self.0.get()
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for EventName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) => Self::new(value).map_err(de::Error::custom),
            None => Ok(Self::unset()),
        }
    }
}
