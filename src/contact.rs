//! Contacts as they are stored and exchanged: ids, the stored record, the request payload and the
//! validation rules a record must pass.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PhonebookError, Result};

/// minimum number of characters in a contact name
pub const MIN_NAME_LEN: usize = 3;

/// minimum number of characters in a phone number
pub const MIN_NUMBER_LEN: usize = 8;

// two or three ASCII digits, a hyphen, then one or more ASCII digits
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2,3}-[0-9]+$").expect("phone number pattern is valid"));

/// The identifier of a stored [`Contact`].
///
/// Ids are generated by the storage engine and are never reused. On the wire they are rendered as
/// a 16 character, lower-case, hexadecimal string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(u64);

impl ContactId {
    /// wraps a raw store generated id
    pub fn new(raw: u64) -> Self {
        ContactId(raw)
    }

    /// the raw store generated id
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// the big-endian bytes of this id, used as an ordered storage key
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for ContactId {
    type Err = PhonebookError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 16 || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(PhonebookError::MalformedId(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(ContactId)
            .map_err(|_| PhonebookError::MalformedId(s.to_string()))
    }
}

impl Serialize for ContactId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored phonebook entry, as returned by every endpoint of the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// store assigned identifier, immutable once created
    pub id: ContactId,
    /// unique display name
    pub name: String,
    /// phone number, e.g. `040-1234567`
    pub number: String,
}

impl Contact {
    /// builds a stored contact from its id and validated fields
    pub fn new(id: ContactId, fields: NewContact) -> Self {
        Contact {
            id,
            name: fields.name,
            number: fields.number,
        }
    }
}

/// The request body of a create or update.
///
/// Both fields are optional so that a missing field is reported as an invalid person object
/// instead of a deserialization failure. Any other field, `id` included, is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPayload {
    /// the requested name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// the requested phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl ContactPayload {
    /// builds a payload holding both fields
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        ContactPayload {
            name: Some(name.into()),
            number: Some(number.into()),
        }
    }

    /// checks that `name` and `number` are present, non-blank strings
    ///
    /// # Errors
    /// returns [`PhonebookError::InvalidInput`] with the message "invalid person object"
    pub fn require_fields(self) -> Result<NewContact> {
        match (self.name, self.number) {
            (Some(name), Some(number)) if !name.trim().is_empty() && !number.trim().is_empty() => {
                Ok(NewContact { name, number })
            }
            _ => Err(invalid_person_object()),
        }
    }
}

/// the error returned for any body that is not a usable person object
pub fn invalid_person_object() -> PhonebookError {
    PhonebookError::InvalidInput("invalid person object".to_string())
}

/// The name and number of a contact that passed the presence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    /// the contact name
    pub name: String,
    /// the contact phone number
    pub number: String,
}

impl NewContact {
    /// builds a `NewContact` without validating it
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        NewContact {
            name: name.into(),
            number: number.into(),
        }
    }

    /// checks the format rules of a stored contact: the name is at least [`MIN_NAME_LEN`]
    /// characters, the number is at least [`MIN_NUMBER_LEN`] characters and looks like `09-1234556`
    ///
    /// # Errors
    /// returns [`PhonebookError::InvalidInput`] naming every field that failed
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.name.chars().count() < MIN_NAME_LEN {
            problems.push(format!(
                "name: `{}` is shorter than the minimum allowed length ({})",
                self.name, MIN_NAME_LEN
            ));
        }
        if self.number.chars().count() < MIN_NUMBER_LEN {
            problems.push(format!(
                "number: `{}` is shorter than the minimum allowed length ({})",
                self.number, MIN_NUMBER_LEN
            ));
        } else if !NUMBER_PATTERN.is_match(&self.number) {
            problems.push(format!("number: {} is not a valid phone number", self.number));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PhonebookError::InvalidInput(format!(
                "Person validation failed: {}",
                problems.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_renders_as_fixed_width_hex() {
        let id = ContactId::new(42);
        assert_eq!(id.to_string(), "000000000000002a");
        assert_eq!("000000000000002a".parse::<ContactId>().unwrap(), id);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for raw in ["", "42", "000000000000002A", "zz0000000000002a", "0000000000000002aa"] {
            assert!(
                matches!(raw.parse::<ContactId>(), Err(PhonebookError::MalformedId(_))),
                "{raw} should be malformed"
            );
        }
    }

    #[test]
    fn contact_serializes_with_string_id() {
        let contact = Contact::new(ContactId::new(1), NewContact::new("Ada Lovelace", "39-445323"));
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "0000000000000001", "name": "Ada Lovelace", "number": "39-445323"})
        );
    }

    #[test]
    fn payload_ignores_client_supplied_id() {
        let payload: ContactPayload =
            serde_json::from_str(r#"{"id": "1234", "name": "Ada", "number": "12-345678"}"#).unwrap();
        let fields = payload.require_fields().unwrap();
        assert_eq!(fields, NewContact::new("Ada", "12-345678"));
    }

    #[test]
    fn blank_or_missing_fields_are_invalid() {
        let payloads = [
            ContactPayload::default(),
            ContactPayload { name: Some("Ada".into()), number: None },
            ContactPayload::new("   ", "12-345678"),
            ContactPayload::new("Ada", ""),
        ];
        for payload in payloads {
            match payload.require_fields() {
                Err(PhonebookError::InvalidInput(msg)) => assert_eq!(msg, "invalid person object"),
                other => panic!("expected invalid input, got {other:?}"),
            }
        }
    }

    #[test]
    fn number_format_is_enforced() {
        assert!(NewContact::new("Ada", "12-345678").validate().is_ok());
        assert!(NewContact::new("Ada", "123-45678").validate().is_ok());
        // too short
        assert!(NewContact::new("Ada", "12-3456").validate().is_err());
        // four leading digits
        assert!(NewContact::new("Ada", "1234-5678").validate().is_err());
        // no hyphen
        assert!(NewContact::new("Ada", "123456789").validate().is_err());
        // trailing letters
        assert!(NewContact::new("Ada", "12-34567a").validate().is_err());
        // digits outside ASCII
        assert!(NewContact::new("Ada", "١٢-٣٤٥٦٧٨").validate().is_err());
        assert!(NewContact::new("Ada", "１２-３４５６７８").validate().is_err());
    }

    #[test]
    fn short_names_are_invalid() {
        let err = NewContact::new("Al", "12-345678").validate().unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
