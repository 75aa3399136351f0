//! Artefact records as returned by the listing service.
//!
//! The wire shape is loosely typed: identifiers may be numbers or strings and
//! most fields may be absent or `null`. Records are validated once during
//! deserialisation into [`Artefact`], with every optional field given a
//! documented default, so downstream stages never deal with raw JSON.

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Opaque artefact identifier, unique within a repository.
///
/// The listing service sends numeric identifiers, but the value is only ever
/// compared and echoed back into URLs, so it is kept as a string.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::record::ArtefactId;
///
/// let id = ArtefactId::from(42_u64);
/// assert_eq!(id.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtefactId(String);

impl ArtefactId {
    /// Create an identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ArtefactId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ArtefactId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ArtefactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ArtefactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Number(u64),
            Text(String),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Number(number) => Self::from(number),
            WireId::Text(text) => Self(text),
        })
    }
}

/// A timestamp string could not be interpreted as ISO 8601.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ISO 8601 timestamp \"{value}\"")]
pub struct InvalidTimestamp {
    /// The rejected timestamp string.
    pub value: String,
}

/// Last-updated timestamp of an artefact.
///
/// An absent timestamp is represented explicitly and orders before every
/// present timestamp, so it never wins a latest-by-timestamp comparison
/// against a dated artefact.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::record::UpdatedAt;
///
/// let dated = UpdatedAt::parse("2024-01-02T00:00:00Z").expect("valid timestamp");
/// assert!(dated > UpdatedAt::missing());
/// assert!(dated > UpdatedAt::parse("2024-01-01").expect("valid date"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UpdatedAt(Option<DateTime<Utc>>);

impl UpdatedAt {
    /// The value used when the listing omits the timestamp.
    #[must_use]
    pub const fn missing() -> Self {
        Self(None)
    }

    /// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTimestamp`] when the value matches neither form.
    pub fn parse(value: &str) -> Result<Self, InvalidTimestamp> {
        let trimmed = value.trim();
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(Some(timestamp.with_timezone(&Utc))));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Self(Some(midnight.and_utc())))
            .ok_or_else(|| InvalidTimestamp {
                value: value.to_owned(),
            })
    }

    /// Return true when the listing did not carry a usable timestamp.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.0.is_none()
    }
}

impl From<DateTime<Utc>> for UpdatedAt {
    fn from(value: DateTime<Utc>) -> Self {
        Self(Some(value))
    }
}

impl fmt::Display for UpdatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(timestamp) => write!(f, "{}", timestamp.to_rfc3339()),
            None => f.write_str("unknown"),
        }
    }
}

/// A build artefact stored by the CI service.
///
/// Records are never mutated once ingested; the pipeline filters and selects
/// them by value.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::record::{Artefact, UpdatedAt};
///
/// let json = r#"{"id": 7, "name": "dist", "updated_at": "2024-01-02T00:00:00Z"}"#;
/// let artefact: Artefact = serde_json::from_str(json).expect("valid record");
/// assert_eq!(artefact.id().as_str(), "7");
/// assert_eq!(artefact.size_in_bytes(), 0);
/// assert!(!artefact.is_expired());
/// assert_eq!(artefact.updated_at(), UpdatedAt::parse("2024-01-02").expect("date"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireArtefact")]
pub struct Artefact {
    id: ArtefactId,
    name: String,
    size_in_bytes: u64,
    updated_at: UpdatedAt,
    expired: bool,
}

impl Artefact {
    /// Create an unexpired artefact of unknown size.
    #[must_use]
    pub fn new(id: impl Into<ArtefactId>, name: impl Into<String>, updated_at: UpdatedAt) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size_in_bytes: 0,
            updated_at,
            expired: false,
        }
    }

    /// Return a copy with the given size in bytes.
    #[must_use]
    pub fn with_size_in_bytes(mut self, size_in_bytes: u64) -> Self {
        self.size_in_bytes = size_in_bytes;
        self
    }

    /// Return a copy with the given expiry flag.
    #[must_use]
    pub fn with_expired(mut self, expired: bool) -> Self {
        self.expired = expired;
        self
    }

    /// The artefact identifier.
    #[must_use]
    pub const fn id(&self) -> &ArtefactId {
        &self.id
    }

    /// The artefact name; empty when the listing omitted it.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Archive size in bytes; zero when unknown.
    #[must_use]
    pub const fn size_in_bytes(&self) -> u64 {
        self.size_in_bytes
    }

    /// Last-updated timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> UpdatedAt {
        self.updated_at
    }

    /// Whether the CI service marked the artefact as expired.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }
}

impl fmt::Display for Artefact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id {}, {} bytes, updated {})",
            self.name, self.id, self.size_in_bytes, self.updated_at
        )
    }
}

/// Raw listing record before defaults are applied.
#[derive(Deserialize)]
struct WireArtefact {
    id: ArtefactId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size_in_bytes: Option<u64>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    expired: Option<bool>,
}

impl From<WireArtefact> for Artefact {
    fn from(wire: WireArtefact) -> Self {
        let updated_at = wire
            .updated_at
            .as_deref()
            .map_or_else(UpdatedAt::missing, |raw| {
                UpdatedAt::parse(raw).unwrap_or_else(|err| {
                    warn!("artefact {}: {err}; treating as missing", wire.id);
                    UpdatedAt::missing()
                })
            });
        Self {
            id: wire.id,
            name: wire.name.unwrap_or_default(),
            size_in_bytes: wire.size_in_bytes.unwrap_or_default(),
            updated_at,
            expired: wire.expired.unwrap_or_default(),
        }
    }
}
