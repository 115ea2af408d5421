use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and timestamps shared by every stored object.
///
/// Timestamps are kept at microsecond precision so that a value read back from
/// the storage file compares equal to the one that was written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseModel {
    /// UUIDv4, assigned once at construction
    #[serde(default = "new_id")]
    pub id: String,

    #[serde(default = "now", with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "now", with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl BaseModel {
    /// Fresh identity: new id, both timestamps set to now
    pub fn new() -> Self {
        let now = now();
        Self {
            id: new_id(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at` before a mutation is persisted
    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

impl Default for BaseModel {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time truncated to the precision of the storage format
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Serde adapter for object timestamps.
///
/// Written as `2017-06-14T22:31:03.285259` (UTC, no offset). Reading also
/// accepts a missing fraction and RFC 3339 strings.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
    const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match NaiveDateTime::parse_from_str(raw, PARSE_FORMAT) {
            Ok(naive) => Ok(naive.and_utc()),
            Err(_) => DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
