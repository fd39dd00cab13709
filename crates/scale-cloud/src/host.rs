//! Host records tracked by the fleet registry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a host.
///
/// The registry treats the status as an opaque ordinal: only [`HostStatus::NEW`]
/// has a meaning here, every other value is stored and written back untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostStatus(pub i64);

impl HostStatus {
    /// Host has been allocated but is not confirmed running yet
    pub const NEW: HostStatus = HostStatus(0);

    pub fn is_new(self) -> bool {
        self == Self::NEW
    }
}

impl std::fmt::Display for HostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single fleet member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Unique host name, also sent to the gateway on decommission
    pub name: String,

    /// When the host was created (or provisioned, for imported hosts)
    #[serde(default, with = "zero_time")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the host entered an idle-capable state
    #[serde(default, with = "zero_time")]
    pub idle_since: Option<DateTime<Utc>>,

    /// Last mutation of this record
    #[serde(default, with = "zero_time")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Current lifecycle state
    #[serde(default)]
    pub status: HostStatus,
}

impl HostRecord {
    /// A freshly allocated host: status `New`, created and updated at `now`
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created_at: Some(now),
            idle_since: None,
            updated_at: Some(now),
            status: HostStatus::NEW,
        }
    }

    /// A host discovered in provisioning state; only the creation time is known
    pub fn discovered(name: impl Into<String>, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            created_at,
            idle_since: None,
            updated_at: None,
            status: HostStatus::NEW,
        }
    }

    /// Move the host into `status`.
    ///
    /// `idle` marks the new state as idle-capable: `idle_since` is set on entry
    /// and kept while the host stays idle, and cleared once it leaves.
    pub fn transition(&mut self, status: HostStatus, idle: bool, now: DateTime<Utc>) {
        self.status = status;
        if idle {
            self.idle_since.get_or_insert(now);
        } else {
            self.idle_since = None;
        }
        self.touch(now);
    }

    /// Refresh `updated_at`, never letting it fall behind `created_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(match self.created_at {
            Some(created) if created > now => created,
            _ => now,
        });
    }

    pub fn is_idle(&self) -> bool {
        self.idle_since.is_some()
    }
}

impl std::fmt::Display for HostRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}@{})", self.name, self.status)
    }
}

/// Timestamps that may be unset.
///
/// Unset values are written as the zero instant `0001-01-01T00:00:00Z`.
/// Reading accepts the zero instant, `null` and the empty string as unset.
/// Any other instant is kept, even one elsewhere in year 1 or before it.
pub(crate) mod zero_time {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const ZERO: &str = "0001-01-01T00:00:00Z";

    fn is_zero(ts: &DateTime<Utc>) -> bool {
        Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
            .single()
            .is_some_and(|zero| *ts == zero)
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_str(ZERO),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => {
                let ts = DateTime::parse_from_rfc3339(s)
                    .map_err(serde::de::Error::custom)?
                    .with_timezone(&Utc);
                if is_zero(&ts) { Ok(None) } else { Ok(Some(ts)) }
            }
        }
    }
}
