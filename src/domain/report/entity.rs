use super::kind::ReportKind;
use crate::domain::shared::geo::Coordinates;
use crate::domain::shared::ids::{ReportId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a missing person has been located.
///
/// Rows with a null or unrecognized status are treated as still missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonStatus {
    #[default]
    Missing,
    Found,
}

impl PersonStatus {
    pub fn from_column(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("found") => PersonStatus::Found,
            _ => PersonStatus::Missing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonStatus::Missing => "missing",
            PersonStatus::Found => "found",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            PersonStatus::Missing => PersonStatus::Found,
            PersonStatus::Found => PersonStatus::Missing,
        }
    }
}

impl fmt::Display for PersonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report about a person whose whereabouts are unknown.
///
/// # Invariants
/// - `id`, `created_at` and `reporter_id` are assigned by the backend and
///   never change on the client.
/// - `coordinates` is either a full pair or absent.
/// - `view_count` is maintained server-side; the client only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingPerson {
    pub id: ReportId,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub last_seen_location: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub identifying_features: Option<String>,
    pub image_url: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub reporter_contact: Option<String>,
    pub reporter_id: Option<UserId>,
    pub status: PersonStatus,
    pub view_count: u64,
}

/// A report of damage at a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub id: ReportId,
    pub created_at: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub reporter_id: Option<UserId>,
    pub verified: bool,
    pub has_casualties: bool,
    pub view_count: u64,
}

/// Either kind of report, for code that handles both uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    MissingPerson(MissingPerson),
    Damage(DamageReport),
}

impl Report {
    pub fn id(&self) -> &ReportId {
        match self {
            Report::MissingPerson(r) => &r.id,
            Report::Damage(r) => &r.id,
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Report::MissingPerson(_) => ReportKind::MissingPerson,
            Report::Damage(_) => ReportKind::Damage,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Report::MissingPerson(r) => r.created_at,
            Report::Damage(r) => r.created_at,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Report::MissingPerson(r) => r.coordinates,
            Report::Damage(r) => r.coordinates,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Report::MissingPerson(r) => r.image_url.as_deref(),
            Report::Damage(r) => r.image_url.as_deref(),
        }
    }

    pub fn reporter_id(&self) -> Option<&UserId> {
        match self {
            Report::MissingPerson(r) => r.reporter_id.as_ref(),
            Report::Damage(r) => r.reporter_id.as_ref(),
        }
    }

    /// Line shown on cards and map pins: the person's name or the damaged
    /// location.
    pub fn title(&self) -> &str {
        match self {
            Report::MissingPerson(r) => &r.name,
            Report::Damage(r) => &r.location,
        }
    }

    pub fn view_count(&self) -> u64 {
        match self {
            Report::MissingPerson(r) => r.view_count,
            Report::Damage(r) => r.view_count,
        }
    }

    /// `true` when `user` filed this report.
    pub fn is_reported_by(&self, user: &UserId) -> bool {
        self.reporter_id() == Some(user)
    }

    pub fn as_missing_person(&self) -> Option<&MissingPerson> {
        match self {
            Report::MissingPerson(r) => Some(r),
            Report::Damage(_) => None,
        }
    }

    pub fn as_damage(&self) -> Option<&DamageReport> {
        match self {
            Report::Damage(r) => Some(r),
            Report::MissingPerson(_) => None,
        }
    }
}

impl From<MissingPerson> for Report {
    fn from(value: MissingPerson) -> Self {
        Report::MissingPerson(value)
    }
}

impl From<DamageReport> for Report {
    fn from(value: DamageReport) -> Self {
        Report::Damage(value)
    }
}
