//! Wire shapes of backend rows and their conversion into domain types.
//!
//! Rows are lenient on the way in: nullable counters default to zero, flags
//! to `false`, a half-filled coordinate pair is dropped. Anything that cannot
//! be interpreted at all (missing id, bad timestamp) is a decode error.

use crate::domain::comment::{ANONYMOUS_AUTHOR, Comment, CommentParent};
use crate::domain::report::{
    CollectionBinding, DamageReport, MissingPerson, NewReport, PersonStatus, Report, ReportKind,
};
use crate::domain::shared::errors::GatewayError;
use crate::domain::shared::geo::Coordinates;
use crate::domain::shared::ids::{CommentId, ReportId, UserId};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

/// Accepts identifiers sent either as strings or as integers.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid id: {other}"))),
    }
}

fn flexible_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("invalid id: {other}"))),
    }
}

fn coordinates(id: &str, latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinates> {
    let pair = Coordinates::from_columns(latitude, longitude);
    if pair.is_none() && (latitude.is_some() || longitude.is_some()) {
        debug!(id, ?latitude, ?longitude, "Dropping half-filled coordinate pair");
    }
    pair
}

fn counter(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

#[derive(Debug, Deserialize)]
pub struct MissingPersonRow {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_seen_location: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub identifying_features: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub reporter_contact: Option<String>,
    #[serde(default, deserialize_with = "flexible_optional_id")]
    pub reporter_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub view_count: Option<i64>,
}

impl From<MissingPersonRow> for MissingPerson {
    fn from(row: MissingPersonRow) -> Self {
        let coordinates = coordinates(&row.id, row.latitude, row.longitude);
        MissingPerson {
            id: ReportId::new(row.id),
            created_at: row.created_at,
            name: row.name.unwrap_or_default(),
            last_seen_location: row.last_seen_location.unwrap_or_default(),
            age: row.age.and_then(|a| u32::try_from(a).ok()),
            gender: row.gender,
            identifying_features: row.identifying_features,
            image_url: row.image_url,
            coordinates,
            reporter_contact: row.reporter_contact,
            reporter_id: row.reporter_id.map(UserId::new),
            status: PersonStatus::from_column(row.status.as_deref()),
            view_count: counter(row.view_count),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DamageReportRow {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "flexible_optional_id")]
    pub reporter_id: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub has_casualties: Option<bool>,
    #[serde(default)]
    pub view_count: Option<i64>,
}

impl From<DamageReportRow> for DamageReport {
    fn from(row: DamageReportRow) -> Self {
        let coordinates = coordinates(&row.id, row.latitude, row.longitude);
        DamageReport {
            id: ReportId::new(row.id),
            created_at: row.created_at,
            location: row.location.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            image_url: row.image_url,
            coordinates,
            reporter_id: row.reporter_id.map(UserId::new),
            verified: row.verified.unwrap_or(false),
            has_casualties: row.has_casualties.unwrap_or(false),
            view_count: counter(row.view_count),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileJoin {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRow {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_optional_id")]
    pub missing_person_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_optional_id")]
    pub damage_report_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "flexible_optional_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub user_likes: Option<Vec<String>>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub profiles: Option<ProfileJoin>,
}

pub fn decode_report(kind: ReportKind, value: Value) -> Result<Report, GatewayError> {
    let report = match kind {
        ReportKind::MissingPerson => serde_json::from_value::<MissingPersonRow>(value)
            .map(|row| Report::MissingPerson(row.into())),
        ReportKind::Damage => serde_json::from_value::<DamageReportRow>(value)
            .map(|row| Report::Damage(row.into())),
    };
    report.map_err(|e| GatewayError::Decode(format!("{kind} row: {e}")))
}

/// Decodes a comment row of `binding`'s comment collection.
///
/// The parent is read from the row's foreign key; `fallback_parent` is used
/// when the projection did not include it.
pub fn decode_comment(
    binding: &CollectionBinding,
    value: Value,
    fallback_parent: Option<&ReportId>,
) -> Result<Comment, GatewayError> {
    let row: CommentRow = serde_json::from_value(value)
        .map_err(|e| GatewayError::Decode(format!("{} row: {e}", binding.comment_collection)))?;

    let parent_id = match binding.kind {
        ReportKind::MissingPerson => row.missing_person_id.clone(),
        ReportKind::Damage => row.damage_report_id.clone(),
    }
    .map(ReportId::new)
    .or_else(|| fallback_parent.cloned())
    .ok_or_else(|| {
        GatewayError::Decode(format!(
            "comment {} has no {}",
            row.id, binding.foreign_key_field
        ))
    })?;

    let user_likes: Vec<UserId> = row
        .user_likes
        .unwrap_or_default()
        .into_iter()
        .map(UserId::new)
        .collect();
    let likes = row
        .likes
        .and_then(|l| u32::try_from(l).ok())
        .unwrap_or(0);
    let author_username = row
        .profiles
        .and_then(|p| p.username)
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());
    let (coordinates, location_name) = match binding.kind {
        ReportKind::MissingPerson => (
            self::coordinates(&row.id, row.latitude, row.longitude),
            row.location_name,
        ),
        ReportKind::Damage => (None, None),
    };

    Ok(Comment {
        id: CommentId::new(row.id),
        parent: CommentParent::new(binding.kind, parent_id),
        content: row.content.unwrap_or_default(),
        created_at: row.created_at,
        user_id: row.user_id.map(UserId::new),
        image_url: row.image_url,
        likes,
        user_likes,
        author_username,
        coordinates,
        location_name,
    })
}

/// Insert payload for a new comment, keyed by the binding's foreign key.
pub fn comment_payload(
    binding: &CollectionBinding,
    report_id: &ReportId,
    content: &str,
    user_id: &UserId,
) -> Value {
    let mut payload = serde_json::Map::new();
    payload.insert(
        binding.foreign_key_field.to_string(),
        Value::String(report_id.to_string()),
    );
    payload.insert("content".to_string(), Value::String(content.to_string()));
    payload.insert("user_id".to_string(), Value::String(user_id.to_string()));
    Value::Object(payload)
}

pub fn likes_patch(comment: &Comment) -> Value {
    json!({
        "likes": comment.likes,
        "user_likes": comment.user_likes,
    })
}

pub fn status_patch(status: PersonStatus) -> Value {
    json!({ "status": status.as_str() })
}

#[derive(Debug, Serialize)]
struct MissingPersonInsert<'a> {
    name: &'a str,
    last_seen_location: &'a str,
    age: Option<u32>,
    gender: Option<&'a str>,
    identifying_features: Option<&'a str>,
    reporter_contact: Option<&'a str>,
    image_url: Option<&'a str>,
    latitude: f64,
    longitude: f64,
    reporter_id: &'a str,
}

#[derive(Debug, Serialize)]
struct DamageReportInsert<'a> {
    location: &'a str,
    description: &'a str,
    image_url: Option<&'a str>,
    latitude: f64,
    longitude: f64,
    has_casualties: bool,
    reporter_id: &'a str,
}

pub fn report_payload(report: &NewReport) -> Result<Value, GatewayError> {
    let encoded = match report {
        NewReport::MissingPerson(r) => serde_json::to_value(MissingPersonInsert {
            name: &r.name,
            last_seen_location: &r.last_seen_location,
            age: r.age,
            gender: r.gender.as_deref(),
            identifying_features: r.identifying_features.as_deref(),
            reporter_contact: r.reporter_contact.as_deref(),
            image_url: r.image_url.as_deref(),
            latitude: r.coordinates.latitude,
            longitude: r.coordinates.longitude,
            reporter_id: r.reporter_id.as_str(),
        }),
        NewReport::Damage(r) => serde_json::to_value(DamageReportInsert {
            location: &r.location,
            description: &r.description,
            image_url: r.image_url.as_deref(),
            latitude: r.coordinates.latitude,
            longitude: r.coordinates.longitude,
            has_casualties: r.has_casualties,
            reporter_id: r.reporter_id.as_str(),
        }),
    };
    encoded.map_err(|e| GatewayError::Decode(e.to_string()))
}
