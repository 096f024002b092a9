use crate::domain::shared::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two report families the application tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    MissingPerson,
    Damage,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::MissingPerson, ReportKind::Damage];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::MissingPerson => "missing_person",
            ReportKind::Damage => "damage_report",
        }
    }

    pub fn binding(&self) -> &'static CollectionBinding {
        resolve_collection(*self)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "missing_person" | "missing-person" | "missing_persons" | "missing-persons" => {
                Ok(ReportKind::MissingPerson)
            }
            "damage_report" | "damage-report" | "damage_reports" | "damage-reports" | "damage" => {
                Ok(ReportKind::Damage)
            }
            other => Err(DomainError::ConfigurationError(format!(
                "Unknown report kind: {other}"
            ))),
        }
    }
}

/// Where a report kind lives in the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBinding {
    pub kind: ReportKind,
    /// Collection holding the reports themselves.
    pub collection: &'static str,
    /// Collection holding their comments.
    pub comment_collection: &'static str,
    /// Column on a comment row that points at its parent report.
    pub foreign_key_field: &'static str,
    /// Projection used for every comment read and insert, author join included.
    pub comment_columns: &'static str,
    /// Folder inside the image bucket for this kind's uploads.
    pub image_folder: &'static str,
}

static MISSING_PERSON_BINDING: CollectionBinding = CollectionBinding {
    kind: ReportKind::MissingPerson,
    collection: "missing_persons",
    comment_collection: "missing_person_comments",
    foreign_key_field: "missing_person_id",
    comment_columns: "id, missing_person_id, content, created_at, user_id, image_url, likes, \
                      user_likes, latitude, longitude, location_name, profiles(username)",
    image_folder: "missing-persons",
};

static DAMAGE_BINDING: CollectionBinding = CollectionBinding {
    kind: ReportKind::Damage,
    collection: "damage_reports",
    comment_collection: "damage_report_comments",
    foreign_key_field: "damage_report_id",
    comment_columns: "id, damage_report_id, content, created_at, user_id, image_url, likes, \
                      user_likes, profiles(username)",
    image_folder: "damage-reports",
};

pub fn resolve_collection(kind: ReportKind) -> &'static CollectionBinding {
    match kind {
        ReportKind::MissingPerson => &MISSING_PERSON_BINDING,
        ReportKind::Damage => &DAMAGE_BINDING,
    }
}

/// Resolves a binding from either a kind selector or one of the collection
/// names it owns.
pub fn resolve_collection_by_name(name: &str) -> Result<&'static CollectionBinding, DomainError> {
    let name = name.trim();
    if let Some(binding) = ReportKind::ALL.iter().map(|k| resolve_collection(*k)).find(|b| {
        b.collection == name || b.comment_collection == name || b.foreign_key_field == name
    }) {
        return Ok(binding);
    }
    name.parse::<ReportKind>().map(resolve_collection)
}
