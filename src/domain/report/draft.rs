use super::kind::ReportKind;
use crate::domain::shared::geo::Coordinates;
use crate::domain::shared::ids::UserId;

/// A missing-person report that passed input validation and is ready to be
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMissingPerson {
    pub name: String,
    pub last_seen_location: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub identifying_features: Option<String>,
    pub reporter_contact: Option<String>,
    pub image_url: Option<String>,
    pub coordinates: Coordinates,
    pub reporter_id: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDamageReport {
    pub location: String,
    pub description: String,
    pub has_casualties: bool,
    pub image_url: Option<String>,
    pub coordinates: Coordinates,
    pub reporter_id: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NewReport {
    MissingPerson(NewMissingPerson),
    Damage(NewDamageReport),
}

impl NewReport {
    pub fn kind(&self) -> ReportKind {
        match self {
            NewReport::MissingPerson(_) => ReportKind::MissingPerson,
            NewReport::Damage(_) => ReportKind::Damage,
        }
    }

    pub fn set_image_url(&mut self, url: Option<String>) {
        match self {
            NewReport::MissingPerson(r) => r.image_url = url,
            NewReport::Damage(r) => r.image_url = url,
        }
    }
}
