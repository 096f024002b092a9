use crate::domain::shared::errors::DomainError;
use crate::domain::shared::geo::Coordinates;
use bytes::Bytes;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MissingPersonForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 300, message = "Last seen location is required"))]
    pub last_seen_location: String,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<u32>,
    #[validate(length(max = 40))]
    pub gender: Option<String>,
    #[validate(length(max = 2000))]
    pub identifying_features: Option<String>,
    #[validate(length(max = 200))]
    pub reporter_contact: Option<String>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DamageReportForm {
    #[validate(length(min = 1, max = 300, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, max = 5000, message = "Description is required"))]
    pub description: String,
    pub has_casualties: bool,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone)]
pub enum ReportForm {
    MissingPerson(MissingPersonForm),
    Damage(DamageReportForm),
}

/// Raw bytes of an image picked for a report.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn trim_optional(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        trim_in_place(inner);
        if inner.is_empty() {
            *value = None;
        }
    }
}

fn check_coordinates(coordinates: Option<Coordinates>) -> Result<(), DomainError> {
    match coordinates {
        Some(c) if !c.is_valid() => Err(DomainError::ValidationError(format!(
            "Invalid coordinates: {}, {}",
            c.latitude, c.longitude
        ))),
        _ => Ok(()),
    }
}

/// Flattens validator output into a single readable message.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

impl ReportForm {
    /// Trims every text field; blank optional fields become absent.
    pub fn normalize(&mut self) {
        match self {
            ReportForm::MissingPerson(f) => {
                trim_in_place(&mut f.name);
                trim_in_place(&mut f.last_seen_location);
                trim_optional(&mut f.gender);
                trim_optional(&mut f.identifying_features);
                trim_optional(&mut f.reporter_contact);
            }
            ReportForm::Damage(f) => {
                trim_in_place(&mut f.location);
                trim_in_place(&mut f.description);
            }
        }
    }

    pub fn check(&self) -> Result<(), DomainError> {
        let (validated, coordinates) = match self {
            ReportForm::MissingPerson(f) => (f.validate(), f.coordinates),
            ReportForm::Damage(f) => (f.validate(), f.coordinates),
        };
        validated.map_err(|e| DomainError::ValidationError(describe(&e)))?;
        check_coordinates(coordinates)
    }
}
