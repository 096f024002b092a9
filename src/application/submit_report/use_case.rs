use super::dto::{ImageUpload, ReportForm};
use crate::application::messages;
use crate::application::reports::repository::ReportRepository;
use crate::domain::report::{NewDamageReport, NewMissingPerson, NewReport, Report, ReportKind};
use crate::domain::session::SessionProvider;
use crate::domain::shared::errors::DomainError;
use crate::domain::shared::geo::{Coordinates, NEPAL_CENTER};
use crate::domain::shared::ids::UserId;
use crate::domain::shared::notice::{Notice, Notifier};
use image::ImageFormat;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Upper bound on a report image, matching the storage bucket's limit.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Detected image type of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageKind {
    pub extension: &'static str,
    pub content_type: &'static str,
}

/// Sniffs the image format from its leading bytes. Only JPEG, PNG, WebP and
/// GIF are accepted.
pub fn detect_image(data: &[u8]) -> Result<ImageKind, DomainError> {
    if data.is_empty() {
        return Err(DomainError::ValidationError("Image is empty".to_string()));
    }
    if data.len() > MAX_IMAGE_BYTES {
        return Err(DomainError::ValidationError(format!(
            "Image exceeds {} MB",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    let format = image::guess_format(data)
        .map_err(|_| DomainError::ValidationError("Unrecognized image format".to_string()))?;
    match format {
        ImageFormat::Jpeg => Ok(ImageKind {
            extension: "jpg",
            content_type: "image/jpeg",
        }),
        ImageFormat::Png => Ok(ImageKind {
            extension: "png",
            content_type: "image/png",
        }),
        ImageFormat::WebP => Ok(ImageKind {
            extension: "webp",
            content_type: "image/webp",
        }),
        ImageFormat::Gif => Ok(ImageKind {
            extension: "gif",
            content_type: "image/gif",
        }),
        other => Err(DomainError::ValidationError(format!(
            "Unsupported image format: {other:?}"
        ))),
    }
}

/// Creates missing-person and damage reports.
///
/// Input is trimmed and validated before anything reaches the backend. The
/// image, if any, is uploaded first so the stored row can carry its URL.
pub struct SubmitReportUseCase {
    repository: ReportRepository,
    sessions: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    default_center: Coordinates,
}

impl SubmitReportUseCase {
    pub fn new(
        repository: ReportRepository,
        sessions: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            sessions,
            notifier,
            default_center: NEPAL_CENTER,
        }
    }

    /// Coordinates used when the form carries none.
    pub fn with_default_center(mut self, center: Coordinates) -> Self {
        self.default_center = center;
        self
    }

    #[instrument(skip_all, fields(kind = %form_kind(&form), has_image = image.is_some()))]
    pub async fn execute(
        &self,
        mut form: ReportForm,
        image: Option<ImageUpload>,
    ) -> Result<Report, DomainError> {
        let Some(session) = self.sessions.current_session() else {
            self.notifier.notify(Notice::error(messages::LOGIN_TO_REPORT));
            return Err(DomainError::AuthRequired);
        };

        form.normalize();
        if let Err(e) = form.check() {
            debug!(error = %e, "Report form rejected");
            self.notifier.notify(Notice::error(e.to_string()));
            return Err(e);
        }
        let image_kind = match image.as_ref().map(|i| detect_image(&i.data)).transpose() {
            Ok(kind) => kind,
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        let kind = form_kind(&form);
        let mut draft = self.draft(form, session.user_id);

        if let (Some(image), Some(image_kind)) = (image, image_kind) {
            let url = self
                .repository
                .upload_report_image(kind, image.data, image_kind.extension, image_kind.content_type)
                .await
                .inspect_err(|_| self.notifier.notify(Notice::error(messages::REPORT_FAILED)))?;
            draft.set_image_url(Some(url));
        }

        let report = self.repository.create_report(&draft).await.map_err(|e| {
            error!(error = %e, "Report insert failed");
            self.notifier.notify(Notice::error(messages::REPORT_FAILED));
            e
        })?;

        self.notifier
            .notify(Notice::success(messages::report_submitted(kind)));
        info!(report_id = %report.id(), "Report submitted");
        Ok(report)
    }

    fn draft(&self, form: ReportForm, reporter_id: UserId) -> NewReport {
        match form {
            ReportForm::MissingPerson(f) => NewReport::MissingPerson(NewMissingPerson {
                name: f.name,
                last_seen_location: f.last_seen_location,
                age: f.age,
                gender: f.gender,
                identifying_features: f.identifying_features,
                reporter_contact: f.reporter_contact,
                image_url: None,
                coordinates: f.coordinates.unwrap_or(self.default_center),
                reporter_id,
            }),
            ReportForm::Damage(f) => NewReport::Damage(NewDamageReport {
                location: f.location,
                description: f.description,
                has_casualties: f.has_casualties,
                image_url: None,
                coordinates: f.coordinates.unwrap_or(self.default_center),
                reporter_id,
            }),
        }
    }
}

fn form_kind(form: &ReportForm) -> ReportKind {
    match form {
        ReportForm::MissingPerson(_) => ReportKind::MissingPerson,
        ReportForm::Damage(_) => ReportKind::Damage,
    }
}
