use super::rows::{
    comment_payload, decode_comment, decode_report, likes_patch, report_payload, status_patch,
};
use crate::domain::comment::{Comment, CommentContent};
use crate::domain::gateway::Gateway;
use crate::domain::gateway::change::{ChangeHandler, Subscription};
use crate::domain::gateway::query::{Filter, SelectQuery};
use crate::domain::report::{NewReport, PersonStatus, Report, ReportKind, resolve_collection};
use crate::domain::shared::errors::{DomainError, GatewayError};
use crate::domain::shared::ids::{ReportId, UserId};
use bytes::Bytes;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

pub const DEFAULT_IMAGE_BUCKET: &str = "disaster-images";
pub const CONSULTATION_COLLECTION: &str = "expert_consultations";

/// Typed access to reports and their comments on top of a [`Gateway`].
///
/// Every collection name, foreign key and projection comes from the
/// [`CollectionBinding`](crate::domain::report::CollectionBinding) table; the
/// repository never builds them from strings.
#[derive(Clone)]
pub struct ReportRepository {
    gateway: Arc<dyn Gateway>,
    bucket: String,
}

impl ReportRepository {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self::with_bucket(gateway, DEFAULT_IMAGE_BUCKET)
    }

    pub fn with_bucket(gateway: Arc<dyn Gateway>, bucket: impl Into<String>) -> Self {
        Self {
            gateway,
            bucket: bucket.into(),
        }
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// All reports of `kind`, newest first.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn list_reports(&self, kind: ReportKind) -> Result<Vec<Report>, DomainError> {
        let binding = resolve_collection(kind);
        let rows = self
            .gateway
            .select(SelectQuery::from(binding.collection).order_by("created_at", false))
            .await
            .map_err(|e| {
                error!(error = %e, collection = binding.collection, "Failed to fetch reports");
                DomainError::FetchError(e)
            })?;

        let reports = decode_all(rows, |row| decode_report(kind, row));
        debug!(count = reports.len(), "Fetched reports");
        Ok(reports)
    }

    #[instrument(skip(self), fields(kind = %kind, report_id = %id))]
    pub async fn find_report(&self, kind: ReportKind, id: &ReportId) -> Result<Report, DomainError> {
        let binding = resolve_collection(kind);
        let rows = self
            .gateway
            .select(
                SelectQuery::from(binding.collection)
                    .eq("id", id.as_str())
                    .limit(1),
            )
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch report");
                DomainError::FetchError(e)
            })?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::NotFound(format!("{kind} {id}")))?;
        decode_report(kind, row).map_err(DomainError::FetchError)
    }

    /// Comments of one report, oldest first, with author names joined in.
    #[instrument(skip(self), fields(kind = %kind, report_id = %report_id))]
    pub async fn list_comments(
        &self,
        kind: ReportKind,
        report_id: &ReportId,
    ) -> Result<Vec<Comment>, DomainError> {
        let binding = resolve_collection(kind);
        let rows = self
            .gateway
            .select(
                SelectQuery::from(binding.comment_collection)
                    .columns(binding.comment_columns)
                    .eq(binding.foreign_key_field, report_id.as_str())
                    .order_by("created_at", true),
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch comments");
                DomainError::FetchError(e)
            })?;

        Ok(decode_all(rows, |row| {
            decode_comment(binding, row, Some(report_id))
        }))
    }

    /// Inserts a comment and returns the stored row, author join included.
    #[instrument(skip(self, content), fields(kind = %kind, report_id = %report_id, user_id = %user_id))]
    pub async fn insert_comment(
        &self,
        kind: ReportKind,
        report_id: &ReportId,
        content: &CommentContent,
        user_id: &UserId,
    ) -> Result<Comment, DomainError> {
        let binding = resolve_collection(kind);
        let payload = comment_payload(binding, report_id, content.as_str(), user_id);
        let row = self
            .gateway
            .insert(binding.comment_collection, payload, binding.comment_columns)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to insert comment");
                DomainError::InsertError(e)
            })?;

        decode_comment(binding, row, Some(report_id)).map_err(DomainError::InsertError)
    }

    #[instrument(skip(self, comment), fields(kind = %kind, comment_id = %comment.id))]
    pub async fn update_comment_likes(
        &self,
        kind: ReportKind,
        comment: &Comment,
    ) -> Result<(), DomainError> {
        let binding = resolve_collection(kind);
        self.gateway
            .update(
                binding.comment_collection,
                comment.id.as_str(),
                likes_patch(comment),
            )
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to update comment likes");
                DomainError::UpdateError(e)
            })
    }

    /// Status only exists on missing-person reports.
    #[instrument(skip(self), fields(report_id = %id, status = %status))]
    pub async fn update_status(&self, id: &ReportId, status: PersonStatus) -> Result<(), DomainError> {
        let binding = resolve_collection(ReportKind::MissingPerson);
        self.gateway
            .update(binding.collection, id.as_str(), status_patch(status))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to update status");
                DomainError::UpdateError(e)
            })
    }

    #[instrument(skip(self), fields(kind = %kind, report_id = %id))]
    pub async fn delete_report(&self, kind: ReportKind, id: &ReportId) -> Result<(), DomainError> {
        let binding = resolve_collection(kind);
        self.gateway
            .delete(binding.collection, id.as_str())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete report");
                DomainError::DeleteError(e)
            })
    }

    /// Uploads a report image under `<image_folder>/<uuid>.<extension>` and
    /// returns its public URL.
    #[instrument(skip(self, data), fields(kind = %kind, size = data.len()))]
    pub async fn upload_report_image(
        &self,
        kind: ReportKind,
        data: Bytes,
        extension: &str,
        content_type: &str,
    ) -> Result<String, DomainError> {
        let binding = resolve_collection(kind);
        let path = format!("{}/{}.{}", binding.image_folder, Uuid::now_v7(), extension);
        let url = self
            .gateway
            .upload_blob(&self.bucket, &path, data, content_type)
            .await
            .map_err(|e| {
                error!(error = %e, path = %path, "Failed to upload image");
                DomainError::UploadError(e)
            })?;
        debug!(url = %url, "Uploaded report image");
        Ok(url)
    }

    #[instrument(skip(self, report), fields(kind = %report.kind()))]
    pub async fn create_report(&self, report: &NewReport) -> Result<Report, DomainError> {
        let kind = report.kind();
        let binding = resolve_collection(kind);
        let payload = report_payload(report).map_err(DomainError::InsertError)?;
        let row = self
            .gateway
            .insert(binding.collection, payload, "*")
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to insert report");
                DomainError::InsertError(e)
            })?;
        decode_report(kind, row).map_err(DomainError::InsertError)
    }

    #[instrument(skip_all)]
    pub async fn create_consultation(
        &self,
        question: &str,
        contact_info: &str,
    ) -> Result<(), DomainError> {
        self.gateway
            .insert(
                CONSULTATION_COLLECTION,
                json!({ "question": question, "contact_info": contact_info }),
                "id",
            )
            .await
            .map(|_| ())
            .map_err(|e| {
                error!(error = %e, "Failed to insert consultation");
                DomainError::InsertError(e)
            })
    }

    /// Subscribes to changes on one report's comments.
    #[instrument(skip(self, on_change), fields(kind = %kind, report_id = %report_id))]
    pub async fn watch_comments(
        &self,
        kind: ReportKind,
        report_id: &ReportId,
        on_change: ChangeHandler,
    ) -> Result<Subscription, DomainError> {
        let binding = resolve_collection(kind);
        self.gateway
            .subscribe(
                binding.comment_collection,
                Some(Filter::eq(binding.foreign_key_field, report_id.as_str())),
                on_change,
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to subscribe to comment changes");
                DomainError::FetchError(e)
            })
    }
}

/// Decodes every row, skipping (and logging) the ones that do not fit.
fn decode_all<T>(
    rows: Vec<Value>,
    decode: impl Fn(Value) -> Result<T, GatewayError>,
) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match decode(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable row");
                None
            }
        })
        .collect()
}
