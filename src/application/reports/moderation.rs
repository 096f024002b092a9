use super::repository::ReportRepository;
use crate::application::list_view::ListViewModel;
use crate::application::messages;
use crate::domain::report::{PersonStatus, Report};
use crate::domain::session::{Session, SessionProvider};
use crate::domain::shared::errors::DomainError;
use crate::domain::shared::notice::{Notice, Notifier};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Reporter-only changes to an existing report.
///
/// The list is patched only after the backend accepted the change.
pub struct ReportModeration {
    repository: ReportRepository,
    sessions: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
}

impl ReportModeration {
    pub fn new(
        repository: ReportRepository,
        sessions: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            sessions,
            notifier,
        }
    }

    fn authorize(&self, report: &Report) -> Result<Session, DomainError> {
        let session = self
            .sessions
            .current_session()
            .ok_or(DomainError::AuthRequired)?;
        if !report.is_reported_by(&session.user_id) {
            warn!(report_id = %report.id(), user_id = %session.user_id, "Rejected change by non-reporter");
            self.notifier.notify(Notice::error(messages::NOT_REPORTER));
            return Err(DomainError::ValidationError(
                messages::NOT_REPORTER.to_string(),
            ));
        }
        Ok(session)
    }

    /// Flips a missing-person report between missing and found.
    #[instrument(skip_all, fields(report_id = %report.id()))]
    pub async fn toggle_status(
        &self,
        report: &Report,
        list: &ListViewModel,
    ) -> Result<PersonStatus, DomainError> {
        let Report::MissingPerson(person) = report else {
            return Err(DomainError::ValidationError(
                "Only missing-person reports have a status".to_string(),
            ));
        };
        self.authorize(report)?;

        let next = person.status.toggled();
        if let Err(e) = self.repository.update_status(&person.id, next).await {
            self.notifier.notify(Notice::error(messages::STATUS_FAILED));
            return Err(e);
        }

        list.apply_status(&person.id, next);
        self.notifier.notify(Notice::success(messages::STATUS_UPDATED));
        info!(status = %next, "Status updated");
        Ok(next)
    }

    #[instrument(skip_all, fields(report_id = %report.id()))]
    pub async fn delete(&self, report: &Report, list: &ListViewModel) -> Result<(), DomainError> {
        self.authorize(report)?;

        if let Err(e) = self.repository.delete_report(report.kind(), report.id()).await {
            self.notifier.notify(Notice::error(messages::DELETE_FAILED));
            return Err(e);
        }

        list.remove_report(report.id());
        self.notifier.notify(Notice::success(messages::REPORT_DELETED));
        info!("Report deleted");
        Ok(())
    }
}
