use crate::application::reports::repository::ReportRepository;
use crate::domain::report::{Report, ReportKind};
use crate::domain::session::SessionProvider;
use crate::domain::shared::errors::DomainError;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Both report kinds in one list, newest first.
pub struct AdminFeedUseCase {
    repository: ReportRepository,
    sessions: Arc<dyn SessionProvider>,
}

impl AdminFeedUseCase {
    pub fn new(repository: ReportRepository, sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<Vec<Report>, DomainError> {
        if self.sessions.current_session().is_none() {
            return Err(DomainError::AuthRequired);
        }

        let (missing, damage) = tokio::try_join!(
            self.repository.list_reports(ReportKind::MissingPerson),
            self.repository.list_reports(ReportKind::Damage)
        )?;

        let mut feed: Vec<Report> = missing.into_iter().chain(damage).collect();
        feed.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        debug!(count = feed.len(), "Admin feed assembled");
        Ok(feed)
    }
}
