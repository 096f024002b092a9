use crate::application::messages;
use crate::application::reports::repository::ReportRepository;
use crate::application::submit_report::dto::describe;
use crate::domain::shared::errors::DomainError;
use crate::domain::shared::notice::{Notice, Notifier};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ConsultationRequest {
    #[validate(length(min = 1, max = 2000, message = "Question is required"))]
    pub question: String,
    #[validate(length(min = 1, max = 200, message = "Contact information is required"))]
    pub contact_info: String,
}

/// Forwards a question to the expert panel. Does not require a session.
pub struct AskExpertUseCase {
    repository: ReportRepository,
    notifier: Arc<dyn Notifier>,
}

impl AskExpertUseCase {
    pub fn new(repository: ReportRepository, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(&self, mut request: ConsultationRequest) -> Result<(), DomainError> {
        request.question = request.question.trim().to_string();
        request.contact_info = request.contact_info.trim().to_string();
        if let Err(e) = request.validate() {
            let message = describe(&e);
            self.notifier.notify(Notice::error(message.clone()));
            return Err(DomainError::ValidationError(message));
        }

        if let Err(e) = self
            .repository
            .create_consultation(&request.question, &request.contact_info)
            .await
        {
            self.notifier.notify(Notice::error(messages::QUESTION_FAILED));
            return Err(e);
        }

        self.notifier
            .notify(Notice::success(messages::QUESTION_SUBMITTED));
        info!("Consultation submitted");
        Ok(())
    }
}
