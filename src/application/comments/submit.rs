use super::sink::CommentSink;
use crate::application::messages;
use crate::application::reports::repository::ReportRepository;
use crate::domain::comment::{Comment, CommentContent};
use crate::domain::report::ReportKind;
use crate::domain::session::SessionProvider;
use crate::domain::shared::errors::DomainError;
use crate::domain::shared::ids::ReportId;
use crate::domain::shared::notice::{Notice, Notifier};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The text box a comment is typed into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeField {
    text: String,
}

impl ComposeField {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored and appended to the view.
    Posted(Comment),
    /// Nothing to post once trimmed.
    Ignored,
}

/// Posts comments on reports of one kind.
///
/// The session is checked before the content. Only a successful insert
/// touches the view, and then only by appending the stored row.
pub struct CommentSubmission {
    kind: ReportKind,
    repository: ReportRepository,
    sessions: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
}

impl CommentSubmission {
    pub fn new(
        kind: ReportKind,
        repository: ReportRepository,
        sessions: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            kind,
            repository,
            sessions,
            notifier,
        }
    }

    #[instrument(skip(self, compose, sink), fields(kind = %self.kind, report_id = %report_id))]
    pub async fn submit(
        &self,
        report_id: &ReportId,
        compose: &mut ComposeField,
        sink: &dyn CommentSink,
    ) -> Result<SubmitOutcome, DomainError> {
        let Some(session) = self.sessions.current_session() else {
            debug!("Comment attempted without a session");
            self.notifier.notify(Notice::error(messages::LOGIN_TO_COMMENT));
            return Err(DomainError::AuthRequired);
        };

        let Some(content) = CommentContent::parse(compose.text()) else {
            return Ok(SubmitOutcome::Ignored);
        };

        let comment = match self
            .repository
            .insert_comment(self.kind, report_id, &content, &session.user_id)
            .await
        {
            Ok(comment) => comment,
            Err(e) => {
                warn!(error = %e, "Comment insert failed");
                self.notifier.notify(Notice::error(messages::COMMENT_FAILED));
                return Err(e);
            }
        };

        if !sink.append_comment(comment.clone()) {
            debug!("View disposed or no longer holds the report");
        }
        compose.clear();
        self.notifier.notify(Notice::success(messages::COMMENT_ADDED));
        info!(comment_id = %comment.id, "Comment posted");
        Ok(SubmitOutcome::Posted(comment))
    }
}
