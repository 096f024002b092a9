use super::sink::CommentSink;
use crate::application::messages;
use crate::application::reports::repository::ReportRepository;
use crate::domain::comment::Comment;
use crate::domain::session::SessionProvider;
use crate::domain::shared::errors::DomainError;
use crate::domain::shared::notice::{Notice, Notifier};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Toggles the signed-in user's like on a comment.
pub struct CommentLikes {
    repository: ReportRepository,
    sessions: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
}

impl CommentLikes {
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

    /// Sends the toggled like set to the backend and, once stored, replaces
    /// the comment in `sink`. Returns the updated comment.
    #[instrument(skip(self, comment, sink), fields(comment_id = %comment.id))]
    pub async fn toggle(
        &self,
        comment: &Comment,
        sink: &dyn CommentSink,
    ) -> Result<Comment, DomainError> {
        let Some(session) = self.sessions.current_session() else {
            self.notifier.notify(Notice::error(messages::LOGIN_TO_LIKE));
            return Err(DomainError::AuthRequired);
        };

        let updated = comment.with_like_toggled(&session.user_id);
        if let Err(e) = self
            .repository
            .update_comment_likes(comment.parent.kind(), &updated)
            .await
        {
            warn!(error = %e, "Like update failed");
            self.notifier.notify(Notice::error(messages::LIKE_FAILED));
            return Err(e);
        }

        sink.replace_comment(updated.clone());
        debug!(likes = updated.likes, "Like toggled");
        Ok(updated)
    }
}
