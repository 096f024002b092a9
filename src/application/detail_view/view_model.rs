use crate::application::comments::sink::CommentSink;
use crate::application::messages;
use crate::application::reports::repository::ReportRepository;
use crate::application::scope::{ViewScope, ViewState};
use crate::domain::comment::Comment;
use crate::domain::gateway::change::{ChangeEvent, ChangeHandler, Subscription};
use crate::domain::report::{Report, ReportKind};
use crate::domain::shared::errors::DomainError;
use crate::domain::shared::ids::ReportId;
use crate::domain::shared::notice::{Notice, Notifier};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct DetailState {
    pub report: Report,
    pub comments: Vec<Comment>,
}

/// One report with its comments, kept fresh through the change feed while
/// watched.
#[derive(Clone)]
pub struct ReportDetailView {
    kind: ReportKind,
    id: ReportId,
    repository: ReportRepository,
    state: ViewState<DetailState>,
}

impl ReportDetailView {
    /// Loads the report and its comments concurrently.
    ///
    /// A missing or unreadable report fails the open; a failed comment read
    /// only leaves the comment list empty.
    #[instrument(skip(repository, notifier), fields(kind = %kind, report_id = %id))]
    pub async fn open(
        kind: ReportKind,
        id: ReportId,
        repository: ReportRepository,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, DomainError> {
        let (report, comments) = tokio::join!(
            repository.find_report(kind, &id),
            repository.list_comments(kind, &id)
        );

        let report = report.inspect_err(|e| {
            warn!(error = %e, "Could not open report");
            notifier.notify(Notice::error(messages::LOAD_FAILED));
        })?;
        let comments = comments.unwrap_or_else(|e| {
            warn!(error = %e, "Comment load failed, showing none");
            Vec::new()
        });

        Ok(Self {
            kind,
            id,
            repository,
            state: ViewState::new(DetailState { report, comments }, ViewScope::new()),
        })
    }

    pub fn id(&self) -> &ReportId {
        &self.id
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn report(&self) -> Report {
        self.state.read(|s| s.report.clone())
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.state.read(|s| s.comments.clone())
    }

    pub fn comment_count(&self) -> usize {
        self.state.read(|s| s.comments.len())
    }

    pub fn scope(&self) -> &ViewScope {
        self.state.scope()
    }

    pub fn dispose(&self) {
        self.state.scope().dispose();
    }

    /// Re-reads the comment list and replaces it wholesale.
    pub async fn refresh_comments(&self) -> Result<usize, DomainError> {
        let comments = self.repository.list_comments(self.kind, &self.id).await?;
        let count = comments.len();
        self.state.apply(|s| s.comments = comments);
        Ok(count)
    }

    /// Subscribes to this report's comment collection; each change triggers
    /// a reload until the returned handle is dropped or unsubscribed.
    #[instrument(skip(self), fields(kind = %self.kind, report_id = %self.id))]
    pub async fn watch(&self) -> Result<CommentWatch, DomainError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<ChangeEvent>();
        let handler: ChangeHandler = Arc::new(move |event| {
            let _ = tx.send(event);
        });
        let subscription = self
            .repository
            .watch_comments(self.kind, &self.id, handler)
            .await?;

        let token = self.scope().child_token();
        let refreshes = Arc::new(AtomicUsize::new(0));
        let view = self.clone();
        let task = {
            let token = token.clone();
            let refreshes = refreshes.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        event = rx.recv() => {
                            let Some(event) = event else { break };
                            debug!(kind = ?event.kind, "Comment change received");
                            match view.refresh_comments().await {
                                Ok(count) => {
                                    refreshes.fetch_add(1, Ordering::SeqCst);
                                    debug!(count, "Comments reloaded");
                                }
                                Err(e) => warn!(error = %e, "Comment reload failed"),
                            }
                        }
                    }
                }
            })
        };

        info!("Watching comments");
        Ok(CommentWatch {
            subscription: Some(subscription),
            token,
            task: Some(task),
            refreshes,
        })
    }
}

impl CommentSink for ReportDetailView {
    fn append_comment(&self, comment: Comment) -> bool {
        if comment.report_id() != &self.id {
            return false;
        }
        self.state.apply(|s| s.comments.push(comment))
    }

    fn replace_comment(&self, comment: Comment) -> bool {
        let mut replaced = false;
        self.state.apply(|s| {
            if let Some(slot) = s.comments.iter_mut().find(|c| c.id == comment.id) {
                *slot = comment;
                replaced = true;
            }
        });
        replaced
    }
}

/// Live comment watch on a detail view. Dropping it stops delivery.
pub struct CommentWatch {
    subscription: Option<Subscription>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
    refreshes: Arc<AtomicUsize>,
}

impl CommentWatch {
    /// Reloads completed so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
            && self
                .subscription
                .as_ref()
                .is_some_and(Subscription::is_active)
    }

    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.token.cancel();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for CommentWatch {
    fn drop(&mut self) {
        self.stop();
    }
}
