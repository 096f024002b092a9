use super::map_overlay;
use super::selection::PanelSelection;
use crate::application::comments::sink::CommentSink;
use crate::application::messages;
use crate::application::reports::repository::ReportRepository;
use crate::application::scope::{ViewScope, ViewState};
use crate::domain::comment::Comment;
use crate::domain::location::MapPin;
use crate::domain::report::{PersonStatus, Report, ReportKind};
use crate::domain::shared::errors::DomainError;
use crate::domain::shared::geo::{Coordinates, NEPAL_CENTER};
use crate::domain::shared::ids::ReportId;
use crate::domain::shared::notice::{Notice, Notifier};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Comments of every listed report, each sequence oldest first as loaded.
pub type CommentsByReportId = HashMap<ReportId, Vec<Comment>>;

#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub reports: Vec<Report>,
    pub comments: CommentsByReportId,
    pub loading: bool,
    pub error: Option<String>,
    pub selection: PanelSelection,
}

/// State behind a report list screen of one kind.
///
/// A load fetches the reports, then fans out one comment read per report.
/// All writes go through the view's scope, so nothing lands after
/// [`ListViewModel::dispose`].
#[derive(Clone)]
pub struct ListViewModel {
    kind: ReportKind,
    repository: ReportRepository,
    notifier: Arc<dyn Notifier>,
    default_center: Coordinates,
    state: ViewState<ListState>,
}

impl ListViewModel {
    pub fn new(kind: ReportKind, repository: ReportRepository, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            kind,
            repository,
            notifier,
            default_center: NEPAL_CENTER,
            state: ViewState::new(ListState::default(), ViewScope::new()),
        }
    }

    /// Map center used while no listed report has coordinates.
    pub fn with_default_center(mut self, center: Coordinates) -> Self {
        self.default_center = center;
        self
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn scope(&self) -> &ViewScope {
        self.state.scope()
    }

    pub fn dispose(&self) {
        debug!(kind = %self.kind, "Disposing list view");
        self.state.scope().dispose();
    }

    pub fn snapshot(&self) -> ListState {
        self.state.read(Clone::clone)
    }

    /// Loads reports, then their comments.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn load(&self) -> Result<(), DomainError> {
        let reports = self.load_reports().await?;
        self.load_comments_fan_out(&reports).await;
        self.state.apply(|s| s.loading = false);
        info!(reports = reports.len(), "List loaded");
        Ok(())
    }

    /// Fetches every report of this view's kind, newest first, and stores
    /// them. On failure the list is emptied and flagged.
    pub async fn load_reports(&self) -> Result<Vec<Report>, DomainError> {
        self.state.apply(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.repository.list_reports(self.kind).await {
            Ok(reports) => {
                self.state.apply(|s| s.reports = reports.clone());
                Ok(reports)
            }
            Err(e) => {
                let message = e.to_string();
                let written = self.state.apply(|s| {
                    s.reports.clear();
                    s.comments.clear();
                    s.loading = false;
                    s.error = Some(message);
                });
                if written {
                    self.notifier
                        .notify(Notice::error(messages::load_failed(self.kind)));
                }
                Err(e)
            }
        }
    }

    /// Reads the comments of every report concurrently and replaces the
    /// merged map. A failed read leaves that report with no comments.
    pub async fn load_comments_fan_out(&self, reports: &[Report]) -> CommentsByReportId {
        let kind = self.kind;
        let reads = reports.iter().map(|report| {
            let id = report.id().clone();
            async move {
                let comments = match self.repository.list_comments(kind, &id).await {
                    Ok(comments) => comments,
                    Err(e) => {
                        warn!(report_id = %id, error = %e, "Comment load failed, showing none");
                        Vec::new()
                    }
                };
                (id, comments)
            }
        });

        let merged: CommentsByReportId = join_all(reads).await.into_iter().collect();
        self.state.apply(|s| s.comments = merged.clone());
        merged
    }

    pub fn reports(&self) -> Vec<Report> {
        self.state.read(|s| s.reports.clone())
    }

    pub fn find_report(&self, id: &ReportId) -> Option<Report> {
        self.state
            .read(|s| s.reports.iter().find(|r| r.id() == id).cloned())
    }

    pub fn comments_for(&self, id: &ReportId) -> Vec<Comment> {
        self.state
            .read(|s| s.comments.get(id).cloned().unwrap_or_default())
    }

    pub fn comment_count(&self, id: &ReportId) -> usize {
        self.state.read(|s| s.comments.get(id).map_or(0, Vec::len))
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.error.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading)
    }

    pub fn toggle_panel(&self, id: &ReportId) {
        self.state.apply(|s| s.selection.toggle(id));
    }

    pub fn selected_panel(&self) -> Option<ReportId> {
        self.state.read(|s| s.selection.selected().cloned())
    }

    pub fn reports_with_coordinates(&self) -> Vec<Report> {
        self.state.read(|s| {
            map_overlay::with_coordinates(&s.reports)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn initial_map_center(&self) -> Coordinates {
        self.state
            .read(|s| map_overlay::initial_center(&s.reports, self.default_center))
    }

    pub fn map_pins(&self) -> Vec<MapPin> {
        self.state.read(|s| map_overlay::pins(&s.reports))
    }

    /// Patches a missing-person report's status in place.
    pub fn apply_status(&self, id: &ReportId, status: PersonStatus) -> bool {
        let mut found = false;
        self.state.apply(|s| {
            for report in s.reports.iter_mut() {
                if let Report::MissingPerson(person) = report
                    && &person.id == id
                {
                    person.status = status;
                    found = true;
                }
            }
        });
        found
    }

    pub fn remove_report(&self, id: &ReportId) -> bool {
        let mut removed = false;
        self.state.apply(|s| {
            let before = s.reports.len();
            s.reports.retain(|r| r.id() != id);
            removed = s.reports.len() != before;
            s.comments.remove(id);
            if s.selection.is_open(id) {
                s.selection.clear();
            }
        });
        removed
    }
}

impl CommentSink for ListViewModel {
    fn append_comment(&self, comment: Comment) -> bool {
        let mut appended = false;
        self.state.apply(|s| {
            if s.reports.iter().any(|r| r.id() == comment.report_id()) {
                s.comments
                    .entry(comment.report_id().clone())
                    .or_default()
                    .push(comment);
                appended = true;
            }
        });
        appended
    }

    fn replace_comment(&self, comment: Comment) -> bool {
        let mut replaced = false;
        self.state.apply(|s| {
            if let Some(slot) = s
                .comments
                .get_mut(comment.report_id())
                .and_then(|entry| entry.iter_mut().find(|c| c.id == comment.id))
            {
                *slot = comment;
                replaced = true;
            }
        });
        replaced
    }
}
