use crate::application::detail_view::ReportDetailView;
use crate::application::list_view::ListViewModel;
use crate::domain::comment::Comment;
use crate::domain::location::MapPin;
use crate::domain::report::{PersonStatus, Report};
use crate::domain::shared::ids::UserId;
use serde::Serialize;
use ts_rs::TS;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct CommentView {
    pub id: String,
    pub author: String,
    pub content: String,
    pub posted_on: String,
    pub likes: u32,
    /// Whether the viewing user has liked this comment.
    pub liked: bool,
    pub image_url: Option<String>,
    pub location_name: Option<String>,
}

impl CommentView {
    pub fn from_comment(comment: &Comment, viewer: Option<&UserId>) -> Self {
        Self {
            id: comment.id.to_string(),
            author: comment.author_username.clone(),
            content: comment.content.clone(),
            posted_on: comment.created_at.format(DATE_FORMAT).to_string(),
            likes: comment.likes,
            liked: viewer.is_some_and(|v| comment.liked_by(v)),
            image_url: comment.image_url.clone(),
            location_name: comment.location_name.clone(),
        }
    }
}

/// One report as shown in a list.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReportCardView {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub subtitle: String,
    pub reported_on: String,
    pub image_url: Option<String>,
    pub status: Option<String>,
    /// Label of the reporter's status toggle; absent for other viewers.
    pub status_action: Option<String>,
    pub can_delete: bool,
    pub verified: bool,
    pub has_casualties: bool,
    pub comment_count: usize,
    pub expanded: bool,
}

impl ReportCardView {
    pub fn from_report(
        report: &Report,
        comment_count: usize,
        expanded: bool,
        viewer: Option<&UserId>,
    ) -> Self {
        let owned = viewer.is_some_and(|v| report.is_reported_by(v));
        let (subtitle, status, status_action, verified, has_casualties) = match report {
            Report::MissingPerson(p) => (
                p.last_seen_location.clone(),
                Some(p.status.to_string()),
                owned.then(|| match p.status {
                    PersonStatus::Missing => "Mark as Found".to_string(),
                    PersonStatus::Found => "Mark as Missing".to_string(),
                }),
                false,
                false,
            ),
            Report::Damage(d) => (
                d.description.clone(),
                None,
                None,
                d.verified,
                d.has_casualties,
            ),
        };

        Self {
            id: report.id().to_string(),
            kind: report.kind().to_string(),
            title: report.title().to_string(),
            subtitle,
            reported_on: report.created_at().format(DATE_FORMAT).to_string(),
            image_url: report.image_url().map(str::to_string),
            status,
            status_action,
            can_delete: owned,
            verified,
            has_casualties,
            comment_count,
            expanded,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct MapPinView {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl From<&MapPin> for MapPinView {
    fn from(pin: &MapPin) -> Self {
        Self {
            latitude: pin.coordinates.latitude,
            longitude: pin.coordinates.longitude,
            label: pin.label.clone(),
        }
    }
}

/// A whole list screen: cards, map seed and the open panel's comments.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReportListView {
    pub kind: String,
    pub cards: Vec<ReportCardView>,
    pub map_center: MapPinView,
    pub pins: Vec<MapPinView>,
    pub open_comments: Vec<CommentView>,
    pub error: Option<String>,
}

impl ReportListView {
    pub fn render(list: &ListViewModel, viewer: Option<&UserId>) -> Self {
        let state = list.snapshot();
        let open = state.selection.selected();

        let cards = state
            .reports
            .iter()
            .map(|r| {
                let count = state.comments.get(r.id()).map_or(0, Vec::len);
                ReportCardView::from_report(r, count, open == Some(r.id()), viewer)
            })
            .collect();
        let open_comments = open
            .and_then(|id| state.comments.get(id))
            .map(|comments| {
                comments
                    .iter()
                    .map(|c| CommentView::from_comment(c, viewer))
                    .collect()
            })
            .unwrap_or_default();
        let center = list.initial_map_center();

        Self {
            kind: list.kind().to_string(),
            cards,
            map_center: MapPinView {
                latitude: center.latitude,
                longitude: center.longitude,
                label: String::new(),
            },
            pins: list.map_pins().iter().map(MapPinView::from).collect(),
            open_comments,
            error: state.error,
        }
    }
}

/// A single report page with its full comment thread.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReportDetailPage {
    pub card: ReportCardView,
    pub place_name: Option<String>,
    pub comments: Vec<CommentView>,
}

impl ReportDetailPage {
    pub fn render(
        view: &ReportDetailView,
        viewer: Option<&UserId>,
        place_name: Option<String>,
    ) -> Self {
        let report = view.report();
        let comments = view.comments();
        Self {
            card: ReportCardView::from_report(&report, comments.len(), true, viewer),
            place_name: place_name.filter(|name| !name.is_empty()),
            comments: comments
                .iter()
                .map(|c| CommentView::from_comment(c, viewer))
                .collect(),
        }
    }
}
