use crate::domain::report::ReportKind;
use crate::domain::shared::geo::Coordinates;
use crate::domain::shared::ids::{CommentId, ReportId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// The report a comment hangs off. Exactly one parent per comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "report_id", rename_all = "snake_case")]
pub enum CommentParent {
    MissingPerson(ReportId),
    Damage(ReportId),
}

impl CommentParent {
    pub fn new(kind: ReportKind, report_id: ReportId) -> Self {
        match kind {
            ReportKind::MissingPerson => CommentParent::MissingPerson(report_id),
            ReportKind::Damage => CommentParent::Damage(report_id),
        }
    }

    pub fn report_id(&self) -> &ReportId {
        match self {
            CommentParent::MissingPerson(id) | CommentParent::Damage(id) => id,
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            CommentParent::MissingPerson(_) => ReportKind::MissingPerson,
            CommentParent::Damage(_) => ReportKind::Damage,
        }
    }
}

/// A comment posted on a report.
///
/// `likes` always equals the number of entries in `user_likes` for comments
/// the client has touched; rows arriving from the backend are taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub parent: CommentParent,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<UserId>,
    pub image_url: Option<String>,
    pub likes: u32,
    pub user_likes: Vec<UserId>,
    pub author_username: String,
    /// Only missing-person comments carry a sighting location.
    pub coordinates: Option<Coordinates>,
    pub location_name: Option<String>,
}

impl Comment {
    pub fn report_id(&self) -> &ReportId {
        self.parent.report_id()
    }

    pub fn liked_by(&self, user: &UserId) -> bool {
        self.user_likes.iter().any(|u| u == user)
    }

    /// Returns a copy with `user`'s like added or removed.
    pub fn with_like_toggled(&self, user: &UserId) -> Comment {
        let mut next = self.clone();
        if next.liked_by(user) {
            next.user_likes.retain(|u| u != user);
        } else {
            next.user_likes.push(user.clone());
        }
        next.likes = u32::try_from(next.user_likes.len()).unwrap_or(u32::MAX);
        next
    }
}
