//! User-visible notice texts.

use crate::domain::report::ReportKind;

pub const LOGIN_TO_COMMENT: &str = "Please log in to comment";
pub const COMMENT_ADDED: &str = "Comment added successfully";
pub const COMMENT_FAILED: &str = "Failed to add comment";
pub const LOGIN_TO_LIKE: &str = "Please sign in to like comments";
pub const LIKE_FAILED: &str = "Failed to update like";
pub const STATUS_UPDATED: &str = "Status updated successfully";
pub const STATUS_FAILED: &str = "Failed to update status";
pub const REPORT_DELETED: &str = "Report deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete report";
pub const LOGIN_TO_REPORT: &str = "Please log in to submit a report";
pub const REPORT_FAILED: &str = "Failed to submit report";
pub const QUESTION_SUBMITTED: &str = "Question submitted successfully";
pub const QUESTION_FAILED: &str = "Failed to submit question";
pub const LOAD_FAILED: &str = "Failed to load data";
pub const NOT_REPORTER: &str = "Only the reporter can change this report";

pub fn load_failed(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::MissingPerson => "Failed to load missing persons reports",
        ReportKind::Damage => "Failed to load damage reports",
    }
}

pub fn report_submitted(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::MissingPerson => "Missing person report submitted successfully",
        ReportKind::Damage => "Damage report submitted successfully",
    }
}
