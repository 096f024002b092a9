pub mod admin_feed;
pub mod comments;
pub mod consultation;
pub mod detail_view;
pub mod list_view;
pub mod messages;
pub mod reports;
pub mod scope;
pub mod submit_report;
