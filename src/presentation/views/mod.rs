//! Render-ready view structs, exported to TypeScript for the web front end.

pub mod cards;

pub use cards::{CommentView, MapPinView, ReportCardView, ReportDetailPage, ReportListView};
