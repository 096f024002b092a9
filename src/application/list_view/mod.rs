pub mod map_overlay;
pub mod selection;
pub mod view_model;

pub use selection::PanelSelection;
pub use view_model::{CommentsByReportId, ListState, ListViewModel};
