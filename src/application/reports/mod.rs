pub mod moderation;
pub mod repository;
pub mod rows;

pub use moderation::ReportModeration;
pub use repository::ReportRepository;
