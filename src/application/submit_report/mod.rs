pub mod dto;
pub mod use_case;

pub use dto::{DamageReportForm, ImageUpload, MissingPersonForm, ReportForm};
pub use use_case::{SubmitReportUseCase, detect_image};
