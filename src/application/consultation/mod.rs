pub mod use_case;

pub use use_case::{AskExpertUseCase, ConsultationRequest};
