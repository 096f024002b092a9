pub mod likes;
pub mod sink;
pub mod submit;

pub use likes::CommentLikes;
pub use sink::CommentSink;
pub use submit::{CommentSubmission, ComposeField, SubmitOutcome};
