use crate::domain::comment::Comment;

/// A view that holds comments and accepts local updates after a successful
/// gateway write.
///
/// Both methods return `false` when the view has been disposed or does not
/// hold the comment's report.
pub trait CommentSink: Send + Sync {
    fn append_comment(&self, comment: Comment) -> bool;

    fn replace_comment(&self, comment: Comment) -> bool;
}
