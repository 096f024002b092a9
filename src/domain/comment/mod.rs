pub mod entity;
pub mod value_objects;

pub use entity::{ANONYMOUS_AUTHOR, Comment, CommentParent};
pub use value_objects::CommentContent;
