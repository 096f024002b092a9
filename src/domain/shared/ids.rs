use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an opaque, server-assigned identifier.
///
/// The backend hands out identifiers as strings (UUIDs in practice), but the
/// client never inspects their structure, so they are carried as-is.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_id!(
    /// Identity of a missing-person or damage report.
    ReportId
);

opaque_id!(
    /// Identity of a comment row.
    CommentId
);

opaque_id!(
    /// Identity of an authenticated user (the `profiles.id` of the backend).
    UserId
);
