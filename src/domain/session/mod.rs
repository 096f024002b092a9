use crate::domain::shared::ids::UserId;
use std::fmt;

/// An authenticated session issued by the backend's auth service.
///
/// The client never creates or mutates sessions on its own; it reads the
/// current one through a [`SessionProvider`].
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    access_token: String,
}

impl Session {
    pub fn new(user_id: UserId, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Read access to the current session; `None` while anonymous.
#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;
}
