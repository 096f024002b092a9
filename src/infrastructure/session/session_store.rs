use crate::domain::session::{Session, SessionProvider};
use std::sync::RwLock;
use tracing::info;

/// Holds whatever session the auth collaborator last handed over.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            current: RwLock::new(Some(session)),
        }
    }

    pub fn sign_in(&self, session: Session) {
        info!(user_id = %session.user_id, "Session started");
        *self.current.write().unwrap_or_else(|p| p.into_inner()) = Some(session);
    }

    pub fn sign_out(&self) {
        if let Some(session) = self
            .current
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            info!(user_id = %session.user_id, "Session ended");
        }
    }
}

impl SessionProvider for SessionStore {
    fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
