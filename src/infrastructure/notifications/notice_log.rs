use crate::domain::shared::notice::{Notice, Notifier};
use std::sync::Mutex;
use tracing::{info, warn};

/// Notifier that writes notices to the log and keeps them for later
/// inspection.
#[derive(Debug, Default)]
pub struct NoticeLog {
    history: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.history
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.history
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            warn!(title = %notice.title, "{}", notice.description);
        } else {
            info!(title = %notice.title, "{}", notice.description);
        }
        self.history
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(notice);
    }
}
