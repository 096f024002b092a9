use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row-level change delivered by the backend's change feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub collection: String,
    pub kind: ChangeKind,
    pub record: Value,
    pub old_record: Value,
}

impl ChangeEvent {
    /// Reads `field` from the new record, falling back to the old one (deletes
    /// only carry the old record).
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.record
            .get(field)
            .filter(|v| !v.is_null())
            .or_else(|| self.old_record.get(field).filter(|v| !v.is_null()))
    }
}

pub type ChangeHandler = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Handle to a live change-feed subscription.
///
/// Delivery stops when the handle is dropped or [`Subscription::unsubscribe`]
/// is called; there is no way to leak a subscription past its owner.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(token: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            token,
            task: Some(task),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
            && self
                .task
                .as_ref()
                .map(|task| !task.is_finished())
                .unwrap_or(false)
    }

    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}
