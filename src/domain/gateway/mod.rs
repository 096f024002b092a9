pub mod change;
pub mod query;

use crate::domain::shared::errors::GatewayError;
use async_trait::async_trait;
use bytes::Bytes;
use change::{ChangeHandler, Subscription};
use query::{Filter, SelectQuery};
use serde_json::Value;

/// Record-level access to the hosted backend.
///
/// Rows travel as JSON objects; typed decoding happens one layer up, in the
/// report repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Value>, GatewayError>;

    /// Inserts one row and returns it as stored, projected through
    /// `returning` (joins included) in the same round trip.
    async fn insert(
        &self,
        collection: &str,
        row: Value,
        returning: &str,
    ) -> Result<Value, GatewayError>;

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), GatewayError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError>;

    /// Stores a blob and returns its public URL.
    async fn upload_blob(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError>;

    async fn subscribe(
        &self,
        collection: &str,
        filter: Option<Filter>,
        on_change: ChangeHandler,
    ) -> Result<Subscription, GatewayError>;
}
