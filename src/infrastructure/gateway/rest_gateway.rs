use super::realtime::spawn_feed;
use crate::domain::gateway::Gateway;
use crate::domain::gateway::change::{ChangeHandler, Subscription};
use crate::domain::gateway::query::{Filter, SelectQuery};
use crate::domain::session::SessionProvider;
use crate::domain::shared::errors::GatewayError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, header};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            GatewayError::Status {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

/// Gateway over the backend's REST, storage and realtime endpoints.
///
/// Requests carry the project key in `apikey` and the signed-in user's access
/// token (or the project key when anonymous) as the bearer token.
pub struct RestGateway {
    client: Client,
    stream_client: Client,
    base_url: String,
    anon_key: String,
    sessions: Arc<dyn SessionProvider>,
}

impl RestGateway {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
        sessions: Arc<dyn SessionProvider>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        // Event streams stay open indefinitely; only the connect phase is bounded.
        let stream_client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            stream_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            sessions,
        })
    }

    fn rest_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn bearer(&self) -> String {
        self.sessions
            .current_session()
            .map(|s| s.access_token().to_string())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }

    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Whitespace-free select list; the REST layer treats spaces literally.
fn compact_columns(columns: &str) -> String {
    columns.chars().filter(|c| !c.is_whitespace()).collect()
}

fn eq_param(filter: &Filter) -> (String, String) {
    (filter.field.clone(), format!("eq.{}", filter.value))
}

/// Query-string parameters for a select.
pub fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), compact_columns(&query.columns))];
    params.extend(query.filters.iter().map(eq_param));
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.field, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

#[async_trait]
impl Gateway for RestGateway {
    #[instrument(skip(self, query), fields(collection = %query.collection))]
    async fn select(&self, query: SelectQuery) -> Result<Vec<Value>, GatewayError> {
        let request = self
            .client
            .get(self.rest_url(&query.collection))
            .query(&select_params(&query));
        let response = Self::check(self.authorized(request).send().await?).await?;
        let rows: Vec<Value> = response.json().await?;
        debug!(rows = rows.len(), "Select returned");
        Ok(rows)
    }

    #[instrument(skip(self, row, returning))]
    async fn insert(
        &self,
        collection: &str,
        row: Value,
        returning: &str,
    ) -> Result<Value, GatewayError> {
        let request = self
            .client
            .post(self.rest_url(collection))
            .query(&[("select", compact_columns(returning))])
            .header("Prefer", "return=representation")
            .json(&row);
        let response = Self::check(self.authorized(request).send().await?).await?;
        let mut rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(GatewayError::Decode(format!(
                "insert into {collection} returned no row"
            )));
        }
        Ok(rows.swap_remove(0))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), GatewayError> {
        let request = self
            .client
            .patch(self.rest_url(collection))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&patch);
        Self::check(self.authorized(request).send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .delete(self.rest_url(collection))
            .query(&[("id", format!("eq.{id}"))]);
        Self::check(self.authorized(request).send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload_blob(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path);
        let request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(data);
        Self::check(self.authorized(request).send().await?).await?;
        Ok(self.public_url(bucket, path))
    }

    #[instrument(skip(self, on_change))]
    async fn subscribe(
        &self,
        collection: &str,
        filter: Option<Filter>,
        on_change: ChangeHandler,
    ) -> Result<Subscription, GatewayError> {
        let mut params = vec![("table".to_string(), collection.to_string())];
        if let Some(filter) = &filter {
            let (field, value) = eq_param(filter);
            params.push(("filter".to_string(), format!("{field}={value}")));
        }
        let request = self
            .stream_client
            .get(format!("{}/realtime/v1/changes", self.base_url))
            .query(&params)
            .header(header::ACCEPT, "text/event-stream");
        spawn_feed(self.authorized(request), collection.to_string(), on_change)
    }
}
