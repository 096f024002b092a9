//! In-process gateway backed by JSON tables.
//!
//! Behaves like the hosted backend for everything the client relies on:
//! equality filters, ordering, embedded joins in projections, server-assigned
//! `id` and `created_at`, and a change feed. Failures and latency can be
//! injected per operation.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use relief_desk::domain::{
    gateway::{
        Gateway,
        change::{ChangeEvent, ChangeHandler, ChangeKind, Subscription},
        query::{Filter, SelectQuery},
    },
    shared::errors::GatewayError,
};
use uuid::Uuid;

const CHANGE_FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Upload,
    Subscribe,
}

#[derive(Debug, Clone)]
struct FailureRule {
    operation: Operation,
    collection: String,
    filter: Option<Filter>,
    error: GatewayError,
}

#[derive(Default)]
struct Store {
    tables: HashMap<String, Vec<Value>>,
    blobs: HashMap<String, (Bytes, String)>,
    calls: HashMap<(Operation, String), usize>,
    failures: Vec<FailureRule>,
    select_delay: Option<Duration>,
}

pub struct MemoryGateway {
    store: Mutex<Store>,
    changes: broadcast::Sender<ChangeEvent>,
    /// Embedded relation name → local column holding the related row's id.
    relations: HashMap<String, String>,
    public_url: String,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        let mut relations = HashMap::new();
        relations.insert("profiles".to_string(), "user_id".to_string());
        Self {
            store: Mutex::new(Store::default()),
            changes,
            relations,
            public_url: "memory://storage".to_string(),
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>, local_field: impl Into<String>) -> Self {
        self.relations.insert(relation.into(), local_field.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds rows without emitting change events. Missing `id` and
    /// `created_at` are filled in.
    pub fn seed(&self, collection: &str, rows: impl IntoIterator<Item = Value>) {
        let mut store = self.lock();
        let table = store.tables.entry(collection.to_string()).or_default();
        table.extend(rows.into_iter().map(stamp));
    }

    pub fn rows(&self, collection: &str) -> Vec<Value> {
        self.lock()
            .tables
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn blob(&self, bucket: &str, path: &str) -> Option<(Bytes, String)> {
        self.lock().blobs.get(&format!("{bucket}/{path}")).cloned()
    }

    /// Makes every `operation` on `collection` fail with `error`.
    pub fn fail(&self, operation: Operation, collection: &str, error: GatewayError) {
        self.lock().failures.push(FailureRule {
            operation,
            collection: collection.to_string(),
            filter: None,
            error,
        });
    }

    /// Like [`MemoryGateway::fail`], restricted to selects carrying `filter`.
    pub fn fail_where(&self, operation: Operation, collection: &str, filter: Filter, error: GatewayError) {
        self.lock().failures.push(FailureRule {
            operation,
            collection: collection.to_string(),
            filter: Some(filter),
            error,
        });
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Delays every select by `delay` before it reads the tables.
    pub fn set_select_delay(&self, delay: Option<Duration>) {
        self.lock().select_delay = delay;
    }

    pub fn calls(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|((op, _), _)| *op == operation)
            .map(|(_, n)| *n)
            .sum()
    }

    pub fn calls_on(&self, operation: Operation, collection: &str) -> usize {
        self.lock()
            .calls
            .get(&(operation, collection.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Pushes an event to subscribers as if the backend had emitted it.
    pub fn emit(&self, event: ChangeEvent) {
        let _ = self.changes.send(event);
    }

    fn enter(
        &self,
        operation: Operation,
        collection: &str,
        filters: &[Filter],
    ) -> Result<(), GatewayError> {
        let mut store = self.lock();
        *store
            .calls
            .entry((operation, collection.to_string()))
            .or_default() += 1;
        let failure = store.failures.iter().find(|rule| {
            rule.operation == operation
                && rule.collection == collection
                && rule.filter.as_ref().is_none_or(|f| filters.contains(f))
        });
        match failure {
            Some(rule) => Err(rule.error.clone()),
            None => Ok(()),
        }
    }

    fn publish(&self, collection: &str, kind: ChangeKind, record: Value, old_record: Value) {
        let event = ChangeEvent {
            collection: collection.to_string(),
            kind,
            record,
            old_record,
        };
        // No receivers is not an error.
        let _ = self.changes.send(event);
    }

    fn project(&self, store: &Store, row: &Value, columns: &str) -> Value {
        let mut out = Map::new();
        for column in split_columns(columns) {
            if column == "*" {
                if let Value::Object(fields) = row {
                    out.extend(fields.clone());
                }
                continue;
            }
            match column.split_once('(') {
                Some((relation, rest)) => {
                    let relation = relation.trim();
                    let inner = rest.trim_end_matches(')');
                    out.insert(relation.to_string(), self.join(store, row, relation, inner));
                }
                None => {
                    out.insert(
                        column.to_string(),
                        row.get(column).cloned().unwrap_or(Value::Null),
                    );
                }
            }
        }
        Value::Object(out)
    }

    fn join(&self, store: &Store, row: &Value, relation: &str, columns: &str) -> Value {
        let Some(local_field) = self.relations.get(relation) else {
            return Value::Null;
        };
        let Some(key) = row.get(local_field).filter(|v| !v.is_null()) else {
            return Value::Null;
        };
        store
            .tables
            .get(relation)
            .and_then(|rows| rows.iter().find(|r| r.get("id") == Some(key)))
            .map(|related| self.project(store, related, columns))
            .unwrap_or(Value::Null)
    }
}

fn stamp(row: Value) -> Value {
    let Value::Object(mut fields) = row else {
        return row;
    };
    if fields.get("id").is_none_or(Value::is_null) {
        fields.insert("id".to_string(), Value::String(Uuid::now_v7().to_string()));
    }
    if fields.get("created_at").is_none_or(Value::is_null) {
        fields.insert(
            "created_at".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
    }
    Value::Object(fields)
}

/// Splits a select list on top-level commas.
fn split_columns(columns: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in columns.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(columns[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(columns[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn matches_value(actual: Option<&Value>, expected: &str) -> bool {
    match actual {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Bool(b)) => b.to_string() == expected,
        _ => false,
    }
}

fn matches_filters(row: &Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| matches_value(row.get(&f.field), &f.value))
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (a.parse::<DateTime<Utc>>(), b.parse::<DateTime<Utc>>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        // Nulls sort last in both directions.
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Value>, GatewayError> {
        self.enter(Operation::Select, &query.collection, &query.filters)?;

        let delay = self.lock().select_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let store = self.lock();
        let mut rows: Vec<&Value> = store
            .tables
            .get(&query.collection)
            .map(|rows| rows.iter().filter(|r| matches_filters(r, &query.filters)).collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.field), b.get(&order.field));
                let nulls = a.get(&order.field).is_none_or(Value::is_null)
                    || b.get(&order.field).is_none_or(Value::is_null);
                if order.ascending || nulls {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let projected: Vec<Value> = rows
            .into_iter()
            .map(|row| self.project(&store, row, &query.columns))
            .collect();
        trace!(collection = %query.collection, rows = projected.len(), "Memory select");
        Ok(projected)
    }

    async fn insert(
        &self,
        collection: &str,
        row: Value,
        returning: &str,
    ) -> Result<Value, GatewayError> {
        self.enter(Operation::Insert, collection, &[])?;
        if !row.is_object() {
            return Err(GatewayError::Status {
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        }

        let stored = stamp(row);
        let projected = {
            let mut store = self.lock();
            store
                .tables
                .entry(collection.to_string())
                .or_default()
                .push(stored.clone());
            self.project(&store, &stored, returning)
        };
        debug!(collection, "Memory insert");
        self.publish(collection, ChangeKind::Insert, stored, Value::Null);
        Ok(projected)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), GatewayError> {
        self.enter(Operation::Update, collection, &[])?;
        let Value::Object(patch) = patch else {
            return Err(GatewayError::Status {
                status: 400,
                message: "patch must be a JSON object".to_string(),
            });
        };

        let changed = {
            let mut store = self.lock();
            store
                .tables
                .get_mut(collection)
                .and_then(|rows| rows.iter_mut().find(|r| matches_value(r.get("id"), id)))
                .map(|row| {
                    let old = row.clone();
                    if let Value::Object(fields) = row {
                        fields.extend(patch);
                    }
                    (row.clone(), old)
                })
        };
        if let Some((record, old)) = changed {
            self.publish(collection, ChangeKind::Update, record, old);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        self.enter(Operation::Delete, collection, &[])?;
        let removed = {
            let mut store = self.lock();
            store.tables.get_mut(collection).and_then(|rows| {
                let position = rows.iter().position(|r| matches_value(r.get("id"), id))?;
                Some(rows.remove(position))
            })
        };
        if let Some(old) = removed {
            self.publish(collection, ChangeKind::Delete, Value::Null, old);
        }
        Ok(())
    }

    async fn upload_blob(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        self.enter(Operation::Upload, bucket, &[])?;
        self.lock()
            .blobs
            .insert(format!("{bucket}/{path}"), (data, content_type.to_string()));
        Ok(format!("{}/{}/{}", self.public_url, bucket, path))
    }

    async fn subscribe(
        &self,
        collection: &str,
        filter: Option<Filter>,
        on_change: ChangeHandler,
    ) -> Result<Subscription, GatewayError> {
        self.enter(Operation::Subscribe, collection, &[])?;

        let mut receiver = self.changes.subscribe();
        let collection = collection.to_string();
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    received = receiver.recv() => match received {
                        Ok(event) => {
                            let wanted = event.collection == collection
                                && filter
                                    .as_ref()
                                    .is_none_or(|f| matches_value(event.field(&f.field), &f.value));
                            if wanted {
                                on_change(event);
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Change subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        });

        Ok(Subscription::new(token, task))
    }
}

mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_returns_joined_projection() {
        let gateway = MemoryGateway::new();
        gateway.seed("profiles", [json!({ "id": "u1", "username": "sita" })]);

        let row = gateway
            .insert(
                "damage_report_comments",
                json!({ "damage_report_id": "d1", "content": "hi", "user_id": "u1" }),
                "id, content, profiles(username)",
            )
            .await
            .unwrap();

        assert!(row["id"].is_string());
        assert_eq!(row["profiles"]["username"], "sita");
        assert!(row.get("damage_report_id").is_none());
    }

    #[tokio::test]
    async fn select_filters_orders_and_limits() {
        let gateway = MemoryGateway::new();
        gateway.seed(
            "missing_persons",
            [
                json!({ "id": "a", "created_at": "2025-04-25T06:00:00Z" }),
                json!({ "id": "b", "created_at": "2025-04-25T08:00:00.5+00:00" }),
                json!({ "id": "c", "created_at": "2025-04-25T07:00:00Z" }),
            ],
        );

        let rows = gateway
            .select(SelectQuery::from("missing_persons").order_by("created_at", false).limit(2))
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);

        let rows = gateway
            .select(SelectQuery::from("missing_persons").eq("id", "c"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn scoped_failure_only_hits_matching_filter() {
        let gateway = MemoryGateway::new();
        gateway.fail_where(
            Operation::Select,
            "damage_report_comments",
            Filter::eq("damage_report_id", "bad"),
            GatewayError::Transport("reset".to_string()),
        );

        let ok = gateway
            .select(SelectQuery::from("damage_report_comments").eq("damage_report_id", "good"))
            .await;
        let failed = gateway
            .select(SelectQuery::from("damage_report_comments").eq("damage_report_id", "bad"))
            .await;

        assert!(ok.is_ok());
        assert!(failed.is_err());
        assert_eq!(gateway.calls_on(Operation::Select, "damage_report_comments"), 2);
    }

    #[test]
    fn splits_nested_projection() {
        assert_eq!(
            split_columns("id, profiles(username, avatar), content"),
            vec!["id", "profiles(username, avatar)", "content"]
        );
    }
}
