use super::memory_gateway::MemoryGateway;
use relief_desk::{
    application::{list_view::ListViewModel, reports::ReportRepository},
    domain::{
        report::ReportKind,
        session::Session,
        shared::ids::UserId,
    },
    infrastructure::{notifications::NoticeLog, session::SessionStore},
};
use serde_json::{Value, json};
use std::{future::Future, sync::Arc, time::Duration};

pub struct TestApp {
    pub gateway: Arc<MemoryGateway>,
    pub repository: ReportRepository,
    pub sessions: Arc<SessionStore>,
    pub notices: Arc<NoticeLog>,
}

impl TestApp {
    pub fn new() -> Self {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed(
            "profiles",
            [
                json!({ "id": "u-sita", "username": "sita" }),
                json!({ "id": "u-ram", "username": "ram" }),
            ],
        );
        Self {
            repository: ReportRepository::new(gateway.clone()),
            gateway,
            sessions: Arc::new(SessionStore::anonymous()),
            notices: Arc::new(NoticeLog::new()),
        }
    }

    pub fn sign_in(&self, user: &str) -> UserId {
        let user_id = UserId::new(user);
        self.sessions
            .sign_in(Session::new(user_id.clone(), format!("token-{user}")));
        user_id
    }

    pub fn list(&self, kind: ReportKind) -> ListViewModel {
        ListViewModel::new(kind, self.repository.clone(), self.notices.clone())
    }

    pub fn notice_texts(&self) -> Vec<String> {
        self.notices
            .notices()
            .into_iter()
            .map(|n| n.description)
            .collect()
    }
}

pub fn damage_row(id: &str, created_at: &str, coordinates: Option<(f64, f64)>) -> Value {
    json!({
        "id": id,
        "created_at": created_at,
        "location": format!("Ward {id}"),
        "description": "Collapsed wall",
        "latitude": coordinates.map(|c| c.0),
        "longitude": coordinates.map(|c| c.1),
        "reporter_id": "u-sita",
        "verified": null,
        "has_casualties": false,
    })
}

pub fn person_row(id: &str, created_at: &str, reporter: &str) -> Value {
    json!({
        "id": id,
        "created_at": created_at,
        "name": format!("Person {id}"),
        "last_seen_location": "Gorkha bazaar",
        "age": 34,
        "status": "missing",
        "reporter_id": reporter,
    })
}

pub fn damage_comment(id: &str, report: &str, created_at: &str, user: &str) -> Value {
    json!({
        "id": id,
        "damage_report_id": report,
        "content": format!("comment {id}"),
        "created_at": created_at,
        "user_id": user,
        "likes": 0,
        "user_likes": [],
    })
}

pub fn person_comment(id: &str, report: &str, created_at: &str, user: &str) -> Value {
    json!({
        "id": id,
        "missing_person_id": report,
        "content": format!("sighting {id}"),
        "created_at": created_at,
        "user_id": user,
        "latitude": 28.0,
        "longitude": 84.6,
        "location_name": "Arughat",
    })
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
