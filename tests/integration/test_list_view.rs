use super::helpers::{TestApp, damage_comment, damage_row, person_row};
use super::memory_gateway::Operation;
use relief_desk::{
    application::reports::ReportModeration,
    domain::{
        gateway::query::Filter,
        report::{PersonStatus, ReportKind},
        shared::{errors::GatewayError, geo::{Coordinates, NEPAL_CENTER}, ids::ReportId},
    },
};
use std::time::Duration;

fn seed_three_damage_reports(app: &TestApp) {
    app.gateway.seed(
        "damage_reports",
        [
            damage_row("a", "2025-04-25T06:00:00Z", None),
            damage_row("b", "2025-04-25T07:00:00Z", Some((27.7, 85.3))),
            damage_row("c", "2025-04-25T08:00:00Z", None),
        ],
    );
    app.gateway.seed(
        "damage_report_comments",
        [
            damage_comment("a2", "a", "2025-04-25T09:30:00Z", "u-ram"),
            damage_comment("a1", "a", "2025-04-25T09:00:00Z", "u-sita"),
            damage_comment("b1", "b", "2025-04-25T09:00:00Z", "u-sita"),
            damage_comment("c1", "c", "2025-04-25T09:00:00Z", "u-ram"),
        ],
    );
}

#[tokio::test]
async fn list_loads_newest_first_with_comment_counts() {
    let app = TestApp::new();
    seed_three_damage_reports(&app);

    let list = app.list(ReportKind::Damage);
    list.load().await.unwrap();

    let ids: Vec<String> = list.reports().iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
    assert_eq!(list.comment_count(&ReportId::new("a")), 2);
    assert_eq!(list.comment_count(&ReportId::new("b")), 1);
    assert_eq!(list.comment_count(&ReportId::new("c")), 1);
    assert_eq!(list.comment_count(&ReportId::new("missing")), 0);

    let a_comments: Vec<String> = list
        .comments_for(&ReportId::new("a"))
        .iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(a_comments, vec!["a1", "a2"], "comments load oldest first");
    assert_eq!(list.comments_for(&ReportId::new("a"))[0].author_username, "sita");

    assert_eq!(
        app.gateway.calls_on(Operation::Select, "damage_report_comments"),
        3,
        "one comment read per report"
    );
}

#[tokio::test]
async fn one_failed_comment_read_does_not_affect_the_others() {
    let app = TestApp::new();
    seed_three_damage_reports(&app);
    app.gateway.fail_where(
        Operation::Select,
        "damage_report_comments",
        Filter::eq("damage_report_id", "a"),
        GatewayError::Transport("connection reset".to_string()),
    );

    let list = app.list(ReportKind::Damage);
    list.load().await.unwrap();

    assert_eq!(list.comment_count(&ReportId::new("a")), 0);
    assert_eq!(list.comment_count(&ReportId::new("b")), 1);
    assert_eq!(list.comment_count(&ReportId::new("c")), 1);
    assert!(list.error().is_none());
}

#[tokio::test]
async fn failed_report_read_shows_empty_list_with_error() {
    let app = TestApp::new();
    seed_three_damage_reports(&app);
    app.gateway.fail(
        Operation::Select,
        "damage_reports",
        GatewayError::Unavailable("maintenance".to_string()),
    );

    let list = app.list(ReportKind::Damage);
    assert!(list.load().await.is_err());

    assert!(list.reports().is_empty());
    assert!(list.error().is_some());
    assert!(!list.is_loading());
    assert_eq!(app.notice_texts(), vec!["Failed to load damage reports"]);
}

#[tokio::test]
async fn disposed_list_ignores_late_results() {
    let app = TestApp::new();
    seed_three_damage_reports(&app);
    app.gateway.set_select_delay(Some(Duration::from_millis(100)));

    let list = app.list(ReportKind::Damage);
    let pending = tokio::spawn({
        let list = list.clone();
        async move { list.load().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    list.dispose();
    pending.await.unwrap().unwrap();

    assert!(list.reports().is_empty());
    assert_eq!(list.comment_count(&ReportId::new("a")), 0);
    assert!(app.notices.notices().is_empty());
}

#[tokio::test]
async fn map_overlay_uses_only_located_reports() {
    let app = TestApp::new();
    app.gateway.seed(
        "damage_reports",
        [
            damage_row("A", "2025-04-25T08:00:00Z", None),
            damage_row("B", "2025-04-25T07:00:00Z", Some((28.3949, 84.1240))),
        ],
    );

    let list = app.list(ReportKind::Damage);
    list.load().await.unwrap();

    let pins = list.map_pins();
    assert_eq!(pins.len(), 1);
    assert_eq!(pins[0].label, "Ward B");
    assert_eq!(list.initial_map_center(), Coordinates::new(28.3949, 84.1240));

    let empty = app.list(ReportKind::MissingPerson);
    empty.load().await.unwrap();
    assert!(empty.map_pins().is_empty());
    assert_eq!(empty.initial_map_center(), NEPAL_CENTER);
}

#[tokio::test]
async fn panel_toggle_keeps_at_most_one_open() {
    let app = TestApp::new();
    seed_three_damage_reports(&app);
    let list = app.list(ReportKind::Damage);
    list.load().await.unwrap();

    let a = ReportId::new("a");
    let b = ReportId::new("b");
    list.toggle_panel(&a);
    list.toggle_panel(&b);
    assert_eq!(list.selected_panel(), Some(b.clone()));
    list.toggle_panel(&b);
    assert_eq!(list.selected_panel(), None);
}

#[tokio::test]
async fn reporter_can_mark_found_and_delete() {
    let app = TestApp::new();
    app.gateway.seed(
        "missing_persons",
        [
            person_row("p1", "2025-04-25T06:00:00Z", "u-sita"),
            person_row("p2", "2025-04-25T07:00:00Z", "u-ram"),
        ],
    );
    let list = app.list(ReportKind::MissingPerson);
    list.load().await.unwrap();
    app.sign_in("u-sita");

    let moderation = ReportModeration::new(
        app.repository.clone(),
        app.sessions.clone(),
        app.notices.clone(),
    );

    let p1 = list.find_report(&ReportId::new("p1")).unwrap();
    let status = moderation.toggle_status(&p1, &list).await.unwrap();
    assert_eq!(status, PersonStatus::Found);
    let stored = app.gateway.rows("missing_persons");
    assert!(stored.iter().any(|r| r["id"] == "p1" && r["status"] == "found"));
    let p1 = list.find_report(&ReportId::new("p1")).unwrap();
    assert_eq!(p1.as_missing_person().unwrap().status, PersonStatus::Found);

    let p2 = list.find_report(&ReportId::new("p2")).unwrap();
    assert!(moderation.delete(&p2, &list).await.is_err(), "not the reporter");
    assert_eq!(list.reports().len(), 2);

    moderation.delete(&p1, &list).await.unwrap();
    assert!(list.find_report(&ReportId::new("p1")).is_none());
    assert_eq!(app.gateway.rows("missing_persons").len(), 1);
    assert!(app.notice_texts().contains(&"Report deleted successfully".to_string()));
}
