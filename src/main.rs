use relief_desk::{
    application::{
        comments::{CommentSubmission, ComposeField},
        detail_view::ReportDetailView,
        list_view::ListViewModel,
        reports::ReportRepository,
    },
    config::Config,
    domain::{
        location::place_name_or_empty,
        report::ReportKind,
        shared::{ids::ReportId, notice::Notifier},
    },
    infrastructure::{
        gateway::RestGateway, geocoding::MapboxGeocoder, notifications::NoticeLog,
        session::SessionStore,
    },
    presentation::views::{ReportDetailPage, ReportListView},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Usage: `relief-desk [missing-person|damage] [report-id [comment...]]`
///
/// Without a report id, loads the report list and prints it as JSON. With
/// one, prints that report's page; any further words are posted as a
/// comment first, which needs `RELIEF_USER_ID` and `RELIEF_ACCESS_TOKEN`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,relief_desk=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let mut args = std::env::args().skip(1);
    let kind: ReportKind = args
        .next()
        .unwrap_or_else(|| ReportKind::Damage.to_string())
        .parse()?;
    let report_id = args.next().map(ReportId::new);
    let comment = args.collect::<Vec<_>>().join(" ");

    let sessions = Arc::new(match config.session() {
        Some(session) => SessionStore::signed_in(session),
        None => SessionStore::anonymous(),
    });
    let viewer = config.session().map(|s| s.user_id);
    let gateway = RestGateway::new(
        &config.backend_url,
        &config.backend_anon_key,
        config.backend_timeout(),
        sessions.clone(),
    )?;
    let repository = ReportRepository::with_bucket(Arc::new(gateway), &config.storage_bucket);
    let notices = Arc::new(NoticeLog::new());

    let Some(report_id) = report_id else {
        let list = ListViewModel::new(kind, repository, notices.clone())
            .with_default_center(config.default_map_center());
        info!(kind = %kind, backend = %config.backend_url, "Loading reports");
        list.load().await?;
        let view = ReportListView::render(&list, viewer.as_ref());
        println!("{}", serde_json::to_string_pretty(&view)?);
        list.dispose();
        return Ok(());
    };

    let notifier: Arc<dyn Notifier> = notices.clone();
    let detail = ReportDetailView::open(kind, report_id, repository.clone(), notifier.clone()).await?;

    if !comment.trim().is_empty() {
        let mut compose = ComposeField::new(comment);
        CommentSubmission::new(kind, repository, sessions, notifier)
            .submit(detail.id(), &mut compose, &detail)
            .await?;
    }

    let place_name = match (&config.mapbox_token, detail.report().coordinates()) {
        (Some(token), Some(at)) => {
            match MapboxGeocoder::new(&config.geocoding_url, token, config.backend_timeout()) {
                Ok(geocoder) => Some(place_name_or_empty(&geocoder, at).await),
                Err(e) => {
                    warn!(error = %e, "Geocoder unavailable");
                    None
                }
            }
        }
        _ => None,
    };

    let page = ReportDetailPage::render(&detail, viewer.as_ref(), place_name);
    println!("{}", serde_json::to_string_pretty(&page)?);
    detail.dispose();
    Ok(())
}
