use axum::{extract::State, routing::get, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cropmarket_core::client::http::HttpRecommendationClient;
use cropmarket_core::client::RecommendationClient;
use cropmarket_core::domain::request::RawFields;
use cropmarket_core::geocode::nominatim::NominatimClient;
use cropmarket_core::geocode::{locate, GeocodeCandidate, GeocodeClient};
use cropmarket_core::present::{geocode_status, render, DisplayModel, GeocodeStatus};
use cropmarket_core::request::RequestBuilder;
use cropmarket_core::session::recommend;
use cropmarket_core::time::sale_date::default_sale_date;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = cropmarket_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let recommender = HttpRecommendationClient::from_settings(&settings).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        e
    })?;
    let geocoder = NominatimClient::from_settings(&settings)?;
    tracing::info!(endpoint = %recommender.url(), "recommendation endpoint resolved");

    let state = AppState {
        recommender: Arc::new(recommender),
        geocoder: Arc::new(geocoder),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    recommender: Arc<dyn RecommendationClient>,
    geocoder: Arc<dyn GeocodeClient>,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/session", get(new_session))
        .route("/render", post(render_submission))
        .route("/geocode", post(geocode))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct SessionDefaults {
    selected_date: chrono::NaiveDate,
}

/// Defaults a freshly opened form should show.
async fn new_session() -> Json<SessionDefaults> {
    Json(SessionDefaults {
        selected_date: default_sale_date(Utc::now()),
    })
}

/// Validation and service failures are part of the view, so this always answers 200.
async fn render_submission(
    State(state): State<AppState>,
    Json(fields): Json<RawFields>,
) -> Json<DisplayModel> {
    // Each request is its own session; the default date is taken now.
    let builder = RequestBuilder::new(default_sale_date(Utc::now()));

    let model = match builder.build(&fields) {
        Ok(request) => recommend(state.recommender.as_ref(), &request).await,
        Err(err) => render(err.into()),
    };
    Json(model)
}

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Serialize)]
struct GeocodeReply {
    status: GeocodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<String>,
}

async fn geocode(
    State(state): State<AppState>,
    Json(q): Json<GeocodeQuery>,
) -> Json<GeocodeReply> {
    let result = locate(state.geocoder.as_ref(), &q.query).await;
    let status = geocode_status(&result);
    let (latitude, longitude) = match &result {
        Ok(candidate) => coordinates(candidate),
        Err(_) => (None, None),
    };

    Json(GeocodeReply {
        status,
        latitude,
        longitude,
    })
}

fn coordinates(candidate: &GeocodeCandidate) -> (Option<String>, Option<String>) {
    let mut fields = RawFields::default();
    cropmarket_core::geocode::fill_coordinates(&mut fields, candidate);
    (Some(fields.latitude), Some(fields.longitude))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &cropmarket_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
