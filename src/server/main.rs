//! HTTP server for soil lookup and crop recommendations.
//!
//! Serves the nearest-soil lookup, image-based soil prediction, the static
//! recommendation tables and the page/navigation model.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use yuvaa::classifier::{classify, SoilClassifier, TfServingClassifier};
use yuvaa::config::{ClassifierConfig, Config};
use yuvaa::dataset::SoilTable;
use yuvaa::geo::ScanPolicy;
use yuvaa::geocoding::{Geocoder, NominatimGeocoder};
use yuvaa::pages::{self, Action, NavState, Page, Transition, View};
use yuvaa::query::{resolve_query, QueryInput};
use yuvaa::recommend::{self, Recommendation};
use yuvaa::{Error, GeoPoint, SoilRecord, SoilType};

mod errors;
use errors::error_response;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Soil lookup and crop recommendation server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Soil dataset CSV/TSV, optionally gzipped (overrides config)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Nominatim base URL (overrides config)
    #[arg(long)]
    geocoder_url: Option<String>,

    /// TensorFlow Serving base URL; enables prediction (overrides config)
    #[arg(long)]
    classifier_url: Option<String>,

    /// Fail lookups on records with unusable coordinates instead of skipping them
    #[arg(long)]
    strict: bool,
}

/// Application state shared across handlers
struct AppState {
    table: SoilTable,
    policy: ScanPolicy,
    geocoder: Box<dyn Geocoder>,
    classifier: Option<Box<dyn SoilClassifier>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }
    if let Some(url) = args.geocoder_url {
        config.geocoder.url = url;
    }
    if let Some(url) = args.classifier_url {
        match config.classifier.as_mut() {
            Some(c) => c.url = url,
            None => config.classifier = Some(ClassifierConfig::new(url)),
        }
    }
    config.dataset.strict |= args.strict;

    info!("Yuvaa Soil Server");

    let table = SoilTable::load(&config.dataset.path)
        .with_context(|| format!("Failed to load soil data from {}", config.dataset.path.display()))?;

    info!("Using geocoder at {}", config.geocoder.url);
    let geocoder = NominatimGeocoder::new(
        &config.geocoder.url,
        &config.geocoder.user_agent,
        config.geocoder.timeout(),
    )?;

    let classifier: Option<Box<dyn SoilClassifier>> = match &config.classifier {
        Some(c) => {
            info!("Using soil classifier '{}' at {}", c.model, c.url);
            Some(Box::new(TfServingClassifier::new(&c.url, &c.model, c.timeout())?))
        }
        None => {
            info!("No classifier configured, prediction disabled");
            None
        }
    };

    let state = Arc::new(AppState {
        table,
        policy: config.dataset.scan_policy(),
        geocoder: Box::new(geocoder),
        classifier,
    });

    let app = router(state, config.server.max_upload_bytes);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/nearest", get(nearest_handler))
        .route("/v1/predict", post(predict_handler))
        .route("/v1/recommendations/soil/{soil_type}", get(soil_handler))
        .route("/v1/recommendations/month/{month}", get(month_handler))
        .route("/v1/pages/{page}", get(page_handler))
        .route("/v1/navigate", post(navigate_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.table.len(),
        malformed_rows: state.table.malformed_rows(),
        classifier: state.classifier.is_some(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    records: usize,
    malformed_rows: usize,
    classifier: bool,
}

/// Closest soil record to a place name or coordinates
async fn nearest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryInput>,
) -> Result<Json<NearestResponse>, (StatusCode, String)> {
    let point = resolve_query(&params, &*state.geocoder)
        .await
        .map_err(error_response)?;

    let result = state
        .table
        .nearest(&point, state.policy)
        .map_err(error_response)?;

    Ok(Json(NearestResponse {
        query: point,
        distance_km: result.distance_km,
        excluded_records: result.excluded,
        record: result.record.clone(),
    }))
}

#[derive(Serialize, Deserialize)]
struct NearestResponse {
    query: GeoPoint,
    distance_km: f64,
    excluded_records: usize,
    record: SoilRecord,
}

#[derive(Deserialize)]
struct PredictParams {
    /// Sowing month for the market-demand recommendation
    month: Option<String>,
}

/// Classify an uploaded soil image (raw JPEG/PNG body)
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictParams>,
    body: Bytes,
) -> Result<Json<PredictResponse>, (StatusCode, String)> {
    let classifier = state.classifier.as_deref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "soil classifier is not configured".to_string(),
    ))?;

    let month = params
        .month
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(recommend::parse_month)
        .transpose()
        .map_err(error_response)?;

    if body.is_empty() {
        return Err(error_response(Error::InvalidImage("no image uploaded".to_string())));
    }

    let classification = classify(classifier, body.to_vec()).await.map_err(error_response)?;

    Ok(Json(PredictResponse {
        soil_type: classification.soil_type,
        confidence: classification.confidence,
        recommendation: recommend::for_soil(classification.soil_type),
        month: month.map(|m| MonthRecommendation {
            month: m.name(),
            recommendation: recommend::for_month(m),
        }),
    }))
}

#[derive(Serialize)]
struct PredictResponse {
    soil_type: SoilType,
    /// Percentage
    confidence: f64,
    recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<MonthRecommendation>,
}

#[derive(Serialize)]
struct MonthRecommendation {
    month: &'static str,
    #[serde(flatten)]
    recommendation: Recommendation,
}

async fn soil_handler(
    Path(soil_type): Path<String>,
) -> Result<Json<SoilRecommendation>, (StatusCode, String)> {
    let soil_type: SoilType = soil_type.parse().map_err(error_response)?;
    Ok(Json(SoilRecommendation {
        soil_type,
        recommendation: recommend::for_soil(soil_type),
    }))
}

#[derive(Serialize)]
struct SoilRecommendation {
    soil_type: SoilType,
    #[serde(flatten)]
    recommendation: Recommendation,
}

async fn month_handler(
    Path(month): Path<String>,
) -> Result<Json<MonthRecommendation>, (StatusCode, String)> {
    let month = recommend::parse_month(&month).map_err(error_response)?;
    Ok(Json(MonthRecommendation {
        month: month.name(),
        recommendation: recommend::for_month(month),
    }))
}

async fn page_handler(Path(page): Path<String>) -> Result<Json<View>, (StatusCode, String)> {
    let page: Page = page.parse().map_err(|e| (StatusCode::NOT_FOUND, e))?;
    Ok(Json(pages::view(page)))
}

#[derive(Deserialize)]
struct NavigateRequest {
    #[serde(default)]
    state: NavState,
    action: Action,
}

#[derive(Serialize)]
struct NavigateResponse {
    #[serde(flatten)]
    transition: Transition,
    view: View,
}

/// Apply a navigation action to client-held state
async fn navigate_handler(Json(request): Json<NavigateRequest>) -> Json<NavigateResponse> {
    let transition = pages::apply(&request.state, &request.action);
    let view = pages::view(transition.state.page);
    Json(NavigateResponse { transition, view })
}
