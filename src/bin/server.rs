//! HTTP front end: `POST /api/weather` with `{"city": "..."}` returns a forecast report.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use meteocast::{ForecastConfig, ForecastError, ForecastReport, Forecaster, WeatherSource};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENV_ADDR: &str = "METEOCAST_ADDR";
const DEFAULT_ADDR: &str = "0.0.0.0:5000";

const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/app.js");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // `log` records from the library are forwarded into tracing by `init`
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meteocast=info,meteocast_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ForecastConfig::from_env()?;
    tracing::info!("Historical dataset: {}", config.dataset_path().display());
    let forecaster = Arc::new(Forecaster::new(config)?);

    let addr = std::env::var(ENV_ADDR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, create_app(forecaster)).await?;

    Ok(())
}

fn create_app<S: WeatherSource + 'static>(forecaster: Arc<Forecaster<S>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/app.js", get(app_script))
        .route("/health", get(health_check))
        .route("/api/weather", post(weather::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(forecaster)
}

/// Search page charting the forecast returned by `/api/weather`.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        APP_JS,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct WeatherRequest {
    city: Option<String>,
}

/// A missing or unparsable body is treated like a missing city.
async fn weather<S: WeatherSource + 'static>(
    State(forecaster): State<Arc<Forecaster<S>>>,
    payload: Option<Json<WeatherRequest>>,
) -> Result<Json<ForecastReport>, ApiError> {
    let city = payload
        .and_then(|Json(request)| request.city)
        .unwrap_or_default();
    let report = forecaster.forecast_city(&city).await?;
    Ok(Json(report))
}

struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Forecast failed: {:?}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
