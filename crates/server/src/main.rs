use std::{collections::HashMap, net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use shared::{
    error::{ApiError, ApiException, ErrorCode},
    protocol::{EstimateResponse, LocationsResponse, LOCATIONS_PATH, PREDICT_PATH},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod model;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;
use model::PriceModel;

const MAX_REQUEST_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let model = PriceModel::load_or_fallback(Path::new(&settings.artifacts_dir));
    let app = build_router(Arc::new(AppState {
        api: ApiContext { model },
    }));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "price estimation server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(LOCATIONS_PATH, get(get_location_names))
        .route(PREDICT_PATH, post(predict_home_price))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn reject(err: ApiException) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::MissingInput | ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(status = status.as_u16(), message = %err.message, "prediction request rejected");
    (status, Json(err.into()))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_location_names(State(state): State<Arc<AppState>>) -> Json<LocationsResponse> {
    Json(api::list_locations(&state.api))
}

async fn predict_home_price(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> ApiResult<EstimateResponse> {
    let fields = read_form_fields(request).await.map_err(reject)?;
    api::estimate_price(&state.api, &fields)
        .map(Json)
        .map_err(reject)
}

/// Collects text fields from a multipart, urlencoded, or JSON body.
async fn read_form_fields(request: Request) -> Result<HashMap<String, String>, ApiException> {
    let missing = |detail: String| {
        warn!(%detail, "could not read prediction form");
        ApiException::new(ErrorCode::MissingInput, "Missing input parameters")
    };
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| missing(e.to_string()))?;
        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| missing(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field.text().await.map_err(|e| missing(e.to_string()))?;
            fields.insert(name, value);
        }
        Ok(fields)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|e| missing(e.to_string()))?;
        Ok(fields)
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<HashMap<String, serde_json::Value>>::from_request(request, &())
            .await
            .map_err(|e| missing(e.to_string()))?;
        Ok(body
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect())
    } else {
        Err(missing(format!("unsupported content type '{content_type}'")))
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
