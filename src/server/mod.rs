use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;
use crate::data::{load_configured, LoadError};
use crate::engine::{EngineInitError, QueryEngine};

pub mod api;
pub mod routes;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load dataset: {0}")]
    Load(#[from] LoadError),
    #[error("failed to start query engine: {0}")]
    Init(#[from] EngineInitError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for routes::HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type))],
            Body::from(self.body),
        )
            .into_response()
    }
}

async fn dispatch(
    State(engine): State<Arc<QueryEngine>>,
    method: Method,
    uri: Uri,
    body: String,
) -> routes::HttpResponse {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    routes::route_request(&engine, method.as_str(), path, &body)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins = if settings.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            settings
                .cors_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// All routes go through [`routes::route_request`].
pub fn router(engine: Arc<QueryEngine>, settings: &Settings) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(settings))
        .with_state(engine)
}

pub async fn serve(engine: Arc<QueryEngine>, settings: &Settings) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!(bind_addr = %settings.bind_addr, "pokefinder server listening");
    axum::serve(listener, router(engine, settings)).await
}

/// Load the configured dataset, then block serving it until the process ends.
pub fn run_server(settings: &Settings) -> Result<(), ServerError> {
    let indexes = load_configured(settings)?;
    let engine = Arc::new(QueryEngine::new(indexes)?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(engine, settings))?;
    Ok(())
}
