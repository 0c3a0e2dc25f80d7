//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum Router for the configured dataset
//! - Wire up middleware (request ID, tracing, timeout)
//! - Build the upstream URL and the `Next-Page` link
//! - Fetch upstream records and answer with a FeatureCollection
//! - Serve until the shutdown broadcast fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use geojson::FeatureCollection;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::validate_config;
use crate::config::{ConfigError, DatasetKind, ProxyConfig};
use crate::error::ProxyError;
use crate::http::request::{base_url, request_id, MakeRequestUuid};
use crate::http::upstream::UpstreamClient;
use crate::lifecycle::StartupError;
use crate::observability::metrics;
use crate::query::{FoodFacilityQuery, QueryBuilder, QueryParams};
use crate::transform::{to_pretty_json, Transformer};

pub const NEXT_PAGE: HeaderName = HeaderName::from_static("next-page");

const SERVICE_REQUESTS_ROUTE: &str = "service_requests";
const FOOD_FACILITIES_ROUTE: &str = "food_facilities";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub query: Arc<QueryBuilder>,
    pub food_query: Arc<FoodFacilityQuery>,
    pub transformer: Arc<Transformer>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        let transformer = Transformer::from_config(&config.dataset)?;
        let upstream = UpstreamClient::new(&config.upstream)?;
        Ok(Self {
            query: Arc::new(QueryBuilder::new(&config.upstream, &config.pagination)),
            food_query: Arc::new(FoodFacilityQuery::new(&config.dataset.food)),
            transformer: Arc::new(transformer),
            upstream,
            config: Arc::new(config),
        })
    }
}

/// HTTP server for the GeoJSON proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Validate the configuration and build the router.
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let timeout = Duration::from_secs(state.config.timeouts.request_secs);

        let router = match state.config.dataset.kind {
            DatasetKind::ServiceRequests => Router::new()
                .route("/{*path}", get(service_requests_handler))
                .route("/", get(service_requests_handler)),
            DatasetKind::FoodFacilities => Router::new()
                .route(&state.config.dataset.food.route, get(food_facilities_handler)),
        };

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &axum::http::Request<axum::body::Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request.headers()),
                        )
                    },
                ))
                .layer(TimeoutLayer::new(timeout))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            dataset = ?self.config.dataset.kind,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(crate::lifecycle::shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Paginated service request proxy for any path.
async fn service_requests_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start = Instant::now();
    let response = match serve_service_requests(&state, &headers, &uri).await {
        Ok(response) => response,
        Err(e) => failure(&headers, e),
    };
    metrics::record_request(SERVICE_REQUESTS_ROUTE, response.status().as_u16(), start);
    response
}

async fn serve_service_requests(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<Response, ProxyError> {
    let params = QueryParams::from_query(uri.query());
    let path = uri.path();

    let base = base_url(
        headers,
        state.config.listener.public_url.as_deref(),
        &state.config.listener.bind_address,
    );
    let next_page = state.query.next_page_url(&base, path, &params)?;
    let upstream_url = state.query.upstream_url(path, &params)?;

    tracing::debug!(
        request_id = %request_id(headers),
        upstream = %upstream_url,
        next_page = ?next_page.as_ref().map(|u| u.as_str()),
        "Proxying request"
    );

    let records = state.upstream.fetch_records(upstream_url).await?;
    let collection = state.transformer.transform_all(records)?;

    let mut response = feature_response(&collection)?;
    if let Some(next_page) = next_page {
        if let Ok(value) = HeaderValue::from_str(next_page.as_str()) {
            response.headers_mut().insert(NEXT_PAGE, value);
        }
    }
    Ok(response)
}

/// Recently approved food facilities; inbound parameters are ignored.
async fn food_facilities_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let response = match serve_food_facilities(&state, &headers).await {
        Ok(response) => response,
        Err(e) => failure(&headers, e),
    };
    metrics::record_request(FOOD_FACILITIES_ROUTE, response.status().as_u16(), start);
    response
}

async fn serve_food_facilities(state: &AppState, headers: &HeaderMap) -> Result<Response, ProxyError> {
    let params = state.food_query.params(Utc::now().date_naive());
    let upstream_url = state
        .query
        .upstream_url(&state.config.dataset.food.upstream_path, &params)?;

    tracing::debug!(
        request_id = %request_id(headers),
        upstream = %upstream_url,
        "Fetching food facilities"
    );

    let records = state.upstream.fetch_records(upstream_url).await?;
    let collection = state.transformer.transform_all(records)?;
    feature_response(&collection)
}

fn feature_response(collection: &FeatureCollection) -> Result<Response, ProxyError> {
    let body = to_pretty_json(collection)?;
    metrics::record_features(collection.features.len());
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn failure(headers: &HeaderMap, error: ProxyError) -> Response {
    let status = error.status();
    if status.is_client_error() {
        tracing::warn!(request_id = %request_id(headers), error = %error, "Rejected request");
    } else {
        tracing::error!(request_id = %request_id(headers), error = %error, "Request failed");
    }
    error.into_response()
}
