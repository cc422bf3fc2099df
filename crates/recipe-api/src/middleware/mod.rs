//! Middleware stack for the API server
//!
//! Request ids, request tracing, timeouts, CORS and rate limiting.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use recipe_common::{AppError, CorsConfig, RateLimitConfig};
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Settings for [`apply_middleware`]
#[derive(Debug, Clone)]
pub struct MiddlewareConfig<'a> {
    pub rate_limit: Option<&'a RateLimitConfig>,
    pub cors: &'a CorsConfig,
    pub is_production: bool,
    pub request_timeout: Duration,
}

/// Wrap `router` in the middleware stack
///
/// Incoming requests pass rate limiting, then request id assignment, tracing,
/// the timeout and CORS, in that order. Rate limiting is skipped when
/// `config.rate_limit` is `None`.
pub fn apply_middleware(router: Router<AppState>, config: &MiddlewareConfig<'_>) -> Result<Router<AppState>, AppError> {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = router
        .layer(cors_layer(config.cors, config.is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            config.request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    let Some(rate_limit) = config.rate_limit else {
        return Ok(router);
    };

    // One bucket for the whole server, not per client address
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rate_limit.requests_per_second.into())
        .burst_size(rate_limit.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish()
        .ok_or_else(|| {
            AppError::Config(format!(
                "invalid rate limit: {} per second, burst {}",
                rate_limit.requests_per_second, rate_limit.burst
            ))
        })?;

    Ok(router.layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

fn cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let base_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            request_id.clone(),
        ])
        .expose_headers([request_id]);

    if config.allowed_origins.is_empty() {
        if is_production {
            tracing::warn!("CORS: no allowed origins configured in production; cross-origin requests will be blocked");
            return base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }
        tracing::warn!("CORS: allowing any origin (development). Set CORS_ALLOWED_ORIGINS to restrict.");
        return base_layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    tracing::info!(count = origins.len(), "CORS: allowing configured origins");
    base_layer.allow_origin(AllowOrigin::list(origins))
}
