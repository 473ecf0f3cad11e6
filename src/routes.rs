use axum::{
    extract::State,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, SecurityConfig};
use crate::handlers;
use crate::middleware::{
    allow_get, authenticate_middleware, rate_limit_api, validate_client_middleware,
    validate_coach_middleware,
};
use crate::state::AppState;

/// Build the full application router over the given state.
///
/// Every gated route runs the same entry contract, outermost first:
/// CORS preflight short-circuit (global layer), method check,
/// authentication, ownership check where the route declares one, then the
/// rate limit. The first failing step resolves the request; nothing later
/// runs.
pub fn app(state: AppState) -> Router {
    // Stacks are assembled innermost-first: each route_layer wraps the
    // ones added before it.
    let auth_routes = Router::new()
        .route("/api/auth/whoami", get(handlers::auth::whoami))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_api))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_middleware,
        ))
        .route_layer(middleware::from_fn(allow_get));

    let client_routes = Router::new()
        .route(
            "/api/clients/:client_id/access",
            get(handlers::clients::client_access),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_api))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            validate_client_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_middleware,
        ))
        .route_layer(middleware::from_fn(allow_get));

    let coach_routes = Router::new()
        .route(
            "/api/coaches/:coach_id/quota",
            get(handlers::coaches::coach_quota),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_api))
        .route_layer(middleware::from_fn(validate_coach_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_middleware,
        ))
        .route_layer(middleware::from_fn(allow_get));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Gated API
        .merge(auth_routes)
        .merge(client_routes)
        .merge(coach_routes)
        // Global middleware
        .layer(cors_layer(&config::config().security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Coach API",
            "version": version,
            "description": "Request gate for the coaching platform API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "whoami": "/api/auth/whoami (authenticated)",
                "client_access": "/api/clients/:client_id/access (authenticated, owner or coach)",
                "coach_quota": "/api/coaches/:coach_id/quota (authenticated, coach only)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.directory.ping().await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "directory": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "directory unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "directory_error": e.to_string()
                }
            })),
        ),
    }
}
