pub mod health;
pub mod metrics;
pub mod shifts;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{config::Config, middleware::auth::JwtSecret, AppState};

fn is_local(origin: &str) -> bool {
    ["http://localhost", "http://127.0.0.1"].iter().any(|host| {
        origin
            .strip_prefix(host)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
    })
}

/// Allow the app base URL exactly, plus localhost for development.
fn cors_layer(base_url: &str) -> CorsLayer {
    let base = base_url.trim_end_matches('/').to_string();
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let Ok(o) = origin.to_str() else {
            return false;
        };
        o == base || is_local(o)
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(origin)
}

pub fn router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        // Shifts
        .route("/shifts", post(shifts::create_shift))
        .route("/shifts/calendar", get(shifts::get_calendar))
        .route("/shifts/{id}", delete(shifts::delete_shift))
        .layer(axum::Extension(JwtSecret(config.jwt_secret.clone())))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.app_base_url))
        .with_state(state)
}
