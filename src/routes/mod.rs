pub mod announcements;
pub mod health;
pub mod metrics;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{config::CorsOrigins, AppState};

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        // Announcements. Delete reads its id from the body.
        .route(
            "/announcements",
            get(announcements::list_announcements)
                .post(announcements::create_announcement)
                .delete(announcements::delete_announcement),
        )
        .route("/announcements/{id}", put(announcements::update_announcement))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `*` lets any origin in without credentials; an explicit list also allows
/// credentials.
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_origin(Any),
        CorsOrigins::List(list) => {
            let allowed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_methods(methods)
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
                .allow_origin(AllowOrigin::list(allowed))
                .allow_credentials(true)
        }
    }
}
