use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{self};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use crate::adapter::http::docs::{docs_ui, openapi_json};
use crate::adapter::http::routes::auth::{complete_password_reset, request_password_reset};
use crate::adapter::http::routes::user::signup;
use crate::infra::config::AppConfig;
use crate::infra::state::AppState;

fn build_cors(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([http::Method::POST, http::Method::GET])
        .allow_headers([CONTENT_TYPE]);

    if config.application.allow_origins.iter().any(|s| s == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<http::HeaderValue> = config
        .application
        .allow_origins
        .iter()
        .filter_map(|s| {
            s.parse::<http::HeaderValue>()
                .map_err(|e| {
                    tracing::warn!("Failed to parse origin '{}': {}", s, e);
                })
                .ok()
        })
        .collect();
    cors.allow_origin(origins)
}

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/reset-password", post(request_password_reset))
        .route("/reset-password-complete", post(complete_password_reset))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_router())
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(docs_ui))
}

pub fn create_app(config: &AppConfig, state: AppState) -> Router {
    router()
        .with_state(state)
        .layer(build_cors(config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &http::Request<_>| {
                    let request_id = Uuid::now_v7();
                    tracing::info_span!(
                        "http-request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                        version = ?request.version(),
                        request_id = %request_id
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::infra::app::create_app;
    use crate::tests::fixtures::{TestApp, test_app};

    #[rstest]
    #[case("/openapi.json")]
    #[case("/docs")]
    #[tokio::test]
    async fn test_docs_routes_served(test_app: TestApp, #[case] uri: &str) {
        let app = create_app(test_app.state.config.as_ref(), test_app.state.clone());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[tokio::test]
    async fn test_unknown_route_not_found(test_app: TestApp) {
        let app = create_app(test_app.state.config.as_ref(), test_app.state.clone());
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/forgot-password")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
