//! Error-counter middleware tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use sales_service::services::metrics::ERRORS_TOTAL;
use sales_service::startup::track_errors;
use tower::ServiceExt;

async fn ok() -> StatusCode {
    StatusCode::OK
}

async fn missing() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

#[tokio::test]
async fn error_responses_increment_the_counter_by_class() {
    let app = Router::new()
        .route("/ok", get(ok))
        .route("/missing", get(missing))
        .route("/broken", get(broken))
        .layer(middleware::from_fn(track_errors));

    let client_before = ERRORS_TOTAL.with_label_values(&["client_error"]).get();
    let server_before = ERRORS_TOTAL.with_label_values(&["server_error"]).get();

    for uri in ["/ok", "/missing", "/broken"] {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("handler must respond");
    }

    let client_after = ERRORS_TOTAL.with_label_values(&["client_error"]).get();
    let server_after = ERRORS_TOTAL.with_label_values(&["server_error"]).get();
    assert_eq!(client_after - client_before, 1.0);
    assert_eq!(server_after - server_before, 1.0);
}
