use admission_webhook::{
    admission_review::{self, AdmissionRequest, AdmissionResponse, AdmissionReview, RawObject},
    config::Config,
    strategy::AdmissionStrategy,
    AdmissionWebhook,
};
use axum::{
    body::Body,
    http::{self, header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceExt;

pub(crate) fn default_test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        tls_config: None,
        validate_path: "/validate".to_owned(),
        max_request_body_size: 3 * 1024 * 1024,
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) fn app(strategy: Arc<dyn AdmissionStrategy>) -> Router {
    AdmissionWebhook::new_from_config(default_test_config(), strategy).router()
}

pub(crate) fn route_group(name: &str, namespace: &str) -> RawObject {
    RawObject::from_serializable(&serde_json::json!({
        "apiVersion": "zalando.org/v1",
        "kind": "RouteGroup",
        "metadata": {
            "name": name,
            "namespace": namespace,
        },
        "spec": {
            "hosts": ["example.org"],
            "backends": [{"name": "app", "type": "service", "serviceName": "app", "servicePort": 80}],
        },
    }))
    .expect("cannot serialize RouteGroup")
}

pub(crate) fn admission_review(uid: &str, object: Option<RawObject>) -> AdmissionReview {
    AdmissionReview::new_with_request(AdmissionRequest {
        uid: uid.to_owned(),
        name: Some("r1".to_owned()),
        namespace: Some("n1".to_owned()),
        operation: "CREATE".to_owned(),
        object,
        ..Default::default()
    })
}

pub(crate) fn validate_request(review: &AdmissionReview) -> Request<Body> {
    Request::builder()
        .method(http::Method::POST)
        .header(header::CONTENT_TYPE, "application/json")
        .uri("/validate")
        .body(Body::from(
            admission_review::encode(review).expect("cannot encode AdmissionReview"),
        ))
        .unwrap()
}

pub(crate) async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status, body.to_vec())
}

pub(crate) fn admission_response(body: &[u8]) -> AdmissionResponse {
    admission_review::decode(body)
        .expect("cannot decode AdmissionReview")
        .response
        .expect("response should be set")
}
