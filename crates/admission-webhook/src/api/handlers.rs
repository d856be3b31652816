use std::sync::Arc;

use axum::{
    body,
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Response},
};
use tokio::task;
use tracing::{debug, error, warn, Span};

use crate::{
    admission_review::{self, AdmissionRequest, AdmissionResponse, AdmissionReview},
    api::{api_error::ApiError, state::ApiServerState},
};

const EMPTY_STRATEGY_ERROR_MESSAGE: &str = "admission strategy failed without giving a reason";
const STRATEGY_PANIC_MESSAGE: &str = "admission strategy terminated unexpectedly";

#[tracing::instrument(
    name = "validation",
    fields(
        request_uid=tracing::field::Empty,
        host=crate::config::HOSTNAME.as_str(),
        name=tracing::field::Empty,
        namespace=tracing::field::Empty,
        operation=tracing::field::Empty,
        allowed=tracing::field::Empty,
        response_message=tracing::field::Empty,
    ),
    skip_all)]
/// Validate a request using the configured admission strategy.
pub(crate) async fn validate_handler(
    State(state): State<Arc<ApiServerState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let admission_request =
        match read_admission_request(request, state.max_request_body_size).await {
            Ok(admission_request) => admission_request,
            Err(err) => {
                warn!(error = err.message.as_str(), "Bad AdmissionReview request");
                return Err(err);
            }
        };

    populate_span_with_admission_request_data(&admission_request);

    let response = evaluate(state, admission_request).await;

    populate_span_with_admission_response_data(&response);

    let payload = admission_review::encode(&AdmissionReview::new_with_response(response))
        .map_err(|err| {
            error!(error = %err, "cannot build AdmissionReview response");
            ApiError::internal_server_error()
        })?;

    Ok((
        [(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())],
        payload,
    )
        .into_response())
}

/// Check the transport preconditions and decode the body. The body is
/// read only once method and content type are known to be right.
async fn read_admission_request(
    request: Request,
    max_request_body_size: usize,
) -> Result<AdmissionRequest, ApiError> {
    if *request.method() != Method::POST {
        return Err(ApiError::bad_request(format!(
            "unsupported method {}, only POST is allowed",
            request.method()
        )));
    }
    check_content_type(request.headers())?;

    let raw = body::to_bytes(request.into_body(), max_request_body_size)
        .await
        .map_err(|err| ApiError::bad_request(format!("cannot read request body: {err}")))?;
    debug!(admission_review = %String::from_utf8_lossy(&raw));

    Ok(admission_review::decode(&raw)?.into_request()?)
}

fn check_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .ok_or_else(|| ApiError::bad_request("missing Content-Type header"))?;
    let media_type = content_type
        .to_str()
        .ok()
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .ok_or_else(|| ApiError::bad_request("invalid Content-Type header"))?;

    if media_type.type_() == mime::APPLICATION
        && media_type.subtype() == mime::JSON
        && media_type.suffix().is_none()
    {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "unsupported Content-Type {media_type}, expected {}",
            mime::APPLICATION_JSON
        )))
    }
}

/// Run the strategy on the blocking thread pool. Whatever happens, the
/// outcome is a response carrying the uid of the request: strategy
/// failures become denials.
async fn evaluate(
    state: Arc<ApiServerState>,
    admission_request: AdmissionRequest,
) -> AdmissionResponse {
    let uid = admission_request.uid.clone();
    let span = Span::current();

    let outcome = task::spawn_blocking(move || {
        let _enter = span.enter();
        state.strategy.admit(&admission_request)
    })
    .await;

    match outcome {
        Ok(Ok(decision)) => {
            debug!(decision =? &decision, "admission strategy evaluated");
            AdmissionResponse::from_decision(uid, decision)
        }
        Ok(Err(err)) => {
            error!(error = %err, "admission strategy failed");
            let message = err.to_string();
            let message = if message.is_empty() {
                EMPTY_STRATEGY_ERROR_MESSAGE.to_owned()
            } else {
                message
            };
            AdmissionResponse::reject(uid, message, 500)
        }
        Err(err) => {
            error!(error = %err, "admission strategy task failed");
            AdmissionResponse::reject(uid, STRATEGY_PANIC_MESSAGE.to_owned(), 500)
        }
    }
}

fn populate_span_with_admission_request_data(adm_req: &AdmissionRequest) {
    Span::current().record("request_uid", adm_req.uid.as_str());
    Span::current().record("name", adm_req.name.as_deref().unwrap_or_default());
    Span::current().record(
        "namespace",
        adm_req.namespace.as_deref().unwrap_or_default(),
    );
    Span::current().record("operation", adm_req.operation.as_str());
}

fn populate_span_with_admission_response_data(response: &AdmissionResponse) {
    Span::current().record("allowed", response.allowed);
    if let Some(message) = response
        .status
        .as_ref()
        .and_then(|status| status.message.as_deref())
    {
        Span::current().record("response_message", message);
    }
}
