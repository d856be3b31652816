mod api_error;
mod handlers;
pub(crate) mod state;

use std::sync::Arc;

use axum::{routing::any, Router};

use state::ApiServerState;

/// Every method is routed to the handler: it is the handler that turns
/// anything but POST into a bad request.
pub(crate) fn router(validate_path: &str, state: Arc<ApiServerState>) -> Router {
    Router::new()
        .route(validate_path, any(handlers::validate_handler))
        .with_state(state)
}
