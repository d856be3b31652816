use std::sync::Arc;

use crate::strategy::AdmissionStrategy;

pub(crate) struct ApiServerState {
    pub(crate) strategy: Arc<dyn AdmissionStrategy>,
    pub(crate) max_request_body_size: usize,
}
