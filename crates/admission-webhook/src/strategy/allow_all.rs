use tracing::debug;

use super::{errors::Result, AdmissionDecision, AdmissionStrategy};
use crate::admission_review::AdmissionRequest;

/// Accepts every request. Handy for smoke tests and as a safe default when
/// no real strategy has been wired in.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl AdmissionStrategy for AllowAll {
    fn admit(&self, request: &AdmissionRequest) -> Result<AdmissionDecision> {
        debug!(request_uid = request.uid.as_str(), "allowing request");
        Ok(AdmissionDecision::allow())
    }
}
