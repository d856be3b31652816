use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot decode AdmissionReview: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no Request object defined inside AdmissionReview object")]
    MissingRequest,
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot encode AdmissionReview: {0}")]
    Json(#[from] serde_json::Error),
}
