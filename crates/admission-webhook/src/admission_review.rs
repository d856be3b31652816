pub mod errors;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::strategy::AdmissionDecision;
use errors::{DecodeError, EncodeError};

pub const ADMISSION_REVIEW_API_VERSION: &str = "admission.k8s.io/v1";
pub const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";

/// Used when a strategy denies a request without saying why.
pub const DEFAULT_DENIAL_MESSAGE: &str = "request denied by the admission strategy";

/// The envelope exchanged with the Kubernetes API server, in both directions.
/// Inbound envelopes carry a `request`, outbound ones a `response`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<AdmissionResponse>,
}

impl Default for AdmissionReview {
    fn default() -> Self {
        AdmissionReview {
            api_version: Some(String::from(ADMISSION_REVIEW_API_VERSION)),
            kind: Some(String::from(ADMISSION_REVIEW_KIND)),
            request: None,
            response: None,
        }
    }
}

impl AdmissionReview {
    pub fn new_with_request(request: AdmissionRequest) -> Self {
        AdmissionReview {
            request: Some(request),
            ..Default::default()
        }
    }

    pub fn new_with_response(response: AdmissionResponse) -> Self {
        AdmissionReview {
            response: Some(response),
            ..Default::default()
        }
    }

    /// Consume the envelope and return the request it carries.
    pub fn into_request(self) -> Result<AdmissionRequest, DecodeError> {
        self.request.ok_or(DecodeError::MissingRequest)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

/// This models the admission/v1/AdmissionRequest object of Kubernetes.
///
/// Only `uid` is mandatory. The resource payloads (`object`, `oldObject`,
/// `options`) are kept as raw bytes: interpreting them is up to the
/// [`AdmissionStrategy`](crate::strategy::AdmissionStrategy).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<GroupVersionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<GroupVersionResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<k8s_openapi::api::authentication::v1::UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<RawObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_object: Option<RawObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<RawObject>,
}

impl AdmissionRequest {
    /// The serialized resource as submitted by the caller, empty when the
    /// request carries no object (e.g. DELETE operations).
    pub fn object_bytes(&self) -> &[u8] {
        self.object
            .as_ref()
            .map(RawObject::as_bytes)
            .unwrap_or_default()
    }
}

/// An embedded resource, stored exactly as it appeared on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawObject(Box<RawValue>);

impl RawObject {
    pub fn from_slice(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<Box<RawValue>>(raw).map(RawObject)
    }

    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::value::to_raw_value(value).map(RawObject)
    }

    pub fn get(&self) -> &str {
        self.0.get()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.get().as_bytes()
    }
}

impl PartialEq for RawObject {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

/// This models the admission/v1/AdmissionResponse object of Kubernetes
/// See https://pkg.go.dev/k8s.io/kubernetes/pkg/apis/admission#AdmissionResponse
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// UID is an identifier for the individual request/response.
    /// This must be copied over from the corresponding AdmissionRequest.
    pub uid: String,

    /// Allowed indicates whether or not the admission request was permitted.
    pub allowed: bool,

    /// Status contains extra details into why an admission request was denied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AdmissionResponseStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionResponseStatus {
    /// A human-readable description of the status of this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Suggested HTTP return code for this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl AdmissionResponse {
    pub fn from_decision(uid: String, decision: AdmissionDecision) -> AdmissionResponse {
        let message = decision.message.filter(|message| !message.is_empty());
        let message = match message {
            None if !decision.allowed => Some(DEFAULT_DENIAL_MESSAGE.to_owned()),
            message => message,
        };

        AdmissionResponse {
            uid,
            allowed: decision.allowed,
            status: message.map(|message| AdmissionResponseStatus {
                message: Some(message),
                code: None,
            }),
        }
    }

    pub fn reject(uid: String, message: String, code: u16) -> AdmissionResponse {
        AdmissionResponse {
            uid,
            allowed: false,
            status: Some(AdmissionResponseStatus {
                message: Some(message),
                code: Some(code),
            }),
        }
    }
}

pub fn decode(raw: &[u8]) -> Result<AdmissionReview, DecodeError> {
    Ok(serde_json::from_slice(raw)?)
}

pub fn encode(review: &AdmissionReview) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(review)?)
}
