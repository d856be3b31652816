mod allow_all;
pub mod errors;

pub use allow_all::AllowAll;

use crate::admission_review::AdmissionRequest;
use errors::Result;

/// The verdict of an [`AdmissionStrategy`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdmissionDecision {
    pub allowed: bool,
    /// Human-readable explanation, shown to the user when the request is
    /// denied.
    pub message: Option<String>,
}

impl AdmissionDecision {
    pub fn allow() -> Self {
        AdmissionDecision {
            allowed: true,
            message: None,
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        AdmissionDecision {
            allowed: false,
            message: Some(message.into()),
        }
    }
}

/// Decides whether an admission request is allowed.
///
/// The request object is handed over as raw bytes, implementations decode
/// it with whatever codec fits the resource they validate. A payload that
/// is missing or cannot be decoded must be answered with a denial, errors
/// are reserved for failures of the strategy itself.
///
/// Strategies are shared by all the in-flight requests and are invoked from
/// the blocking thread pool, hence they can perform blocking calls but must
/// not keep mutable state around.
#[cfg_attr(test, mockall::automock)]
pub trait AdmissionStrategy: Send + Sync {
    fn admit(&self, request: &AdmissionRequest) -> Result<AdmissionDecision>;
}

impl<F> AdmissionStrategy for F
where
    F: Fn(&AdmissionRequest) -> Result<AdmissionDecision> + Send + Sync,
{
    fn admit(&self, request: &AdmissionRequest) -> Result<AdmissionDecision> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::StrategyError;

    #[test]
    fn closures_are_strategies() {
        let reserved_names = ["kube-system", "default"];
        let strategy = move |request: &AdmissionRequest| -> Result<AdmissionDecision> {
            match request.name.as_deref() {
                Some(name) if reserved_names.contains(&name) => {
                    Ok(AdmissionDecision::deny(format!("{name} is reserved")))
                }
                Some(_) => Ok(AdmissionDecision::allow()),
                None => Err(StrategyError::Internal("request has no name".to_owned())),
            }
        };

        let mut request = AdmissionRequest {
            uid: "u1".to_owned(),
            name: Some("default".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            strategy.admit(&request).unwrap(),
            AdmissionDecision::deny("default is reserved")
        );

        request.name = Some("my-app".to_owned());
        assert!(strategy.admit(&request).unwrap().allowed);

        request.name = None;
        assert_eq!(
            strategy.admit(&request).unwrap_err().to_string(),
            "request has no name"
        );
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err: StrategyError = anyhow::anyhow!("cannot reach the backend").into();

        assert_eq!(err.to_string(), "cannot reach the backend");
    }
}
