use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 401 or otherwise invalid session. The session has already been torn
    /// down when this is returned; callers must stop processing.
    #[error("Session expired or invalid. Please login again.")]
    AuthExpired,
    /// Non-2xx answer. Carries the backend `detail` verbatim when present.
    #[error("{0}")]
    Rejected(String),
    #[error("network error")]
    Network,
    /// The owning view went away and aborted the request.
    #[error("request cancelled")]
    Cancelled,
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApiError::AuthExpired | ApiError::Cancelled)
    }

    /// Text for an inline error region.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected(detail) => detail.clone(),
            ApiError::Network | ApiError::Decode(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            _ => ApiError::Network,
        }
    }
}

/// Client-side input problems. These block submission and never reach the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter the Reporting Date.")]
    MissingReportingDate,
    #[error("Please select a forecast anchor date.")]
    MissingAnchorDate,
    #[error("Email and password are required.")]
    MissingCredentials,
    #[error("Please select a file to upload.")]
    NoFileSelected,
    #[error("Please select currency and at least one file.")]
    IncompleteBulkUpload,
    #[error("'{0}' is not a valid number.")]
    MalformedNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_is_shown_verbatim() {
        let err = ApiError::Rejected("Incorrect email or password".to_string());
        assert_eq!(err.user_message(), "Incorrect email or password");
        assert_eq!(err.to_string(), "Incorrect email or password");
    }

    #[test]
    fn transport_failures_get_a_generic_message() {
        assert_eq!(
            ApiError::Network.user_message(),
            "An unexpected error occurred. Please try again."
        );
        assert_eq!(ApiError::Network.to_string(), "network error");
        assert!(!ApiError::Network.is_terminal());
        assert!(ApiError::AuthExpired.is_terminal());
        assert!(ApiError::Cancelled.is_terminal());
    }
}
