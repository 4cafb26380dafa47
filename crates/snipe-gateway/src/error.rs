//! Gateway error types and classification.

use thiserror::Error;

/// Exchange error code for "order does not exist" on queries.
const CODE_NO_SUCH_ORDER: i64 = -2013;
/// Exchange error code for cancel of an unknown order.
const CODE_UNKNOWN_ORDER: i64 = -2011;
/// Exchange error code for request-weight rate limiting.
const CODE_TOO_MANY_REQUESTS: i64 = -1003;
/// Exchange error code for an internal error where the outcome is unknown.
const CODE_DISCONNECTED: i64 = -1001;

/// Gateway error types.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),

    /// The request never produced an exchange response. When
    /// `ambiguous` is set the request may still have reached the
    /// matching engine (timed out or dropped mid-flight).
    #[error("Transport error: {message}")]
    Transport { message: String, ambiguous: bool },

    /// The exchange answered with an error body.
    #[error("Exchange rejected request: HTTP {status}, code {code}: {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("Response decode failed: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Classify a transport-level failure from the HTTP client.
    ///
    /// Timeouts are ambiguous: the request may have been delivered and
    /// the response lost. Connection failures never reached the
    /// exchange.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        GatewayError::Transport {
            message: err.to_string(),
            ambiguous: err.is_timeout() || err.is_body(),
        }
    }

    /// True for failures worth retrying: transport problems, rate
    /// limiting, server-side errors, and malformed responses
    /// (deserialization hiccups are treated as transient).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { .. } => true,
            GatewayError::Decode(_) => true,
            GatewayError::Api { status, code, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
                    || matches!(*code, CODE_TOO_MANY_REQUESTS | CODE_DISCONNECTED)
            }
            GatewayError::HttpClient(_) => false,
        }
    }

    /// True when the exchange reports that the referenced order does
    /// not exist. During cancellation this is the benign race: the
    /// order resolved naturally before the cancel arrived.
    #[must_use]
    pub fn is_unknown_order(&self) -> bool {
        matches!(
            self,
            GatewayError::Api { code, .. }
                if matches!(*code, CODE_NO_SUCH_ORDER | CODE_UNKNOWN_ORDER)
        )
    }

    /// True when a failed call may nevertheless have taken effect on
    /// the exchange. Callers placing orders must reconcile before
    /// retrying such a failure.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, GatewayError::Transport { ambiguous: true, .. })
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
