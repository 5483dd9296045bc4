//! Error types for the authorization flow, credential queries, and the
//! configuration store.
//!
//! Every failure is a typed result; nothing is retried internally. The
//! variants split along recovery lines: precondition violations (programmer
//! error), protocol violations (restart the flow), transport failures
//! (retry the whole flow), decode failures (server returned garbage), and
//! credential-state failures (query-time only).

use thiserror::Error;

/// Error type for authorization flow operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// Session used before `set_up_configuration` (or a persisted restore)
    #[error("Session is not configured; call set_up_configuration before starting a flow")]
    NotConfigured,

    /// Callback URL did not parse or is missing `code`/`state`
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// State parameter mismatch (CSRF attack detected)
    #[error("State mismatch (CSRF): expected {expected}, received {received}")]
    StateMismatch {
        /// State issued by the last `begin_authorization`
        expected: String,
        /// State carried by the rejected callback
        received: String,
    },

    /// HTTP transport failed before a response body was read
    #[error("Token request failed: {0}")]
    Server(#[from] reqwest::Error),

    /// Token endpoint returned an empty body
    #[error("Token endpoint returned no data")]
    NoData,

    /// Response body did not decode as a token response
    #[error("Token response could not be decoded: {0}")]
    NoDecode(String),

    /// PKCE verifier or challenge generation failed
    #[error("PKCE generation error: {0}")]
    Pkce(String),

    /// Configuration persistence failed
    #[error("Configuration store error: {0}")]
    Store(#[from] StoreError),
}

/// Error type for credential queries
///
/// Pure query-time failures with no side effects; callers use them to decide
/// whether to re-initiate authorization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// No token exchange has ever succeeded for this session
    #[error("No credentials available")]
    NoCredentials,

    /// The stored credential is past `issued_at + expires_in`
    #[error("Credentials are expired")]
    ExpiredCredentials,
}

/// Error type for the injected key-value configuration store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected the operation
    #[error("Configuration store access failed: {0}")]
    AccessFailed(String),

    /// The configuration record could not be encoded or decoded
    #[error("Configuration record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    //! Unit tests for error.
    use super::*;

    /// Validates `AuthError` behavior for the display formatting scenario.
    ///
    /// Assertions:
    /// - Ensures the state mismatch message carries both state values.
    /// - Ensures the not-configured message names the setup call.
    #[test]
    fn test_auth_error_display() {
        let err = AuthError::StateMismatch {
            expected: "expected-state".to_string(),
            received: "forged-state".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("expected-state"));
        assert!(message.contains("forged-state"));

        let message = AuthError::NotConfigured.to_string();
        assert!(message.contains("set_up_configuration"));
    }

    /// Validates `CredentialError` behavior for the variant distinction
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `CredentialError::NoCredentials` differs from
    ///   `CredentialError::ExpiredCredentials`.
    #[test]
    fn test_credential_error_variants() {
        assert_ne!(CredentialError::NoCredentials, CredentialError::ExpiredCredentials);
        assert_eq!(CredentialError::NoCredentials.to_string(), "No credentials available");
    }

    /// Validates `StoreError` behavior for the serde conversion scenario.
    ///
    /// Assertions:
    /// - Ensures a `serde_json::Error` converts into
    ///   `StoreError::Serialization`.
    #[test]
    fn test_store_error_from_serde() {
        let parse_failure =
            serde_json::from_str::<serde_json::Value>("not json").expect_err("must fail");
        let err = StoreError::from(parse_failure);
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
