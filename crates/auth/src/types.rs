//! Provider configuration, wire types, and the issued credential
//!
//! Defines the data the flow controller operates on: the Okta provider
//! configuration with its fixed endpoint paths, the token endpoint's response
//! schema, and the credential the session keeps once an exchange succeeds.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Okta provider configuration for one authorization session
///
/// The endpoint paths under the base URL are fixed, provider-specific
/// conventions and are appended verbatim; the base URL is kept exactly as the
/// caller supplied it (no normalization), so it should carry the scheme and
/// host without a trailing slash, e.g. `https://dev-123456.okta.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider root, e.g. "https://dev-123456.okta.com"
    pub base_url: String,

    /// OAuth client ID issued by the provider
    pub client_id: String,

    /// Redirect URI registered for the application (custom scheme or loopback)
    pub redirect_uri: String,
}

impl ProviderConfig {
    /// Create a new provider configuration
    #[must_use]
    pub fn new(base_url: String, client_id: String, redirect_uri: String) -> Self {
        Self { base_url, client_id, redirect_uri }
    }

    /// Get the authorization endpoint URL
    ///
    /// Always `{base_url}/oauth2/default/v1/authorize`; the suffix must be
    /// reproduced exactly for wire compatibility.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!("{}/oauth2/default/v1/authorize", self.base_url)
    }

    /// Get the token endpoint URL
    ///
    /// Always `{base_url}/oauth2/default/v1/token`.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/default/v1/token", self.base_url)
    }
}

/// Token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749). Every field is
/// required; a body missing any of them is a decode failure, not a partial
/// credential.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub id_token: String,
    pub expires_in: i64,
}

/// Tokens issued by a successful authorization code exchange
///
/// Created only by a successful exchange and replaced wholesale by the next
/// one; never partially mutated. `issued_at` is stamped locally at exchange
/// time because the server reports only a relative lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer" for OAuth 2.0)
    pub token_type: String,

    /// Granted scopes (space-separated)
    pub scope: String,

    /// ID token (JWT) carrying user claims (OpenID Connect)
    pub id_token: String,

    /// Access token lifetime in seconds, as returned by the server
    pub expires_in: i64,

    /// Wall-clock time of the successful exchange (UTC)
    pub issued_at: DateTime<Utc>,

    /// Subject identifier from the ID token's `uid` claim, when it decodes
    pub user_id: Option<String>,
}

impl Credential {
    /// Build a credential from a token response, stamping `issued_at` with the
    /// current wall-clock time.
    pub(crate) fn issue(response: TokenResponse, user_id: Option<String>) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            scope: response.scope,
            id_token: response.id_token,
            expires_in: response.expires_in,
            issued_at: Utc::now(),
            user_id,
        }
    }

    /// Absolute expiration timestamp (UTC)
    ///
    /// `issued_at + expires_in` seconds. With `expires_in = 0` the credential
    /// expires the moment it is issued.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + chrono::Duration::seconds(self.expires_in)
    }

    /// Check whether the credential is past its absolute expiry
    ///
    /// Strict comparison: expired once `now > issued_at + expires_in`.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at()
    }

    /// Get seconds until expiration (negative once expired)
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at() - Utc::now()).num_seconds()
    }
}
