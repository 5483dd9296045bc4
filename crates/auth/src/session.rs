//! OAuth 2.0 Authorization Code + PKCE flow controller
//!
//! Owns all state for one authorization flow and the resulting credential:
//! the provider configuration, the session-lifetime PKCE pair, the state
//! token bound to the in-flight attempt, and the credential once an exchange
//! succeeds. The browser navigation itself is the caller's job; this module
//! only builds the URL it should open and consumes the callback it comes
//! back with.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::claims;
use crate::error::{AuthError, CredentialError};
use crate::pkce::{self, PkcePair};
use crate::store::{self, ConfigStore, CONFIG_NAMESPACE};
use crate::types::{Credential, ProviderConfig, TokenResponse};

/// Controller for one authorization flow and its credential
///
/// One attempt moves through `Idle → AwaitingCallback` (after
/// [`begin_authorization`](Self::begin_authorization)) `→ Exchanging` (a
/// valid callback arrived) `→ Completed | Failed`. Calling
/// `begin_authorization` again at any point starts a fresh attempt with a new
/// state token; the PKCE verifier is generated once per session and reused
/// across attempts.
///
/// # Concurrency
///
/// A session is a single logical flow and carries no internal locking: the
/// mutating operations take `&mut self`, so concurrent use of one instance
/// must be serialized by the caller (wrap the session in a lock if it is
/// shared). The token exchange is the only suspending operation.
///
/// # Examples
///
/// ```no_run
/// use okta_auth::{AuthSession, ProviderConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ProviderConfig::new(
///     "https://dev-123456.okta.com".to_string(),
///     "0oa1client".to_string(),
///     "com.example.app:/callback".to_string(),
/// );
/// let mut session = AuthSession::new(config)?;
///
/// let url = session.begin_authorization()?;
/// // Open `url` in the system browser; the provider redirects back to the
/// // registered URI once the user has authenticated.
///
/// # let callback_url = "com.example.app:/callback?code=...&state=...";
/// session.complete_authorization(callback_url).await?;
/// let credential = session.current_credential()?;
/// println!("signed in as {:?}", credential.user_id);
/// # Ok(())
/// # }
/// ```
pub struct AuthSession {
    config: Option<ProviderConfig>,
    store: Option<Arc<dyn ConfigStore>>,
    http: Client,
    pkce: PkcePair,
    current_state: Option<String>,
    credential: Option<Credential>,
}

impl AuthSession {
    /// Create a configured session with no persistence
    ///
    /// # Arguments
    /// * `config` - Provider configuration (base URL, client ID, redirect URI)
    ///
    /// # Errors
    /// Returns `AuthError::Pkce` if verifier generation fails (extremely rare)
    pub fn new(config: ProviderConfig) -> Result<Self, AuthError> {
        Self::assemble(Some(config), None)
    }

    /// Create an unconfigured session
    ///
    /// Every flow operation returns `AuthError::NotConfigured` until
    /// [`set_up_configuration`](Self::set_up_configuration) is called.
    ///
    /// # Errors
    /// Returns `AuthError::Pkce` if verifier generation fails (extremely rare)
    pub fn unconfigured() -> Result<Self, AuthError> {
        Self::assemble(None, None)
    }

    /// Create a session attached to a configuration store
    ///
    /// If the store holds a previously persisted configuration record, the
    /// session comes up already configured; otherwise it starts unconfigured
    /// and [`set_up_configuration`](Self::set_up_configuration) will persist
    /// through the same store.
    ///
    /// # Errors
    /// Returns `AuthError::Store` if the store cannot be read or holds a
    /// record that no longer decodes, `AuthError::Pkce` if verifier
    /// generation fails
    pub fn with_store(store: Arc<dyn ConfigStore>) -> Result<Self, AuthError> {
        let config = store::load_configuration(store.as_ref())?;
        Self::assemble(config, Some(store))
    }

    fn assemble(
        config: Option<ProviderConfig>,
        store: Option<Arc<dyn ConfigStore>>,
    ) -> Result<Self, AuthError> {
        let pkce = PkcePair::generate().map_err(AuthError::Pkce)?;

        Ok(Self {
            config,
            store,
            http: Client::new(),
            pkce,
            current_state: None,
            credential: None,
        })
    }

    /// Set a request timeout on the HTTP transport
    ///
    /// The session imposes no timeout by default, so an unresponsive token
    /// endpoint can stall an exchange indefinitely; hosts that care should
    /// set one.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http =
            Client::builder().timeout(timeout).build().unwrap_or_else(|_| Client::new());
        self
    }

    /// Configure the session, persisting the values when a store is attached
    ///
    /// Persistence happens first: if the store write fails the session is
    /// left unchanged. Reconfiguring an already configured session replaces
    /// the configuration but keeps any credential and in-flight attempt.
    ///
    /// # Arguments
    /// * `base_url` - Provider root, e.g. "https://dev-123456.okta.com"
    /// * `client_id` - OAuth client ID issued by the provider
    /// * `redirect_uri` - Redirect URI registered for the application
    ///
    /// # Errors
    /// Returns `AuthError::Store` if the attached store rejects the write
    pub fn set_up_configuration(
        &mut self,
        base_url: String,
        client_id: String,
        redirect_uri: String,
    ) -> Result<(), AuthError> {
        let config = ProviderConfig::new(base_url, client_id, redirect_uri);

        if let Some(store) = &self.store {
            store::save_configuration(store.as_ref(), &config)?;
        }

        debug!(base_url = %config.base_url, client_id = %config.client_id, "Configured session");
        self.config = Some(config);

        Ok(())
    }

    /// Check whether the session has been configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Get the active provider configuration, if any
    #[must_use]
    pub fn config(&self) -> Option<&ProviderConfig> {
        self.config.as_ref()
    }

    /// Start an authorization attempt and build the browser URL
    ///
    /// Generates a fresh state token (discarding any unconsumed prior
    /// attempt) and builds the authorization endpoint URL carrying the PKCE
    /// challenge. The caller hands the URL to an external browser; nothing
    /// here performs the navigation.
    ///
    /// # Returns
    /// The GET URL for the provider's authorization page
    ///
    /// # Errors
    /// Returns `AuthError::NotConfigured` before configuration,
    /// `AuthError::Pkce` if state generation fails
    pub fn begin_authorization(&mut self) -> Result<String, AuthError> {
        let config = self.config.as_ref().ok_or(AuthError::NotConfigured)?;

        let state = pkce::generate_state().map_err(AuthError::Pkce)?;

        let params = [
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("scope", "openid"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("state", state.as_str()),
            ("code_challenge_method", self.pkce.challenge_method()),
            ("code_challenge", self.pkce.challenge.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", config.authorize_url(), query_string);

        debug!(state = %state, "Built authorization request");
        self.current_state = Some(state);

        Ok(url)
    }

    /// Consume the provider's redirect callback and exchange the code
    ///
    /// Validates the callback against the in-flight attempt, then posts the
    /// authorization code and the session verifier to the token endpoint and
    /// stores the resulting credential. Resolves exactly once per call, after
    /// the transport operation concludes; nothing is retried.
    ///
    /// A rejected callback leaves the in-flight attempt untouched, so a
    /// forged or mangled redirect cannot cancel the genuine one that may
    /// still arrive. Failure to decode the identity token's payload is not
    /// fatal: the credential is stored with `user_id` unset.
    ///
    /// # Arguments
    /// * `callback_url` - The full redirect URI the provider invoked,
    ///   including its query string
    ///
    /// # Errors
    /// Returns `AuthError::NotConfigured` before configuration;
    /// `AuthError::MalformedCallback` when `code` or `state` is missing;
    /// `AuthError::StateMismatch` when the callback does not belong to the
    /// current attempt (the CSRF defense; no network call is made);
    /// `AuthError::Server`, `AuthError::NoData`, or `AuthError::NoDecode`
    /// when the exchange itself fails
    pub async fn complete_authorization(&mut self, callback_url: &str) -> Result<(), AuthError> {
        let config = self.config.as_ref().ok_or(AuthError::NotConfigured)?;

        let (code, returned_state) = parse_callback(callback_url)?;

        // CSRF defense: the callback must echo the state of the current
        // attempt. Before any begin_authorization the expected state is
        // empty and everything mismatches.
        let expected = self.current_state.as_deref().unwrap_or_default();
        if !pkce::validate_state(expected, &returned_state) {
            warn!(received = %returned_state, "Rejected callback with mismatched state");
            return Err(AuthError::StateMismatch {
                expected: expected.to_string(),
                received: returned_state,
            });
        }

        let request_body = [
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code", code.as_str()),
            ("code_verifier", self.pkce.verifier.as_str()),
        ];

        debug!("Sending authorization code exchange request");

        let response = self
            .http
            .post(config.token_url())
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .form(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if body.is_empty() {
            return Err(AuthError::NoData);
        }

        let token_response: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| AuthError::NoDecode(format!("{e} (HTTP {status})")))?;

        let user_id = match claims::extract_uid(&token_response.id_token) {
            Ok(uid) => Some(uid),
            Err(reason) => {
                debug!(%reason, "Identity token not decoded; storing credential without user id");
                None
            }
        };

        let credential = Credential::issue(token_response, user_id);
        debug!(
            expires_in = credential.expires_in,
            has_user_id = credential.user_id.is_some(),
            "Completed authorization code exchange"
        );
        self.credential = Some(credential);

        Ok(())
    }

    /// Get the credential from the last successful exchange
    ///
    /// Read-only: no side effects and no implicit refresh.
    ///
    /// # Errors
    /// Returns `CredentialError::NoCredentials` if no exchange has ever
    /// succeeded, `CredentialError::ExpiredCredentials` once the credential
    /// is past `issued_at + expires_in`
    pub fn current_credential(&self) -> Result<Credential, CredentialError> {
        match &self.credential {
            Some(credential) if credential.is_expired() => {
                Err(CredentialError::ExpiredCredentials)
            }
            Some(credential) => Ok(credential.clone()),
            None => Err(CredentialError::NoCredentials),
        }
    }

    /// Check whether an unexpired credential is held
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.current_credential().is_ok()
    }

    /// Drop the credential and any in-flight attempt
    ///
    /// The configuration (and its persisted record) is untouched; the
    /// session can begin a new authorization immediately.
    pub fn sign_out(&mut self) {
        self.current_state = None;
        self.credential = None;
        debug!("Cleared credential and pending authorization state");
    }

    /// Delete the persisted configuration record, if a store is attached
    ///
    /// The in-memory configuration stays active; only the durable copy is
    /// removed, so the next process start will come up unconfigured.
    ///
    /// # Errors
    /// Returns `AuthError::Store` if the store rejects the delete
    pub fn clear_saved_configuration(&self) -> Result<(), AuthError> {
        if let Some(store) = &self.store {
            store.delete(CONFIG_NAMESPACE).map_err(AuthError::Store)?;
            debug!(namespace = CONFIG_NAMESPACE, "Deleted persisted configuration");
        }
        Ok(())
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The verifier and tokens stay out of Debug output.
        f.debug_struct("AuthSession")
            .field("config", &self.config)
            .field("has_store", &self.store.is_some())
            .field("in_flight", &self.current_state.is_some())
            .field("has_credential", &self.credential.is_some())
            .finish_non_exhaustive()
    }
}

/// Pull `code` and `state` out of a callback URL.
///
/// Provider error parameters are not interpreted; a callback carrying only
/// `error`/`error_description` fails here as missing `code`.
fn parse_callback(callback_url: &str) -> Result<(String, String), AuthError> {
    let url = Url::parse(callback_url)
        .map_err(|e| AuthError::MalformedCallback(format!("callback URL did not parse: {e}")))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, state) {
        (Some(code), Some(state)) => Ok((code, state)),
        (None, _) => Err(AuthError::MalformedCallback("no code parameter".to_string())),
        (_, None) => Err(AuthError::MalformedCallback("no state parameter".to_string())),
    }
}
