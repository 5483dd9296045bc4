//! Client-side OAuth 2.0 Authorization Code flow with PKCE for Okta.
//!
//! Native applications cannot hold a client secret, so the flow binds the
//! authorization code to a per-session PKCE verifier instead: the session
//! builds the browser URL carrying the verifier's SHA-256 challenge, validates
//! the provider's redirect callback against an anti-forgery state token, and
//! exchanges the code (plus the verifier) for tokens at the token endpoint.
//! The resulting credential is held by the session until it expires or the
//! next exchange replaces it.
//!
//! # Quick start
//!
//! ```no_run
//! use okta_auth::{AuthSession, ProviderConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::new(
//!     "https://dev-123456.okta.com".to_string(),
//!     "0oa1client".to_string(),
//!     "com.example.app:/callback".to_string(),
//! );
//! let mut session = AuthSession::new(config)?;
//!
//! // Hand this URL to the system browser.
//! let url = session.begin_authorization()?;
//!
//! // The provider redirects back to the registered URI; feed it in whole.
//! # let callback = "com.example.app:/callback?code=...&state=...";
//! session.complete_authorization(callback).await?;
//! let credential = session.current_credential()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Persistence
//!
//! The application may be suspended while the user authenticates in the
//! external browser. Attach a [`ConfigStore`] via
//! [`AuthSession::with_store`] and the provider configuration survives the
//! restart; the `keychain` feature ships a platform-keychain store.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod claims;
pub mod error;
pub mod pkce;
pub mod session;
pub mod store;
pub mod types;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export the primary surface for convenience
// ------------------------
pub use error::{AuthError, CredentialError, StoreError};
pub use pkce::PkcePair;
pub use session::AuthSession;
#[cfg(feature = "keychain")]
pub use store::KeychainConfigStore;
pub use store::{ConfigStore, StoredConfiguration, CONFIG_NAMESPACE};
pub use types::{Credential, ProviderConfig, TokenResponse};
