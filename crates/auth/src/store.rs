//! Durable configuration persistence
//!
//! The session can outlive the process that configured it: while the user is
//! off authenticating in an external browser, the application may be
//! suspended and relaunched. To survive that, the provider configuration is
//! written through an injected key-value capability under a fixed namespace
//! key and read back when the session is reconstructed.
//!
//! The capability itself stays behind the [`ConfigStore`] trait; the crate
//! ships a platform-keychain implementation behind the `keychain` feature and
//! an in-memory double in [`crate::testing`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::types::ProviderConfig;

/// Fixed namespace key the configuration record is stored under.
pub const CONFIG_NAMESPACE: &str = "oktaAuth.configuration";

/// Injected key-value capability for configuration persistence
///
/// Implementations are plain string maps; all operations are synchronous (the
/// network exchange is the session's only suspending operation). `get` for an
/// absent key is `Ok(None)`, not an error.
pub trait ConfigStore: Send + Sync {
    /// Store a value under a key, replacing any previous value
    ///
    /// # Errors
    /// Returns `StoreError::AccessFailed` if the backing store rejects the
    /// write
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Retrieve the value stored under a key, if any
    ///
    /// # Errors
    /// Returns `StoreError::AccessFailed` if the backing store cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Delete the value stored under a key (idempotent)
    ///
    /// # Errors
    /// Returns `StoreError::AccessFailed` if the backing store rejects the
    /// delete
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Persisted configuration record
///
/// Flat string-keyed JSON object; the field names are part of the stored
/// format and must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfiguration {
    /// Provider root URL, stored as its exact string form
    #[serde(rename = "baseURL")]
    pub base_url: String,

    /// OAuth client ID
    #[serde(rename = "clientID")]
    pub client_id: String,

    /// Registered redirect URI
    #[serde(rename = "redirectURI")]
    pub redirect_uri: String,
}

impl From<&ProviderConfig> for StoredConfiguration {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }
}

impl From<StoredConfiguration> for ProviderConfig {
    fn from(record: StoredConfiguration) -> Self {
        Self {
            base_url: record.base_url,
            client_id: record.client_id,
            redirect_uri: record.redirect_uri,
        }
    }
}

/// Write the configuration record under the namespace key.
pub(crate) fn save_configuration(
    store: &dyn ConfigStore,
    config: &ProviderConfig,
) -> Result<(), StoreError> {
    let record = StoredConfiguration::from(config);
    let json = serde_json::to_string(&record)?;
    store.set(CONFIG_NAMESPACE, &json)?;

    debug!(namespace = CONFIG_NAMESPACE, "Persisted provider configuration");

    Ok(())
}

/// Read the configuration record back, if one was ever saved.
///
/// Absence is not an error; a record that no longer decodes is.
pub(crate) fn load_configuration(
    store: &dyn ConfigStore,
) -> Result<Option<ProviderConfig>, StoreError> {
    let json = match store.get(CONFIG_NAMESPACE)? {
        Some(json) => json,
        None => return Ok(None),
    };

    let record: StoredConfiguration = serde_json::from_str(&json)?;

    debug!(namespace = CONFIG_NAMESPACE, "Restored provider configuration");

    Ok(Some(record.into()))
}

/// Configuration store backed by the platform keychain
///
/// Stores the record as a generic secret via the `keyring` crate: macOS
/// Keychain, Windows Credential Manager, or the Linux Secret Service API.
#[cfg(feature = "keychain")]
pub struct KeychainConfigStore {
    service_name: String,
}

#[cfg(feature = "keychain")]
impl KeychainConfigStore {
    /// Create a store scoped to a keychain service name
    ///
    /// # Arguments
    /// * `service_name` - Service identifier (e.g., "MyApp.oktaAuth")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, StoreError> {
        keyring::Entry::new(&self.service_name, key).map_err(|e| {
            StoreError::AccessFailed(format!("Failed to create keychain entry: {e}"))
        })
    }
}

#[cfg(feature = "keychain")]
impl ConfigStore for KeychainConfigStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!(service = %self.service_name, key = %key, "Storing record in keychain");

        self.entry(key)?.set_password(value).map_err(|e| {
            StoreError::AccessFailed(format!("Failed to store record for {key}: {e}"))
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                Err(StoreError::AccessFailed(format!("Failed to read record for {key}: {e}")))
            }
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                Err(StoreError::AccessFailed(format!("Failed to delete record for {key}: {e}")))
            }
        }
    }
}
