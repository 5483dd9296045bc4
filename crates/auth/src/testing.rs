//! In-memory test doubles
//!
//! Provides a [`ConfigStore`] implementation that keeps records in process
//! memory, avoiding platform keychain prompts in tests. Available to
//! downstream crates through the `test-utils` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::store::ConfigStore;

/// In-memory configuration store for tests
///
/// # Examples
///
/// ```
/// use okta_auth::testing::MemoryConfigStore;
/// use okta_auth::ConfigStore;
///
/// let store = MemoryConfigStore::new();
/// store.set("key1", "value1").unwrap();
///
/// let value = store.get("key1").unwrap();
/// assert_eq!(value, Some("value1".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryConfigStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key exists
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        // SAFETY: Mutex poisoning is acceptable in test doubles
        self.entries.lock().unwrap().contains_key(key)
    }

    /// Get the number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        // SAFETY: Mutex poisoning is acceptable in test doubles
        self.entries.lock().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        // SAFETY: Mutex poisoning is acceptable in test doubles
        self.entries.lock().unwrap().is_empty()
    }

    /// Clear all records
    pub fn clear(&self) {
        // SAFETY: Mutex poisoning is acceptable in test doubles
        self.entries.lock().unwrap().clear();
    }
}

impl ConfigStore for MemoryConfigStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // SAFETY: Mutex poisoning is acceptable in test doubles
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        // SAFETY: Mutex poisoning is acceptable in test doubles
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        // SAFETY: Mutex poisoning is acceptable in test doubles
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
