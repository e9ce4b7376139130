use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::repository::traits::KeyValueStore;

/// Process-local store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<HashMap<String, String>>,
    read_only: bool,
    failing_key: Option<String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        self
    }

    /// Every `set` fails afterwards, like a full quota.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Only writes to `key` fail.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_key = Some(key.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.read_only || self.failing_key.as_deref() == Some(key) {
            return Err(anyhow!("store rejected write to {}", key));
        }
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
