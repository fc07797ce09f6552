//! Named key/value slots holding serialized JSON, the shell's only persisted state.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Host service for named persisted slots (JSON stored as text per key).
///
/// The browser adapter is `localStorage`, which is synchronous, so the contract is too.
pub trait StateSlotStore {
    /// Reads the raw JSON text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable.
    fn read_slot(&self, key: &str) -> Result<Option<String>, String>;

    /// Replaces the raw JSON text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable or rejects the write.
    fn write_slot(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable or rejects the delete.
    fn clear_slot(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Error)]
/// Typed failures of the slot helpers.
pub enum StorageError {
    /// The backing store failed.
    #[error("slot store failed: {0}")]
    Store(String),
    /// The slot holds text that does not decode into the expected shape.
    #[error("slot `{key}` holds malformed data: {source}")]
    Decode {
        /// Slot key.
        key: String,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The value could not be encoded.
    #[error("failed to encode slot `{key}`: {source}")]
    Encode {
        /// Slot key.
        key: String,
        /// Encoder failure.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op slot store for unsupported targets and baseline tests.
pub struct NoopSlotStore;

impl StateSlotStore for NoopSlotStore {
    fn read_slot(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn write_slot(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }

    fn clear_slot(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory slot store; clones share the same slots.
pub struct MemorySlotStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl StateSlotStore for MemorySlotStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn clear_slot(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed value through a [`StateSlotStore`] implementation.
///
/// # Errors
///
/// Returns [`StorageError::Store`] when the store fails and [`StorageError::Decode`] when the
/// stored text is not valid for `T`.
pub fn load_slot_with<S: StateSlotStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.read_slot(key).map_err(StorageError::Store)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|source| StorageError::Decode {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`StateSlotStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_slot_with<S: StateSlotStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.write_slot(key, &raw).map_err(StorageError::Store)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Geometry {
        left: i32,
        top: i32,
    }

    #[test]
    fn memory_store_clones_share_slots() {
        let store = MemorySlotStore::default();
        let other = store.clone();
        let store_obj: &dyn StateSlotStore = &store;

        store_obj.write_slot("windowState", "[]").expect("write");
        assert_eq!(
            other.read_slot("windowState").expect("read"),
            Some("[]".to_string())
        );
        other.clear_slot("windowState").expect("clear");
        assert_eq!(store_obj.read_slot("windowState").expect("read"), None);
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemorySlotStore::default();
        save_slot_with(&store, "geometry", &Geometry { left: 5, top: 9 }).expect("save");
        let loaded: Option<Geometry> = load_slot_with(&store, "geometry").expect("load");
        assert_eq!(loaded, Some(Geometry { left: 5, top: 9 }));
    }

    #[test]
    fn malformed_slot_reports_decode_error_with_key() {
        let store = MemorySlotStore::default();
        store.write_slot("geometry", "{not json").expect("write");
        let err = load_slot_with::<_, Geometry>(&store, "geometry").expect_err("decode fails");
        assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "geometry"));
        assert!(err.to_string().contains("geometry"));
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopSlotStore;
        store.write_slot("k", "{}").expect("write");
        assert_eq!(store.read_slot("k").expect("read"), None);
        store.clear_slot("k").expect("clear");
    }
}
