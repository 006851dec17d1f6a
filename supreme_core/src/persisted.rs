// Load-mutate-save collection bound to a single storage slot

use crate::storage_trait::{StorageBackend, StorageResult};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// An ordered list of items mirrored into one storage slot.
///
/// `load` never fails: an absent, unreadable or malformed slot yields an
/// empty collection. Mutations go through [`PersistedCollection::update`],
/// which writes the slot back before returning.
pub struct PersistedCollection<T, S> {
    store: Arc<S>,
    slot: String,
    items: Vec<T>,
}

impl<T, S> PersistedCollection<T, S>
where
    T: Serialize + DeserializeOwned,
    S: StorageBackend,
{
    pub fn load(store: Arc<S>, slot: &str) -> Self {
        let items = match store.load::<Vec<T>>(slot) {
            Ok(Some(items)) => {
                debug!("Loaded {} items from slot {}", items.len(), slot);
                items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Discarding unreadable slot {}: {}", slot, e);
                Vec::new()
            }
        };
        Self {
            store,
            slot: slot.to_string(),
            items,
        }
    }

    /// Overwrite the slot with the current items
    pub fn save(&self) -> StorageResult<()> {
        self.store.save(&self.slot, &self.items)
    }

    /// Apply `f` to the items, then persist. A failed write is logged and the
    /// in-memory state is kept.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let result = f(&mut self.items);
        if let Err(e) = self.save() {
            warn!("Failed to persist slot {}: {}", self.slot, e);
        }
        result
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
