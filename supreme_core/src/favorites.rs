// Favorite product ids

use crate::persisted::PersistedCollection;
use crate::storage_trait::{keys, StorageBackend};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

/// What a favorites mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteChange {
    Added,
    Removed,
}

impl FavoriteChange {
    /// Toast text for this change
    pub fn message(&self) -> &'static str {
        match self {
            FavoriteChange::Added => "Produto adicionado aos favoritos!",
            FavoriteChange::Removed => "Produto removido dos favoritos",
        }
    }
}

/// Ordered, duplicate-free set of favorited product ids, persisted in the
/// `favorites` slot.
pub struct Favorites<S> {
    ids: PersistedCollection<String, S>,
}

impl<S: StorageBackend> Favorites<S> {
    pub fn load(store: Arc<S>) -> Self {
        let mut ids = PersistedCollection::load(store, keys::FAVORITES);
        if has_duplicates(ids.items()) {
            ids.update(|ids: &mut Vec<String>| {
                let mut seen = std::collections::HashSet::new();
                ids.retain(|id| seen.insert(id.clone()));
            });
        }
        Self { ids }
    }

    /// Flip membership of `id`
    pub fn toggle(&mut self, id: &str) -> FavoriteChange {
        let change = if self.is_favorite(id) {
            self.ids.update(|ids| ids.retain(|f| f != id));
            FavoriteChange::Removed
        } else {
            self.ids.update(|ids| ids.push(id.to_string()));
            FavoriteChange::Added
        };
        debug!("Favorites: {} {:?}", id, change);
        change
    }

    /// Add `id` if absent. Returns false when it was already a favorite.
    pub fn add(&mut self, id: &str) -> bool {
        if self.is_favorite(id) {
            return false;
        }
        self.toggle(id);
        true
    }

    /// Remove `id` if present
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.is_favorite(id) {
            return false;
        }
        self.toggle(id);
        true
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.items().iter().any(|f| f == id)
    }

    /// Favorited ids in insertion order
    pub fn list(&self) -> &[String] {
        self.ids.items()
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.update(|ids| ids.clear());
    }

    /// Text shown when the favorites counter is clicked
    pub fn summary_message(&self) -> String {
        match self.count() {
            0 => "Você ainda não tem produtos favoritos".to_string(),
            n => format!("Você tem {} produto(s) favorito(s)", n),
        }
    }
}

fn has_duplicates(ids: &[String]) -> bool {
    let mut seen = std::collections::HashSet::new();
    ids.iter().any(|id| !seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_trait::MemoryStorage;

    fn favorites() -> (Arc<MemoryStorage>, Favorites<MemoryStorage>) {
        let store = Arc::new(MemoryStorage::new());
        (store.clone(), Favorites::load(store))
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let (_, mut favs) = favorites();
        favs.toggle("whey-2");
        let before = favs.list().to_vec();

        assert_eq!(favs.toggle("pre-1"), FavoriteChange::Added);
        assert_eq!(favs.toggle("pre-1"), FavoriteChange::Removed);
        assert_eq!(favs.list(), before.as_slice());

        assert_eq!(favs.toggle("whey-2"), FavoriteChange::Removed);
        assert_eq!(favs.toggle("whey-2"), FavoriteChange::Added);
        assert!(favs.is_favorite("whey-2"));
    }

    #[test]
    fn test_insertion_order_and_no_duplicates() {
        let (_, mut favs) = favorites();
        assert!(favs.add("c"));
        assert!(favs.add("a"));
        assert!(!favs.add("c"));
        assert_eq!(favs.list(), ["c".to_string(), "a".to_string()]);
        assert_eq!(favs.count(), 2);
    }

    #[test]
    fn test_persisted_on_every_mutation() {
        let (store, mut favs) = favorites();
        favs.toggle("whey-1");
        favs.toggle("creatina-2");
        assert_eq!(
            store.get_raw(keys::FAVORITES).unwrap().as_deref(),
            Some(r#"["whey-1","creatina-2"]"#)
        );
        favs.remove("whey-1");
        let reloaded = Favorites::load(store.clone());
        assert_eq!(reloaded.list(), ["creatina-2".to_string()]);

        favs.clear();
        assert_eq!(store.get_raw(keys::FAVORITES).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_duplicate_ids_in_storage_are_collapsed() {
        let store = Arc::new(MemoryStorage::new());
        store.set_raw(keys::FAVORITES, r#"["a","b","a"]"#).unwrap();
        let favs = Favorites::load(store);
        assert_eq!(favs.list(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_summary_message() {
        let (_, mut favs) = favorites();
        assert_eq!(favs.summary_message(), "Você ainda não tem produtos favoritos");
        favs.toggle("x");
        assert_eq!(favs.summary_message(), "Você tem 1 produto(s) favorito(s)");
    }
}
