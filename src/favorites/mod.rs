//! Local favorite store: a thin key-set abstraction over durable client
//! storage. The favorite set outlives a single map session.

use crate::core::listing::ListingId;
use crate::Result;
use fxhash::FxHashMap;

/// Storage key holding the serialized favorite identifier array.
pub const FAVORITES_STORAGE_KEY: &str = "propertyFavorites";

/// String-keyed durable client storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-memory `KeyValueStore`, used in tests and as a session-only fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Set of favorited listing identifiers, persisted as a JSON array under
/// [`FAVORITES_STORAGE_KEY`].
///
/// Persistence writes are best-effort: a failed write is logged and the
/// in-memory set stays authoritative for the session.
pub struct FavoriteStore<S: KeyValueStore> {
    store: S,
    ids: Vec<ListingId>,
}

impl<S: KeyValueStore> FavoriteStore<S> {
    /// Loads the favorite set from storage. A malformed or missing entry
    /// starts an empty set.
    pub fn load(store: S) -> Result<Self> {
        let ids = match store.get(FAVORITES_STORAGE_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(ids) => ids,
                Err(err) => {
                    log::warn!("malformed favorites entry, starting empty: {}", err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(Self { store, ids })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    /// Adds an identifier if not already present.
    pub fn add(&mut self, id: ListingId) {
        if !self.contains(&id) {
            self.ids.push(id);
            self.persist();
        }
    }

    /// Removes an identifier if present.
    pub fn remove(&mut self, id: &str) {
        let before = self.ids.len();
        self.ids.retain(|fav| fav != id);
        if self.ids.len() != before {
            self.persist();
        }
    }

    /// Flips membership; returns the new state (true = now a favorite).
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id.to_string());
            true
        }
    }

    /// Favorited identifiers in insertion order.
    pub fn ids(&self) -> &[ListingId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.ids) {
            Ok(serialized) => serialized,
            Err(err) => {
                log::warn!("failed to serialize favorites: {}", err);
                return;
            }
        };
        if let Err(err) = self.store.set(FAVORITES_STORAGE_KEY, &serialized) {
            log::warn!("failed to persist favorites: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncError;

    #[test]
    fn test_load_empty() {
        let favorites = FavoriteStore::load(MemoryStore::new()).unwrap();
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_load_malformed_entry_starts_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_STORAGE_KEY, "not json").unwrap();

        let favorites = FavoriteStore::load(store).unwrap();
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut favorites = FavoriteStore::load(MemoryStore::new()).unwrap();

        assert!(favorites.toggle("a"));
        assert!(favorites.contains("a"));
        assert!(!favorites.toggle("a"));
        assert!(!favorites.contains("a"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut favorites = FavoriteStore::load(MemoryStore::new()).unwrap();
        favorites.add("a".to_string());
        favorites.add("a".to_string());
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = MemoryStore::new();
        {
            let mut favorites = FavoriteStore::load(&mut store).unwrap();
            favorites.add("a".to_string());
            favorites.add("b".to_string());
        }

        let reloaded = FavoriteStore::load(&mut store).unwrap();
        assert_eq!(reloaded.ids(), &["a".to_string(), "b".to_string()]);
    }

    /// Store that fails every write; failures must not propagate.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(SyncError::Storage("disk full".to_string()).into())
        }
    }

    #[test]
    fn test_write_failure_is_best_effort() {
        let mut favorites = FavoriteStore::load(BrokenStore).unwrap();
        assert!(favorites.toggle("a"));
        assert!(favorites.contains("a"));
    }
}
