//! In-memory [`Repository`] implementation backed by [`DashMap`].
//!
//! Provides concurrent read/write access without external locking. Contents
//! live for the process lifetime only.

use dashmap::DashMap;

use crate::storage::repository::{Entity, Repository, RepositoryError, RepositoryKey};

/// In-memory repository backed by [`DashMap`].
///
/// Readers never block each other. Writers lock only the shard holding the
/// key, so two concurrent saves of the same key are serialized and neither is
/// lost, while saves of different keys usually proceed in parallel.
pub struct HashMapRepository<E: Entity> {
    entries: DashMap<E::Key, E>,
}

impl<E: Entity> HashMapRepository<E> {
    /// Creates a new, empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Creates a repository pre-populated with `items`.
    ///
    /// Later items overwrite earlier ones with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::BlankKey`] if any item has a blank key.
    pub fn seeded(items: impl IntoIterator<Item = E>) -> Result<Self, RepositoryError> {
        let repo = Self::new();
        for item in items {
            repo.save(item)?;
        }
        Ok(repo)
    }
}

impl<E: Entity> Default for HashMapRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> for HashMapRepository<E> {
    fn save(&self, entity: E) -> Result<Option<E>, RepositoryError> {
        let key = entity.key().clone();
        if key.is_blank() {
            return Err(RepositoryError::BlankKey { kind: E::KIND });
        }
        Ok(self.entries.insert(key, entity))
    }

    fn delete(&self, key: &E::Key) -> Option<E> {
        self.entries.remove(key).map(|(_, entity)| entity)
    }

    fn find_by_id(&self, key: &E::Key) -> Option<E> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn find_all(&self) -> Vec<E> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn contains_key(&self, key: &E::Key) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
