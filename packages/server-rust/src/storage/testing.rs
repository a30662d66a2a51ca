//! Repository wrappers for timing-sensitive tests.

use std::time::Duration;

use crate::storage::engines::HashMapRepository;
use crate::storage::repository::{Entity, Repository, RepositoryError};

/// Delegates to a [`HashMapRepository`] but blocks the calling thread for
/// `delay` on every read.
pub(crate) struct SlowRepository<E: Entity> {
    inner: HashMapRepository<E>,
    delay: Duration,
}

impl<E: Entity> SlowRepository<E> {
    pub(crate) fn seeded(items: impl IntoIterator<Item = E>, delay: Duration) -> Self {
        Self {
            inner: HashMapRepository::seeded(items).unwrap(),
            delay,
        }
    }
}

impl<E: Entity> Repository<E> for SlowRepository<E> {
    fn save(&self, entity: E) -> Result<Option<E>, RepositoryError> {
        self.inner.save(entity)
    }

    fn delete(&self, key: &E::Key) -> Option<E> {
        self.inner.delete(key)
    }

    fn find_by_id(&self, key: &E::Key) -> Option<E> {
        std::thread::sleep(self.delay);
        self.inner.find_by_id(key)
    }

    fn find_all(&self) -> Vec<E> {
        std::thread::sleep(self.delay);
        self.inner.find_all()
    }

    fn contains_key(&self, key: &E::Key) -> bool {
        self.inner.contains_key(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
