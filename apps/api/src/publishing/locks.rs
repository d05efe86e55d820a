use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per user. Holding the guard serializes the
/// read-flag / write-remote / set-flag sequence for that user.
#[derive(Default, Clone)]
pub struct PublishLocks {
    inner: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl PublishLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: Uuid) -> PublishGuard {
        // Clone the Arc out so the shard lock is released before awaiting.
        let lock = self.inner.entry(user_id).or_default().value().clone();
        PublishGuard {
            guard: Some(lock.lock_owned().await),
            registry: self.inner.clone(),
            user_id,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Held for the duration of one publish. Dropping it releases the user's
/// mutex and forgets the entry once nobody else holds or awaits it.
pub struct PublishGuard {
    guard: Option<OwnedMutexGuard<()>>,
    registry: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
    user_id: Uuid,
}

impl Drop for PublishGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Only the map's own reference left means no holder and no waiter.
        self.registry
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
