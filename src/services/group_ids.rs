use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Issues correlation ids for recurring series.
///
/// Every call must return an id never returned before by the same allocator,
/// including under concurrent callers.
pub trait GroupIdAllocator: Send + Sync {
    fn next_group_id(&self) -> Uuid;
}

/// Random v4 UUIDs. Used by the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGroupIds;

impl GroupIdAllocator for RandomGroupIds {
    fn next_group_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Process-unique salt in the high 64 bits, a monotonic counter in the low 64 bits.
#[derive(Debug)]
pub struct SequentialGroupIds {
    salt: u64,
    counter: AtomicU64,
}

impl SequentialGroupIds {
    pub fn new() -> Self {
        Self::with_salt(Uuid::new_v4().as_u64_pair().0)
    }

    pub fn with_salt(salt: u64) -> Self {
        Self { salt, counter: AtomicU64::new(0) }
    }
}

impl Default for SequentialGroupIds {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupIdAllocator for SequentialGroupIds {
    fn next_group_id(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Uuid::from_u64_pair(self.salt, n)
    }
}
