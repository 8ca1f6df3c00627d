use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    models::shift::{NewShiftOccurrence, ShiftOccurrence},
    services::shifts::ShiftStore,
};

/// In-process shift store with the same contract as the Postgres one.
/// Used by the preview tool and tests.
#[derive(Default)]
pub struct MemoryShiftStore {
    shifts: Mutex<Vec<ShiftOccurrence>>,
    assignees: HashMap<Uuid, String>,
}

impl MemoryShiftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display name returned as `assignee_name` for this owner's shifts.
    pub fn with_assignee(mut self, user_id: Uuid, name: impl Into<String>) -> Self {
        self.assignees.insert(user_id, name.into());
        self
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Vec<ShiftOccurrence>>> {
        self.shifts
            .lock()
            .map_err(|_| anyhow::anyhow!("shift store lock poisoned"))
    }
}

#[async_trait]
impl ShiftStore for MemoryShiftStore {
    async fn insert_batch(&self, shifts: &[NewShiftOccurrence]) -> anyhow::Result<Vec<ShiftOccurrence>> {
        let now = Utc::now();
        let stored: Vec<ShiftOccurrence> = shifts
            .iter()
            .cloned()
            .map(|shift| shift.into_persisted(Uuid::new_v4(), now))
            .collect();
        self.lock()?.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn list_for_owner(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ShiftOccurrence>> {
        let mut found: Vec<ShiftOccurrence> = self
            .lock()?
            .iter()
            .filter(|s| s.user_id == user_id && s.date_start >= from && s.date_start <= to)
            .cloned()
            .map(|mut s| {
                s.assignee_name = self.assignees.get(&s.user_id).cloned();
                s
            })
            .collect();
        found.sort_by_key(|s| (s.date_start, s.time_start));
        Ok(found)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut shifts = self.lock()?;
        let before = shifts.len();
        shifts.retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(shifts.len() != before)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.lock().map(|_| ())
    }
}
