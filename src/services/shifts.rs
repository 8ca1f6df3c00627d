use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{ShiftError, ShiftOperation},
    models::shift::{
        CalendarRangeQuery, CreateShiftRequest, NewShiftOccurrence, Recurrence, ShiftOccurrence,
    },
    services::{
        group_ids::GroupIdAllocator,
        metrics::{
            SHIFT_DELETIONS_COUNTER, SHIFT_OCCURRENCES_COUNTER, SHIFT_REJECTIONS_COUNTER,
            SHIFT_SERIES_COUNTER, STORE_FAILURES_COUNTER,
        },
        recurrence,
    },
};

/// Persistence collaborator for shift occurrences.
#[async_trait]
pub trait ShiftStore: Send + Sync {
    /// Insert every occurrence or none of them. Returns the stored rows in input order.
    async fn insert_batch(&self, shifts: &[NewShiftOccurrence]) -> anyhow::Result<Vec<ShiftOccurrence>>;

    /// Occurrences of one owner starting within `from..=to`, ordered by date then start time.
    async fn list_for_owner(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ShiftOccurrence>>;

    /// Remove one occurrence. `false` when no row matched (owner, id).
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;

    async fn ping(&self) -> anyhow::Result<()>;
}

fn store_failure(op: ShiftOperation) -> impl FnOnce(anyhow::Error) -> ShiftError {
    move |e| {
        let label = match op {
            ShiftOperation::Create => "create",
            ShiftOperation::List => "list",
            ShiftOperation::Delete => "delete",
        };
        STORE_FAILURES_COUNTER.with_label_values(&[label]).inc();
        tracing::warn!("shift store {label} failed: {e:#}");
        ShiftError::collaborator(op)(e)
    }
}

pub struct ShiftService;

impl ShiftService {
    /// Validate and expand a pattern, then persist the whole batch.
    pub async fn create(
        store: &dyn ShiftStore,
        group_ids: &dyn GroupIdAllocator,
        req: &CreateShiftRequest,
        caller: Uuid,
    ) -> Result<Vec<ShiftOccurrence>, ShiftError> {
        let pattern = recurrence::validate(req, caller).inspect_err(|e| {
            SHIFT_REJECTIONS_COUNTER.with_label_values(&["validation"]).inc();
            tracing::debug!("rejected shift pattern from {caller}: {e}");
        })?;

        let occurrences = recurrence::expand_non_empty(&pattern, group_ids).inspect_err(|_| {
            SHIFT_REJECTIONS_COUNTER.with_label_values(&["empty"]).inc();
            tracing::info!(
                "weekly pattern for {} starting {} produced no occurrences",
                pattern.user_id,
                pattern.date_start
            );
        })?;

        let stored = store
            .insert_batch(&occurrences)
            .await
            .map_err(store_failure(ShiftOperation::Create))?;

        let frequency = match pattern.recurrence {
            Recurrence::Once => "none",
            Recurrence::Weekly { weekdays, until } => {
                tracing::debug!(
                    days = ?weekdays.day_numbers(),
                    %until,
                    "expanded weekly pattern starting {}",
                    pattern.date_start
                );
                "weekly"
            }
        };
        SHIFT_SERIES_COUNTER.with_label_values(&[frequency]).inc();
        SHIFT_OCCURRENCES_COUNTER.inc_by(stored.len() as f64);
        tracing::info!(
            user_id = %pattern.user_id,
            group_id = ?occurrences[0].recurring_group_id,
            "created {} {} shift occurrence(s)",
            stored.len(),
            pattern.category
        );
        Ok(stored)
    }

    /// Load an owner's occurrences for an inclusive date range.
    pub async fn list_range(
        store: &dyn ShiftStore,
        user_id: Uuid,
        range: CalendarRangeQuery,
    ) -> Result<Vec<ShiftOccurrence>, ShiftError> {
        if range.to < range.from {
            return Err(ShiftError::validation(
                "to",
                "The end of the calendar range cannot be before its start",
            ));
        }
        store
            .list_for_owner(user_id, range.from, range.to)
            .await
            .map_err(store_failure(ShiftOperation::List))
    }

    /// Delete one occurrence. Siblings in the same recurring group are left alone.
    pub async fn delete(store: &dyn ShiftStore, user_id: Uuid, id: Uuid) -> Result<(), ShiftError> {
        let deleted = store
            .delete(user_id, id)
            .await
            .map_err(store_failure(ShiftOperation::Delete))?;
        if !deleted {
            return Err(ShiftError::NotFound);
        }
        SHIFT_DELETIONS_COUNTER.inc();
        tracing::info!(%user_id, shift_id = %id, "deleted shift occurrence");
        Ok(())
    }
}
