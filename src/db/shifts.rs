use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    models::shift::{NewShiftOccurrence, ShiftOccurrence},
    services::shifts::ShiftStore,
};

/// Row as fetched from Postgres. The category is TEXT and parsed on the way out,
/// so a value outside the enum fails the read instead of being rendered.
#[derive(Debug, FromRow)]
struct ShiftRow {
    id: Uuid,
    user_id: Uuid,
    date_start: NaiveDate,
    date_end: NaiveDate,
    time_start: NaiveTime,
    time_end: NaiveTime,
    category: String,
    description: Option<String>,
    group_label: Option<String>,
    recurring_group_id: Option<Uuid>,
    assignee_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShiftRow> for ShiftOccurrence {
    type Error = anyhow::Error;

    fn try_from(row: ShiftRow) -> anyhow::Result<Self> {
        let category = row
            .category
            .parse()
            .with_context(|| format!("shift {} has an invalid category", row.id))?;
        Ok(ShiftOccurrence {
            id: row.id,
            user_id: row.user_id,
            date_start: row.date_start,
            date_end: row.date_end,
            time_start: row.time_start,
            time_end: row.time_end,
            category,
            description: row.description,
            group_label: row.group_label,
            recurring_group_id: row.recurring_group_id,
            assignee_name: row.assignee_name,
            created_at: row.created_at,
        })
    }
}

/// Postgres-backed shift store.
#[derive(Clone)]
pub struct PgShiftStore {
    pool: PgPool,
}

impl PgShiftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShiftStore for PgShiftStore {
    async fn insert_batch(&self, shifts: &[NewShiftOccurrence]) -> anyhow::Result<Vec<ShiftOccurrence>> {
        // Dropping the transaction on an early return rolls every row back.
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(shifts.len());

        for shift in shifts {
            let row = sqlx::query_as::<_, ShiftRow>(
                r#"INSERT INTO shift_occurrences
                       (user_id, date_start, date_end, time_start, time_end,
                        category, description, group_label, recurring_group_id)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                   RETURNING id, user_id, date_start, date_end, time_start, time_end,
                             category, description, group_label, recurring_group_id,
                             NULL::TEXT AS assignee_name, created_at"#,
            )
            .bind(shift.user_id)
            .bind(shift.date_start)
            .bind(shift.date_end)
            .bind(shift.time_start)
            .bind(shift.time_end)
            .bind(shift.category.as_str())
            .bind(&shift.description)
            .bind(&shift.group_label)
            .bind(shift.recurring_group_id)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(ShiftOccurrence::try_from(row)?);
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn list_for_owner(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ShiftOccurrence>> {
        let rows = sqlx::query_as::<_, ShiftRow>(
            r#"SELECT s.id, s.user_id, s.date_start, s.date_end, s.time_start, s.time_end,
                      s.category, s.description, s.group_label, s.recurring_group_id,
                      NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS assignee_name,
                      s.created_at
               FROM shift_occurrences s
               LEFT JOIN users u ON u.id = s.user_id
               WHERE s.user_id = $1 AND s.date_start BETWEEN $2 AND $3
               ORDER BY s.date_start, s.time_start"#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ShiftOccurrence::try_from).collect()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM shift_occurrences WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
