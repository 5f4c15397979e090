//! SQLite availability slot repository implementation.

use sqlx::Row;
use swapmatch_core::repository::availability::AvailabilityRepository;
use swapmatch_types::availability::{AvailabilitySlot, DayBitmask, SlotId};
use swapmatch_types::error::RepositoryError;
use swapmatch_types::user::UserId;

use super::convert::{
    format_datetime, format_time, parse_datetime, parse_id, parse_time, query_error, write_error,
};
use super::pool::DatabasePool;

#[derive(Clone)]
pub struct SqliteAvailabilityRepository {
    pool: DatabasePool,
}

impl SqliteAvailabilityRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SlotRow {
    id: String,
    user_id: String,
    label: String,
    day_bitmask: i64,
    start_time: String,
    end_time: String,
    created_at: String,
}

impl SlotRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            label: row.try_get("label")?,
            day_bitmask: row.try_get("day_bitmask")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_slot(self) -> Result<AvailabilitySlot, RepositoryError> {
        let day_bitmask = DayBitmask::new(self.day_bitmask)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(AvailabilitySlot {
            id: parse_id("slot id", &self.id)?,
            user_id: parse_id("user id", &self.user_id)?,
            label: self.label,
            day_bitmask,
            start_time: parse_time(&self.start_time)?,
            end_time: parse_time(&self.end_time)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn slot_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<AvailabilitySlot, RepositoryError> {
    SlotRow::from_row(row).map_err(query_error)?.into_slot()
}

impl AvailabilityRepository for SqliteAvailabilityRepository {
    async fn create(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot, RepositoryError> {
        sqlx::query(
            "INSERT INTO availability_slots (id, user_id, label, day_bitmask, start_time, end_time, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(slot.id.to_string())
        .bind(slot.user_id.to_string())
        .bind(&slot.label)
        .bind(i64::from(slot.day_bitmask))
        .bind(format_time(&slot.start_time))
        .bind(format_time(&slot.end_time))
        .bind(format_datetime(&slot.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || format!("slot {} already exists", slot.id)))?;
        Ok(slot.clone())
    }

    async fn get(&self, id: &SlotId, owner: &UserId) -> Result<Option<AvailabilitySlot>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM availability_slots WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(slot_from_row).transpose()
    }

    async fn list_for_user(&self, owner: &UserId) -> Result<Vec<AvailabilitySlot>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM availability_slots WHERE user_id = ? ORDER BY day_bitmask, start_time",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows.iter().map(slot_from_row).collect()
    }

    async fn update(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot, RepositoryError> {
        let result = sqlx::query(
            "UPDATE availability_slots SET label = ?, day_bitmask = ?, start_time = ?, end_time = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(&slot.label)
        .bind(i64::from(slot.day_bitmask))
        .bind(format_time(&slot.start_time))
        .bind(format_time(&slot.end_time))
        .bind(slot.id.to_string())
        .bind(slot.user_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(slot.clone())
    }

    async fn delete(&self, id: &SlotId, owner: &UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM availability_slots WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}
