//! SQLite swap request repository implementation.
//!
//! Duplicate pending requests are rejected by a partial unique index, and
//! every status change or deletion is a single guarded statement, so
//! concurrent writers resolve with exactly one winner.

use chrono::{DateTime, Utc};
use sqlx::Row;
use swapmatch_core::repository::swap_request::{SwapRequestFilter, SwapRequestRepository};
use swapmatch_types::error::RepositoryError;
use swapmatch_types::swap::{SwapId, SwapRequest, SwapStatus};

use super::convert::{format_datetime, parse_datetime, parse_id, query_error, write_error};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `SwapRequestRepository`.
#[derive(Clone)]
pub struct SqliteSwapRequestRepository {
    pool: DatabasePool,
}

impl SqliteSwapRequestRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain SwapRequest.
struct SwapRequestRow {
    id: String,
    requester_id: String,
    responder_id: String,
    offered_skill_id: String,
    wanted_skill_id: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl SwapRequestRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            requester_id: row.try_get("requester_id")?,
            responder_id: row.try_get("responder_id")?,
            offered_skill_id: row.try_get("offered_skill_id")?,
            wanted_skill_id: row.try_get("wanted_skill_id")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_request(self) -> Result<SwapRequest, RepositoryError> {
        let status: SwapStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(SwapRequest {
            id: parse_id("swap id", &self.id)?,
            requester_id: parse_id("requester id", &self.requester_id)?,
            responder_id: parse_id("responder id", &self.responder_id)?,
            offered_skill_id: parse_id("offered skill id", &self.offered_skill_id)?,
            wanted_skill_id: parse_id("wanted skill id", &self.wanted_skill_id)?,
            status,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn request_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SwapRequest, RepositoryError> {
    SwapRequestRow::from_row(row)
        .map_err(query_error)?
        .into_request()
}

/// WHERE clause and its bind values for a filter.
fn filter_conditions(filter: &SwapRequestFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if !filter.statuses.is_empty() {
        let placeholders = vec!["?"; filter.statuses.len()].join(", ");
        conditions.push(format!("status IN ({placeholders})"));
        binds.extend(filter.statuses.iter().map(|s| s.as_str().to_string()));
    }
    if let Some(id) = filter.requester_id {
        conditions.push("requester_id = ?".to_string());
        binds.push(id.to_string());
    }
    if let Some(id) = filter.responder_id {
        conditions.push("responder_id = ?".to_string());
        binds.push(id.to_string());
    }
    if let Some(id) = filter.participant_id {
        conditions.push("(requester_id = ? OR responder_id = ?)".to_string());
        binds.push(id.to_string());
        binds.push(id.to_string());
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

impl SwapRequestRepository for SqliteSwapRequestRepository {
    async fn insert_pending(&self, request: &SwapRequest) -> Result<SwapRequest, RepositoryError> {
        sqlx::query(
            "INSERT INTO swap_requests (id, requester_id, responder_id, offered_skill_id, wanted_skill_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 'pending', ?, ?)",
        )
        .bind(request.id.to_string())
        .bind(request.requester_id.to_string())
        .bind(request.responder_id.to_string())
        .bind(request.offered_skill_id.to_string())
        .bind(request.wanted_skill_id.to_string())
        .bind(format_datetime(&request.created_at))
        .bind(format_datetime(&request.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || "a pending swap request already exists".to_string()))?;

        Ok(SwapRequest {
            status: SwapStatus::Pending,
            ..request.clone()
        })
    }

    async fn get_by_id(&self, id: &SwapId) -> Result<Option<SwapRequest>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM swap_requests WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(request_from_row).transpose()
    }

    async fn list(&self, filter: &SwapRequestFilter) -> Result<Vec<SwapRequest>, RepositoryError> {
        let (where_clause, binds) = filter_conditions(filter);
        let order = filter.sort_order.as_sql();
        let mut sql = format!(
            "SELECT * FROM swap_requests{where_clause} ORDER BY {} {order}, id {order}",
            filter.sort_by.column()
        );

        // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
        match (filter.limit, filter.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(request_from_row).collect()
    }

    async fn transition_from_pending(
        &self,
        id: &SwapId,
        to: SwapStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<SwapRequest>, RepositoryError> {
        let row = sqlx::query(
            "UPDATE swap_requests SET status = ?, updated_at = ?
             WHERE id = ? AND status = 'pending'
             RETURNING *",
        )
        .bind(to.as_str())
        .bind(format_datetime(&at))
        .bind(id.to_string())
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;
        row.as_ref().map(request_from_row).transpose()
    }

    async fn delete_pending(&self, id: &SwapId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM swap_requests WHERE id = ? AND status = 'pending'")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}
