//! SQLite swap rating repository implementation.

use sqlx::Row;
use swapmatch_core::repository::rating::{RatingFilter, RatingRepository};
use swapmatch_types::error::RepositoryError;
use swapmatch_types::rating::{RatingId, Score, SwapRating};
use swapmatch_types::swap::SwapId;
use swapmatch_types::user::UserId;

use super::convert::{format_datetime, parse_datetime, parse_id, query_error, write_error};
use super::pool::DatabasePool;

#[derive(Clone)]
pub struct SqliteRatingRepository {
    pool: DatabasePool,
}

impl SqliteRatingRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct RatingRow {
    id: String,
    swap_id: String,
    rater_id: String,
    ratee_id: String,
    score: i64,
    comment: Option<String>,
    created_at: String,
}

impl RatingRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            swap_id: row.try_get("swap_id")?,
            rater_id: row.try_get("rater_id")?,
            ratee_id: row.try_get("ratee_id")?,
            score: row.try_get("score")?,
            comment: row.try_get("comment")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_rating(self) -> Result<SwapRating, RepositoryError> {
        let score = Score::new(self.score).map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(SwapRating {
            id: parse_id("rating id", &self.id)?,
            swap_id: parse_id("swap id", &self.swap_id)?,
            rater_id: parse_id("rater id", &self.rater_id)?,
            ratee_id: parse_id("ratee id", &self.ratee_id)?,
            score,
            comment: self.comment,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn rating_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SwapRating, RepositoryError> {
    RatingRow::from_row(row).map_err(query_error)?.into_rating()
}

impl RatingRepository for SqliteRatingRepository {
    async fn insert(&self, rating: &SwapRating) -> Result<SwapRating, RepositoryError> {
        sqlx::query(
            "INSERT INTO swap_ratings (id, swap_id, rater_id, ratee_id, score, comment, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(rating.id.to_string())
        .bind(rating.swap_id.to_string())
        .bind(rating.rater_id.to_string())
        .bind(rating.ratee_id.to_string())
        .bind(i64::from(rating.score))
        .bind(&rating.comment)
        .bind(format_datetime(&rating.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || format!("swap {} already rated by this user", rating.swap_id)))?;
        Ok(rating.clone())
    }

    async fn get_by_id(&self, id: &RatingId) -> Result<Option<SwapRating>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM swap_ratings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(rating_from_row).transpose()
    }

    async fn has_rated(&self, swap_id: &SwapId, rater_id: &UserId) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM swap_ratings WHERE swap_id = ? AND rater_id = ?")
            .bind(swap_id.to_string())
            .bind(rater_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(row.is_some())
    }

    async fn list_for_swap(&self, swap_id: &SwapId) -> Result<Vec<SwapRating>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM swap_ratings WHERE swap_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(swap_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows.iter().map(rating_from_row).collect()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: &RatingFilter,
    ) -> Result<Vec<SwapRating>, RepositoryError> {
        let (role, placeholders) = match (filter.as_rater, filter.as_ratee) {
            (true, true) => ("(rater_id = ? OR ratee_id = ?)", 2),
            (true, false) => ("rater_id = ?", 1),
            (false, _) => ("ratee_id = ?", 1),
        };
        let mut sql = format!("SELECT * FROM swap_ratings WHERE {role}");
        if let Some(min) = filter.min_score {
            sql.push_str(&format!(" AND score >= {}", min.value()));
        }
        if let Some(max) = filter.max_score {
            sql.push_str(&format!(" AND score <= {}", max.value()));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");
        match (filter.limit, filter.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        let mut query = sqlx::query(&sql);
        for _ in 0..placeholders {
            query = query.bind(user_id.to_string());
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter().map(rating_from_row).collect()
    }

    async fn scores_received(&self, user_id: &UserId) -> Result<Vec<Score>, RepositoryError> {
        let rows = sqlx::query("SELECT score FROM swap_ratings WHERE ratee_id = ?")
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter()
            .map(|row| {
                let raw: i64 = row.try_get("score").map_err(query_error)?;
                Score::new(raw).map_err(|e| RepositoryError::Query(e.to_string()))
            })
            .collect()
    }

    async fn update(&self, rating: &SwapRating) -> Result<SwapRating, RepositoryError> {
        let result = sqlx::query("UPDATE swap_ratings SET score = ?, comment = ? WHERE id = ?")
            .bind(i64::from(rating.score))
            .bind(&rating.comment)
            .bind(rating.id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(rating.clone())
    }

    async fn delete(&self, id: &RatingId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM swap_ratings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}
