//! SQLite user/skill directory.
//!
//! Implements `SkillRelationRepository` and `DirectoryRepository` from
//! `swapmatch-core`. Also carries the seeding helpers (users, skills,
//! offered/wanted links) used by the CLI and tests in place of a full
//! identity service.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::Row;
use swapmatch_core::repository::directory::DirectoryRepository;
use swapmatch_core::repository::skill_relation::SkillRelationRepository;
use swapmatch_types::error::RepositoryError;
use swapmatch_types::skill::{Skill, SkillId};
use swapmatch_types::swap::TradeCandidate;
use swapmatch_types::user::{UserId, UserSummary};
use tracing::debug;

use super::convert::{format_datetime, parse_datetime, parse_id, query_error, write_error};
use super::pool::DatabasePool;

/// Reciprocal partners in one pass: my offered skill `mo` is wanted by the
/// partner (`tw`), and my wanted skill `mw` is offered by the partner (`tof`).
const TRADE_PARTNERS_SQL: &str = "
SELECT u.id AS user_id, u.name AS user_name, u.location, u.photo_url,
       os.id AS offered_id, os.name AS offered_name, os.created_at AS offered_created_at,
       ws.id AS wanted_id, ws.name AS wanted_name, ws.created_at AS wanted_created_at
FROM user_skills_offered mo
JOIN user_skills_wanted mw ON mw.user_id = mo.user_id
JOIN user_skills_wanted tw ON tw.skill_id = mo.skill_id
JOIN user_skills_offered tof ON tof.user_id = tw.user_id AND tof.skill_id = mw.skill_id
JOIN users u ON u.id = tw.user_id
JOIN skills os ON os.id = mo.skill_id
JOIN skills ws ON ws.id = mw.skill_id
WHERE mo.user_id = ?
  AND u.id <> ?
  AND u.is_public = 1
  AND u.deleted_at IS NULL
ORDER BY mo.skill_id, mw.skill_id, u.id
LIMIT ?";

/// SQLite-backed users, skills and skill links.
#[derive(Clone)]
pub struct SqliteDirectoryRepository {
    pool: DatabasePool,
}

impl SqliteDirectoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Register a public user.
    pub async fn create_user(
        &self,
        name: &str,
        location: Option<&str>,
    ) -> Result<UserSummary, RepositoryError> {
        let user = UserSummary {
            id: UserId::new(),
            name: name.to_string(),
            location: location.map(str::to_string),
            photo_url: None,
        };
        sqlx::query("INSERT INTO users (id, name, location, created_at) VALUES (?, ?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.location)
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(user)
    }

    /// Hide or expose a user's profile to partner matching.
    pub async fn set_public(&self, user_id: &UserId, public: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET is_public = ? WHERE id = ?")
            .bind(public)
            .bind(user_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Mark a user deleted. The row is kept so existing swaps still resolve.
    pub async fn soft_delete_user(&self, user_id: &UserId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(format_datetime(&Utc::now()))
                .bind(user_id.to_string())
                .execute(&self.pool.writer)
                .await
                .map_err(query_error)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Users that are not deleted, by name.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, location, photo_url FROM users WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows.iter().map(user_from_row).collect()
    }

    /// Add a skill to the catalog. Names are unique.
    pub async fn create_skill(&self, name: &str) -> Result<Skill, RepositoryError> {
        let skill = Skill {
            id: SkillId::new(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };
        sqlx::query("INSERT INTO skills (id, name, created_at) VALUES (?, ?, ?)")
            .bind(skill.id.to_string())
            .bind(&skill.name)
            .bind(format_datetime(&skill.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| write_error(e, || format!("skill '{}' already exists", skill.name)))?;
        Ok(skill)
    }

    pub async fn skill_by_name(&self, name: &str) -> Result<Option<Skill>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, created_at FROM skills WHERE name = ?")
            .bind(name.trim())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(skill_from_row).transpose()
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM skills ORDER BY name")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter().map(skill_from_row).collect()
    }

    /// Link a skill the user teaches. Idempotent.
    pub async fn add_offered(&self, user_id: &UserId, skill_id: &SkillId) -> Result<(), RepositoryError> {
        self.link("user_skills_offered", user_id, skill_id).await
    }

    /// Link a skill the user wants to learn. Idempotent.
    pub async fn add_wanted(&self, user_id: &UserId, skill_id: &SkillId) -> Result<(), RepositoryError> {
        self.link("user_skills_wanted", user_id, skill_id).await
    }

    async fn link(&self, table: &str, user_id: &UserId, skill_id: &SkillId) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT OR IGNORE INTO {table} (user_id, skill_id) VALUES (?, ?)"
        ))
        .bind(user_id.to_string())
        .bind(skill_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn has_link(&self, table: &str, user_id: &UserId, skill_id: &SkillId) -> Result<bool, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT 1 FROM {table} WHERE user_id = ? AND skill_id = ?"
        ))
        .bind(user_id.to_string())
        .bind(skill_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;
        Ok(row.is_some())
    }

    async fn linked_skills(&self, table: &str, user_id: &UserId) -> Result<HashSet<SkillId>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT skill_id FROM {table} WHERE user_id = ?"))
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter()
            .map(|row| {
                let raw: String = row.try_get("skill_id").map_err(query_error)?;
                parse_id("skill id", &raw)
            })
            .collect()
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserSummary, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    Ok(UserSummary {
        id: parse_id("user id", &id)?,
        name: row.try_get("name").map_err(query_error)?,
        location: row.try_get("location").map_err(query_error)?,
        photo_url: row.try_get("photo_url").map_err(query_error)?,
    })
}

fn skill_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Skill, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    Ok(Skill {
        id: parse_id("skill id", &id)?,
        name: row.try_get("name").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Internal row type for the trade-partner join.
struct TradePartnerRow {
    user_id: String,
    user_name: String,
    location: Option<String>,
    photo_url: Option<String>,
    offered_id: String,
    offered_name: String,
    offered_created_at: String,
    wanted_id: String,
    wanted_name: String,
    wanted_created_at: String,
}

impl TradePartnerRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            user_name: row.try_get("user_name")?,
            location: row.try_get("location")?,
            photo_url: row.try_get("photo_url")?,
            offered_id: row.try_get("offered_id")?,
            offered_name: row.try_get("offered_name")?,
            offered_created_at: row.try_get("offered_created_at")?,
            wanted_id: row.try_get("wanted_id")?,
            wanted_name: row.try_get("wanted_name")?,
            wanted_created_at: row.try_get("wanted_created_at")?,
        })
    }

    fn into_candidate(self) -> Result<TradeCandidate, RepositoryError> {
        Ok(TradeCandidate {
            user: UserSummary {
                id: parse_id("user id", &self.user_id)?,
                name: self.user_name,
                location: self.location,
                photo_url: self.photo_url,
            },
            offered_skill: Skill {
                id: parse_id("skill id", &self.offered_id)?,
                name: self.offered_name,
                created_at: parse_datetime(&self.offered_created_at)?,
            },
            wanted_skill: Skill {
                id: parse_id("skill id", &self.wanted_id)?,
                name: self.wanted_name,
                created_at: parse_datetime(&self.wanted_created_at)?,
            },
        })
    }
}

impl SkillRelationRepository for SqliteDirectoryRepository {
    async fn is_offering(&self, user_id: &UserId, skill_id: &SkillId) -> Result<bool, RepositoryError> {
        self.has_link("user_skills_offered", user_id, skill_id).await
    }

    async fn is_wanting(&self, user_id: &UserId, skill_id: &SkillId) -> Result<bool, RepositoryError> {
        self.has_link("user_skills_wanted", user_id, skill_id).await
    }

    async fn offered_skills(&self, user_id: &UserId) -> Result<HashSet<SkillId>, RepositoryError> {
        self.linked_skills("user_skills_offered", user_id).await
    }

    async fn wanted_skills(&self, user_id: &UserId) -> Result<HashSet<SkillId>, RepositoryError> {
        self.linked_skills("user_skills_wanted", user_id).await
    }

    async fn find_trade_partners(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<TradeCandidate>, RepositoryError> {
        let rows = sqlx::query(TRADE_PARTNERS_SQL)
            .bind(user_id.to_string())
            .bind(user_id.to_string())
            .bind(i64::from(limit))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in &rows {
            let partner = TradePartnerRow::from_row(row).map_err(query_error)?;
            candidates.push(partner.into_candidate()?);
        }
        debug!(user_id = %user_id, count = candidates.len(), "trade partner query");
        Ok(candidates)
    }
}

impl DirectoryRepository for SqliteDirectoryRepository {
    async fn user_summary(&self, id: &UserId) -> Result<Option<UserSummary>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, location, photo_url FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn skill(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, created_at FROM skills WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(skill_from_row).transpose()
    }
}
