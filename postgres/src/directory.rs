//! PostgreSQL-backed sponsor and team directories.
//!
//! Both directories are small JSONB document tables; rows are listed newest
//! first for display on the club site.

use async_trait::async_trait;
use clubhub_core::error::{DomainError, Result};
use clubhub_core::repository::DirectoryRepository;
use clubhub_core::types::{Sponsor, SponsorId, TeamMember, TeamMemberId};
use sqlx::PgPool;

/// PostgreSQL directory repository for sponsors and club team members.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Create a new repository on an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Storage {
        message: format!("{context}: {err}"),
    }
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn list_sponsors(&self) -> Result<Vec<Sponsor>> {
        let rows: Vec<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM sponsors ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to list sponsors", e))?;

        rows.into_iter()
            .map(|(json,)| {
                serde_json::from_value(json)
                    .map_err(|e| storage_error("Failed to decode sponsor", e))
            })
            .collect()
    }

    async fn insert_sponsor(&self, sponsor: &Sponsor) -> Result<()> {
        let json = serde_json::to_value(sponsor)
            .map_err(|e| storage_error("Failed to encode sponsor", e))?;

        sqlx::query("INSERT INTO sponsors (id, data, created_at) VALUES ($1, $2, $3)")
            .bind(sponsor.id.as_uuid())
            .bind(&json)
            .bind(sponsor.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to insert sponsor", e))?;

        Ok(())
    }

    async fn delete_sponsor(&self, id: SponsorId) -> Result<()> {
        let result = sqlx::query("DELETE FROM sponsors WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete sponsor", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SponsorNotFound { id });
        }

        Ok(())
    }

    async fn list_team_members(&self) -> Result<Vec<TeamMember>> {
        let rows: Vec<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM team_members ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to list team members", e))?;

        rows.into_iter()
            .map(|(json,)| {
                serde_json::from_value(json)
                    .map_err(|e| storage_error("Failed to decode team member", e))
            })
            .collect()
    }

    async fn insert_team_member(&self, member: &TeamMember) -> Result<()> {
        let json = serde_json::to_value(member)
            .map_err(|e| storage_error("Failed to encode team member", e))?;

        sqlx::query("INSERT INTO team_members (id, data, created_at) VALUES ($1, $2, $3)")
            .bind(member.id.as_uuid())
            .bind(&json)
            .bind(member.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to insert team member", e))?;

        Ok(())
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> Result<()> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete team member", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TeamMemberNotFound { id });
        }

        Ok(())
    }
}
