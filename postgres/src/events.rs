//! PostgreSQL-backed event storage using JSONB.
//!
//! Stores full `Event` domain documents as JSONB. The `version` column
//! mirrors the version inside the document so the optimistic-concurrency
//! check is a plain compare-and-swap `UPDATE`, no JSON parsing involved.
//!
//! # Example
//!
//! ```no_run
//! use clubhub_postgres::PostgresEventRepository;
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgresql://localhost/clubhub").await?;
//! let repo = PostgresEventRepository::new(pool);
//! repo.migrate().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubhub_core::error::{DomainError, Result};
use clubhub_core::repository::EventRepository;
use clubhub_core::types::{
    Event, EventId, Money, PaymentAction, PaymentLog, PaymentLogId, RegistrationId,
};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL event repository.
///
/// One row per event in the `events` table; payment log entries live in the
/// append-only `payment_logs` table.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Create a new repository on an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::Storage {
                message: format!("Migration failed: {e}"),
            })?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn storage_error(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Storage {
        message: format!("{context}: {err}"),
    }
}

fn decode_event(json: sqlx::types::JsonValue) -> Result<Event> {
    serde_json::from_value(json).map_err(|e| storage_error("Failed to decode event document", e))
}

fn parse_action(s: &str) -> Result<PaymentAction> {
    match s {
        "submitted" => Ok(PaymentAction::Submitted),
        "verified" => Ok(PaymentAction::Verified),
        "rejected" => Ok(PaymentAction::Rejected),
        "reset" => Ok(PaymentAction::Reset),
        other => Err(DomainError::Storage {
            message: format!("Unknown payment action in log row: {other}"),
        }),
    }
}

type PaymentLogRow = (
    Uuid,
    Uuid,
    Uuid,
    String,
    Option<i64>,
    Option<String>,
    String,
    Option<String>,
    DateTime<Utc>,
);

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        let json =
            serde_json::to_value(event).map_err(|e| storage_error("Failed to encode event", e))?;

        // Versions start at 1 and bump by 1 per write; wrapping at 2^63 is
        // unreachable in practice.
        #[allow(clippy::cast_possible_wrap)]
        let version = event.version as i64;

        sqlx::query(
            "INSERT INTO events (id, version, data, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(event.id.as_uuid())
        .bind(version)
        .bind(&json)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::Storage {
                        message: "Event already exists".to_string(),
                    };
                }
            }
            storage_error("Failed to insert event", e)
        })?;

        Ok(())
    }

    async fn fetch_event(&self, id: EventId) -> Result<Event> {
        let result: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM events WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to fetch event", e))?;

        match result {
            Some((json,)) => decode_event(json),
            None => Err(DomainError::EventNotFound { id }),
        }
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows: Vec<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM events ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to list events", e))?;

        rows.into_iter().map(|(json,)| decode_event(json)).collect()
    }

    #[tracing::instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update_event(&self, event: &mut Event) -> Result<()> {
        let expected = event.version;
        event.version += 1;

        // Serialize after the bump so the document agrees with the column.
        let json = serde_json::to_value(&*event)
            .map_err(|e| storage_error("Failed to encode event", e))?;

        #[allow(clippy::cast_possible_wrap)]
        let expected_i64 = expected as i64;
        #[allow(clippy::cast_possible_wrap)]
        let next_i64 = event.version as i64;

        let result = sqlx::query(
            "UPDATE events
             SET version = $3, data = $4, updated_at = $5
             WHERE id = $1 AND version = $2",
        )
        .bind(event.id.as_uuid())
        .bind(expected_i64)
        .bind(next_i64)
        .bind(&json)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to update event", e));

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                event.version = expected;
                return Err(e);
            }
        };

        if result.rows_affected() == 0 {
            event.version = expected;

            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
                    .bind(event.id.as_uuid())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| storage_error("Failed to check event", e))?;

            if exists {
                return Err(DomainError::VersionConflict);
            }
            return Err(DomainError::EventNotFound { id: event.id });
        }

        Ok(())
    }

    async fn delete_event(&self, id: EventId) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete event", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound { id });
        }

        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Payment Log
    // ═══════════════════════════════════════════════════════════════════════

    async fn append_payment_log(&self, entry: &PaymentLog) -> Result<()> {
        // Amounts are whole currency units, far below i64::MAX.
        #[allow(clippy::cast_possible_wrap)]
        let amount = entry.amount.map(|m| m.units() as i64);

        sqlx::query(
            "INSERT INTO payment_logs
                (id, event_id, registration_id, action, amount, utr, actor, note, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(entry.id.as_uuid())
        .bind(entry.event_id.as_uuid())
        .bind(entry.registration_id.as_uuid())
        .bind(entry.action.to_string())
        .bind(amount)
        .bind(entry.utr.as_deref())
        .bind(&entry.actor)
        .bind(entry.note.as_deref())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to append payment log", e))?;

        Ok(())
    }

    async fn payment_logs(&self, event_id: EventId) -> Result<Vec<PaymentLog>> {
        let rows: Vec<PaymentLogRow> = sqlx::query_as(
            "SELECT id, event_id, registration_id, action, amount, utr, actor, note, created_at
             FROM payment_logs
             WHERE event_id = $1
             ORDER BY created_at",
        )
        .bind(event_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to load payment logs", e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for (id, event_id, registration_id, action, amount, utr, actor, note, created_at) in rows {
            #[allow(clippy::cast_sign_loss)]
            let amount = amount.map(|v| Money::from_units(v as u64));

            entries.push(PaymentLog {
                id: PaymentLogId::from_uuid(id),
                event_id: EventId::from_uuid(event_id),
                registration_id: RegistrationId::from_uuid(registration_id),
                action: parse_action(&action)?,
                amount,
                utr,
                actor,
                note,
                created_at,
            });
        }

        Ok(entries)
    }
}
