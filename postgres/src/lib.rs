//! PostgreSQL storage for ClubHub.
//!
//! This crate provides the production implementations of the storage traits
//! from `clubhub-core`. Event documents are stored as JSONB with an
//! optimistic-concurrency version column; payment log entries live in an
//! append-only table.
//!
//! # Example
//!
//! ```no_run
//! use clubhub_postgres::{PostgresDirectoryRepository, PostgresEventRepository};
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgresql://localhost/clubhub").await?;
//! let events = PostgresEventRepository::new(pool.clone());
//! events.migrate().await?;
//! let directory = PostgresDirectoryRepository::new(pool);
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod events;

pub use directory::PostgresDirectoryRepository;
pub use events::PostgresEventRepository;
