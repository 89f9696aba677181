use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use crate::error::Result;

pub mod admin;
pub mod thresholds;

pub use admin::AdminRow;
pub use thresholds::{ThresholdsRow, ThresholdsUpdate};

/// Unified access layer for the management database.
///
/// All methods are `async fn` over SeaORM. A single `Store` is created at
/// startup and shared behind an `Arc`; it is safe for concurrent use by
/// multiple simultaneous requests.
pub struct Store {
    pub(crate) db: DatabaseConnection,
}

impl Store {
    /// Connects to the database and brings the schema up to date.
    ///
    /// - `db_url`: full connection URL provided by the caller's config.
    ///   SQLite example: `sqlite://data/aquamon.db?mode=rwc`
    ///
    /// Runs all pending `sea-orm-migration` migrations, which also applies
    /// the one-time idempotent seed of the threshold singleton.
    pub async fn new(db_url: &str) -> Result<Self> {
        let db = Database::connect(db_url).await?;

        // WAL mode only applies to SQLite
        if db_url.starts_with("sqlite:") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None).await?;

        tracing::info!("Initialized store (SeaORM)");

        Ok(Self { db })
    }

    /// Issues a trivial round-trip query; used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await?;
        Ok(())
    }

    /// Returns the underlying connection (for the aggregate submodules).
    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
