use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_initial_schema"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Tables in dependency order, then the singleton seed
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await?;
        Ok(())
    }
}

const UP_SQL: &str = "
CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'admin',
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_admins_email ON admins(email);

CREATE TABLE IF NOT EXISTS thresholds (
    id INTEGER PRIMARY KEY,
    sal_low REAL NOT NULL,
    sal_high REAL NOT NULL,
    ph_low REAL NOT NULL,
    ph_high REAL NOT NULL,
    temp_low REAL NOT NULL,
    temp_high REAL NOT NULL,
    bat_low REAL NOT NULL,
    offline_minutes INTEGER NOT NULL,
    updated_at TEXT NOT NULL,
    updated_by INTEGER REFERENCES admins(id)
);

INSERT OR IGNORE INTO thresholds
    (id, sal_low, sal_high, ph_low, ph_high, temp_low, temp_high, bat_low, offline_minutes, updated_at, updated_by)
VALUES
    (1, 8, 12, 6.5, 8.5, 25, 32, 20, 10, strftime('%Y-%m-%dT%H:%M:%S+00:00', 'now'), NULL);
";

const DOWN_SQL: &str = "
DROP TABLE IF EXISTS thresholds;
DROP TABLE IF EXISTS admins;
";
