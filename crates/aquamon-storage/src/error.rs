use sea_orm::DbErr;

/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use aquamon_storage::error::StorageError;
///
/// let err = StorageError::Conflict {
///     entity: "admin",
///     value: "ops@example.com".to_string(),
/// };
/// assert!(err.to_string().contains("ops@example.com"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required record was not found in the database.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i32 },

    /// A unique constraint was violated, e.g. a duplicate admin email.
    #[error("Storage: {entity} already exists ({value})")]
    Conflict { entity: &'static str, value: String },

    /// The singleton seed ran but the row could not be read back, which
    /// should be unreachable under normal conditions.
    #[error("Storage: seed of {entity} succeeded but the row could not be read back")]
    SeedReadback { entity: &'static str },

    /// An underlying database error.
    #[error("Storage: database error: {0}")]
    Database(#[from] DbErr),

    /// A password hashing or verification failure.
    #[error("Storage: password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Classifies a SeaORM error, turning unique-constraint violations into
    /// [`StorageError::Conflict`] so callers never see raw driver messages.
    pub fn from_insert(err: DbErr, entity: &'static str, value: &str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => StorageError::Conflict {
                entity,
                value: value.to_string(),
            },
            _ => StorageError::Database(err),
        }
    }

    /// True when the error is a unique-constraint conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }
}
