use sea_orm::{DbErr, SqlErr};

/// True when the database rejected a write because of a unique index.
///
/// Repositories translate this into their domain conflict instead of an internal error.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Name-aware variant: true when the violated constraint message mentions `index_name`.
pub fn violates_index(err: &DbErr, index_name: &str) -> bool {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => message.contains(index_name),
        _ => false,
    }
}
