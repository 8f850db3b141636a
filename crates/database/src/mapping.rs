//! Row-to-entity mapping for the `users` table.
//!
//! Columns are read by position, in the order the table declares them:
//! `id, email, role, sub, name, avatar_id, deleted`.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::entities::{UnknownRole, User, UserRole};
use crate::types::{UserError, UserResult};

/// Where the row being mapped comes from.
pub enum RowSource<'r> {
    /// Outcome of a single-row query. A `RowNotFound` outcome is passed through
    /// as [`UserError::UserNotFound`].
    Single(Result<SqliteRow, sqlx::Error>),
    /// The row a multi-row cursor is currently positioned at.
    Cursor(&'r SqliteRow),
}

/// Produce a [`User`] from exactly one row.
pub fn map_user(source: RowSource<'_>) -> UserResult<User> {
    match source {
        RowSource::Single(result) => {
            let row = result?;
            read_user(&row)
        }
        RowSource::Cursor(row) => read_user(row),
    }
}

fn read_user(row: &SqliteRow) -> UserResult<User> {
    let role: String = row.try_get(2)?;
    let role = role
        .parse::<UserRole>()
        .map_err(|UnknownRole(value)| UserError::InvalidRow(format!("unknown role `{value}`")))?;

    Ok(User {
        id: row.try_get(0)?,
        email: row.try_get(1)?,
        role,
        sub: row.try_get(3)?,
        name: row.try_get(4)?,
        avatar_id: row.try_get(5)?,
        deleted: row.try_get(6)?,
    })
}
