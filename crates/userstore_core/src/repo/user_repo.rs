//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `users` relation via a borrowed gateway
//!   connection.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `User::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Zero rows affected on update/delete surfaces as `NotFound`, never as
//!   silent success.

use crate::db::DbError;
use crate::model::user::{User, UserId, UserValidationError};
use log::{error, warn};
use rusqlite::{ffi, params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USER_SELECT_SQL: &str = "SELECT id, name, email FROM users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Domain error kinds for user persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    NotFound(UserId),
    Duplicate(String),
    IdAssigned(UserId),
    MissingId,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::Duplicate(message) => write!(f, "duplicate entry: {message}"),
            Self::IdAssigned(id) => {
                write!(f, "user already has id {id}; storage assigns ids on create")
            }
            Self::MissingId => write!(f, "user id is required for this operation"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation
                    && code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Self::Duplicate(
                    message.unwrap_or_else(|| "unique constraint violated".to_string()),
                )
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    /// Inserts a not-yet-persisted user and returns the assigned id.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    /// Fetches zero or one user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Lists users in natural scan order. Backend failure is logged and
    /// yields an empty list; this operation never fails the caller.
    fn list_users(&self) -> Vec<User>;
    /// Replaces name and email for the row addressed by `user.id`.
    fn update_user(&self, user: &User) -> RepoResult<()>;
    /// Removes the row with the given id.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository borrowing the gateway connection.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let user = parse_user_row(row)?;

        if rows.next()?.is_some() {
            // The primary key makes this unreachable in a healthy database;
            // a second row means corruption, so report nothing rather than
            // an arbitrary pick.
            warn!("event=user_get module=repo status=anomaly id={id} reason=multiple_rows");
            return Ok(None);
        }

        Ok(Some(user))
    }

    fn fetch_all(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!("{USER_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;

        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        if let Some(id) = user.id {
            return Err(RepoError::IdAssigned(id));
        }
        user.validate()?;

        match self.conn.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2);",
            params![user.name.as_str(), user.email.as_str()],
        ) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) => {
                error!("event=user_create module=repo status=error error={err}");
                Err(err.into())
            }
        }
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let result = self.fetch_user(id);
        if let Err(err) = &result {
            error!("event=user_get module=repo status=error id={id} error={err}");
        }
        result
    }

    fn list_users(&self) -> Vec<User> {
        match self.fetch_all() {
            Ok(users) => users,
            Err(err) => {
                error!("event=user_list module=repo status=error error={err}");
                Vec::new()
            }
        }
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        let Some(id) = user.id else {
            return Err(RepoError::MissingId);
        };
        user.validate()?;

        let changed = match self.conn.execute(
            "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3;",
            params![user.name.as_str(), user.email.as_str(), id],
        ) {
            Ok(changed) => changed,
            Err(err) => {
                error!("event=user_update module=repo status=error id={id} error={err}");
                return Err(err.into());
            }
        };

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = match self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", params![id])
        {
            Ok(changed) => changed,
            Err(err) => {
                error!("event=user_delete module=repo status=error id={id} error={err}");
                return Err(err.into());
            }
        };

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let user = User::with_id(
        row.get::<_, UserId>("id")?,
        row.get::<_, String>("name")?,
        row.get::<_, String>("email")?,
    );
    user.validate()?;
    Ok(user)
}
