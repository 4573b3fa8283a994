//! User Storage
//! Mission: Persist user accounts behind a small store interface

use crate::auth::models::{NewUser, User, UserField};
use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, Row};
use tracing::{debug, info};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE NOT NULL,
    username TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

const SELECT_COLUMNS: &str = "SELECT id, email, username, password_hash, created_at FROM users";

/// Persistence for user accounts.
///
/// Handlers and the auth gate receive the store through `AuthState`; nothing
/// reaches for a global connection.
pub trait UserStore: Send + Sync {
    /// Insert a user and return it with its assigned id.
    /// Fails if the email is already registered.
    fn create(&self, user: NewUser) -> Result<User>;

    /// Find a single user by a unique field
    fn find_by(&self, field: UserField<'_>) -> Result<Option<User>>;
}

/// User storage with SQLite backend
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Open (or create) the database file and initialize the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open user database at {}", db_path))?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, gone when the store is dropped
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize users schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl UserStore for SqliteUserStore {
    fn create(&self, user: NewUser) -> Result<User> {
        let created_at = Utc::now().to_rfc3339();
        let conn = self.conn.lock();

        let inserted = conn.execute(
            "INSERT INTO users (email, username, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user.email, user.username, user.password_hash, created_at],
        );

        if let Err(rusqlite::Error::SqliteFailure(e, _)) = &inserted {
            if e.code == ErrorCode::ConstraintViolation {
                debug!("Rejected duplicate registration for {}", user.email);
            }
        }
        inserted.context("Failed to insert user")?;

        let user = User {
            id: conn.last_insert_rowid(),
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            created_at,
        };

        info!("✅ Created user: {} ({})", user.username, user.id);

        Ok(user)
    }

    fn find_by(&self, field: UserField<'_>) -> Result<Option<User>> {
        let conn = self.conn.lock();

        let user_result = match field {
            UserField::Id(id) => conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_user,
            ),
            UserField::Email(email) => conn.query_row(
                &format!("{} WHERE email = ?1", SELECT_COLUMNS),
                params![email],
                row_to_user,
            ),
        };

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).context("Failed to look up user"),
        }
    }
}
