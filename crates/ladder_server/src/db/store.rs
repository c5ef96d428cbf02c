//! Units of work over a [`Repository`], and the SQLite-backed store.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, Repository, SqliteRepository};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Hands out [`Repository`] access in read or exclusive units of work.
///
/// `exclusive` is the primitive that keeps match updates consistent: work
/// passed to it observes and writes state as one atomic unit, and two
/// exclusive units never interleave. `read` carries no such promise.
pub trait Store: Send + Sync + 'static {
    /// Runs `work` without exclusive access. Each write commits on its own.
    ///
    /// # Errors
    ///
    /// Returns whatever `work` returns, or a [`DbError`] converted into `E`
    /// if the store cannot be reached.
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, E>,
        E: From<DbError>;

    /// Runs `work` as one serialized, all-or-nothing unit.
    ///
    /// Writes made by `work` persist only if it returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns whatever `work` returns, or a [`DbError`] converted into `E`
    /// if the unit cannot begin or commit.
    fn exclusive<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, E>,
        E: From<DbError>;
}

/// SQLite store that opens a connection per unit of work.
///
/// Exclusive units run in `BEGIN IMMEDIATE` transactions, so a second writer
/// waits up to the busy timeout for the first to commit.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
    busy_timeout_ms: u32,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating it if needed, and applies
    /// pending migrations.
    ///
    /// `":memory:"` is not supported: every unit of work opens its own
    /// connection and would see a fresh database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String, busy_timeout_ms: u32) -> Result<Self, DbError> {
        info!(path = %db_path, busy_timeout_ms, "Opening SqliteStore");
        let store = Self {
            db_path,
            busy_timeout_ms,
        };

        let mut conn = store.connection()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");

        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))?;
        Ok(conn)
    }
}

/// Failure inside a transaction: either the work's own error or diesel's.
enum Abort<E> {
    Work(E),
    Backend(DieselError),
}

impl<E> From<DieselError> for Abort<E> {
    fn from(err: DieselError) -> Self {
        Abort::Backend(err)
    }
}

impl<E: From<DbError>> Abort<E> {
    fn into_inner(self) -> E {
        match self {
            Abort::Work(err) => err,
            Abort::Backend(err) => E::from(DbError::from(err)),
        }
    }
}

impl Store for SqliteStore {
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.connection()?;
        let mut repo = SqliteRepository::new(&mut conn);
        work(&mut repo)
    }

    fn exclusive<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| {
            let mut repo = SqliteRepository::new(conn);
            work(&mut repo).map_err(Abort::Work)
        })
        .map_err(Abort::into_inner)
    }
}
