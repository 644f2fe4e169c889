//! # chalk-db
//!
//! libSQL storage for journal entries.
//!
//! [`JournalStore`] is the seam the orchestrator writes through and the
//! presentation layer reads from: `append` writes one entry, `subscribe_all`
//! yields the owner's full entry set now and again after every change.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod store;

pub use service::JournalService;
pub use store::{JournalStore, SnapshotStream};

use error::DatabaseError;
use libsql::Builder;

/// Raw database handle: a libSQL database plus one shared connection.
pub struct ChalkDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ChalkDb {
    /// Open a local database at the given path (`:memory:` for tests).
    ///
    /// Runs migrations automatically.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let chalk_db = Self { db, conn };
        chalk_db.run_migrations().await?;
        Ok(chalk_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"jrn-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
