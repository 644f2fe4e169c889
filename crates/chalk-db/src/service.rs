//! Service layer over [`ChalkDb`].
//!
//! `JournalService` scopes every query to one app namespace and announces each
//! write on a `watch` channel so live subscriptions can re-query. Writes made
//! through another handle on the same file are picked up by polling.

use std::time::Duration;

use tokio::sync::watch;

use crate::ChalkDb;
use crate::error::DatabaseError;

pub struct JournalService {
    db: ChalkDb,
    app_id: String,
    changes: watch::Sender<u64>,
    poll_interval: Duration,
}

/// How often subscriptions check for writes from other connections.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

impl JournalService {
    /// Open a local database and scope it to `app_id`.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    /// * `app_id` — Namespace for every entry read or written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, app_id: &str) -> Result<Self, DatabaseError> {
        let db = ChalkDb::open_local(db_path).await?;
        Ok(Self::from_db(db, app_id))
    }

    /// Wrap an existing `ChalkDb`.
    #[must_use]
    pub fn from_db(db: ChalkDb, app_id: &str) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            db,
            app_id: app_id.to_string(),
            changes,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set how often subscriptions look for writes made by other connections.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub const fn db(&self) -> &ChalkDb {
        &self.db
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Announce a write to every live subscription.
    pub(crate) fn notify_changed(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// A receiver that fires after the next write.
    pub(crate) fn watch_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
