//! The persistence seam.
//!
//! [`JournalStore`] is what the orchestrator writes through and what the feed
//! reads from. [`JournalService`] implements it over libSQL; a subscription is
//! a stream of full snapshots, re-queried every time the service announces a
//! write or another connection commits to the same file.

use std::future::Future;
use std::time::Duration;

use chalk_core::entities::{JournalEntry, NewJournalEntry};
use futures::StreamExt as _;
use futures::stream::{self, BoxStream};
use tokio::sync::watch;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::error::DatabaseError;
use crate::repos::journal::query_entries;
use crate::service::JournalService;

/// Full, unordered entry sets for one owner, one per change.
pub type SnapshotStream = BoxStream<'static, Result<Vec<JournalEntry>, DatabaseError>>;

pub trait JournalStore: Send + Sync {
    /// Persist one entry. The returned entry carries the assigned id and
    /// creation time.
    fn append(
        &self,
        entry: NewJournalEntry,
    ) -> impl Future<Output = Result<JournalEntry, DatabaseError>> + Send;

    /// Every entry `owner_id` owns, now and after each subsequent change.
    ///
    /// The first item is the current snapshot. The stream ends when the store
    /// is dropped.
    fn subscribe_all(&self, owner_id: &str) -> SnapshotStream;
}

impl<T: JournalStore + ?Sized> JournalStore for &T {
    fn append(
        &self,
        entry: NewJournalEntry,
    ) -> impl Future<Output = Result<JournalEntry, DatabaseError>> + Send {
        (**self).append(entry)
    }

    fn subscribe_all(&self, owner_id: &str) -> SnapshotStream {
        (**self).subscribe_all(owner_id)
    }
}

struct Cursor {
    conn: libsql::Connection,
    app_id: String,
    owner_id: String,
    changes: watch::Receiver<u64>,
    poll_every: Duration,
    /// Set on the first poll of the stream, inside the runtime.
    poll: Option<Interval>,
    data_version: Option<i64>,
}

impl Cursor {
    fn start_polling(&mut self) {
        let mut poll = time::interval_at(Instant::now() + self.poll_every, self.poll_every);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.poll = Some(poll);
    }

    /// Wait for the next change. `None` once the service is gone.
    ///
    /// Writes through this service arrive on `changes`. Writes through any
    /// other connection to the same file only move `PRAGMA data_version`,
    /// which is checked on every poll tick.
    async fn next_change(&mut self) -> Option<()> {
        loop {
            let poll = self.poll.as_mut()?;
            let announced = tokio::select! {
                changed = self.changes.changed() => {
                    changed.ok()?;
                    true
                }
                _ = poll.tick() => false,
            };
            if announced || self.external_write().await {
                return Some(());
            }
        }
    }

    async fn external_write(&mut self) -> bool {
        match data_version(&self.conn).await {
            Ok(version) => self
                .data_version
                .replace(version)
                .is_some_and(|seen| seen != version),
            Err(error) => {
                tracing::debug!(owner = %self.owner_id, %error, "data_version check failed");
                false
            }
        }
    }

    async fn snapshot(&mut self) -> Result<Vec<JournalEntry>, DatabaseError> {
        self.changes.mark_unchanged();
        // Version before query: a write racing the query shows up on the next tick.
        if let Ok(version) = data_version(&self.conn).await {
            self.data_version = Some(version);
        }
        let snapshot = query_entries(&self.conn, &self.app_id, &self.owner_id).await;
        if let Err(error) = &snapshot {
            tracing::warn!(owner = %self.owner_id, %error, "journal snapshot query failed");
        }
        snapshot
    }
}

/// `SQLite`'s per-connection counter of commits made by other connections.
async fn data_version(conn: &libsql::Connection) -> Result<i64, DatabaseError> {
    let mut rows = conn.query("PRAGMA data_version", ()).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

impl JournalStore for JournalService {
    fn append(
        &self,
        entry: NewJournalEntry,
    ) -> impl Future<Output = Result<JournalEntry, DatabaseError>> + Send {
        self.append_entry(entry)
    }

    fn subscribe_all(&self, owner_id: &str) -> SnapshotStream {
        let cursor = Cursor {
            conn: self.db().conn().clone(),
            app_id: self.app_id().to_string(),
            owner_id: owner_id.to_string(),
            changes: self.watch_changes(),
            poll_every: self.poll_interval(),
            poll: None,
            data_version: None,
        };

        stream::unfold(cursor, |mut cursor| async move {
            if cursor.poll.is_some() {
                cursor.next_change().await?;
            } else {
                cursor.start_polling();
            }
            let snapshot = cursor.snapshot().await;
            Some((snapshot, cursor))
        })
        .boxed()
    }
}
