//! Journal entry repository — append and reads.

use chalk_core::entities::{JournalEntry, NewJournalEntry};
use chalk_core::ids::PREFIX_ENTRY;
use chrono::Utc;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::JournalService;

const SELECT_COLUMNS: &str = "SELECT id, text, created_at, sentiment, feedback, owner_id
     FROM journal_entries";

fn row_to_entry(row: &libsql::Row) -> Result<JournalEntry, DatabaseError> {
    Ok(JournalEntry {
        id: row.get::<String>(0)?,
        text: row.get::<String>(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
        sentiment: get_opt_string(row, 3)?,
        feedback: get_opt_string(row, 4)?,
        owner_id: row.get::<String>(5)?,
    })
}

/// Every entry `owner_id` has in `app_id`, in storage order.
pub(crate) async fn query_entries(
    conn: &libsql::Connection,
    app_id: &str,
    owner_id: &str,
) -> Result<Vec<JournalEntry>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("{SELECT_COLUMNS} WHERE app_id = ?1 AND owner_id = ?2"),
            [app_id, owner_id],
        )
        .await?;

    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_entry(&row)?);
    }
    Ok(entries)
}

impl JournalService {
    /// Write one entry. The store assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a blank text or owner, or
    /// `DatabaseError` if the insert fails.
    pub async fn append_entry(&self, draft: NewJournalEntry) -> Result<JournalEntry, DatabaseError> {
        if draft.text.trim().is_empty() {
            return Err(DatabaseError::InvalidState("entry text is empty".into()));
        }
        if draft.owner_id.trim().is_empty() {
            return Err(DatabaseError::InvalidState("entry has no owner".into()));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ENTRY).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO journal_entries (id, app_id, owner_id, text, sentiment, feedback, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    self.app_id(),
                    draft.owner_id.as_str(),
                    draft.text.as_str(),
                    draft.sentiment.as_deref(),
                    draft.feedback.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(entry = %id, owner = %draft.owner_id, "journal entry saved");
        self.notify_changed();

        Ok(JournalEntry {
            id,
            text: draft.text,
            created_at: now,
            sentiment: draft.sentiment,
            feedback: draft.feedback,
            owner_id: draft.owner_id,
        })
    }

    /// Fetch one entry by id, within this app namespace.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no such entry exists.
    pub async fn get_entry(&self, id: &str) -> Result<JournalEntry, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("{SELECT_COLUMNS} WHERE id = ?1 AND app_id = ?2"),
                [id, self.app_id()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_entry(&row)
    }

    /// One-shot read of every entry `owner_id` has. Unordered.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_entries(&self, owner_id: &str) -> Result<Vec<JournalEntry>, DatabaseError> {
        query_entries(self.db().conn(), self.app_id(), owner_id).await
    }
}
