//! Ordering and rendering of the entry feed.
//!
//! Snapshots arrive unordered; consumers sort on every event.

use std::fmt::Write as _;

use chalk_core::entities::JournalEntry;
use chalk_core::placeholders::NOT_ANALYZED;
use chrono::Local;
use serde::Serialize;

pub const EMPTY_FEED: &str = "No entries yet. Start writing!";

/// Sort by `created_at`, newest first. Entries with equal timestamps keep
/// their relative order.
pub fn sort_newest_first(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Display fields of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub id: String,
    /// Creation time in the local timezone.
    pub date: String,
    pub sentiment: String,
    pub text: String,
    pub feedback: Option<String>,
}

impl From<&JournalEntry> for EntryView {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            id: entry.id.clone(),
            date: entry
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            sentiment: entry
                .sentiment
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| NOT_ANALYZED.to_string()),
            text: entry.text.clone(),
            feedback: entry.feedback.clone().filter(|f| !f.is_empty()),
        }
    }
}

/// Newest-first views of `entries`.
#[must_use]
pub fn views(entries: &[JournalEntry]) -> Vec<EntryView> {
    let mut sorted = entries.to_vec();
    sort_newest_first(&mut sorted);
    sorted.iter().map(EntryView::from).collect()
}

/// Plain-text feed, newest first.
#[must_use]
pub fn render_feed(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_FEED.to_string();
    }

    let mut out = String::new();
    for (i, view) in views(entries).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}  [{}]", view.date, view.sentiment);
        let _ = writeln!(out, "{}", view.text);
        if let Some(feedback) = &view.feedback {
            let _ = writeln!(out, "AI Feedback: {feedback}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(id: &str, at: DateTime<Utc>, sentiment: Option<&str>) -> JournalEntry {
        JournalEntry {
            id: id.into(),
            text: format!("text of {id}"),
            created_at: at,
            sentiment: sentiment.map(Into::into),
            feedback: None,
            owner_id: "u1".into(),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn newest_first_and_stable() {
        let mut entries = vec![
            entry("a", at(8), None),
            entry("b", at(12), None),
            entry("c", at(8), None),
            entry("d", at(10), None),
        ];
        sort_newest_first(&mut entries);
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn missing_sentiment_shows_not_analyzed() {
        let view = EntryView::from(&entry("a", at(8), None));
        assert_eq!(view.sentiment, "Not analyzed");
        assert_eq!(view.feedback, None);

        let view = EntryView::from(&entry("b", at(8), Some("Positive")));
        assert_eq!(view.sentiment, "Positive");
    }

    #[test]
    fn empty_feed_message() {
        assert_eq!(render_feed(&[]), "No entries yet. Start writing!");
    }

    #[test]
    fn render_lists_newest_first_with_feedback() {
        let mut older = entry("old", at(8), Some("Neutral"));
        older.feedback = Some("Try a walk.".into());
        let newer = entry("new", at(9), Some("Positive"));

        let rendered = render_feed(&[older, newer]);
        let new_pos = rendered.find("text of new").unwrap();
        let old_pos = rendered.find("text of old").unwrap();
        assert!(new_pos < old_pos, "{rendered}");
        assert!(rendered.contains("[Positive]"));
        assert!(rendered.contains("AI Feedback: Try a walk."));
        assert_eq!(rendered.matches("AI Feedback:").count(), 1);
    }
}
