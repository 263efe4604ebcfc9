use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Upcoming,
    Released,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Discovery,
    DateChange,
    Reminder,
    ReleaseDay,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NotificationRecord {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_date: Option<String>,
}

impl NotificationRecord {
    pub fn new(kind: NotificationKind) -> NotificationRecord {
        NotificationRecord {
            kind,
            date: now_string(),
            old_date: None,
            new_date: None,
        }
    }

    pub fn date_change(
        old_date: Option<NaiveDate>,
        new_date: Option<NaiveDate>,
    ) -> NotificationRecord {
        NotificationRecord {
            kind: NotificationKind::DateChange,
            date: now_string(),
            old_date: old_date.map(|d| d.to_string()),
            new_date: new_date.map(|d| d.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub release_date: Option<NaiveDate>,
    pub status: BookStatus,
    pub source_url: String,
    pub discovery_date: String,
    pub last_checked: String,
    #[serde(default)]
    pub notifications_sent: Vec<NotificationRecord>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Book {
    pub fn new(
        title: &str,
        author: &str,
        release_date: Option<NaiveDate>,
        source_url: &str,
        metadata: BTreeMap<String, String>,
    ) -> Book {
        let title = title.trim();
        let author = author.trim();
        Book {
            id: generate_id(title, author, release_date),
            title: title.to_string(),
            author: author.to_string(),
            release_date,
            status: BookStatus::Upcoming,
            source_url: source_url.to_string(),
            discovery_date: now_string(),
            last_checked: now_string(),
            notifications_sent: Vec::new(),
            metadata,
        }
    }

    /// Lowercased (title, author) pair, used to match scraped books against
    /// stored ones when the ids disagree.
    pub fn name_key(&self) -> (String, String) {
        (self.title.to_lowercase(), self.author.to_lowercase())
    }

    pub fn has_sent(&self, kind: NotificationKind) -> bool {
        self.notifications_sent.iter().any(|n| n.kind == kind)
    }

    pub fn record_notification(&mut self, record: NotificationRecord) {
        self.notifications_sent.push(record);
    }

    pub fn refresh_status(&mut self, today: NaiveDate) {
        if let Some(date) = self.release_date {
            if date <= today {
                self.status = BookStatus::Released;
            }
        }
    }
}

/// Deterministic slug id: first two author words, first three title words,
/// plus the release year when known. Stable across runs so the store can
/// match on it.
pub fn generate_id(title: &str, author: &str, release_date: Option<NaiveDate>) -> String {
    let title_part = slug_words(title, 3);
    let author_part = slug_words(author, 2);

    let mut id = format!("{}_{}", author_part, title_part);
    if let Some(date) = release_date {
        id.push_str(&format!("_{}", date.format("%Y")));
    }
    id
}

fn slug_words(s: &str, max_words: usize) -> String {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join("_")
}

pub fn now_string() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn id_from_title_author_year() {
        let id = generate_id(
            "The Doors of Stone",
            "Patrick Rothfuss",
            Some(date("2026-05-01")),
        );
        assert_eq!(id, "patrick_rothfuss_the_doors_of_2026");
    }

    #[test]
    fn id_strips_punctuation() {
        let id = generate_id("Wind & Truth: Book Five", "Brandon Sanderson", None);
        assert_eq!(id, "brandon_sanderson_wind_truth_book");
    }

    #[test]
    fn status_flips_once_released() {
        let mut book = Book::new(
            "Tailored Realities",
            "Brandon Sanderson",
            Some(date("2025-12-09")),
            "https://example.com",
            BTreeMap::new(),
        );
        book.refresh_status(date("2025-12-08"));
        assert_eq!(book.status, BookStatus::Upcoming);
        book.refresh_status(date("2025-12-09"));
        assert_eq!(book.status, BookStatus::Released);
    }

    #[test]
    fn no_date_stays_upcoming() {
        let mut book = Book::new(
            "Untitled",
            "Someone",
            None,
            "https://example.com",
            BTreeMap::new(),
        );
        book.refresh_status(date("2030-01-01"));
        assert_eq!(book.status, BookStatus::Upcoming);
    }

    #[test]
    fn notification_dedup_by_kind() {
        let mut book = Book::new("A", "B", None, "", BTreeMap::new());
        assert!(!book.has_sent(NotificationKind::Reminder));
        book.record_notification(NotificationRecord::new(NotificationKind::Reminder));
        assert!(book.has_sent(NotificationKind::Reminder));
        assert!(!book.has_sent(NotificationKind::ReleaseDay));
    }
}
