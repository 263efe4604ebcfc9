use crate::{
    book::{now_string, Book, NotificationKind, NotificationRecord},
    config,
    email::{EmailKind, Mailer},
    scrapers::BookSource,
    store::{self, Schedules},
    Result,
};
use chrono::{Duration, Local, NaiveDate};
use std::{collections::HashMap, path::Path};

/// Released books fall out of the store after this long.
const CLEANUP_AFTER_DAYS: i64 = 180;
const REMINDER_DAYS: i64 = 7;

/// A matched book whose scraped release date differs from the stored one.
#[derive(Debug, Clone)]
pub struct DateChange {
    pub book: Book,
    pub old_date: Option<NaiveDate>,
    pub new_date: Option<NaiveDate>,
}

/// One full run: scrape every active author, diff against the stored
/// schedule, merge, notify, prune, save.
pub fn run_cycle(
    authors_path: &Path,
    schedules_path: &Path,
    source: &dyn BookSource,
    mailer: &dyn Mailer,
) -> Result<()> {
    log::info!("Starting book release monitoring cycle");

    let authors = config::load(authors_path)?;
    if authors.is_empty() {
        return Err("no authors found in configuration".into());
    }

    let existing = store::load(schedules_path);

    let mut discovered = Vec::new();
    for author in authors.iter().filter(|a| a.is_active()) {
        log::info!("Scraping releases for {}", author.name);
        match source.scrape_author(author) {
            Ok(books) => discovered.extend(books),
            Err(e) => log::error!("Error scraping releases for {}: {}", author.name, e),
        }
    }
    if discovered.is_empty() {
        log::info!("No books discovered from any authors during scraping");
    }

    let (new_discoveries, date_changes) = diff(&existing, &discovered);
    for book in &new_discoveries {
        log::info!("New book discovered: {} by {}", book.title, book.author);
    }
    for change in &date_changes {
        log::info!("Release date changed for: {}", change.book.title);
    }

    let today = Local::now().date_naive();
    let mut updated = update_schedules(existing, &discovered, today);

    // Notify before pruning so a failed send can't lose state.
    send_notifications(&mut updated, &new_discoveries, &date_changes, today, mailer);

    cleanup_old_releases(&mut updated, today);
    store::save(schedules_path, &mut updated)?;

    log::info!("Monitoring cycle completed successfully");
    Ok(())
}

/// Split scraped books into genuinely new ones and date changes against the
/// stored schedule. Matching is by id first, then by lowercased
/// title+author.
pub fn diff(existing: &Schedules, discovered: &[Book]) -> (Vec<Book>, Vec<DateChange>) {
    let mut new_discoveries = Vec::new();
    let mut date_changes = Vec::new();

    for book in discovered {
        match find_existing(book, existing) {
            None => new_discoveries.push(book.clone()),
            Some(prev) => {
                if book.release_date != prev.release_date {
                    date_changes.push(DateChange {
                        book: book.clone(),
                        old_date: prev.release_date,
                        new_date: book.release_date,
                    });
                }
            }
        }
    }

    (new_discoveries, date_changes)
}

pub fn find_existing<'a>(book: &Book, schedules: &'a Schedules) -> Option<&'a Book> {
    if let Some(found) = schedules.find_by_id(&book.id) {
        return Some(found);
    }
    let key = book.name_key();
    schedules.books.iter().find(|b| b.name_key() == key)
}

/// Merge scraped books into the stored schedule. Matched books take the
/// scraped title, date, source url and a metadata union (scraped keys win)
/// but keep their id, discovery date and notification history. Stored books
/// the scrape didn't see are kept as-is with a refreshed check time.
pub fn update_schedules(existing: Schedules, discovered: &[Book], today: NaiveDate) -> Schedules {
    let mut by_id: HashMap<&str, usize> = HashMap::new();
    let mut by_name: HashMap<(String, String), usize> = HashMap::new();
    for (i, book) in existing.books.iter().enumerate() {
        by_id.insert(book.id.as_str(), i);
        by_name.insert(book.name_key(), i);
    }

    let mut matched = vec![false; existing.books.len()];
    let mut final_books = Vec::new();

    for new_book in discovered {
        let idx = by_id
            .get(new_book.id.as_str())
            .or_else(|| by_name.get(&new_book.name_key()))
            .copied();

        match idx {
            Some(i) => {
                let mut updated = existing.books[i].clone();
                updated.title = new_book.title.clone();
                updated.release_date = new_book.release_date;
                updated.source_url = new_book.source_url.clone();
                updated.last_checked = now_string();
                for (k, v) in &new_book.metadata {
                    updated.metadata.insert(k.clone(), v.clone());
                }
                final_books.push(updated);
                matched[i] = true;
            }
            None => final_books.push(new_book.clone()),
        }
    }

    for (i, book) in existing.books.iter().enumerate() {
        if !matched[i] {
            let mut kept = book.clone();
            kept.last_checked = now_string();
            final_books.push(kept);
        }
    }

    for book in &mut final_books {
        book.refresh_status(today);
    }

    Schedules {
        books: final_books,
        last_updated: now_string(),
    }
}

fn send_notifications(
    schedules: &mut Schedules,
    new_discoveries: &[Book],
    date_changes: &[DateChange],
    today: NaiveDate,
    mailer: &dyn Mailer,
) {
    if !new_discoveries.is_empty() {
        log::info!(
            "Sending discovery notifications for {} books",
            new_discoveries.len()
        );
        match mailer.send_books(new_discoveries, EmailKind::Discovery) {
            Ok(()) => {
                for book in new_discoveries {
                    mark_sent(
                        schedules,
                        &book.id,
                        NotificationRecord::new(NotificationKind::Discovery),
                    );
                }
            }
            Err(e) => log::error!("Failed to send discovery notifications: {}", e),
        }
    }

    // Date changes reuse the discovery email.
    if !date_changes.is_empty() {
        let changed: Vec<Book> = date_changes.iter().map(|c| c.book.clone()).collect();
        log::info!(
            "Sending date change notifications for {} books",
            changed.len()
        );
        match mailer.send_books(&changed, EmailKind::Discovery) {
            Ok(()) => {
                for change in date_changes {
                    mark_sent(
                        schedules,
                        &change.book.id,
                        NotificationRecord::date_change(change.old_date, change.new_date),
                    );
                }
            }
            Err(e) => log::error!("Failed to send date change notifications: {}", e),
        }
    }

    let reminder_books: Vec<Book> = schedules
        .books
        .iter()
        .filter(|b| should_send_reminder(b, today))
        .cloned()
        .collect();
    if !reminder_books.is_empty() {
        log::info!(
            "Sending {}-day reminders for {} books",
            REMINDER_DAYS,
            reminder_books.len()
        );
        match mailer.send_books(&reminder_books, EmailKind::Reminder) {
            Ok(()) => {
                for book in &reminder_books {
                    mark_sent(
                        schedules,
                        &book.id,
                        NotificationRecord::new(NotificationKind::Reminder),
                    );
                }
            }
            Err(e) => log::error!("Failed to send reminder notifications: {}", e),
        }
    }

    let release_day_books: Vec<Book> = schedules
        .books
        .iter()
        .filter(|b| should_send_release_day_alert(b, today))
        .cloned()
        .collect();
    if !release_day_books.is_empty() {
        log::info!(
            "Sending release day alerts for {} books",
            release_day_books.len()
        );
        match mailer.send_books(&release_day_books, EmailKind::ReleaseDay) {
            Ok(()) => {
                for book in &release_day_books {
                    mark_sent(
                        schedules,
                        &book.id,
                        NotificationRecord::new(NotificationKind::ReleaseDay),
                    );
                }
            }
            Err(e) => log::error!("Failed to send release day notifications: {}", e),
        }
    }
}

fn mark_sent(schedules: &mut Schedules, id: &str, record: NotificationRecord) {
    match schedules.find_by_id_mut(id) {
        Some(book) => book.record_notification(record),
        None => log::warn!(
            "Could not find book {} in updated schedules to record notification",
            id
        ),
    }
}

pub fn should_send_reminder(book: &Book, today: NaiveDate) -> bool {
    let release_date = match book.release_date {
        Some(d) => d,
        None => return false,
    };
    today == release_date - Duration::days(REMINDER_DAYS)
        && !book.has_sent(NotificationKind::Reminder)
}

pub fn should_send_release_day_alert(book: &Book, today: NaiveDate) -> bool {
    match book.release_date {
        Some(d) => today == d && !book.has_sent(NotificationKind::ReleaseDay),
        None => false,
    }
}

/// Drop books released more than `CLEANUP_AFTER_DAYS` ago. Books without a
/// date are kept indefinitely.
pub fn cleanup_old_releases(schedules: &mut Schedules, today: NaiveDate) {
    let cutoff = today - Duration::days(CLEANUP_AFTER_DAYS);
    let before = schedules.books.len();

    schedules.books.retain(|book| match book.release_date {
        Some(d) if d < cutoff => {
            log::info!(
                "Removing old release: {} by {} (released {})",
                book.title,
                book.author,
                d
            );
            false
        }
        _ => true,
    });

    let removed = before - schedules.books.len();
    if removed > 0 {
        log::info!("Cleaned up {} old releases", removed);
    }
}
