use crate::{
    book::Book,
    config::Author,
    scrapers::{self, BookSource},
    Result,
};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

const BASE_URL: &str = "https://www.booknotification.com";

/// Scraper for booknotification.com author pages. Upcoming releases are
/// announced in the FAQ section in two prose shapes:
///
///   "<Author> has a new book coming out on <date> called <title>."
///   "<Author> has 2 new books coming out: <title> will be released on
///    <date>. <title> will be released on <date>."
pub struct BookNotification {
    base_url: String,
    client: reqwest::blocking::Client,
    single_book: Regex,
    multi_gate: Regex,
    multi_book: Regex,
    title_preamble: Regex,
}

impl BookNotification {
    pub fn new() -> Result<BookNotification> {
        Ok(BookNotification {
            base_url: BASE_URL.to_string(),
            client: scrapers::build_client()?,
            single_book: Regex::new(
                r"(?i)has a new book coming out on\s+(.+?)\s+called\s+(.+?)(?:\.|$)",
            )?,
            multi_gate: Regex::new(r"(?i)has\s+.*?\bbooks?\s+coming\s+out")?,
            multi_book: Regex::new(r"(?i)([^.]+?)\s+will be released on\s+([^.]+?)(?:\.|$)")?,
            title_preamble: Regex::new(r"(?i)^(?:and\s+)?(?:.*?\bbooks?\s+coming\s+out:\s*)?")?,
        })
    }

    fn extract_books(&self, text: &str, author_name: &str, source_url: &str) -> Vec<Book> {
        let mut books = Vec::new();

        for caps in self.single_book.captures_iter(text) {
            let date = parse_release_date(&caps[1]);
            let title = caps[2].trim();
            if date.is_some() && !title.is_empty() {
                log::info!("Found upcoming book: {} - {:?}", title, date);
                books.push(self.build_book(title, author_name, date, source_url, "faq"));
            }
        }

        if self.multi_gate.is_match(text) {
            for caps in self.multi_book.captures_iter(text) {
                let title = self.clean_multi_title(&caps[1]);
                let date = parse_release_date(&caps[2]);
                if date.is_some() && title.len() > 3 {
                    log::info!("Found upcoming book (multiple pattern): {} - {:?}", title, date);
                    books.push(self.build_book(
                        &title,
                        author_name,
                        date,
                        source_url,
                        "faq_multiple",
                    ));
                }
            }
        }

        books
    }

    // The multi-book sentence leaves "<Author> has N new books coming out:"
    // glued to the first title, and "and" glued to the last one.
    fn clean_multi_title(&self, raw: &str) -> String {
        self.title_preamble.replace(raw.trim(), "").trim().to_string()
    }

    fn build_book(
        &self,
        title: &str,
        author_name: &str,
        release_date: Option<NaiveDate>,
        source_url: &str,
        pattern: &str,
    ) -> Book {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), pattern.to_string());
        metadata.insert("confidence".to_string(), "high".to_string());
        Book::new(title, author_name, release_date, source_url, metadata)
    }
}

impl BookSource for BookNotification {
    fn scrape_author(&self, author: &Author) -> Result<Vec<Book>> {
        let author_id = author
            .book_notification_id
            .as_deref()
            .ok_or_else(|| format!("no book_notification_id for {}", author.name))?;

        let url = format!("{}/authors/{}", self.base_url, author_id);
        let html = scrapers::fetch_page(&self.client, &url)?;
        let text = scrapers::html_to_text(&html);

        let mut books = self.extract_books(&text, &author.name, &url);

        // The two patterns overlap on some pages; collapse them by id, and
        // only keep releases that haven't happened yet.
        let today = Local::now().date_naive();
        let mut seen = HashSet::new();
        books.retain(|b| b.release_date.map_or(false, |d| d >= today) && seen.insert(b.id.clone()));

        Ok(books)
    }
}

/// Parse a release date out of FAQ prose. Tries the formats the site has
/// used, most specific first. Month-only dates resolve to the 1st, bare
/// years to January 1st.
pub fn parse_release_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = scrapers::clean_text(date_str);

    // An invalid match (month 13, day 45) falls through to the next,
    // less specific pattern rather than failing the parse outright.
    let ymd = Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap();
    if let Some(d) = ymd
        .captures(&date_str)
        .and_then(|c| from_ymd(&c[1], &c[2], &c[3]))
    {
        return Some(d);
    }

    let mdy_slash = Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap();
    if let Some(d) = mdy_slash
        .captures(&date_str)
        .and_then(|c| from_ymd(&c[3], &c[1], &c[2]))
    {
        return Some(d);
    }

    let mdy_dash = Regex::new(r"(\d{1,2})-(\d{1,2})-(\d{4})").unwrap();
    if let Some(d) = mdy_dash
        .captures(&date_str)
        .and_then(|c| from_ymd(&c[3], &c[1], &c[2]))
    {
        return Some(d);
    }

    let month_day_year =
        Regex::new(r"(?i)([A-Za-z]{3,9})\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})").unwrap();
    if let Some(d) = month_day_year
        .captures(&date_str)
        .and_then(|c| month_number(&c[1]).and_then(|m| make_date(&c[3], m, &c[2])))
    {
        return Some(d);
    }

    let day_month_year = Regex::new(r"(?i)(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})").unwrap();
    if let Some(d) = day_month_year
        .captures(&date_str)
        .and_then(|c| month_number(&c[2]).and_then(|m| make_date(&c[3], m, &c[1])))
    {
        return Some(d);
    }

    let month_year = Regex::new(r"(?i)([A-Za-z]{3,9})\s+(\d{4})").unwrap();
    if let Some(d) = month_year
        .captures(&date_str)
        .and_then(|c| month_number(&c[1]).and_then(|m| make_date(&c[2], m, "1")))
    {
        return Some(d);
    }

    let year_only = Regex::new(r"(\d{4})").unwrap();
    if let Some(d) = year_only
        .captures(&date_str)
        .and_then(|c| make_date(&c[1], 1, "1"))
    {
        return Some(d);
    }

    None
}

fn from_ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn make_date(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn parse_iso_date() {
        assert_eq!(parse_release_date("2025-12-09"), Some(date("2025-12-09")));
    }

    #[test]
    fn parse_us_slash_and_dash() {
        assert_eq!(parse_release_date("12/09/2025"), Some(date("2025-12-09")));
        assert_eq!(parse_release_date("12-09-2025"), Some(date("2025-12-09")));
    }

    #[test]
    fn parse_month_name_dates() {
        assert_eq!(
            parse_release_date("December 9, 2025"),
            Some(date("2025-12-09"))
        );
        assert_eq!(
            parse_release_date("December 9th, 2025"),
            Some(date("2025-12-09"))
        );
        assert_eq!(
            parse_release_date("9 December 2025"),
            Some(date("2025-12-09"))
        );
        assert_eq!(parse_release_date("Sept 3 2026"), Some(date("2026-09-03")));
    }

    #[test]
    fn parse_partial_dates() {
        assert_eq!(
            parse_release_date("December 2025"),
            Some(date("2025-12-01"))
        );
        assert_eq!(parse_release_date("2025"), Some(date("2025-01-01")));
    }

    #[test]
    fn parse_garbage() {
        assert_eq!(parse_release_date("soonish"), None);
        assert_eq!(parse_release_date(""), None);
        // A month number that doesn't exist falls through to the year rule.
        assert_eq!(parse_release_date("13/45/2025"), Some(date("2025-01-01")));
    }

    #[test]
    fn extract_single_book_sentence() {
        let scraper = BookNotification::new().unwrap();
        let text = "Brandon Sanderson has a new book coming out on \
                    December 9th, 2025 called Tailored Realities. \
                    Read more below.";
        let books = scraper.extract_books(text, "Brandon Sanderson", "https://example.com");
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Tailored Realities");
        assert_eq!(books[0].release_date, Some(date("2025-12-09")));
        assert_eq!(books[0].author, "Brandon Sanderson");
        assert_eq!(books[0].metadata.get("source").map(String::as_str), Some("faq"));
    }

    #[test]
    fn extract_multiple_books_sentence() {
        let scraper = BookNotification::new().unwrap();
        let text = "James S. A. Corey has 2 new books coming out: \
                    The Mercy of Gods will be released on August 6, 2026. \
                    and Livesuit will be released on 3 September 2026.";
        let books = scraper.extract_books(text, "James S. A. Corey", "https://example.com");
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "The Mercy of Gods");
        assert_eq!(books[0].release_date, Some(date("2026-08-06")));
        assert_eq!(books[1].title, "Livesuit");
        assert_eq!(books[1].release_date, Some(date("2026-09-03")));
    }

    #[test]
    fn multi_pattern_needs_the_gate_sentence() {
        let scraper = BookNotification::new().unwrap();
        let text = "Some unrelated page: The Hobbit will be released on May 1, 2026.";
        let books = scraper.extract_books(text, "J. R. R. Tolkien", "https://example.com");
        assert!(books.is_empty());
    }

    #[test]
    fn unparseable_date_drops_the_book() {
        let scraper = BookNotification::new().unwrap();
        let text = "X has a new book coming out on someday soon called Mystery.";
        let books = scraper.extract_books(text, "X", "https://example.com");
        // "someday soon" has no year, so the single pattern yields nothing.
        assert!(books.is_empty());
    }
}
