//! HTML for the notification emails. Editorial/serif look, one card per
//! book, shared stylesheet across every message.

use crate::{book::Book, email::EmailKind};
use chrono::Local;

struct Style {
    subject_emoji: &'static str,
    header_title: &'static str,
    footer_message: &'static str,
    accent_color: &'static str,
    accent_light: &'static str,
    badge_text: &'static str,
    icon: &'static str,
}

fn style(kind: EmailKind) -> &'static Style {
    match kind {
        EmailKind::Discovery => &Style {
            subject_emoji: "\u{1F4DA}",
            header_title: "New Discovery",
            footer_message: "More literary adventures await.",
            accent_color: "#2D5A4A",
            accent_light: "#E8F0EC",
            badge_text: "NEW DISCOVERY",
            icon: "\u{25C6}",
        },
        EmailKind::Reminder => &Style {
            subject_emoji: "\u{1F4C5}",
            header_title: "Release Reminder",
            footer_message: "Mark your calendar.",
            accent_color: "#8B6914",
            accent_light: "#FBF6E9",
            badge_text: "7 DAYS",
            icon: "\u{25C7}",
        },
        EmailKind::ReleaseDay => &Style {
            subject_emoji: "\u{1F389}",
            header_title: "Available Now",
            footer_message: "Happy reading.",
            accent_color: "#8B1538",
            accent_light: "#FAF0F2",
            badge_text: "OUT TODAY",
            icon: "\u{2605}",
        },
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "book"
    } else {
        "books"
    }
}

pub fn subject(kind: EmailKind, count: usize) -> String {
    let s = style(kind);
    let line = match kind {
        EmailKind::Discovery => format!("{} new {} discovered!", count, plural(count)),
        EmailKind::Reminder => format!("{} {} releasing in 7 days!", count, plural(count)),
        EmailKind::ReleaseDay => format!("{} {} available now!", count, plural(count)),
    };
    format!("{} {}", s.subject_emoji, line)
}

fn subtitle(kind: EmailKind, count: usize) -> String {
    match kind {
        EmailKind::Discovery => {
            format!("{} new {} from your favorite authors", count, plural(count))
        }
        EmailKind::Reminder => format!("{} {} arriving in just 7 days", count, plural(count)),
        EmailKind::ReleaseDay => {
            format!("{} {} ready for your reading list", count, plural(count))
        }
    }
}

pub fn notification_email(books: &[Book], kind: EmailKind) -> String {
    let s = style(kind);
    let current_date = Local::now().format("%B %Y").to_string().to_uppercase();

    let mut cards = String::new();
    for (i, book) in books.iter().enumerate() {
        cards.push_str(&book_card(book, s));
        if i + 1 < books.len() {
            cards.push_str("<div class=\"divider\">\u{25C6} \u{25C6} \u{25C6}</div>\n");
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{styles}</style>
</head>
<body>
    <div class="email-wrapper">
        <div class="masthead">
            <p class="masthead-title">Your Personal</p>
            <h1 class="masthead-logo">Book Release Tracker</h1>
        </div>

        <div class="header">
            <div class="header-icon">{icon}</div>
            <h2 class="header-title">{title}</h2>
            <p class="header-subtitle">{subtitle}</p>
            <p class="header-date">{date}</p>
        </div>

        <div class="content">
{cards}
        </div>

        <div class="footer">
            <p class="footer-message">{footer}</p>
            <p class="footer-brand">Automated by Book Release Tracker</p>
            <p class="footer-powered">Powered by Resend</p>
        </div>
    </div>
</body>
</html>
"#,
        title = s.header_title,
        styles = BASE_STYLES,
        icon = s.icon,
        subtitle = subtitle(kind, books.len()),
        date = current_date,
        cards = cards,
        footer = s.footer_message,
    )
}

fn book_card(book: &Book, s: &Style) -> String {
    let date_str = book
        .release_date
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_default();

    let mut meta = String::from("<div class=\"book-meta\">");
    if let Some(series) = book.metadata.get("series") {
        meta.push_str(&format!(
            "<div class=\"book-series\">\u{25C6} {}</div>",
            series
        ));
    }
    if !date_str.is_empty() {
        meta.push_str(&format!(
            r#"<div class="book-date">
                <span class="book-date-label">Release Date</span>
                <span class="book-date-value">{}</span>
            </div>"#,
            date_str
        ));
    }
    meta.push_str("</div>");

    let source = if book.source_url.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="book-source">
                <a href="{}" class="book-source-link">View source &#8594;</a>
            </div>"#,
            book.source_url
        )
    };

    format!(
        r#"<div class="book-card">
    <div class="book-card-accent" style="background-color: {accent};"></div>
    <div class="book-card-inner">
        <span class="book-badge" style="background-color: {light}; color: {accent};">{badge}</span>
        <h2 class="book-title">{title}</h2>
        <p class="book-author">by {author}</p>
        {meta}
        {source}
    </div>
</div>
"#,
        accent = s.accent_color,
        light = s.accent_light,
        badge = s.badge_text,
        title = book.title,
        author = book.author,
        meta = meta,
        source = source,
    )
}

pub fn failure_alert_email(error_details: &str) -> String {
    let current_date = Local::now().format("%B %d, %Y").to_string();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tracker Alert</title>
    <style>{styles}</style>
</head>
<body>
    <div class="email-wrapper">
        <div class="masthead" style="background: linear-gradient(135deg, #5C1A1A 0%, #3D1A1A 100%); border-bottom-color: #8B1538;">
            <p class="masthead-title" style="color: #D4A0A0;">System Alert</p>
            <h1 class="masthead-logo">Book Release Tracker</h1>
        </div>

        <div class="header">
            <div class="header-icon" style="color: #8B1538;">&#9888;</div>
            <h2 class="header-title">Action Required</h2>
            <p class="header-subtitle">Your tracker encountered an issue</p>
            <p class="header-date">{date}</p>
        </div>

        <div class="content">
            <div class="alert-card">
                <h3 class="alert-title">Error Details</h3>
                <div class="alert-code">{details}</div>
            </div>

            <div style="margin-bottom: 24px;">
                <h4 style="font-family: Georgia, serif; font-size: 16px; color: #2C2C2C; margin: 0 0 16px 0;">Possible Causes</h4>
                <ul class="alert-list">
                    <li>Author pages may have changed structure</li>
                    <li>Website updates affecting data extraction</li>
                    <li>Network connectivity issues</li>
                    <li>Anti-bot measures blocking access</li>
                </ul>
            </div>

            <div>
                <h4 style="font-family: Georgia, serif; font-size: 16px; color: #2C2C2C; margin: 0 0 16px 0;">Recommended Actions</h4>
                <ol class="alert-list">
                    <li>Verify author pages are accessible</li>
                    <li>Check CI logs</li>
                    <li>Review scraper configuration</li>
                    <li>Update scraper if site structure changed</li>
                </ol>
            </div>
        </div>

        <div class="footer">
            <p class="footer-message">Automated system alert</p>
            <p class="footer-brand">Book Release Tracker</p>
            <p class="footer-powered">Powered by Resend</p>
        </div>
    </div>
</body>
</html>
"#,
        styles = BASE_STYLES,
        date = current_date,
        details = error_details,
    )
}

pub fn test_email() -> String {
    let current_date = Local::now().format("%B %d, %Y").to_string();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Test Email</title>
    <style>{styles}</style>
</head>
<body>
    <div class="email-wrapper">
        <div class="masthead">
            <p class="masthead-title">Your Personal</p>
            <h1 class="masthead-logo">Book Release Tracker</h1>
        </div>

        <div class="header">
            <div class="header-icon" style="color: #2D5A4A;">&#10003;</div>
            <h2 class="header-title">Configuration Verified</h2>
            <p class="header-subtitle">Your email setup is working correctly</p>
            <p class="header-date">{date}</p>
        </div>

        <div class="content">
            <div class="book-card">
                <div class="book-card-accent" style="background-color: #2D5A4A;"></div>
                <div class="book-card-inner" style="text-align: center; padding: 40px 32px;">
                    <p style="font-family: Georgia, serif; font-size: 18px; color: #2C2C2C; margin: 0 0 16px 0;">
                        Everything is set up and ready.
                    </p>
                    <p style="font-family: Georgia, serif; font-size: 15px; color: #6B6B6B; font-style: italic; margin: 0;">
                        You'll receive notifications when new books are discovered<br>
                        from your favorite authors.
                    </p>
                </div>
            </div>
        </div>

        <div class="footer">
            <p class="footer-message">Happy reading ahead.</p>
            <p class="footer-brand">Book Release Tracker</p>
            <p class="footer-powered">Powered by Resend</p>
        </div>
    </div>
</body>
</html>
"#,
        styles = BASE_STYLES,
        date = current_date,
    )
}

const BASE_STYLES: &str = r#"
        body {
            margin: 0;
            padding: 0;
            background-color: #F5F1EB;
            font-family: Georgia, 'Times New Roman', serif;
            line-height: 1.7;
            color: #2C2C2C;
            -webkit-font-smoothing: antialiased;
        }

        .email-wrapper {
            max-width: 600px;
            margin: 0 auto;
            background-color: #FFFDF9;
            box-shadow: 0 4px 24px rgba(44, 44, 44, 0.08);
        }

        .masthead {
            background: linear-gradient(135deg, #2C2C2C 0%, #3D3D3D 100%);
            padding: 32px 40px;
            text-align: center;
            border-bottom: 3px solid #C9A227;
        }

        .masthead-title {
            font-family: Georgia, serif;
            font-size: 11px;
            letter-spacing: 4px;
            text-transform: uppercase;
            color: #C9A227;
            margin: 0 0 8px 0;
        }

        .masthead-logo {
            font-family: Georgia, serif;
            font-size: 28px;
            font-weight: normal;
            font-style: italic;
            color: #FFFDF9;
            margin: 0;
            letter-spacing: 1px;
        }

        .header {
            padding: 48px 40px 32px 40px;
            text-align: center;
            border-bottom: 1px solid #E8E4DC;
        }

        .header-icon {
            font-size: 32px;
            color: #C9A227;
            margin-bottom: 16px;
        }

        .header-title {
            font-family: Georgia, serif;
            font-size: 32px;
            font-weight: normal;
            color: #2C2C2C;
            margin: 0 0 12px 0;
            letter-spacing: -0.5px;
        }

        .header-subtitle {
            font-family: Georgia, serif;
            font-size: 16px;
            color: #6B6B6B;
            margin: 0;
            font-style: italic;
        }

        .header-date {
            font-family: 'Helvetica Neue', Arial, sans-serif;
            font-size: 11px;
            letter-spacing: 2px;
            text-transform: uppercase;
            color: #9B9B9B;
            margin-top: 20px;
        }

        .content {
            padding: 32px 40px;
        }

        .book-card {
            background-color: #FFFDF9;
            border: 1px solid #E8E4DC;
            margin-bottom: 24px;
            position: relative;
        }

        .book-card-accent {
            height: 4px;
            width: 100%;
        }

        .book-card-inner {
            padding: 28px 32px;
        }

        .book-badge {
            display: inline-block;
            font-family: 'Helvetica Neue', Arial, sans-serif;
            font-size: 10px;
            letter-spacing: 2px;
            text-transform: uppercase;
            padding: 6px 14px;
            margin-bottom: 16px;
            font-weight: 600;
        }

        .book-title {
            font-family: Georgia, serif;
            font-size: 24px;
            font-weight: normal;
            color: #2C2C2C;
            margin: 0 0 8px 0;
            line-height: 1.3;
        }

        .book-author {
            font-family: Georgia, serif;
            font-size: 15px;
            color: #6B6B6B;
            margin: 0 0 20px 0;
            font-style: italic;
        }

        .book-meta {
            border-top: 1px solid #E8E4DC;
            padding-top: 20px;
            margin-top: 20px;
        }

        .book-series {
            font-family: 'Helvetica Neue', Arial, sans-serif;
            font-size: 12px;
            letter-spacing: 1px;
            text-transform: uppercase;
            color: #8B6914;
            margin-bottom: 12px;
        }

        .book-date {
            display: flex;
            align-items: center;
            gap: 12px;
        }

        .book-date-label {
            font-family: 'Helvetica Neue', Arial, sans-serif;
            font-size: 11px;
            letter-spacing: 1.5px;
            text-transform: uppercase;
            color: #9B9B9B;
        }

        .book-date-value {
            font-family: Georgia, serif;
            font-size: 18px;
            color: #2C2C2C;
            font-weight: normal;
        }

        .book-source {
            margin-top: 16px;
            padding-top: 16px;
            border-top: 1px dashed #E8E4DC;
        }

        .book-source-link {
            font-family: 'Helvetica Neue', Arial, sans-serif;
            font-size: 11px;
            color: #9B9B9B;
            text-decoration: none;
        }

        .book-source-link:hover {
            color: #6B6B6B;
        }

        .divider {
            text-align: center;
            padding: 8px 0;
            color: #C9A227;
            font-size: 14px;
            letter-spacing: 8px;
        }

        .footer {
            background-color: #F9F7F3;
            padding: 32px 40px;
            text-align: center;
            border-top: 1px solid #E8E4DC;
        }

        .footer-message {
            font-family: Georgia, serif;
            font-size: 15px;
            font-style: italic;
            color: #6B6B6B;
            margin: 0 0 20px 0;
        }

        .footer-brand {
            font-family: 'Helvetica Neue', Arial, sans-serif;
            font-size: 10px;
            letter-spacing: 2px;
            text-transform: uppercase;
            color: #9B9B9B;
            margin: 0;
        }

        .footer-powered {
            font-family: 'Helvetica Neue', Arial, sans-serif;
            font-size: 10px;
            color: #BFBFBF;
            margin-top: 8px;
        }

        .alert-card {
            background-color: #FDF8F8;
            border: 1px solid #E8D4D4;
            border-left: 4px solid #8B1538;
            padding: 28px 32px;
            margin-bottom: 24px;
        }

        .alert-title {
            font-family: Georgia, serif;
            font-size: 20px;
            color: #8B1538;
            margin: 0 0 16px 0;
        }

        .alert-content {
            font-family: Georgia, serif;
            font-size: 15px;
            color: #4A4A4A;
            line-height: 1.7;
        }

        .alert-code {
            background-color: #2C2C2C;
            color: #E8E4DC;
            padding: 16px 20px;
            font-family: 'Monaco', 'Menlo', monospace;
            font-size: 12px;
            line-height: 1.5;
            overflow-x: auto;
            margin: 16px 0;
            border-radius: 2px;
        }

        .alert-list {
            font-family: Georgia, serif;
            font-size: 14px;
            color: #4A4A4A;
            padding-left: 20px;
        }

        .alert-list li {
            margin-bottom: 8px;
        }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_book() -> Book {
        let mut metadata = BTreeMap::new();
        metadata.insert("series".to_string(), "Standalone Collection".to_string());
        Book::new(
            "Tailored Realities",
            "Brandon Sanderson",
            Some("2025-12-09".parse().unwrap()),
            "https://www.booknotification.com/authors/brandon-sanderson",
            metadata,
        )
    }

    #[test]
    fn subject_pluralizes() {
        assert_eq!(
            subject(EmailKind::Discovery, 1),
            "\u{1F4DA} 1 new book discovered!"
        );
        assert_eq!(
            subject(EmailKind::Discovery, 3),
            "\u{1F4DA} 3 new books discovered!"
        );
        assert_eq!(
            subject(EmailKind::Reminder, 2),
            "\u{1F4C5} 2 books releasing in 7 days!"
        );
        assert_eq!(
            subject(EmailKind::ReleaseDay, 1),
            "\u{1F389} 1 book available now!"
        );
    }

    #[test]
    fn notification_email_renders_book_card() {
        let html = notification_email(&[sample_book()], EmailKind::Discovery);
        assert!(html.contains("Tailored Realities"));
        assert!(html.contains("by Brandon Sanderson"));
        assert!(html.contains("December 09, 2025"));
        assert!(html.contains("Standalone Collection"));
        assert!(html.contains("NEW DISCOVERY"));
        assert!(html.contains("https://www.booknotification.com/authors/brandon-sanderson"));
        // Single book: no divider element.
        assert!(!html.contains("class=\"divider\""));
    }

    #[test]
    fn divider_between_cards() {
        let html = notification_email(&[sample_book(), sample_book()], EmailKind::Reminder);
        assert_eq!(html.matches("class=\"divider\"").count(), 1);
        assert!(!html.contains("OUT TODAY"));
        assert!(html.contains("7 DAYS"));
    }

    #[test]
    fn dateless_book_omits_date_row() {
        let book = Book::new("Untitled", "Someone", None, "", BTreeMap::new());
        let html = notification_email(&[book], EmailKind::Discovery);
        assert!(!html.contains("Release Date"));
        assert!(!html.contains("View source"));
    }

    #[test]
    fn failure_email_includes_details() {
        let html = failure_alert_email("fetching xyz returned 503");
        assert!(html.contains("fetching xyz returned 503"));
        assert!(html.contains("Action Required"));
    }

    #[test]
    fn test_email_renders() {
        let html = test_email();
        assert!(html.contains("Configuration Verified"));
    }
}
