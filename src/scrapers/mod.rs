use crate::{book::Book, config::Author, Result};
use regex::Regex;
use std::{error::Error, fmt, time::Duration};

pub mod booknotification;

pub use booknotification::BookNotification;

/// Methods specific to a release-tracking site.
pub trait BookSource {
    /// Pull upcoming releases for one configured author.
    fn scrape_author(&self, author: &Author) -> Result<Vec<Book>>;
}

#[derive(Debug)]
pub struct PageFetchError {
    pub url: String,
    pub status: reqwest::StatusCode,
}

impl fmt::Display for PageFetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fetching {} returned {}", self.url, self.status)
    }
}

impl Error for PageFetchError {}

// The site serves a captcha page to obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub fn build_client() -> Result<reqwest::blocking::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT as UA};

    let mut headers = HeaderMap::new();
    headers.insert(UA, HeaderValue::from_static(USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let client = reqwest::blocking::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

pub fn fetch_page(client: &reqwest::blocking::Client, url: &str) -> Result<String> {
    log::info!("Scraping page: {}", url);
    let resp = client.get(url).send()?;
    if !resp.status().is_success() {
        return Err(Box::new(PageFetchError {
            url: url.to_string(),
            status: resp.status(),
        }));
    }
    Ok(resp.text()?)
}

/// Reduce a page to its visible text: drop script/style blocks, replace tags
/// with spaces, decode the entities that show up in titles, and collapse
/// whitespace. Good enough for sentence-level regex matching; this is not an
/// HTML parser.
pub fn html_to_text(html: &str) -> String {
    let scripts = Regex::new(r"(?is)<(script|style)\b.*?</(script|style)>").unwrap();
    let tags = Regex::new(r"(?s)<[^>]*>").unwrap();

    let text = scripts.replace_all(html, " ");
    let text = tags.replace_all(&text, " ");
    let text = decode_entities(&text);
    clean_text(&text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&rsquo;", "'")
        .replace("&nbsp;", " ")
}

pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_scripts() {
        let html = r#"<html><head><style>.a{color:red}</style>
            <script type="text/javascript">var x = "<div>";</script></head>
            <body><p>Hello <b>world</b>.</p></body></html>"#;
        assert_eq!(html_to_text(html), "Hello world .");
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(
            html_to_text("<p>Wind &amp; Truth&#39;s sequel</p>"),
            "Wind & Truth's sequel"
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("  a \n\t b  c "), "a b c");
    }
}
