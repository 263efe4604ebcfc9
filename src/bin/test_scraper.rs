//! Local smoke test for the booknotification.com scraper: fetches a couple
//! of real author pages and prints whatever it extracts.

use bookwatch::{
    config::{Author, AuthorStatus},
    scrapers::{BookNotification, BookSource},
};

fn main() {
    println!("Book Release Scraper - Local Testing");
    println!("====================================");

    let scraper = match BookNotification::new() {
        Ok(scraper) => scraper,
        Err(e) => {
            eprintln!("Could not build scraper: {}", e);
            std::process::exit(1);
        }
    };

    let test_authors = [
        ("James S. A. Corey", "james-s-a-corey"),
        ("Brandon Sanderson", "brandon-sanderson"),
    ];

    for (name, id) in &test_authors {
        println!("\n=== Testing {} ===", name);
        println!("Author ID: {}", id);
        println!("URL: https://www.booknotification.com/authors/{}", id);

        let author = Author {
            name: name.to_string(),
            book_notification_id: Some(id.to_string()),
            status: AuthorStatus::Active,
        };

        match scraper.scrape_author(&author) {
            Ok(books) => {
                println!("Found {} books", books.len());
                for (i, book) in books.iter().enumerate() {
                    println!("\nBook {}:", i + 1);
                    println!("  Title: {}", book.title);
                    println!(
                        "  Release Date: {}",
                        book.release_date
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "N/A".to_string())
                    );
                    println!("  Source: {}", book.source_url);
                    if !book.metadata.is_empty() {
                        println!("  Metadata: {:?}", book.metadata);
                    }
                }
            }
            Err(e) => eprintln!("Error testing {}: {}", name, e),
        }
    }

    println!("\n=== Testing Complete ===");
}
