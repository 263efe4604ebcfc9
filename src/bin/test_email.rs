//! Sends a test email and a sample discovery alert to verify the Resend
//! configuration. Run with RESEND_API_KEY and EMAIL_TO set (or in .env).

use bookwatch::{
    book::Book,
    email::{EmailKind, Mailer, ResendMailer},
};
use std::collections::BTreeMap;

fn main() {
    dotenv::dotenv().ok();

    let mailer = match ResendMailer::from_env() {
        Ok(mailer) => mailer,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("\nTo fix this, set the following environment variables:");
            eprintln!("export RESEND_API_KEY='your-resend-api-key'");
            eprintln!("export EMAIL_TO='your-email-address'");
            std::process::exit(1);
        }
    };

    println!("Testing Book Release Tracker email configuration...");

    if let Err(e) = mailer.send_test() {
        eprintln!("Failed to send test email: {}", e);
        std::process::exit(1);
    }
    println!("Test email sent successfully!");

    let mut metadata = BTreeMap::new();
    metadata.insert("series".to_string(), "Standalone Collection".to_string());
    metadata.insert("publisher".to_string(), "Tor Books".to_string());
    let sample = Book::new(
        "Tailored Realities",
        "Brandon Sanderson",
        Some("2025-12-09".parse().expect("valid date")),
        "https://www.booknotification.com/authors/brandon-sanderson",
        metadata,
    );

    println!("Sending sample book discovery alert...");
    match mailer.send_books(&[sample], EmailKind::Discovery) {
        Ok(()) => {
            println!("Sample book discovery alert sent successfully!");
            println!("Check your email inbox!");
        }
        Err(e) => {
            eprintln!("Failed to send sample book discovery alert: {}", e);
            std::process::exit(1);
        }
    }
}
