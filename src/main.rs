use bookwatch::{
    config,
    email::{Mailer, ResendMailer},
    logger, monitor,
    scrapers::BookNotification,
    store,
};
use std::{path::Path, process};

fn main() {
    dotenv::dotenv().ok();
    logger::setup_logging(log::LevelFilter::Info).expect("failed to initialize logging");

    log::info!("Book Release Tracker starting up");

    let mailer = match ResendMailer::from_env() {
        Ok(mailer) => mailer,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    let scraper = match BookNotification::new() {
        Ok(scraper) => scraper,
        Err(e) => {
            log::error!("Could not build scraper: {}", e);
            process::exit(1);
        }
    };

    let result = monitor::run_cycle(
        Path::new(config::AUTHORS_FILE),
        Path::new(store::SCHEDULES_FILE),
        &scraper,
        &mailer,
    );

    if let Err(e) = result {
        let error_msg = format!("Book monitoring cycle failed: {}", e);
        log::error!("{}", error_msg);
        if let Err(email_error) = mailer.send_failure_alert(&error_msg) {
            log::error!("Failed to send failure alert: {}", email_error);
        }
        process::exit(1);
    }

    log::info!("Book monitoring completed successfully");
}
