extern crate chrono;

pub mod book;
pub mod config;
pub mod email;
pub mod logger;
pub mod monitor;
pub mod scrapers;
pub mod store;

use std::{error::Error, result::Result as StdResult};
pub type Result<T> = StdResult<T, Box<dyn Error>>;
