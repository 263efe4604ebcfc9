use crate::{
    book::{now_string, Book},
    Result,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const SCHEDULES_FILE: &str = "release_schedules.json";

/// The flat-file state, committed back to the repository after each run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Schedules {
    pub books: Vec<Book>,
    pub last_updated: String,
}

impl Schedules {
    pub fn empty() -> Schedules {
        Schedules {
            books: Vec::new(),
            last_updated: now_string(),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }
}

/// A missing or unreadable file starts a fresh schedule rather than failing
/// the run; the next save rewrites it.
pub fn load(path: &Path) -> Schedules {
    if !path.exists() {
        log::info!(
            "Schedules file not found, starting fresh: {}",
            path.display()
        );
        return Schedules::empty();
    }

    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|contents| serde_json::from_str(&contents).map_err(|e| e.to_string()));

    match parsed {
        Ok(schedules) => schedules,
        Err(e) => {
            log::error!("Error loading release schedules: {}", e);
            Schedules::empty()
        }
    }
}

pub fn save(path: &Path, schedules: &mut Schedules) -> Result<()> {
    schedules.last_updated = now_string();
    fs::write(path, serde_json::to_string_pretty(schedules)?)?;
    log::info!("Release schedules saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("bookwatch_{}_{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_starts_fresh() {
        let schedules = load(Path::new("no/such/schedules.json"));
        assert!(schedules.books.is_empty());
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{not json").unwrap();
        let schedules = load(&path);
        assert!(schedules.books.is_empty());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn round_trip() {
        let path = temp_path("roundtrip.json");
        let mut schedules = Schedules::empty();
        schedules.books.push(Book::new(
            "Tailored Realities",
            "Brandon Sanderson",
            Some("2025-12-09".parse().unwrap()),
            "https://www.booknotification.com/authors/brandon-sanderson",
            BTreeMap::new(),
        ));
        save(&path, &mut schedules).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.books.len(), 1);
        assert_eq!(loaded.books[0].title, "Tailored Realities");
        assert_eq!(
            loaded.books[0].release_date,
            Some("2025-12-09".parse().unwrap())
        );
        assert_eq!(loaded.last_updated, schedules.last_updated);
        fs::remove_file(&path).unwrap();
    }
}
