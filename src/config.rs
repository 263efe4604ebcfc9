use crate::Result;
use serde::Deserialize;
use std::{fs, path::Path};

pub const AUTHORS_FILE: &str = "authors.yaml";

#[derive(Deserialize, Debug)]
pub struct AuthorList {
    pub authors: Vec<Author>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Author {
    pub name: String,
    pub book_notification_id: Option<String>,
    #[serde(default)]
    pub status: AuthorStatus,
}

impl Author {
    pub fn is_active(&self) -> bool {
        self.status == AuthorStatus::Active
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthorStatus {
    Active,
    // Anything that isn't "active" is treated as paused, including a
    // missing status field.
    #[serde(other)]
    Inactive,
}

impl Default for AuthorStatus {
    fn default() -> AuthorStatus {
        AuthorStatus::Inactive
    }
}

pub fn load(path: &Path) -> Result<Vec<Author>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
    let list: AuthorList = serde_yaml::from_str(&contents)?;
    Ok(list.authors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_author_list() {
        let yaml = r#"
authors:
  - name: Brandon Sanderson
    book_notification_id: brandon-sanderson
    status: active
  - name: James S. A. Corey
    book_notification_id: james-s-a-corey
    status: retired
  - name: Unlisted Author
"#;
        let list: AuthorList = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(list.authors.len(), 3);
        assert!(list.authors[0].is_active());
        assert!(!list.authors[1].is_active());
        // No status field means not scraped.
        assert!(!list.authors[2].is_active());
        assert_eq!(
            list.authors[0].book_notification_id.as_deref(),
            Some("brandon-sanderson")
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load(Path::new("does/not/exist.yaml")).is_err());
    }
}
