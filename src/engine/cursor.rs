//! Resume cursor persisted between runs.
//!
//! The on-disk format is a two-line CSV: a `postId` header and the id of the
//! last post acted on. A malformed file is treated as no cursor; only write
//! failures are surfaced, because losing a save would repeat work.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, warn};

const HEADER: &str = "postId";

pub trait CursorStore: Send {
    fn load(&mut self) -> Result<Option<String>>;
    fn save(&mut self, id: &str) -> Result<()>;
}

pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CursorStore for FileCursorStore {
    fn load(&mut self) -> Result<Option<String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cursor file, starting fresh");
                return Ok(None);
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("reading cursor file {}", self.path.display()));
            }
        };

        let mut lines = raw.lines();
        match lines.next() {
            Some(header) if header.trim() == HEADER => {}
            _ => {
                warn!(path = %self.path.display(), "cursor file has no {HEADER} header, ignoring it");
                return Ok(None);
            }
        }
        let id = lines
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string);
        if id.is_none() {
            warn!(path = %self.path.display(), "cursor file has no id row, ignoring it");
        }
        Ok(id)
    }

    fn save(&mut self, id: &str) -> Result<()> {
        let mut file = File::create(&self.path)
            .with_context(|| format!("creating cursor file {}", self.path.display()))?;
        file.write_all(format!("{HEADER}\n{id}\n").as_bytes())
            .with_context(|| format!("writing cursor file {}", self.path.display()))?;
        file.sync_all()
            .with_context(|| format!("flushing cursor file {}", self.path.display()))?;
        debug!(id, "cursor saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCursorStore {
        FileCursorStore::new(dir.path().join("last_post_id.csv"))
    }

    #[test]
    fn test_missing_file_is_no_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.save("urn:li:activity:123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("urn:li:activity:123"));
    }

    #[test]
    fn test_save_overwrites_previous_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
        let raw = std::fs::read_to_string(dir.path().join("last_post_id.csv")).unwrap();
        assert_eq!(raw, "postId\nsecond\n");
    }

    #[test]
    fn test_wrong_header_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_post_id.csv");
        std::fs::write(&path, "orderId\n123\n").unwrap();
        let mut store = FileCursorStore::new(path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_header_without_id_row_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_post_id.csv");
        std::fs::write(&path, "postId\n").unwrap();
        let mut store = FileCursorStore::new(path);
        assert_eq!(store.load().unwrap(), None);

        std::fs::write(dir.path().join("blank.csv"), "postId\n   \n").unwrap();
        let mut blank = FileCursorStore::new(dir.path().join("blank.csv"));
        assert_eq!(blank.load().unwrap(), None);
    }

    #[test]
    fn test_id_whitespace_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_post_id.csv");
        std::fs::write(&path, "postId\n  abc  \n").unwrap();
        let mut store = FileCursorStore::new(path);
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileCursorStore::new(dir.path().join("missing").join("cursor.csv"));
        let error = store.save("abc").unwrap_err();
        assert!(format!("{error:#}").contains("creating cursor file"));
    }
}
