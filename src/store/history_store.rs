use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use chrono::{DateTime, Local, TimeDelta};
use regex::Regex;
use tracing::{info, warn};

use crate::error::HistoryError;
use crate::store::history::History;

static HISTORY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}$")
        .expect("history file name pattern is valid")
});

/// One file per finished test, named by its local finish time.
pub struct HistoryStore {
    base_dir: PathBuf,
}

impl HistoryStore {
    pub fn new() -> Result<Self> {
        let base_dir = state_dir().join("ptype").join("history");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn is_history_name(name: &str) -> bool {
        HISTORY_NAME.is_match(name)
    }

    /// Write `history` under a fresh timestamp name and return that name.
    pub fn write(&self, history: &History) -> Result<String> {
        let name = self.unused_name(Local::now());
        let path = self.base_dir.join(&name);
        let tmp_path = self.base_dir.join(format!(".{name}.tmp"));

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&history.encode())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &path)?;

        info!(file = %name, "wrote history");
        Ok(name)
    }

    /// Timestamp name for `at`, moved forward a millisecond at a time past
    /// names already on disk.
    fn unused_name(&self, mut at: DateTime<Local>) -> String {
        loop {
            let name = at.format("%Y-%m-%d-%H:%M:%S,%3f").to_string();
            if !self.base_dir.join(&name).exists() {
                return name;
            }
            at += TimeDelta::milliseconds(1);
        }
    }

    /// History file names, newest first. Other files are ignored.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| Self::is_history_name(name))
            .collect();
        names.sort_unstable_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Delete all but the newest `limit` files and return the names kept.
    /// Files that can't be removed stay listed.
    pub fn prune(&self, limit: usize) -> Result<Vec<String>> {
        let mut names = self.list()?;
        if names.len() <= limit {
            return Ok(names);
        }

        let mut kept = names.split_off(limit);
        kept.retain(|name| match fs::remove_file(self.base_dir.join(name)) {
            Ok(()) => false,
            Err(e) => {
                warn!(file = %name, error = %e, "failed to remove history file");
                true
            }
        });
        names.extend(kept);
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<History, HistoryError> {
        let bytes = fs::read(self.base_dir.join(name))?;
        History::decode(&bytes)
    }
}

fn state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::history::NameVal;
    use tempfile::TempDir;

    fn sample() -> History {
        History {
            stats: vec![NameVal {
                name: "wpm".into(),
                value: "42.00".into(),
            }],
            text: vec!["cat".into()],
            matches: vec!["cat".into()],
        }
    }

    #[test]
    fn test_history_name_pattern() {
        assert!(HistoryStore::is_history_name("2024-01-31-23:59:59,007"));
        assert!(!HistoryStore::is_history_name("2024-01-31-23:59:59"));
        assert!(!HistoryStore::is_history_name(".2024-01-31-23:59:59,007.tmp"));
    }

    #[test]
    fn test_write_list_load() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let name = store.write(&sample()).unwrap();
        assert!(HistoryStore::is_history_name(&name));
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().unwrap(), vec![name.clone()]);
        assert_eq!(store.load(&name).unwrap(), sample());
    }

    #[test]
    fn test_list_newest_first_and_prune() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let bytes = sample().encode();
        for name in [
            "2023-05-01-10:00:00,000",
            "2024-05-01-10:00:00,000",
            "2022-05-01-10:00:00,000",
        ] {
            fs::write(dir.path().join(name), &bytes).unwrap();
        }

        let names = store.list().unwrap();
        assert_eq!(names[0], "2024-05-01-10:00:00,000");
        assert_eq!(names[2], "2022-05-01-10:00:00,000");

        let kept = store.prune(2).unwrap();
        assert_eq!(kept.len(), 2);
        assert!(!dir.path().join("2022-05-01-10:00:00,000").exists());

        assert!(store.prune(0).unwrap().is_empty());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_same_millisecond_writes_keep_both() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let at = Local::now();
        let first = store.unused_name(at);
        fs::write(dir.path().join(&first), sample().encode()).unwrap();

        let second = store.unused_name(at);
        assert_ne!(first, second);
        assert!(HistoryStore::is_history_name(&second));
        assert!(second > first);

        store.write(&sample()).unwrap();
        store.write(&sample()).unwrap();
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn test_load_malformed() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("2024-05-01-10:00:00,000"), "garbage").unwrap();
        assert!(store.load("2024-05-01-10:00:00,000").is_err());
        assert!(matches!(
            store.load("2000-01-01-00:00:00,000"),
            Err(HistoryError::Io(_))
        ));
    }
}
