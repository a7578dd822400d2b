//! Persistence backends.
//!
//! A directory store keeps one JSON array per record kind plus a `version`
//! marker:
//!
//! ```text
//! <root>/
//!   version          "1"
//!   tags.json        [Tag, ...]
//!   questions.json   [Question, ...]
//! ```

use crate::error::{Result, StoreError};
use crate::model::Snapshot;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Current on-disk schema version.
pub const STORE_VERSION: u32 = 1;

const VERSION_FILE: &str = "version";
const TAGS_FILE: &str = "tags.json";
const QUESTIONS_FILE: &str = "questions.json";

/// Loads and saves whole repository snapshots.
pub trait Storage {
    fn load(&mut self) -> Result<Snapshot>;
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// An open directory store. Creating one initializes a fresh directory.
#[derive(Debug)]
struct Connection {
    root: PathBuf,
}

impl Connection {
    fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).map_err(|e| StoreError::io(root, e))?;

        let version_path = root.join(VERSION_FILE);
        match fs::read_to_string(&version_path) {
            Ok(text) => {
                let found = text.trim().parse::<u32>().unwrap_or(0);
                if found != STORE_VERSION {
                    return Err(StoreError::Version {
                        found,
                        expected: STORE_VERSION,
                    });
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                write_atomic(&version_path, STORE_VERSION.to_string().as_bytes())?;
            }
            Err(e) => return Err(StoreError::io(version_path, e)),
        }

        for file in [TAGS_FILE, QUESTIONS_FILE] {
            let path = root.join(file);
            if !path.exists() {
                write_atomic(&path, b"[]")?;
            }
        }

        log::debug!("opened store at {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.root.join(file);
        let text = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))
    }

    fn write<T: Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        let path = self.root.join(file);
        let json = serde_json::to_vec_pretty(records).map_err(|e| StoreError::json(&path, e))?;
        write_atomic(&path, &json)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        log::debug!("closed store at {}", self.root.display());
    }
}

/// Write through a sibling temp file so readers never see a partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

/// JSON directory store, opened on first use.
#[derive(Debug)]
pub struct DirStorage {
    root: PathBuf,
    connection: Option<Connection>,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            connection: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Release the connection. The next load or save reopens it.
    pub fn close(&mut self) {
        self.connection = None;
    }

    fn connection(&mut self) -> Result<&Connection> {
        if self.connection.is_none() {
            self.connection = Some(Connection::open(&self.root)?);
        }
        self.connection
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable(format!("{} is not open", self.root.display())))
    }
}

impl Storage for DirStorage {
    fn load(&mut self) -> Result<Snapshot> {
        let connection = self.connection()?;
        Ok(Snapshot {
            tags: connection.read(TAGS_FILE)?,
            questions: connection.read(QUESTIONS_FILE)?,
        })
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let connection = self.connection()?;
        connection.write(TAGS_FILE, &snapshot.tags)?;
        connection.write(QUESTIONS_FILE, &snapshot.questions)
    }
}

/// In-memory store. Setting `fail` makes every call return an error.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub snapshot: Snapshot,
    pub fail: bool,
    /// Number of successful saves.
    pub saves: usize,
}

impl MemoryStorage {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(StoreError::Unavailable("memory storage set to fail".into()))
        } else {
            Ok(())
        }
    }
}

impl Storage for MemoryStorage {
    fn load(&mut self) -> Result<Snapshot> {
        self.check()?;
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.check()?;
        self.snapshot = snapshot.clone();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, Tag, TagType};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn sample() -> Snapshot {
        Snapshot {
            tags: vec![Tag {
                id: "t1".into(),
                name: "Level".into(),
                color: "#f00".into(),
                required: true,
                tag_type: TagType::Select,
                options: vec!["easy".into(), "hard".into()],
            }],
            questions: vec![Question {
                id: "q1".into(),
                title: "Half".into(),
                content: "\\frac{1}{2}".into(),
                answers: vec!["0.5".into()],
                tags: BTreeMap::new(),
                images: vec![],
            }],
        }
    }

    #[test]
    fn test_opens_lazily() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("db");
        let mut storage = DirStorage::new(&root);
        assert!(!storage.is_open());
        assert!(!root.exists());

        let snapshot = storage.load().unwrap();
        assert!(storage.is_open());
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(fs::read_to_string(root.join("version")).unwrap(), "1");
        assert_eq!(fs::read_to_string(root.join("tags.json")).unwrap(), "[]");
    }

    #[test]
    fn test_save_then_reload() {
        let dir = tempdir().unwrap();
        let mut storage = DirStorage::new(dir.path());
        storage.save(&sample()).unwrap();
        storage.close();
        assert!(!storage.is_open());

        let mut reopened = DirStorage::new(dir.path());
        assert_eq!(reopened.load().unwrap(), sample());
        assert!(!dir.path().join("tags.json.tmp").exists());
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("version"), "2").unwrap();
        let err = DirStorage::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Version {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_corrupt_json() {
        let dir = tempdir().unwrap();
        let mut storage = DirStorage::new(dir.path());
        storage.load().unwrap();
        fs::write(dir.path().join("questions.json"), "{not json").unwrap();
        let err = storage.load().unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new(sample());
        assert_eq!(storage.load().unwrap(), sample());
        storage.save(&Snapshot::default()).unwrap();
        assert_eq!(storage.saves, 1);

        storage.fail = true;
        assert!(storage.load().is_err());
        assert!(storage.save(&sample()).is_err());
        assert_eq!(storage.snapshot, Snapshot::default());
    }
}
