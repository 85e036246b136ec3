/// Local filesystem backend for the durable store.
///
/// One file per key inside a single directory:
/// - Key percent-encoded into the file name, `.json` suffix
/// - Atomic writes (write to .tmp, fsync, rename, fsync directory)
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::KeyValueStore;

const VALUE_EXTENSION: &str = "json";
const TMP_EXTENSION: &str = "simple-notes.tmp";

/// Characters left readable in file names; everything else is escaped.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-').remove(b'_');

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name = utf8_percent_encode(key, KEY_ENCODE_SET).to_string();
        self.dir.join(format!("{}.{}", name, VALUE_EXTENSION))
    }

    fn key_for(path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        percent_decode_str(stem).decode_utf8().ok().map(|k| k.into_owned())
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension(TMP_EXTENSION);
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        Self::atomic_write(&self.path_for(key), value)
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn keys(&self) -> std::io::Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if let Some(key) = Self::key_for(&path) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path()).unwrap();

        store.write("simple-notes-app.main.notes", "[]").unwrap();
        assert_eq!(
            store.read("simple-notes-app.main.notes").unwrap().as_deref(),
            Some("[]")
        );
        assert!(tmp.path().join("simple-notes-app.main.notes.json").exists());
    }

    #[test]
    fn test_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path()).unwrap();
        assert_eq!(store.read("nothing").unwrap(), None);
    }

    #[test]
    fn test_odd_keys_round_trip_through_file_names() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path()).unwrap();

        store.write("app.side bar/1.notes", "[1]").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["app.side bar/1.notes".to_string()]);
        assert_eq!(store.read("app.side bar/1.notes").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_overwrite_leaves_no_tmp_files() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path()).unwrap();

        store.write("k", "one").unwrap();
        store.write("k", "two").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("two"));

        let files: Vec<_> = fs::read_dir(tmp.path()).unwrap().flatten().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_remove_and_foreign_files_ignored() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path()).unwrap();
        fs::write(tmp.path().join("README.txt"), "not a value").unwrap();

        store.write("a", "1").unwrap();
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("data").join("simple-notes");
        let store = FileStore::new(&nested).unwrap();
        assert!(store.dir().is_dir());
    }
}
