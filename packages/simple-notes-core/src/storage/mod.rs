pub mod local;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::NotesError;

/// Key written and removed by `NamespacedStore::probe`.
const PROBE_KEY: &str = "__storage_test__";

/// Raw string key-value backend.
/// Implementations: FileStore (durable, one file per key), MemoryStore (ephemeral).
pub trait KeyValueStore {
    /// Read the stored text for a key, `None` if absent.
    fn read(&self, key: &str) -> std::io::Result<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> std::io::Result<()>;

    /// Every key currently held by the backend, across all namespaces.
    fn keys(&self) -> std::io::Result<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> std::io::Result<Vec<String>> {
        (**self).keys()
    }
}

/// Application + container prefix isolating one widget instance's keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    pub fn new(app_name: &str, container: &str) -> Result<Self, NotesError> {
        for (label, part) in [("application name", app_name), ("container", container)] {
            if part.trim().is_empty() {
                return Err(NotesError::Validation(format!("Empty {}", label)));
            }
            // '.' separates the prefix parts; allowing it would let "a.b"+"c" collide with "a"+"b.c"
            if part.contains('.') {
                return Err(NotesError::Validation(format!(
                    "Invalid {} '{}': '.' is not allowed",
                    label, part
                )));
            }
        }
        Ok(Self {
            prefix: format!("{}.{}.", app_name, container),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

/// JSON view over a backend, restricted to one namespace.
///
/// Reads are lenient: missing keys, unparsable text and text of the wrong
/// shape all come back as `None`. Only backend I/O failures are errors.
pub struct NamespacedStore<S> {
    backend: S,
    namespace: Namespace,
}

impl<S: KeyValueStore> NamespacedStore<S> {
    pub fn new(backend: S, namespace: Namespace) -> Self {
        Self { backend, namespace }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    /// Check the backend accepts a write and a removal.
    pub fn probe(&mut self) -> Result<(), NotesError> {
        let key = self.namespace.key(PROBE_KEY);
        self.backend
            .write(&key, PROBE_KEY)
            .and_then(|_| self.backend.remove(&key))
            .map_err(|e| NotesError::StorageUnavailable(e.to_string()))
    }

    pub fn contains(&self, key: &str) -> Result<bool, NotesError> {
        Ok(self.backend.read(&self.namespace.key(key))?.is_some())
    }

    /// Raw stored text, used where the exact bytes matter (export).
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, NotesError> {
        Ok(self.backend.read(&self.namespace.key(key))?)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, NotesError> {
        let full_key = self.namespace.key(key);
        let Some(text) = self.backend.read(&full_key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("[simple_notes.storage] Ignoring unreadable value at '{}': {}", full_key, e);
                Ok(None)
            }
        }
    }

    /// Serialize and store a value. Returns the text that was written.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<String, NotesError> {
        let text = serde_json::to_string(value)?;
        self.backend.write(&self.namespace.key(key), &text)?;
        Ok(text)
    }

    pub fn remove(&mut self, key: &str) -> Result<(), NotesError> {
        Ok(self.backend.remove(&self.namespace.key(key))?)
    }

    /// Remove every key under this namespace, leaving other namespaces alone.
    pub fn clear_namespace(&mut self) -> Result<usize, NotesError> {
        let owned: Vec<String> = self
            .backend
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(self.namespace.prefix()))
            .collect();
        for key in &owned {
            self.backend.remove(key)?;
        }
        Ok(owned.len())
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    fn store(container: &str) -> NamespacedStore<MemoryStore> {
        NamespacedStore::new(MemoryStore::new(), Namespace::new("app", container).unwrap())
    }

    #[test]
    fn test_keys_are_prefixed() {
        let mut s = store("left");
        s.set("notes", &vec![1, 2]).unwrap();
        assert_eq!(s.backend().read("app.left.notes").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(s.get::<Vec<u32>>("notes").unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn test_corrupt_value_reads_as_none() {
        let mut backend = MemoryStore::new();
        backend.write("app.left.notes", "{not json").unwrap();
        let s = NamespacedStore::new(backend, Namespace::new("app", "left").unwrap());
        assert_eq!(s.get::<Vec<u32>>("notes").unwrap(), None);
        assert!(s.contains("notes").unwrap());
    }

    #[test]
    fn test_wrong_shape_reads_as_none() {
        let mut s = store("left");
        s.set("notes", "just a string").unwrap();
        assert_eq!(s.get::<Vec<u32>>("notes").unwrap(), None);
    }

    #[test]
    fn test_clear_namespace_spares_neighbours() {
        let mut backend = MemoryStore::new();
        backend.write("app.left.notes", "[]").unwrap();
        backend.write("app.left.user_data", "{}").unwrap();
        backend.write("app.right.notes", "[]").unwrap();

        let mut s = NamespacedStore::new(backend, Namespace::new("app", "left").unwrap());
        assert_eq!(s.clear_namespace().unwrap(), 2);

        let backend = s.into_inner();
        assert_eq!(backend.keys().unwrap(), vec!["app.right.notes".to_string()]);
    }

    #[test]
    fn test_probe_leaves_nothing_behind() {
        let mut s = store("left");
        s.probe().unwrap();
        assert!(s.backend().keys().unwrap().is_empty());
    }

    #[test]
    fn test_namespace_rejects_separator_and_blank() {
        assert!(Namespace::new("a.b", "c").is_err());
        assert!(Namespace::new("app", "").is_err());
        assert_eq!(Namespace::new("app", "main").unwrap().key("notes"), "app.main.notes");
    }
}
