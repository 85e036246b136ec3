/// In-process backend. Lives as long as the value does, which makes it the
/// session (ephemeral) store for hosts where one process is one session.
use std::collections::HashMap;

use super::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> std::io::Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
