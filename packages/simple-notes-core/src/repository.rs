/// Authoritative note collection backed by the durable store.
///
/// Every mutation builds the next collection, writes it as one store value and
/// only then replaces the in-memory copy, so a failed write leaves both sides
/// as they were. Assumes a single writer per namespace.
use chrono::Duration;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::import;
use crate::storage::{KeyValueStore, NamespacedStore};
use crate::types::{Note, NoteId, NOTES_KEY};
use crate::NotesError;

pub const WELCOME_TITLE: &str = "Welcome!";
pub const WELCOME_CONTENT: &str = "This is SimpleNotes extension. Easily create, edit, and manage your notes directly in your browser. \n\nKey features for you:\n- Add and modify your notes quickly and effortlessly.\n- Backup your notes by exporting them or import from other sources.\n- Find note that you need with a simple search function.\n\n We care about your privacy! All your data stored locally, and won't be accessible online";

pub struct NoteRepository<S> {
    store: NamespacedStore<S>,
    /// Insertion order, as persisted.
    notes: Vec<Note>,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> NoteRepository<S> {
    pub fn open(store: NamespacedStore<S>) -> Result<Self, NotesError> {
        Self::open_with_clock(store, Box::new(SystemClock))
    }

    /// Probe the store, load the collection and seed it on first run.
    pub fn open_with_clock(
        mut store: NamespacedStore<S>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, NotesError> {
        store.probe()?;

        let seeded = !store.contains(NOTES_KEY)?;
        let notes = if seeded {
            Vec::new()
        } else {
            store.get::<Vec<Note>>(NOTES_KEY)?.unwrap_or_else(|| {
                log::warn!(
                    "[simple_notes.repository] Stored collection in '{}' is unreadable, starting empty",
                    store.namespace().prefix()
                );
                Vec::new()
            })
        };

        let mut repo = Self { store, notes, clock };
        if seeded {
            repo.seed()?;
        }
        Ok(repo)
    }

    /// First run only: the key is absent, not merely empty.
    fn seed(&mut self) -> Result<(), NotesError> {
        let now = self.clock.now();
        let welcome = Note {
            id: 1,
            title: WELCOME_TITLE.to_string(),
            content: WELCOME_CONTENT.to_string(),
            date: now,
            changed_at: now,
        };
        self.commit(vec![welcome])?;
        log::info!(
            "[simple_notes.repository] Seeded welcome note in '{}'",
            self.store.namespace().prefix()
        );
        Ok(())
    }

    fn commit(&mut self, next: Vec<Note>) -> Result<(), NotesError> {
        self.store.set(NOTES_KEY, &next)?;
        self.notes = next;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in insertion order, exactly as persisted.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Most recently changed first; ties keep insertion order.
    pub fn list(&self) -> Vec<&Note> {
        let mut sorted: Vec<&Note> = self.notes.iter().collect();
        sorted.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        sorted
    }

    pub fn find_by_id(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn exists(&self, id: NoteId) -> bool {
        self.find_by_id(id).is_some()
    }

    fn next_id(&self) -> Result<NoteId, NotesError> {
        match self.notes.iter().map(|n| n.id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| NotesError::Validation("No note ids left".to_string())),
        }
    }

    pub fn create(&mut self, title: &str, content: &str) -> Result<Note, NotesError> {
        if title.trim().is_empty() {
            return Err(NotesError::Validation("Note title cannot be empty.".to_string()));
        }
        if self.notes.iter().any(|n| n.title == title) {
            return Err(NotesError::Validation(
                "Note with this title already exists.".to_string(),
            ));
        }

        let now = self.clock.now();
        let note = Note {
            id: self.next_id()?,
            title: title.to_string(),
            content: content.to_string(),
            date: now,
            changed_at: now,
        };

        let mut next = self.notes.clone();
        next.push(note.clone());
        self.commit(next)?;
        log::debug!("[simple_notes.repository] Created note {}", note.id);
        Ok(note)
    }

    /// Replace a note's content. `changedAt` always moves forward, even when
    /// the clock has not ticked since the previous change.
    pub fn update(&mut self, id: NoteId, content: &str) -> Result<Note, NotesError> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(NotesError::NotFound(id))?;

        let mut next = self.notes.clone();
        let note = &mut next[index];
        let now = self.clock.now();
        note.changed_at = if now > note.changed_at {
            now
        } else {
            note.changed_at + Duration::milliseconds(1)
        };
        note.content = content.to_string();
        let updated = note.clone();

        self.commit(next)?;
        Ok(updated)
    }

    /// Deleting a missing id is an error, not a no-op.
    pub fn delete(&mut self, id: NoteId) -> Result<(), NotesError> {
        if !self.exists(id) {
            return Err(NotesError::NotFound(id));
        }
        let next: Vec<Note> = self.notes.iter().filter(|n| n.id != id).cloned().collect();
        self.commit(next)?;
        log::debug!("[simple_notes.repository] Deleted note {}", id);
        Ok(())
    }

    /// Validate candidates and, only if all pass, make them the collection.
    pub fn replace_all(&mut self, candidates: &Value) -> Result<usize, NotesError> {
        let notes = import::validate(candidates)?;
        self.install(notes)
    }

    /// Import from the text of a notes file.
    pub fn import_json(&mut self, text: &str) -> Result<usize, NotesError> {
        let notes = import::parse_and_validate(text)?;
        self.install(notes)
    }

    fn install(&mut self, notes: Vec<Note>) -> Result<usize, NotesError> {
        let count = notes.len();
        self.commit(notes)?;
        log::info!(
            "[simple_notes.repository] Imported {} notes into '{}'",
            count,
            self.store.namespace().prefix()
        );
        Ok(count)
    }

    /// The stored collection text, byte for byte.
    pub fn export_snapshot(&self) -> Result<String, NotesError> {
        if self.notes.is_empty() {
            return Err(NotesError::Empty);
        }
        match self.store.get_raw(NOTES_KEY)? {
            Some(text) => Ok(text),
            None => Ok(serde_json::to_string(&self.notes)?),
        }
    }

    pub fn store(&self) -> &NamespacedStore<S> {
        &self.store
    }
}
