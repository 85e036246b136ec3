/// List / Detail state machine.
///
/// The open note is remembered in the session store under `user_data` so a
/// reload returns to it. The controller holds only the id; every time it is
/// followed the repository is asked again, and a missing note sends the view
/// back to the list.
use crate::repository::NoteRepository;
use crate::storage::{KeyValueStore, NamespacedStore};
use crate::types::{Note, NoteId, UserData, ViewState, USER_DATA_KEY};
use crate::NotesError;

pub struct ViewStateController<S> {
    session: NamespacedStore<S>,
    state: ViewState,
}

impl<S: KeyValueStore> ViewStateController<S> {
    /// Start from whatever the session remembers, if that note still exists.
    pub fn restore<D: KeyValueStore>(
        mut session: NamespacedStore<S>,
        repo: &NoteRepository<D>,
    ) -> Result<Self, NotesError> {
        session.probe()?;
        let remembered = session
            .get::<UserData>(USER_DATA_KEY)?
            .and_then(|data| data.last_note_id);

        let mut controller = Self {
            session,
            state: ViewState::List,
        };
        match remembered {
            Some(id) => {
                controller.open(repo, id)?;
            }
            None => log::debug!("[simple_notes.view] No open note in session"),
        }
        Ok(controller)
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Show a note if it exists; otherwise fall back to the list.
    pub fn open<D: KeyValueStore>(
        &mut self,
        repo: &NoteRepository<D>,
        id: NoteId,
    ) -> Result<ViewState, NotesError> {
        if repo.exists(id) {
            self.remember(Some(id))?;
            self.state = ViewState::Detail(id);
            log::debug!("[simple_notes.view] Detail({})", id);
        } else {
            log::warn!("[simple_notes.view] Note {} does not exist, showing list", id);
            self.close()?;
        }
        Ok(self.state)
    }

    pub fn close(&mut self) -> Result<(), NotesError> {
        self.remember(None)?;
        self.state = ViewState::List;
        Ok(())
    }

    pub fn after_delete(&mut self, deleted: NoteId) -> Result<(), NotesError> {
        if self.state == ViewState::Detail(deleted) {
            self.close()?;
        }
        Ok(())
    }

    /// Imported data replaces every note, so no open reference survives.
    pub fn after_import(&mut self) -> Result<(), NotesError> {
        self.close()
    }

    /// Follow the current reference, healing to `List` if it dangles.
    pub fn current_note<'r, D: KeyValueStore>(
        &mut self,
        repo: &'r NoteRepository<D>,
    ) -> Result<Option<&'r Note>, NotesError> {
        let Some(id) = self.state.note_id() else {
            return Ok(None);
        };
        match repo.find_by_id(id) {
            Some(note) => Ok(Some(note)),
            None => {
                log::warn!("[simple_notes.view] Open note {} disappeared, showing list", id);
                self.close()?;
                Ok(None)
            }
        }
    }

    /// Rewrite the session record, keeping fields this widget does not own.
    fn remember(&mut self, id: Option<NoteId>) -> Result<(), NotesError> {
        let existing = self.session.get::<UserData>(USER_DATA_KEY)?;
        if existing.is_none() && id.is_none() {
            return Ok(());
        }
        let mut data = existing.unwrap_or_default();
        data.last_note_id = id;
        self.session.set(USER_DATA_KEY, &data)?;
        Ok(())
    }

    pub fn session(&self) -> &NamespacedStore<S> {
        &self.session
    }
}
