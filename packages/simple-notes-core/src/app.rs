/// One widget instance: repository, view state, search query and the host
/// renderer, owned together instead of living in shared globals.
use crate::clock::{Clock, SystemClock};
use crate::config::WidgetConfig;
use crate::repository::NoteRepository;
use crate::search::TitleSearch;
use crate::storage::{KeyValueStore, NamespacedStore};
use crate::types::{Note, NoteId, ViewState, EXPORT_FILE_NAME};
use crate::view_state::ViewStateController;
use crate::NotesError;

/// User actions coming from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Open(NoteId),
    Back,
    Add { title: String },
    Save { id: NoteId, content: String },
    Delete(NoteId),
    Search(String),
    /// Text of a user-selected import file.
    Import(String),
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Host-side presentation. The core calls in after every change that affects
/// what is visible; the renderer never calls back.
pub trait Renderer {
    fn list(&mut self, notes: &[&Note], query: &str);

    fn detail(&mut self, note: &Note);

    fn notice(&mut self, notice: Notice);

    /// Offer `text` to the user as a file named `file_name`.
    fn export(&mut self, file_name: &str, text: &str) -> Result<(), NotesError>;
}

pub struct NotesApp<D, E, R> {
    repo: NoteRepository<D>,
    view: ViewStateController<E>,
    query: String,
    renderer: R,
}

impl<D: KeyValueStore, E: KeyValueStore, R: Renderer> NotesApp<D, E, R> {
    pub fn start(config: &WidgetConfig, durable: D, ephemeral: E, renderer: R) -> Result<Self, NotesError> {
        Self::start_with_clock(config, durable, ephemeral, renderer, Box::new(SystemClock))
    }

    /// Open both stores, restore the last screen and draw it. Any storage
    /// failure here is fatal for the instance.
    pub fn start_with_clock(
        config: &WidgetConfig,
        durable: D,
        ephemeral: E,
        renderer: R,
        clock: Box<dyn Clock>,
    ) -> Result<Self, NotesError> {
        let namespace = config.namespace()?;
        let repo = NoteRepository::open_with_clock(NamespacedStore::new(durable, namespace.clone()), clock)
            .map_err(|e| {
                log::error!("[simple_notes.app] Durable store unusable: {}", e);
                e
            })?;
        let view = ViewStateController::restore(NamespacedStore::new(ephemeral, namespace), &repo)
            .map_err(|e| {
                log::error!("[simple_notes.app] Session store unusable: {}", e);
                e
            })?;

        let mut app = Self {
            repo,
            view,
            query: String::new(),
            renderer,
        };
        app.render()?;
        Ok(app)
    }

    /// Apply one user action and redraw. Validation, not-found, empty-export
    /// and failed export-file errors become a notice plus a return to the list;
    /// anything else is returned.
    pub fn handle(&mut self, event: UiEvent) -> Result<(), NotesError> {
        match self.apply(event) {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                log::info!("[simple_notes.app] {}", e);
                self.view.close()?;
                self.renderer.notice(Notice::Error(e.to_string()));
            }
            Err(e) => return Err(e),
        }
        self.render()
    }

    fn apply(&mut self, event: UiEvent) -> Result<(), NotesError> {
        match event {
            UiEvent::Open(id) => {
                self.view.open(&self.repo, id)?;
            }
            UiEvent::Back => self.view.close()?,
            UiEvent::Add { title } => {
                let note = self.repo.create(&title, "")?;
                self.view.open(&self.repo, note.id)?;
            }
            UiEvent::Save { id, content } => {
                self.repo.update(id, &content)?;
            }
            UiEvent::Delete(id) => {
                self.repo.delete(id)?;
                self.view.after_delete(id)?;
            }
            UiEvent::Search(query) => self.query = query,
            UiEvent::Import(text) => {
                let count = self.repo.import_json(&text)?;
                self.view.after_import()?;
                self.renderer
                    .notice(Notice::Info(format!("Imported {} notes.", count)));
            }
            UiEvent::Export => {
                let text = self.repo.export_snapshot()?;
                self.renderer
                    .export(EXPORT_FILE_NAME, &text)
                    .map_err(|e| match e {
                        NotesError::Io(io) => NotesError::Export(io.to_string()),
                        other => other,
                    })?;
                self.renderer
                    .notice(Notice::Info("Notes exported successfully".to_string()));
            }
        }
        Ok(())
    }

    /// Draw the current screen from the repository as it is now.
    pub fn render(&mut self) -> Result<(), NotesError> {
        match self.view.current_note(&self.repo)? {
            Some(note) => self.renderer.detail(note),
            None => {
                let visible = TitleSearch::compile(&self.query).filter(self.repo.list());
                self.renderer.list(&visible, &self.query);
            }
        }
        Ok(())
    }

    pub fn state(&self) -> ViewState {
        self.view.state()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn repository(&self) -> &NoteRepository<D> {
        &self.repo
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
