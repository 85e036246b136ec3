//! SimpleNotes core: note persistence and list/detail view state.
//!
//! The widget renders into a host through the `app::Renderer` trait; everything
//! in this crate is independent of how notes are drawn.
pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod import;
pub mod repository;
pub mod search;
pub mod storage;
pub mod types;
pub mod view_state;

pub use app::{Notice, NotesApp, Renderer, UiEvent};
pub use config::WidgetConfig;
pub use error::NotesError;
pub use repository::NoteRepository;
pub use types::{Note, NoteId, ViewState};
pub use view_state::ViewStateController;
