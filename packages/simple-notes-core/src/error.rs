use crate::types::NoteId;

#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    /// Bad user input: empty or duplicate title, malformed import payload.
    #[error("{0}")]
    Validation(String),

    #[error("Note not found: {0}")]
    NotFound(NoteId),

    #[error("No notes to export")]
    Empty,

    /// The host could not save the exported file. The collection is untouched.
    #[error("Export failed: {0}")]
    Export(String),

    /// A backing store failed its availability probe. Fatal for the widget.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl NotesError {
    /// Errors the widget recovers from by falling back to the list view.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NotesError::Validation(_)
                | NotesError::NotFound(_)
                | NotesError::Empty
                | NotesError::Export(_)
        )
    }
}
