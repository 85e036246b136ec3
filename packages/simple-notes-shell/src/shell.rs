/// Interactive command loop. One process is one session.
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use simple_notes_core::storage::KeyValueStore;
use simple_notes_core::{NoteId, Notice, NotesApp, NotesError, Renderer, UiEvent, ViewState};

use crate::render::TerminalRenderer;

const HELP: &str = "\
Commands:
  list              show all notes
  open <id>         show a note
  back              return to the list
  add <title>       create a note and open it
  save <text>       replace the open note's text (\\n for new lines)
  delete [id]       delete a note (default: the open one)
  search [query]    filter the list by title
  import <path>     replace all notes with a notes.json file
  export            write notes.json
  help              show this text
  quit              leave";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list.")]
    Unknown(String),

    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("'{0}' is not a note id")]
    BadId(String),
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Ui(UiEvent),
    /// Content for whichever note is open.
    Save(String),
    /// Delete the open note.
    DeleteCurrent,
    Import(PathBuf),
    Help,
    Quit,
    Nothing,
}

fn parse_id(raw: &str) -> Result<NoteId, CommandError> {
    raw.parse().map_err(|_| CommandError::BadId(raw.to_string()))
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "list" | "back" => Command::Ui(UiEvent::Back),
        "open" if rest.is_empty() => return Err(CommandError::MissingArgument("open", "a note id")),
        "open" => Command::Ui(UiEvent::Open(parse_id(rest)?)),
        "add" => Command::Ui(UiEvent::Add {
            title: rest.to_string(),
        }),
        "save" => Command::Save(rest.replace("\\n", "\n")),
        "delete" if rest.is_empty() => Command::DeleteCurrent,
        "delete" => Command::Ui(UiEvent::Delete(parse_id(rest)?)),
        "search" => Command::Ui(UiEvent::Search(rest.to_string())),
        "import" if rest.is_empty() => return Err(CommandError::MissingArgument("import", "a file path")),
        "import" => Command::Import(PathBuf::from(rest)),
        "export" => Command::Ui(UiEvent::Export),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

/// Read commands until `quit` or end of input.
pub fn run<D, E, W, I>(app: &mut NotesApp<D, E, TerminalRenderer<W>>, input: I) -> Result<(), NotesError>
where
    D: KeyValueStore,
    E: KeyValueStore,
    W: Write,
    I: BufRead,
{
    app.renderer_mut().prompt();
    for line in input.lines() {
        let line = line?;
        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                app.renderer_mut().notice(Notice::Error(e.to_string()));
                app.renderer_mut().prompt();
                continue;
            }
        };

        match command {
            Command::Quit => return Ok(()),
            Command::Nothing => {}
            Command::Help => app.renderer_mut().line(HELP),
            Command::Ui(event) => app.handle(event)?,
            Command::Save(content) => match app.state() {
                ViewState::Detail(id) => app.handle(UiEvent::Save { id, content })?,
                ViewState::List => app
                    .renderer_mut()
                    .notice(Notice::Error("No note is open".to_string())),
            },
            Command::DeleteCurrent => match app.state() {
                ViewState::Detail(id) => app.handle(UiEvent::Delete(id))?,
                ViewState::List => app
                    .renderer_mut()
                    .notice(Notice::Error("No note is open".to_string())),
            },
            Command::Import(path) => match fs::read_to_string(&path) {
                Ok(text) => app.handle(UiEvent::Import(text))?,
                Err(e) => app.renderer_mut().notice(Notice::Error(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    e
                ))),
            },
        }
        app.renderer_mut().prompt();
    }
    Ok(())
}
