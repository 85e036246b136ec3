/// Plain-text renderer for the terminal.
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use simple_notes_core::{Note, Notice, NotesError, Renderer};

const PREVIEW_CHARS: usize = 60;

pub struct TerminalRenderer<W> {
    out: W,
    export_dir: PathBuf,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, export_dir: PathBuf) -> Self {
        Self { out, export_dir }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::warn!("[simple_notes.shell] Failed to write to terminal: {}", e);
        }
    }

    pub fn prompt(&mut self) {
        let _ = write!(self.out, "> ");
        let _ = self.out.flush();
    }
}

/// Display form of a stored timestamp: local time, 24h, minute precision.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y, %H:%M").to_string()
}

/// First line of the content, cut to a fixed width.
fn preview(content: &str) -> String {
    let first = content.lines().next().unwrap_or("");
    let mut cut: String = first.chars().take(PREVIEW_CHARS).collect();
    if first.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        cut.push_str("...");
    }
    cut
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn list(&mut self, notes: &[&Note], query: &str) {
        self.line("== Simple notes ==");
        if !query.is_empty() {
            self.line(&format!("Search: {}", query));
        }
        if notes.is_empty() {
            self.line("  (no notes)");
        }
        for note in notes {
            self.line(&format!("  [{}] {}", note.id, note.title));
            let text = preview(&note.content);
            if !text.is_empty() {
                self.line(&format!("      {}", text));
            }
        }
    }

    fn detail(&mut self, note: &Note) {
        self.line(&format!("== {} ==", note.title));
        self.line(&format!(
            "Created {}  Changed {}",
            format_date(&note.date),
            format_date(&note.changed_at)
        ));
        self.line("");
        for line in note.content.lines() {
            self.line(line);
        }
    }

    fn notice(&mut self, notice: Notice) {
        match notice {
            Notice::Info(msg) => self.line(&format!("* {}", msg)),
            Notice::Error(msg) => self.line(&format!("! {}", msg)),
        }
    }

    fn export(&mut self, file_name: &str, text: &str) -> Result<(), NotesError> {
        fs::create_dir_all(&self.export_dir)?;
        let path = self.export_dir.join(file_name);
        fs::write(&path, text)?;
        self.line(&format!("Saved {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn note(id: u64, title: &str, content: &str) -> Note {
        let at = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        Note {
            id,
            title: title.into(),
            content: content.into(),
            date: at,
            changed_at: at,
        }
    }

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.get_ref().clone()).unwrap()
    }

    #[test]
    fn test_list_shows_ids_titles_and_previews() {
        let mut r = TerminalRenderer::new(Vec::new(), PathBuf::from("."));
        let a = note(2, "Shopping", "eggs\nmilk");
        let b = note(1, "Empty", "");
        r.list(&[&a, &b], "");
        let text = output(r);
        assert!(text.contains("[2] Shopping"));
        assert!(text.contains("eggs..."));
        assert!(text.contains("[1] Empty"));
        assert!(!text.contains("Search:"));
    }

    #[test]
    fn test_empty_search_result() {
        let mut r = TerminalRenderer::new(Vec::new(), PathBuf::from("."));
        r.list(&[], "xyz");
        let text = output(r);
        assert!(text.contains("Search: xyz"));
        assert!(text.contains("(no notes)"));
    }

    #[test]
    fn test_preview_truncates_long_lines() {
        let long = "x".repeat(100);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_date_format_shape() {
        let at = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        let shown = format_date(&at);
        // dd.mm.yyyy, HH:MM in local time
        assert_eq!(shown.len(), 17);
        assert_eq!(&shown[2..3], ".");
        assert_eq!(&shown[10..12], ", ");
    }

    #[test]
    fn test_export_writes_file() {
        let tmp = TempDir::new().unwrap();
        let mut r = TerminalRenderer::new(Vec::new(), tmp.path().join("out"));
        r.export("notes.json", "[]").unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join("out/notes.json")).unwrap(), "[]");
    }
}
