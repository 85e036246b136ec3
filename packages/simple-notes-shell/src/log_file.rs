use env_logger::{Logger, Target};
use log::{Log, Metadata, Record, SetLoggerError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log records go to a file so they never interleave with the interactive
/// screen. If the file cannot be opened, records fall back to stderr.
struct FileLogger {
    inner: Logger,
    file: Mutex<Option<File>>,
}

impl FileLogger {
    fn open(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }
}

fn format_log_line(record: &Record<'_>) -> String {
    format!(
        "{} [{}] [{}] {}",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        record.level(),
        record.target(),
        record.args().to_string().replace('\n', "\\n")
    )
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        match guard.as_mut() {
            Some(file) => {
                let _ = writeln!(file, "{}", format_log_line(record));
                let _ = file.flush();
            }
            None => self.inner.log(record),
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
        self.inner.flush();
    }
}

/// Default log file: `<data dir>/logs/shell.log`.
pub fn default_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("logs").join("shell.log")
}

/// Install the logger. Filtering follows `RUST_LOG`, default `warn`.
pub fn init(path: &Path) -> Result<(), SetLoggerError> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.target(Target::Stderr);
    let inner = builder.build();
    let max_level = inner.filter();

    let file = FileLogger::open(path).ok();
    let logger = Box::leak(Box::new(FileLogger {
        inner,
        file: Mutex::new(file),
    }));
    log::set_logger(logger)?;
    log::set_max_level(max_level);
    Ok(())
}
