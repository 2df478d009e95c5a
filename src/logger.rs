use std::cell::RefCell;
use std::fs::File;
use std::io::{Result as IoResult, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();
thread_local! {
    static INPUT_LABEL: RefCell<Option<String>> = const { RefCell::new(None) };
}

#[derive(Clone, Copy)]
enum Level {
    Warning,
    Error,
}

impl Level {
    const fn tag(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Mirrors reader diagnostics into `path` in addition to stderr.
///
/// Only the first configured file is kept for the lifetime of the process.
///
/// # Errors
///
/// Returns an error if the log file or its parent directory cannot be created.
pub fn set_log_file(path: &Path) -> IoResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let _ = LOG_FILE.set(Mutex::new(file));
    Ok(())
}

/// Tags subsequent messages on this thread with the name of the input being
/// read. The previous label comes back when the guard drops.
pub fn set_log_prefix(label: impl Into<String>) -> LogPrefixGuard {
    let previous = INPUT_LABEL.with(|slot| slot.replace(Some(label.into())));
    LogPrefixGuard { previous }
}

pub struct LogPrefixGuard {
    previous: Option<String>,
}

impl Drop for LogPrefixGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        INPUT_LABEL.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}

fn emit(level: Level, message: &str) {
    let line = INPUT_LABEL.with(|slot| match slot.borrow().as_deref() {
        Some(label) => format!("{label}: {message}"),
        None => message.to_owned(),
    });
    eprintln!("{line}");
    if let Some(writer) = LOG_FILE.get()
        && let Ok(mut file) = writer.lock()
    {
        let _ = writeln!(file, "{}: {line}", level.tag());
    }
}

pub fn log_warn(message: &str) {
    emit(Level::Warning, message);
}

pub fn log_error(message: &str) {
    emit(Level::Error, message);
}
