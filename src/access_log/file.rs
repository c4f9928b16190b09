use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, error, warn};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

use super::{AccessLogError, AccessLogReceiver};

/// Appends access log lines to `<directory>/<base_name><suffix>`.
///
/// A leading `.` is added to the suffix when it lacks one, so base `access`
/// with suffix `log` writes `access.log`. The base name is used verbatim:
/// base `accesslog.` with suffix `log` writes `accesslog..log`.
///
/// With daily rotation enabled the first line written on a new day moves the
/// current file to `<base_name><yyyy-mm-dd><suffix>` (the date the moved lines
/// were written) and starts a fresh file. When that name is taken a counter is
/// appended: `<base_name><yyyy-mm-dd>-1<suffix>`, `-2`, and so on.
///
/// [`log_message`](AccessLogReceiver::log_message) only queues the line; a
/// background `access-log-writer` thread owns the file and does the writing
/// and rotating. [`flush`](Self::flush), [`rotate`](Self::rotate) and
/// [`close`](Self::close) wait for queued lines to land first. Write and
/// rotation failures are logged and never reach the caller.
#[derive(Debug)]
pub struct FileAccessLogReceiver {
    state: Arc<Mutex<FileState>>,
    sink: Mutex<Option<Sink>>,
}

/// Sending half of the background writer. Dropping it drains the queue.
#[derive(Debug)]
struct Sink {
    writer: NonBlocking,
    _guard: WorkerGuard,
}

#[derive(Debug)]
struct FileState {
    directory: PathBuf,
    base_name: String,
    suffix: String,
    daily_rotation: bool,
    writer: Option<BufWriter<File>>,
    current_date: NaiveDate,
    closed: bool,
}

/// The writer half living on the worker thread
struct RotatingWriter {
    state: Arc<Mutex<FileState>>,
}

impl FileAccessLogReceiver {
    /// Open (or create) the log file, creating `directory` if needed, and
    /// start the writer thread.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLogError::Io`] when the directory or the file cannot
    /// be created.
    pub fn new(
        directory: impl Into<PathBuf>,
        base_name: &str,
        suffix: &str,
        rotate: bool,
    ) -> Result<Self, AccessLogError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|source| AccessLogError::Io {
            path: directory.clone(),
            source,
        })?;

        let suffix = if suffix.starts_with('.') {
            suffix.to_string()
        } else {
            format!(".{}", suffix)
        };
        let mut state = FileState {
            directory,
            base_name: base_name.to_string(),
            suffix,
            daily_rotation: rotate,
            writer: None,
            current_date: Local::now().date_naive(),
            closed: false,
        };

        let path = state.log_path();
        // Lines already in the file belong to the day it was last written
        if let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) {
            state.current_date = DateTime::<Local>::from(modified).date_naive();
        }
        state.open()?;

        let state = Arc::new(Mutex::new(state));
        let sink = Sink::spawn(&state);
        debug!(path = %path.display(), rotate = rotate, "Opened access log file");
        Ok(Self {
            state,
            sink: Mutex::new(Some(sink)),
        })
    }

    /// Path of the file currently being written
    pub fn path(&self) -> PathBuf {
        lock(&self.state).log_path()
    }

    /// Block until every line logged so far is on disk.
    pub fn flush(&self) {
        let mut sink = lock(&self.sink);
        if sink.take().is_none() {
            return;
        }
        lock(&self.state).flush_file();
        *sink = Some(Sink::spawn(&self.state));
    }

    /// Move the current file aside now, as a day change would.
    ///
    /// Lines already logged end up in the moved file. Returns `Ok(None)` once
    /// the receiver is closed; nothing is renamed or reopened then.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLogError::Io`] when the file cannot be renamed or
    /// reopened. Logging continues into the original file in that case.
    pub fn rotate(&self) -> Result<Option<PathBuf>, AccessLogError> {
        let mut sink = lock(&self.sink);
        if sink.take().is_none() {
            return Ok(None);
        }
        let rotated = lock(&self.state).rotate();
        *sink = Some(Sink::spawn(&self.state));
        rotated.map(Some)
    }

    /// Drain queued lines, then flush and close the file. Later lines are
    /// dropped; closing twice is harmless.
    pub fn close(&self) {
        let mut sink = lock(&self.sink);
        if sink.take().is_none() {
            return;
        }
        let mut state = lock(&self.state);
        state.flush_file();
        state.writer = None;
        state.closed = true;
        debug!(path = %state.log_path().display(), "Closed access log file");
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

impl AccessLogReceiver for FileAccessLogReceiver {
    fn log_message(&self, message: &str) {
        let mut sink = lock(&self.sink);
        let Some(sink) = sink.as_mut() else {
            return;
        };
        // One write per line keeps the line whole on the worker side
        let line = format!("{}\n", message);
        if let Err(err) = sink.writer.write_all(line.as_bytes()) {
            error!(error = %err, "Failed to queue access log line");
        }
    }
}

impl Drop for FileAccessLogReceiver {
    fn drop(&mut self) {
        self.close();
    }
}

impl Sink {
    fn spawn(state: &Arc<Mutex<FileState>>) -> Self {
        let (writer, guard) = NonBlockingBuilder::default()
            .lossy(false)
            .thread_name("access-log-writer")
            .finish(RotatingWriter {
                state: Arc::clone(state),
            });
        Self {
            writer,
            _guard: guard,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// Errors are logged and swallowed here: an `Err` would only reach the
// worker loop, never the code that logged the line.
impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = lock(&self.state);
        if state.closed {
            return Ok(buf.len());
        }

        if state.daily_rotation && Local::now().date_naive() != state.current_date {
            if let Err(err) = state.rotate() {
                error!(error = %err, "Access log rotation failed");
            }
        }

        if state.writer.is_none() {
            if let Err(err) = state.open() {
                error!(error = %err, "Failed to reopen access log");
                return Ok(buf.len());
            }
        }

        if let Some(writer) = state.writer.as_mut() {
            if let Err(err) = writer.write_all(buf) {
                error!(error = %err, "Failed to write access log line");
                // Drop the writer so the next line reopens the file
                state.writer = None;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.state).flush_file();
        Ok(())
    }
}

impl FileState {
    fn log_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.base_name, self.suffix))
    }

    fn open(&mut self) -> Result<(), AccessLogError> {
        let path = self.log_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AccessLogError::Io { path, source })?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn flush_file(&mut self) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        if let Err(err) = writer.flush() {
            warn!(error = %err, "Failed to flush access log");
            self.writer = None;
        }
    }

    fn rotate(&mut self) -> Result<PathBuf, AccessLogError> {
        self.flush_file();
        self.writer = None;

        let source = self.log_path();
        let target = rotated_path(
            &self.directory,
            &self.base_name,
            &self.suffix,
            self.current_date,
        );
        // Set before renaming so a failed rename is not retried on every line
        self.current_date = Local::now().date_naive();

        let renamed = fs::rename(&source, &target).map_err(|err| AccessLogError::Io {
            path: source.clone(),
            source: err,
        });
        self.open()?;
        renamed?;

        debug!(
            from = %source.display(),
            to = %target.display(),
            "Rotated access log"
        );
        Ok(target)
    }
}

/// First free `<base><date><suffix>` or `<base><date>-N<suffix>` in `directory`
fn rotated_path(directory: &Path, base_name: &str, suffix: &str, date: NaiveDate) -> PathBuf {
    let stamp = date.format("%Y-%m-%d");
    let first = directory.join(format!("{}{}{}", base_name, stamp, suffix));
    if !first.exists() {
        return first;
    }
    let mut counter = 1u32;
    loop {
        let candidate = directory.join(format!("{}{}-{}{}", base_name, stamp, counter, suffix));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
