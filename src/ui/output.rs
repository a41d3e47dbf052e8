//! ui::output
//!
//! Destinations for help and diagnostic text.
//!
//! # Design
//!
//! Every command may carry its own [`Output`]. A command without one writes
//! to the nearest ancestor's output, and the root falls back to standard
//! error. Write failures are logged and otherwise ignored: failing to print
//! help must not change parse results.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

/// Where usage and deprecation text goes.
#[derive(Clone, Default)]
pub enum Output {
    /// Standard error (the default).
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
    /// Any shared writer, e.g. a [`SharedBuffer`] in tests.
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl Output {
    /// Wrap a writer.
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        Output::Writer(Arc::new(Mutex::new(writer)))
    }

    /// Run `f` against the underlying writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut dyn Write) -> io::Result<R>) -> io::Result<R> {
        match self {
            Output::Stderr => f(&mut io::stderr().lock()),
            Output::Stdout => f(&mut io::stdout().lock()),
            Output::Writer(writer) => {
                let mut guard = writer.lock().unwrap_or_else(PoisonError::into_inner);
                f(&mut *guard)
            }
        }
    }

    /// Write text as is.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        self.with_writer(|w| {
            w.write_all(text.as_bytes())?;
            w.flush()
        })
    }

    /// Write a line, logging instead of failing.
    pub fn notice(&self, message: impl fmt::Display) {
        if let Err(err) = self.write_str(&format!("{}\n", message)) {
            warn!(error = %err, "failed to write to output");
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stderr => f.write_str("Output::Stderr"),
            Output::Stdout => f.write_str("Output::Stdout"),
            Output::Writer(_) => f.write_str("Output::Writer(..)"),
        }
    }
}

impl From<SharedBuffer> for Output {
    fn from(buffer: SharedBuffer) -> Self {
        Output::writer(buffer)
    }
}

/// An in-memory writer whose clones share one buffer.
///
/// Hand a clone to [`Output`] and read what was written from the first handle.
///
/// ```
/// use cmdtree::ui::output::{Output, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let output = Output::from(buffer.clone());
/// output.notice("hello");
/// assert_eq!(buffer.contents(), "hello\n");
/// ```
#[derive(Clone, Default, Debug)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Text printed when a deprecated command is run.
pub fn deprecation_notice(name: &str) -> String {
    format!("Command {:?} is deprecated!", name)
}
