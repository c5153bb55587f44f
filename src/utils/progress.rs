//! Log output that coexists with a progress bar.
//!
//! Log lines and the `fetch` progress bar share stderr. While a bar is
//! attached, each log line is written with the bar suspended so the line
//! lands above the bar instead of through it.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn set_active_bar(bar: Option<ProgressBar>) {
    *ACTIVE_BAR.lock().unwrap_or_else(PoisonError::into_inner) = bar;
}

/// Route log output around `bar` until the returned guard is dropped
#[must_use = "the bar is detached when the guard is dropped"]
pub fn attach(bar: &ProgressBar) -> AttachedBar {
    set_active_bar(Some(bar.clone()));
    AttachedBar { _private: () }
}

/// Keeps a progress bar attached to the log writer
pub struct AttachedBar {
    _private: (),
}

impl Drop for AttachedBar {
    fn drop(&mut self) {
        set_active_bar(None);
    }
}

/// stderr writer for `tracing_subscriber` that suspends the attached bar
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWriter;

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active_bar() {
            Some(bar) => bar.suspend(|| io::stderr().write_all(buf))?,
            None => io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_detach() {
        let bar = ProgressBar::hidden();
        {
            let _attached = attach(&bar);
            assert!(active_bar().is_some());

            let mut writer = LogWriter.make_writer();
            assert_eq!(writer.write(b"warning line\n").unwrap(), 13);
        }
        assert!(active_bar().is_none());

        let mut writer = LogWriter;
        assert_eq!(writer.write(b"").unwrap(), 0);
    }
}
