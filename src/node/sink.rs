// ABOUTME: Shared progress sink handed through to nodes during pull and push.
// ABOUTME: Cloneable and lock-protected so concurrent nodes can write to one writer.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Byte sink for streamed pull/push progress.
///
/// Every node of a broadcast writes into the same sink, so each write is a
/// whole line taken under the lock.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// A sink that drops everything written to it.
    pub fn discard() -> Self {
        Self::new(std::io::sink())
    }

    /// Write one progress line and flush it.
    pub fn write_line(&self, line: &[u8]) -> std::io::Result<()> {
        let mut writer = self.inner.lock();
        writer.write_all(line)?;
        if !line.ends_with(b"\n") {
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::discard()
    }
}
