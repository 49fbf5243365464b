//! Console duplicate of the log stream.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::sink::LogSink;

/// Writes every line verbatim to a console-like stream.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Sink writing to an arbitrary stream.
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for ConsoleSink {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut out = self.lock();
        out.write_all(line)?;
        out.flush()
    }

    fn sync(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_verbatim() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::new(buf.clone());
        sink.write_line(b"{\"msg\":\"a\"}\n").unwrap();
        sink.write_line(b"{\"msg\":\"b\"}\n").unwrap();
        sink.sync().unwrap();
        assert_eq!(&*buf.0.lock().unwrap(), b"{\"msg\":\"a\"}\n{\"msg\":\"b\"}\n");
    }
}
