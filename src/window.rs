//! The Input Window: a fixed-capacity buffer view of the input stream, plus the
//! Input Reader that refills it.

use std::io::{self, ErrorKind, Read};

use anyhow::{Context, Result};

/// Default input buffer capacity (1 MiB).
pub const DEFAULT_INBUF_SIZE: usize = 1024 * 1024;

/// A fixed-capacity byte buffer holding the most recently read slice of the
/// input stream, plus the absolute offset of its far end.
///
/// Invariant: `0 <= len <= buf.len()`; `read_cursor >= len` once any read has
/// occurred.
pub struct InputWindow {
    buf: Vec<u8>,
    len: usize,
    read_cursor: u64,
}

impl InputWindow {
    pub fn new(capacity: usize) -> Self {
        Self { buf: vec![0u8; capacity.max(1)], len: 0, read_cursor: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Absolute stream offset of `self.filled()[self.len()]`.
    pub fn read_cursor(&self) -> u64 {
        self.read_cursor
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Refill the window from `reader`, replacing its contents.
    ///
    /// Returns the number of bytes placed; 0 means EOF. Retries transparently
    /// on interrupted/would-block conditions (the EINTR/EAGAIN class); any
    /// other I/O failure is fatal. Short reads are accepted as-is — a short
    /// read is a normal refill event, not cause for another attempt.
    pub fn refill(&mut self, reader: &mut dyn Read) -> Result<usize> {
        let n = read_retrying(reader, &mut self.buf).context("read")?;
        self.len = n;
        self.read_cursor += n as u64;
        Ok(n)
    }
}

/// Read once into `buf`, restarting on interrupted/would-block conditions.
fn read_retrying(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted || e.kind() == ErrorKind::WouldBlock => {
                continue;
            }
            Err(e) => return Err(e),
        }
    }
}
