//! Compute-once, serve-many body buffer.
//!
//! Filters that inspect a body before forwarding it (logging, recording) need
//! to read content that may only be readable once. [`MemoizedContent`] reads
//! its source exactly once on first access, keeping small bodies in memory
//! and spilling larger ones to a temporary file. Every caller, including ones
//! that arrive while the first read is still running, blocks until the buffer
//! is complete and then replays the same data.

use std::fmt;
use std::io::{self, Cursor, Read, Write};
use std::sync::Mutex;

use bytes::Bytes;
use once_cell::sync::OnceCell;
use tempfile::NamedTempFile;

use crate::error::Result;

/// Bodies up to this many bytes stay in memory (64 KiB)
pub const DEFAULT_MEMORY_THRESHOLD: usize = 64 * 1024;

type Source = Box<dyn Read + Send>;

enum Buffer {
    Memory(Bytes),
    Spilled { file: NamedTempFile, len: u64 },
}

/// Memoized, replayable content
pub struct MemoizedContent {
    source: Mutex<Option<Source>>,
    threshold: usize,
    buffer: OnceCell<Buffer>,
    /// First materialization failure, replayed to later callers
    failure: OnceCell<String>,
}

impl MemoizedContent {
    /// Wrap a one-shot source. Nothing is read until first access.
    pub fn new(source: impl Read + Send + 'static, threshold: usize) -> Self {
        Self {
            source: Mutex::new(Some(Box::new(source))),
            threshold,
            buffer: OnceCell::new(),
            failure: OnceCell::new(),
        }
    }

    /// Content that is already in memory
    pub fn from_bytes(content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            source: Mutex::new(None),
            threshold: content.len(),
            buffer: OnceCell::with_value(Buffer::Memory(content)),
            failure: OnceCell::new(),
        }
    }

    /// A fresh reader over the full content
    pub fn reader(&self) -> Result<Box<dyn Read + Send>> {
        match self.buffer()? {
            Buffer::Memory(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Buffer::Spilled { file, .. } => Ok(Box::new(file.reopen()?)),
        }
    }

    /// The full content as bytes
    pub fn bytes(&self) -> Result<Bytes> {
        match self.buffer()? {
            Buffer::Memory(bytes) => Ok(bytes.clone()),
            Buffer::Spilled { file, len } => {
                let mut out = Vec::with_capacity(*len as usize);
                file.reopen()?.read_to_end(&mut out)?;
                Ok(Bytes::from(out))
            },
        }
    }

    /// Content length in bytes
    pub fn len(&self) -> Result<u64> {
        match self.buffer()? {
            Buffer::Memory(bytes) => Ok(bytes.len() as u64),
            Buffer::Spilled { len, .. } => Ok(*len),
        }
    }

    /// True for zero-length content
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Whether the content was spilled to disk
    pub fn is_spilled(&self) -> Result<bool> {
        Ok(matches!(self.buffer()?, Buffer::Spilled { .. }))
    }

    fn buffer(&self) -> Result<&Buffer> {
        self.buffer.get_or_try_init(|| self.materialize())
    }

    fn materialize(&self) -> Result<Buffer> {
        let source = self
            .source
            .lock()
            .map_err(|_| io::Error::other("content source lock poisoned"))?
            .take();
        let Some(source) = source else {
            let reason = self.failure.get().map_or("content source already consumed", String::as_str);
            return Err(io::Error::other(reason.to_string()).into());
        };

        self.read_source(source).map_err(|e| {
            let _ = self.failure.set(e.to_string());
            e.into()
        })
    }

    fn read_source(&self, mut source: Source) -> io::Result<Buffer> {
        let mut head = Vec::new();
        source
            .by_ref()
            .take(self.threshold as u64 + 1)
            .read_to_end(&mut head)?;

        if head.len() <= self.threshold {
            return Ok(Buffer::Memory(Bytes::from(head)));
        }

        let mut file = NamedTempFile::new()?;
        file.write_all(&head)?;
        let rest = io::copy(&mut source, &mut file)?;
        file.flush()?;

        let len = head.len() as u64 + rest;
        tracing::debug!(
            bytes = len,
            path = %file.path().display(),
            "Spilled content to disk"
        );
        Ok(Buffer::Spilled { file, len })
    }
}

impl fmt::Debug for MemoizedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.buffer.get() {
            None => "pending",
            Some(Buffer::Memory(_)) => "memory",
            Some(Buffer::Spilled { .. }) => "spilled",
        };
        f.debug_struct("MemoizedContent")
            .field("threshold", &self.threshold)
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_small_content_stays_in_memory() {
        let content = MemoizedContent::new(Cursor::new(b"hello".to_vec()), 16);
        assert_eq!(content.bytes().unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(content.len().unwrap(), 5);
        assert!(!content.is_spilled().unwrap());
    }

    #[test]
    fn test_large_content_spills_and_replays() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let content = MemoizedContent::new(Cursor::new(payload.clone()), 1024);

        assert!(content.is_spilled().unwrap());
        assert_eq!(content.len().unwrap(), payload.len() as u64);

        for _ in 0..2 {
            let mut replay = Vec::new();
            content.reader().unwrap().read_to_end(&mut replay).unwrap();
            assert_eq!(replay, payload);
        }
    }

    #[test]
    fn test_exact_threshold_stays_in_memory() {
        let content = MemoizedContent::new(Cursor::new(vec![7u8; 32]), 32);
        assert!(!content.is_spilled().unwrap());
        assert_eq!(content.len().unwrap(), 32);
    }

    #[test]
    fn test_concurrent_first_access_reads_source_once() {
        let payload = vec![42u8; 4096];
        let content = Arc::new(MemoizedContent::new(Cursor::new(payload.clone()), 512));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let content = Arc::clone(&content);
                let expected = payload.clone();
                scope.spawn(move || {
                    assert_eq!(content.bytes().unwrap().as_ref(), expected.as_slice());
                });
            }
        });

        // The source was taken by exactly one materialization
        assert!(content.source.lock().unwrap().is_none());
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
        }
    }

    #[test]
    fn test_read_failure_is_replayed() {
        let content = MemoizedContent::new(Failing, 16);
        for _ in 0..2 {
            let err = content.bytes().unwrap_err();
            assert!(err.to_string().contains("peer went away"), "{err}");
        }
    }

    #[test]
    fn test_from_bytes() {
        let content = MemoizedContent::from_bytes("abc");
        assert_eq!(content.len().unwrap(), 3);
        assert!(!content.is_empty().unwrap());
    }
}
