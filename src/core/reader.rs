// src/core/reader.rs
use crate::core::cancellation::CancellationToken;
use crate::errors::AnalysisError;
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

/// 256 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Reads a byte stream in fixed-size chunks, checking a cancellation token
/// before each one.
pub struct ChunkedReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: Read> ChunkedReader<R> {
    pub fn new(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            buf: vec![0; chunk_size.max(1)],
        }
    }

    /// Calls `f` with every chunk in order. Every chunk except the last is
    /// exactly `chunk_size` bytes long.
    pub fn for_each_chunk<F>(&mut self, cancel: &CancellationToken, mut f: F) -> Result<(), ChunkError>
    where
        F: FnMut(&mut [u8]),
    {
        loop {
            cancel.check().map_err(|_| ChunkError::Cancelled)?;
            let n = self.fill()?;
            if n == 0 {
                return Ok(());
            }
            f(&mut self.buf[..n]);
            if n < self.buf.len() {
                return Ok(());
            }
        }
    }

    fn fill(&mut self) -> io::Result<usize> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("read cancelled")]
    Cancelled,
}

impl ChunkError {
    /// Attaches the path the stream was opened from.
    pub fn at(self, path: &Path) -> AnalysisError {
        match self {
            Self::Io(e) => AnalysisError::input(path, e),
            Self::Cancelled => AnalysisError::Cancelled,
        }
    }
}

/// Reads the whole stream chunk by chunk, ASCII-lowercasing each chunk, and
/// returns the concatenation as text.
///
/// Folding is byte-local, so a chunk seam inside a word or inside a multi-byte
/// character cannot change the result. Invalid UTF-8 decodes to U+FFFD, which
/// the tokenizer treats as a delimiter.
pub fn read_lowercased<R: Read>(
    reader: R,
    chunk_size: usize,
    size_hint: Option<u64>,
    cancel: &CancellationToken,
) -> Result<String, ChunkError> {
    let capacity = size_hint.and_then(|n| usize::try_from(n).ok()).unwrap_or(0);
    let mut text = Vec::with_capacity(capacity);
    ChunkedReader::new(reader, chunk_size).for_each_chunk(cancel, |chunk| {
        chunk.make_ascii_lowercase();
        text.extend_from_slice(chunk);
    })?;

    Ok(match String::from_utf8(text) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Opens `path` and reads it with [`read_lowercased`].
pub fn read_file_lowercased(
    path: &Path,
    chunk_size: usize,
    size_hint: Option<u64>,
    cancel: &CancellationToken,
) -> Result<String, AnalysisError> {
    let file = File::open(path).map_err(|e| AnalysisError::input(path, e))?;
    let size_hint = match size_hint {
        Some(n) => Some(n),
        None => file.metadata().ok().map(|m| m.len()),
    };
    read_lowercased(file, chunk_size, size_hint, cancel).map_err(|e| e.at(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn chunks_of(data: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        ChunkedReader::new(Cursor::new(data), chunk_size)
            .for_each_chunk(&CancellationToken::new(), |c| out.push(c.to_vec()))
            .unwrap();
        out
    }

    #[test]
    fn yields_fixed_size_chunks() {
        let chunks = chunks_of(b"abcdefgh", 3);
        assert_eq!(chunks, vec![b"abc".to_vec(), b"def".to_vec(), b"gh".to_vec()]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        assert_eq!(chunks_of(b"abcdef", 3).len(), 2);
        assert!(chunks_of(b"", 3).is_empty());
    }

    #[test]
    fn lowercases_across_seams() {
        let text = read_lowercased(Cursor::new("The the THE cat"), 6, None, &CancellationToken::new()).unwrap();
        assert_eq!(text, "the the the cat");
    }

    #[test]
    fn multibyte_character_split_by_seam_survives() {
        // 'é' is two bytes; a chunk size of 2 splits it.
        let text = read_lowercased(Cursor::new("xé y"), 2, None, &CancellationToken::new()).unwrap();
        assert_eq!(text, "xé y");
    }

    #[test]
    fn cancelled_token_stops_reading() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = read_lowercased(Cursor::new("abc"), 1, None, &cancel).unwrap_err();
        assert!(matches!(err, ChunkError::Cancelled));
    }

    /// Cancels its token once the first read has returned data.
    struct CancelAfterFirstRead {
        inner: Cursor<Vec<u8>>,
        cancel: CancellationToken,
        reads: usize,
    }

    impl Read for CancelAfterFirstRead {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            let n = self.inner.read(buf)?;
            self.cancel.cancel();
            Ok(n)
        }
    }

    #[test]
    fn cancellation_between_chunks_stops_the_next_chunk() {
        let cancel = CancellationToken::new();
        let mut source = CancelAfterFirstRead {
            inner: Cursor::new(b"aaaa bbbb cccc".to_vec()),
            cancel: cancel.clone(),
            reads: 0,
        };
        let mut seen = Vec::new();
        let err = ChunkedReader::new(&mut source, 4)
            .for_each_chunk(&cancel, |c| seen.push(c.to_vec()))
            .unwrap_err();

        assert!(matches!(err, ChunkError::Cancelled));
        assert_eq!(seen, vec![b"aaaa".to_vec()]);
        assert_eq!(source.reads, 1);
    }

    #[test]
    fn chunk_errors_display_and_map_to_analysis_errors() {
        let err = ChunkError::from(io::Error::other("disk gone"));
        assert_eq!(err.to_string(), "read failed: disk gone");
        assert!(matches!(err.at(Path::new("a.txt")), AnalysisError::Input { .. }));

        assert_eq!(ChunkError::Cancelled.to_string(), "read cancelled");
        assert!(matches!(ChunkError::Cancelled.at(Path::new("a.txt")), AnalysisError::Cancelled));
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file_lowercased(&dir.path().join("nope.txt"), 8, None, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::Input { .. }));
    }
}
