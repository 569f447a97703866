//! Non-destructive first-line sniffing of input streams.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::{Deref, DerefMut};

use super::TextEncoding;

/// Restores a stream to the position it had when the guard was created.
///
/// The rewind happens on drop, so every exit path (including early returns
/// and `?`) leaves the caller's stream where it was.
pub struct RewindGuard<'a, S: Seek + ?Sized> {
    stream: &'a mut S,
    start: u64,
}

impl<'a, S: Seek + ?Sized> RewindGuard<'a, S> {
    pub fn new(stream: &'a mut S) -> io::Result<Self> {
        let start = stream.stream_position()?;
        Ok(Self { stream, start })
    }
}

impl<S: Seek + ?Sized> Deref for RewindGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.stream
    }
}

impl<S: Seek + ?Sized> DerefMut for RewindGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.stream
    }
}

impl<S: Seek + ?Sized> Drop for RewindGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.stream.seek(SeekFrom::Start(self.start)) {
            tracing::warn!("Failed to rewind sniffed stream to {}: {e}", self.start);
        }
    }
}

/// Longest first line read while sniffing; anything past it is cut off.
pub const FIRST_LINE_LIMIT: u64 = 4096;

/// Read the first line of `stream` and rewind it.
///
/// Returns `Ok(None)` for an empty stream. The line terminator is not
/// included, and at most [`FIRST_LINE_LIMIT`] bytes are read.
pub fn first_line<S>(stream: &mut S, encoding: TextEncoding) -> io::Result<Option<String>>
where
    S: Read + Seek + ?Sized,
{
    let mut guard = RewindGuard::new(stream)?;

    let mut bytes = Vec::new();
    // The buffer may read past the line; the guard puts the position back.
    let limited = Read::take(&mut *guard, FIRST_LINE_LIMIT);
    let read = BufReader::new(limited).read_until(b'\n', &mut bytes)?;
    if read == 0 {
        return Ok(None);
    }

    let line = encoding.decode_lossy(&bytes);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// True if `line` looks like the start of a document file.
///
/// Accepts an XML declaration (`<?xml`, or the lenient `<? xml`) or the
/// document root tag.
pub fn is_document_marker(line: &str) -> bool {
    line.contains("<?xml")
        || line.contains("<? xml")
        || line.contains("<RazorDocument>")
        || line.contains("<RazorDocument ")
        || line.contains("<RazorDocument/>")
}
