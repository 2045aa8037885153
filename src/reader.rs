//! Length-prefixed reads over byte buffers in the SSH wire format.
//!
//! Streaming callers hand partially-filled buffers to these reads, so running
//! out of bytes is an ordinary outcome rather than an error: it is reported
//! as [`ReadStatus::NeedMore`] and the caller retries once more data arrives.

use crate::{Error, Result};
use core::str;

/// Outcome of a cursor read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadStatus<T> {
    /// Decoded value plus the offset of the first byte after the consumed
    /// region, allowing successive reads to be chained without shared
    /// mutable position state.
    Complete(T, usize),

    /// Fewer bytes than required remain after the given offset.
    ///
    /// Recoverable: the caller should retry the same read after supplying
    /// more input.
    NeedMore,
}

impl<T> ReadStatus<T> {
    /// Did the read complete?
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(..))
    }

    /// Extract the value and next offset from a completed read.
    pub fn complete(self) -> Option<(T, usize)> {
        match self {
            Self::Complete(value, next) => Some((value, next)),
            Self::NeedMore => None,
        }
    }
}

/// Positionless cursor over a byte buffer.
///
/// Each read takes an explicit offset and returns the offset just past the
/// consumed region. An optional cleanup hook is invoked synchronously
/// whenever a read comes up short, letting a streaming consumer release
/// per-message state before it retries; the hook must not block.
pub struct BufferCursor<'a> {
    buffer: &'a [u8],
    cleanup: Option<&'a mut (dyn FnMut() + 'a)>,
}

impl<'a> BufferCursor<'a> {
    /// Create a cursor over `buffer` with no cleanup hook.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cleanup: None,
        }
    }

    /// Create a cursor which invokes `cleanup` whenever a read signals
    /// [`ReadStatus::NeedMore`].
    pub fn with_cleanup(buffer: &'a [u8], cleanup: &'a mut (dyn FnMut() + 'a)) -> Self {
        Self {
            buffer,
            cleanup: Some(cleanup),
        }
    }

    /// Read a big-endian `u32` at `offset`.
    pub fn read_u32(&mut self, offset: usize) -> ReadStatus<u32> {
        let end = match offset.checked_add(4) {
            Some(end) => end,
            None => return self.need_more(),
        };

        match self.buffer.get(offset..end) {
            Some(bytes) => {
                let mut word = [0u8; 4];
                word.copy_from_slice(bytes);
                ReadStatus::Complete(u32::from_be_bytes(word), end)
            }
            None => self.need_more(),
        }
    }

    /// Read a length-prefixed byte string at `offset`, returning a zero-copy
    /// view of its contents.
    pub fn read_string(&mut self, offset: usize) -> ReadStatus<&'a [u8]> {
        let (len, start) = match self.read_u32(offset) {
            ReadStatus::Complete(len, start) => (len as usize, start),
            // `read_u32` has already run the cleanup hook
            ReadStatus::NeedMore => return ReadStatus::NeedMore,
        };

        let end = match start.checked_add(len) {
            Some(end) => end,
            None => return self.need_more(),
        };

        match self.buffer.get(start..end) {
            Some(bytes) => ReadStatus::Complete(bytes, end),
            None => self.need_more(),
        }
    }

    /// Read a length-prefixed byte string at `offset`, copying its contents
    /// into `out`.
    ///
    /// A destination shorter than the string receives a clamped prefix copy;
    /// the returned offset still skips the whole string. Destination size is
    /// a caller concern, not a streaming condition, so it never signals
    /// [`ReadStatus::NeedMore`] on its own.
    pub fn read_string_into<'o>(
        &mut self,
        offset: usize,
        out: &'o mut [u8],
    ) -> ReadStatus<&'o [u8]> {
        match self.read_string(offset) {
            ReadStatus::Complete(bytes, next) => {
                let len = bytes.len().min(out.len());
                let dest = &mut out[..len];
                dest.copy_from_slice(&bytes[..len]);
                ReadStatus::Complete(dest, next)
            }
            ReadStatus::NeedMore => ReadStatus::NeedMore,
        }
    }

    /// Read a length-prefixed string at `offset` and decode it as UTF-8.
    ///
    /// Truncated input is still the recoverable [`ReadStatus::NeedMore`];
    /// invalid UTF-8 in a complete string is a hard error.
    pub fn read_utf8(&mut self, offset: usize) -> Result<ReadStatus<&'a str>> {
        match self.read_string(offset) {
            ReadStatus::Complete(bytes, next) => {
                let text = str::from_utf8(bytes).map_err(|_| Error::CharacterEncoding)?;
                Ok(ReadStatus::Complete(text, next))
            }
            ReadStatus::NeedMore => Ok(ReadStatus::NeedMore),
        }
    }

    fn need_more<T>(&mut self) -> ReadStatus<T> {
        if let Some(cleanup) = self.cleanup.as_mut() {
            cleanup();
        }
        ReadStatus::NeedMore
    }
}
