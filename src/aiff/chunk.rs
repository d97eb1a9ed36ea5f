//! Chunk tags, headers, and the sequential chunk cursor.

use std::fmt;
use std::ops::Range;

use super::bytes;
use crate::error::{Error, Result};

/// A four-character chunk tag (`ckID`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const FORM: ChunkId = ChunkId(*b"FORM");
    pub const COMM: ChunkId = ChunkId(*b"COMM");
    pub const SSND: ChunkId = ChunkId(*b"SSND");
    pub const AIFF: ChunkId = ChunkId(*b"AIFF");
    pub const AIFC: ChunkId = ChunkId(*b"AIFC");

    /// Read a tag at `offset`, rejecting bytes outside printable ASCII.
    pub fn read(buf: &[u8], offset: usize) -> Result<Self> {
        let raw = bytes::window::<4>(buf, offset)?;
        if raw.iter().all(|b| (0x20..=0x7E).contains(b)) {
            Ok(ChunkId(raw))
        } else {
            Err(Error::malformed(offset, "chunk tag is not printable ASCII"))
        }
    }

    pub fn as_str(&self) -> &str {
        // Only constructed from printable ASCII.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({:?})", self.as_str())
    }
}

/// Tag, declared size, and position of one chunk inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: ChunkId,
    /// Offset of the tag's first byte.
    pub offset: usize,
    /// Declared payload length (`ckSize`).
    pub size: u32,
}

impl ChunkHeader {
    pub const LEN: usize = 8;

    /// Offset of the `ckSize` field.
    pub fn size_offset(&self) -> usize {
        self.offset + 4
    }

    pub fn payload_start(&self) -> usize {
        self.offset + Self::LEN
    }

    pub fn payload(&self) -> Range<usize> {
        let start = self.payload_start();
        start..start + self.size as usize
    }

    /// Only the FORM header at the start of the buffer encloses chunks; a
    /// FORM tag anywhere else is an ordinary chunk.
    pub fn is_container(&self) -> bool {
        self.id == ChunkId::FORM && self.offset == 0
    }

    /// Offset of the chunk that follows, including the pad byte after odd payloads.
    fn next_offset(&self) -> usize {
        self.payload().end + (self.size as usize & 1)
    }
}

/// Sequential cursor over the chunks of a FORM buffer.
///
/// The leading FORM header is yielded first; its 4-byte form type is
/// skipped and the chunks it encloses follow as if they were top-level.
/// Any other chunk, including a nested FORM, is skipped by its declared
/// size. Iteration stops at the end of
/// the buffer or after the first error.
pub struct Chunks<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Chunks<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Chunks {
            buf,
            pos: 0,
            failed: false,
        }
    }

    fn read_header(&self) -> Result<ChunkHeader> {
        let offset = self.pos;
        let id = ChunkId::read(self.buf, offset)?;
        let size = bytes::read_i32(self.buf, offset + 4)?;
        let size =
            u32::try_from(size).map_err(|_| Error::malformed(offset + 4, "negative chunk size"))?;
        let header = ChunkHeader { id, offset, size };

        if header.is_container() {
            // Form type must be present even though nothing reads it here.
            bytes::window::<4>(self.buf, header.payload_start())?;
        } else if header.payload().end > self.buf.len() {
            return Err(Error::BufferTooShort {
                offset: header.payload_start(),
                needed: size as usize,
                len: self.buf.len(),
            });
        }
        Ok(header)
    }
}

impl Iterator for Chunks<'_> {
    type Item = Result<ChunkHeader>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        match self.read_header() {
            Ok(header) => {
                self.pos = if header.is_container() {
                    header.payload_start() + 4
                } else {
                    header.next_offset()
                };
                Some(Ok(header))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
