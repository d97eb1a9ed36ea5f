//! AIFF container handling: chunk parsing, inspection, trimming, encoding.
//!
//! Buffers are sequences of tagged, length-prefixed chunks inside a single
//! FORM container. All multi-byte fields are big-endian.

pub mod bytes;
pub mod chunk;
pub mod extended;
pub mod layout;
pub mod walker;
pub mod writer;

pub use chunk::{ChunkHeader, ChunkId, Chunks};
pub use layout::{AiffLayout, CommonChunk};
pub use walker::{trim, TrimPlan};
pub use writer::AiffWriter;
