//! Chunk walker: rewrites size fields and drops the tail of SSND.
//!
//! The walk runs against the untouched source buffer and produces a
//! `TrimPlan`: a list of field rewrites plus the byte range to cut. The
//! output is then assembled by appending the kept ranges and patching
//! the fields, so nothing is read from a buffer that is being edited.

use std::ops::Range;

use super::bytes;
use super::chunk::{ChunkId, Chunks};
use super::layout::{COMM_FRAMES_OFFSET, SSND_PREFIX_LEN};
use crate::error::{Error, Result};
use crate::tempo::TrimAmount;

/// A 32-bit big-endian field to overwrite in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEdit {
    pub offset: usize,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimPlan {
    pub edits: Vec<FieldEdit>,
    /// Bytes removed from the end of the SSND payload.
    pub cut: Range<usize>,
}

impl TrimPlan {
    /// Walk `buf` and record the edits that remove `amount` from it.
    pub fn new(buf: &[u8], amount: TrimAmount) -> Result<Self> {
        let bytes_to_remove = amount.bytes;
        let mut edits = Vec::with_capacity(3);

        for header in Chunks::new(buf) {
            let header = header?;
            match header.id {
                ChunkId::FORM if header.is_container() => {
                    let size = header.size.checked_sub(bytes_to_remove).ok_or(
                        Error::malformed(header.size_offset(), "FORM size smaller than trim"),
                    )?;
                    edits.push(FieldEdit {
                        offset: header.size_offset(),
                        value: size,
                    });
                }
                ChunkId::COMM => {
                    let offset = header.payload_start() + COMM_FRAMES_OFFSET;
                    let frames = bytes::read_u32(buf, offset)?;
                    let frames = frames.checked_sub(amount.frames).ok_or(Error::malformed(
                        offset,
                        "sample frame count smaller than trim",
                    ))?;
                    edits.push(FieldEdit {
                        offset,
                        value: frames,
                    });
                }
                ChunkId::SSND => {
                    let size = header
                        .size
                        .checked_sub(bytes_to_remove)
                        .filter(|s| *s >= SSND_PREFIX_LEN)
                        .ok_or(Error::malformed(
                            header.size_offset(),
                            "SSND payload smaller than trim",
                        ))?;
                    edits.push(FieldEdit {
                        offset: header.size_offset(),
                        value: size,
                    });
                    let start = header.payload_start();
                    let cut = start + size as usize..header.payload().end;
                    return Ok(TrimPlan { edits, cut });
                }
                _ => {}
            }
        }

        Err(Error::malformed(buf.len(), "reached end of buffer without an SSND chunk"))
    }

    /// Build the trimmed buffer from the source the plan was made from.
    pub fn apply(&self, source: &[u8]) -> Result<Vec<u8>> {
        let tail = source.get(self.cut.end..).ok_or(Error::BufferTooShort {
            offset: self.cut.end,
            needed: 0,
            len: source.len(),
        })?;
        let mut out = Vec::with_capacity(self.cut.start + tail.len());
        out.extend_from_slice(&source[..self.cut.start]);
        out.extend_from_slice(tail);

        for edit in &self.edits {
            bytes::write_u32(&mut out, edit.offset, edit.value)?;
        }
        Ok(out)
    }
}

/// Produce a copy of `buf` with `amount` removed from its sound data.
///
/// `buf` itself is never modified.
pub fn trim(buf: &[u8], amount: TrimAmount) -> Result<Vec<u8>> {
    if amount.bytes == 0 && amount.frames == 0 {
        return Ok(buf.to_vec());
    }
    TrimPlan::new(buf, amount)?.apply(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiff::layout::AiffLayout;
    use crate::aiff::writer::AiffWriter;

    fn baseline(frames: usize) -> Vec<u8> {
        let pcm: Vec<i16> = (0..frames * 2).map(|i| i as i16).collect();
        AiffWriter::new(2, 44100.0)
            .with_chunk(*b"NAME", b"Clap".to_vec())
            .write_i16(&pcm)
    }

    #[test]
    fn trims_tail_and_fixes_sizes() {
        let src = baseline(100);
        let before = AiffLayout::parse(&src).unwrap();
        let out = trim(&src, TrimAmount { bytes: 40, frames: 10 }).unwrap();
        let after = AiffLayout::parse(&out).unwrap();

        assert_eq!(out.len(), src.len() - 40);
        assert_eq!(after.form_size, before.form_size - 40);
        assert_eq!(after.sound_size, before.sound_size - 40);
        assert_eq!(after.common.num_sample_frames, 90);
        assert!(after.check_consistency(0).is_ok());

        // Kept audio is byte-identical; only the tail is gone.
        let data = after.sound_offset + 16;
        assert_eq!(&out[data..], &src[data..src.len() - 40]);
        assert_eq!(&out[38..50], &src[38..50]);
    }

    #[test]
    fn plan_records_three_fields() {
        let src = baseline(10);
        let plan = TrimPlan::new(&src, TrimAmount { bytes: 8, frames: 2 }).unwrap();
        let offsets: Vec<usize> = plan.edits.iter().map(|e| e.offset).collect();
        // FORM size, COMM frames, SSND size.
        assert_eq!(offsets, [4, 22, 54]);
        assert_eq!(plan.cut, src.len() - 8..src.len());
    }

    #[test]
    fn chunks_after_sound_data_survive() {
        let mut src = baseline(10);
        src.extend_from_slice(b"ANNO");
        src.extend_from_slice(&2u32.to_be_bytes());
        src.extend_from_slice(b"hi");
        let form = (src.len() - 8) as u32;
        src[4..8].copy_from_slice(&form.to_be_bytes());

        let out = trim(&src, TrimAmount { bytes: 4, frames: 1 }).unwrap();
        assert_eq!(&out[out.len() - 10..], b"ANNO\0\0\0\x02hi");
        let layout = AiffLayout::parse(&out).unwrap();
        assert_eq!(layout.common.num_sample_frames, 9);
    }

    #[test]
    fn nested_form_is_left_alone() {
        let mut inner = b"FORM".to_vec();
        inner.extend_from_slice(&16u32.to_be_bytes());
        inner.extend_from_slice(b"AIFF");
        inner.extend_from_slice(b"SSND");
        inner.extend_from_slice(&4u32.to_be_bytes());
        inner.extend_from_slice(&[9; 4]);
        let src = AiffWriter::new(2, 44100.0)
            .with_chunk(*b"NAME", b"Clap".to_vec())
            .write_i16(&(0..40).collect::<Vec<i16>>());
        // Splice the inner FORM in place of NAME's payload position.
        let mut buf = src[..38].to_vec();
        buf.extend_from_slice(&inner);
        buf.extend_from_slice(&src[50..]);
        let form = (buf.len() - 8) as u32;
        buf[4..8].copy_from_slice(&form.to_be_bytes());

        let plan = TrimPlan::new(&buf, TrimAmount { bytes: 8, frames: 2 }).unwrap();
        let offsets: Vec<usize> = plan.edits.iter().map(|e| e.offset).collect();
        assert_eq!(offsets, [4, 22, 66]);

        let out = plan.apply(&buf).unwrap();
        assert_eq!(&out[38..62], &inner[..]);
        let layout = AiffLayout::parse(&out).unwrap();
        assert_eq!(layout.form_size, form - 8);
        assert_eq!(layout.common.num_sample_frames, 18);
        assert!(layout.check_consistency(0).is_ok());
    }

    #[test]
    fn zero_trim_is_identity() {
        let src = baseline(16);
        assert_eq!(trim(&src, TrimAmount { bytes: 0, frames: 0 }).unwrap(), src);
    }

    #[test]
    fn trim_larger_than_sound_data() {
        let src = baseline(4);
        assert!(matches!(
            trim(&src, TrimAmount { bytes: 64, frames: 16 }),
            Err(Error::MalformedChunk { .. })
        ));
    }

    #[test]
    fn bad_tag_before_sound_data() {
        let mut src = baseline(4);
        src[38] = 0xFF; // first byte of NAME
        assert!(matches!(
            trim(&src, TrimAmount { bytes: 4, frames: 1 }),
            Err(Error::MalformedChunk { offset: 38, .. })
        ));
    }

    #[test]
    fn missing_sound_data() {
        let src = baseline(4);
        let cut = AiffLayout::parse(&src).unwrap().sound_offset;
        let mut head = src[..cut].to_vec();
        let form = (head.len() - 8) as u32;
        head[4..8].copy_from_slice(&form.to_be_bytes());
        assert!(matches!(
            trim(&head, TrimAmount { bytes: 4, frames: 1 }),
            Err(Error::MalformedChunk { .. })
        ));
    }
}
