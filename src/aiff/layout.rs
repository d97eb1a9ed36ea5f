//! Read-only inspection of an AIFF buffer.
//!
//! `AiffLayout::parse` locates the COMM and SSND chunks, decodes the
//! common-chunk fields, and checks the container size. Nothing here
//! mutates the buffer.

use serde::Serialize;

use super::bytes;
use super::chunk::{ChunkHeader, ChunkId, Chunks};
use super::extended::read_extended;
use crate::error::{Error, Result};

/// Length of the SSND offset/block-size prefix.
pub const SSND_PREFIX_LEN: u32 = 8;

/// Offset of `numSampleFrames` from the start of the COMM payload.
pub const COMM_FRAMES_OFFSET: usize = 2;

/// Decoded COMM chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonChunk {
    pub num_channels: u16,
    pub num_sample_frames: u32,
    pub sample_size: u16,
    pub sample_rate: f64,
}

impl CommonChunk {
    const LEN: u32 = 18;

    fn read(buf: &[u8], header: &ChunkHeader) -> Result<Self> {
        if header.size < Self::LEN {
            return Err(Error::malformed(header.offset, "COMM chunk shorter than 18 bytes"));
        }
        let at = header.payload_start();
        Ok(CommonChunk {
            num_channels: bytes::read_u16(buf, at)?,
            num_sample_frames: bytes::read_u32(buf, at + COMM_FRAMES_OFFSET)?,
            sample_size: bytes::read_u16(buf, at + 6)?,
            sample_rate: read_extended(bytes::window::<10>(buf, at + 8)?),
        })
    }

    /// Bytes per sample frame: channels × whole bytes per sample.
    pub fn bytes_per_frame(&self) -> u32 {
        self.num_channels as u32 * (self.sample_size as u32).div_ceil(8)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.num_sample_frames as f64 / self.sample_rate
        } else {
            0.0
        }
    }
}

/// Where the interesting chunks sit inside a buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiffLayout {
    pub total_len: usize,
    pub form_size: u32,
    pub form_type: String,
    pub common: CommonChunk,
    /// Offset of the SSND tag.
    pub sound_offset: usize,
    /// SSND `ckSize`, prefix included.
    pub sound_size: u32,
}

impl AiffLayout {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let mut chunks = Chunks::new(buf);

        let form = match chunks.next() {
            Some(header) => header?,
            None => return Err(Error::BufferTooShort { offset: 0, needed: 12, len: 0 }),
        };
        if form.id != ChunkId::FORM {
            return Err(Error::malformed(0, "buffer does not start with a FORM chunk"));
        }
        if form.size as usize != buf.len() - ChunkHeader::LEN {
            return Err(Error::malformed(4, "FORM size does not match buffer length"));
        }
        let form_type = ChunkId::read(buf, form.payload_start())?;

        let mut common = None;
        let mut sound = None;
        for header in chunks {
            let header = header?;
            if header.id == ChunkId::COMM {
                common = Some(CommonChunk::read(buf, &header)?);
            } else if header.id == ChunkId::SSND {
                if header.size < SSND_PREFIX_LEN {
                    return Err(Error::malformed(header.offset, "SSND chunk shorter than its prefix"));
                }
                sound = Some(header);
            }
        }

        let common = common.ok_or(Error::malformed(buf.len(), "no COMM chunk"))?;
        let sound = sound.ok_or(Error::malformed(buf.len(), "no SSND chunk"))?;

        Ok(AiffLayout {
            total_len: buf.len(),
            form_size: form.size,
            form_type: form_type.as_str().to_string(),
            common,
            sound_offset: sound.offset,
            sound_size: sound.size,
        })
    }

    /// PCM bytes in SSND, excluding the offset/block-size prefix.
    pub fn sound_data_len(&self) -> u32 {
        self.sound_size - SSND_PREFIX_LEN
    }

    pub fn bytes_per_frame(&self) -> u32 {
        self.common.bytes_per_frame()
    }

    /// Reject anything other than uncompressed 2-channel 16-bit AIFF.
    pub fn ensure_supported(&self) -> Result<()> {
        if self.form_type == ChunkId::AIFF.as_str()
            && self.common.num_channels == 2
            && self.common.sample_size == 16
        {
            Ok(())
        } else {
            Err(Error::UnsupportedLayout {
                channels: self.common.num_channels,
                sample_size: self.common.sample_size,
                form_type: self.form_type.clone(),
            })
        }
    }

    /// Verify the size bookkeeping a trimmed buffer must keep.
    ///
    /// `frame_slack` is how many bytes the frame count may disagree with
    /// the payload by; trimming to even lengths can leave up to one
    /// sample of difference.
    pub fn check_consistency(&self, frame_slack: u32) -> Result<()> {
        if self.form_size as usize != self.total_len - ChunkHeader::LEN {
            return Err(Error::malformed(4, "FORM size does not match buffer length"));
        }
        let payload = self.sound_data_len();
        if payload % 2 != 0 {
            return Err(Error::malformed(self.sound_offset, "SSND payload length is odd"));
        }
        let framed = self.common.num_sample_frames as u64 * self.bytes_per_frame() as u64;
        if framed.abs_diff(payload as u64) > frame_slack as u64 {
            return Err(Error::malformed(
                self.sound_offset,
                "COMM frame count disagrees with SSND payload",
            ));
        }
        Ok(())
    }
}
