//! AIFF encoder: writes interleaved 16-bit PCM into a FORM/AIFF buffer.

use super::chunk::ChunkId;
use super::extended::write_extended;

/// Builds a FORM/AIFF buffer: COMM, any extra chunks, then SSND.
#[derive(Debug, Clone)]
pub struct AiffWriter {
    channels: u16,
    sample_rate: f64,
    extra: Vec<(ChunkId, Vec<u8>)>,
}

impl AiffWriter {
    pub fn new(channels: u16, sample_rate: f64) -> Self {
        AiffWriter {
            channels,
            sample_rate,
            extra: Vec::new(),
        }
    }

    /// Add a chunk between COMM and SSND (e.g. NAME, ANNO, MARK).
    pub fn with_chunk(mut self, id: [u8; 4], payload: Vec<u8>) -> Self {
        self.extra.push((ChunkId(id), payload));
        self
    }

    /// Encode interleaved samples. A trailing partial frame is dropped.
    pub fn write_i16(&self, samples: &[i16]) -> Vec<u8> {
        let channels = self.channels.max(1) as usize;
        let frames = samples.len() / channels;
        let data_size = frames * channels * 2;

        let extra_size: usize = self
            .extra
            .iter()
            .map(|(_, p)| 8 + p.len() + (p.len() & 1))
            .sum();
        let form_size = 4 + (8 + 18) + extra_size + (8 + 8 + data_size);

        let mut buf = Vec::with_capacity(8 + form_size);

        // FORM header
        buf.extend_from_slice(&ChunkId::FORM.0);
        buf.extend_from_slice(&(form_size as u32).to_be_bytes());
        buf.extend_from_slice(&ChunkId::AIFF.0);

        // COMM chunk
        buf.extend_from_slice(&ChunkId::COMM.0);
        buf.extend_from_slice(&18u32.to_be_bytes());
        buf.extend_from_slice(&self.channels.to_be_bytes());
        buf.extend_from_slice(&(frames as u32).to_be_bytes());
        buf.extend_from_slice(&16u16.to_be_bytes()); // sample size
        buf.extend_from_slice(&write_extended(self.sample_rate));

        for (id, payload) in &self.extra {
            buf.extend_from_slice(&id.0);
            buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            buf.extend_from_slice(payload);
            if payload.len() % 2 == 1 {
                buf.push(0);
            }
        }

        // SSND chunk
        buf.extend_from_slice(&ChunkId::SSND.0);
        buf.extend_from_slice(&((8 + data_size) as u32).to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes()); // offset
        buf.extend_from_slice(&0u32.to_be_bytes()); // block size
        for &sample in &samples[..frames * channels] {
            buf.extend_from_slice(&sample.to_be_bytes());
        }

        buf
    }

    /// A percussive click at the start of `beat_secs` of audio, the rest
    /// silence. This is the shape of a baseline clip recorded at the
    /// slowest tempo: one beat period per loop.
    pub fn click_track(&self, beat_secs: f64, click_secs: f64) -> Vec<u8> {
        let channels = self.channels.max(1) as usize;
        let frames = (beat_secs * self.sample_rate).round() as usize;
        let click_frames = ((click_secs * self.sample_rate).round() as usize).min(frames);

        let mut samples = vec![0i16; frames * channels];
        for frame in 0..click_frames {
            // Linearly decaying square burst.
            let level = 1.0 - frame as f64 / click_frames as f64;
            let sign = if (frame / 8) % 2 == 0 { 1.0 } else { -1.0 };
            let value = (sign * level * i16::MAX as f64 * 0.8) as i16;
            for ch in 0..channels {
                samples[frame * channels + ch] = value;
            }
        }
        self.write_i16(&samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_valid() {
        let buf = AiffWriter::new(2, 44100.0).write_i16(&[1, -1, 2, -2]);

        assert_eq!(&buf[0..4], b"FORM");
        assert_eq!(&buf[8..12], b"AIFF");
        assert_eq!(&buf[12..16], b"COMM");
        assert_eq!(&buf[38..42], b"SSND");

        let form_size = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
        assert_eq!(form_size as usize, buf.len() - 8);

        let channels = u16::from_be_bytes([buf[20], buf[21]]);
        assert_eq!(channels, 2);
        let frames = u32::from_be_bytes([buf[22], buf[23], buf[24], buf[25]]);
        assert_eq!(frames, 2);

        // First sample, big-endian, after the 8-byte SSND prefix.
        assert_eq!(&buf[54..56], &[0x00, 0x01]);
        assert_eq!(buf.len(), 54 + 8);
    }

    #[test]
    fn partial_frame_dropped() {
        let buf = AiffWriter::new(2, 8000.0).write_i16(&[1, 2, 3]);
        let ssnd_size = u32::from_be_bytes([buf[42], buf[43], buf[44], buf[45]]);
        assert_eq!(ssnd_size, 8 + 4);
    }

    #[test]
    fn click_track_is_silent_after_click() {
        let buf = AiffWriter::new(2, 1000.0).click_track(1.0, 0.01);
        let data = &buf[54..];
        assert_eq!(data.len(), 1000 * 4);
        assert!(data[..40].iter().any(|&b| b != 0));
        assert!(data[40..].iter().all(|&b| b == 0));
    }
}
