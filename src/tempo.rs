//! Tempo range and trim arithmetic.
//!
//! A baseline clip is one beat long at the slowest supported tempo.
//! Keeping `min / tempo` of its sound data gives a loop whose period is
//! proportional to `1 / tempo`, which is exactly one beat at `tempo`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MIN_BPM: u32 = 20;
pub const DEFAULT_MAX_BPM: u32 = 260;

/// Inclusive range of supported tempos, in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoRange {
    pub min: u32,
    pub max: u32,
}

impl Default for TempoRange {
    fn default() -> Self {
        TempoRange {
            min: DEFAULT_MIN_BPM,
            max: DEFAULT_MAX_BPM,
        }
    }
}

impl TempoRange {
    pub fn new(min: u32, max: u32) -> Self {
        TempoRange { min, max }
    }

    pub fn contains(&self, tempo: u32) -> bool {
        tempo >= self.min && tempo <= self.max
    }

    pub fn clamp(&self, tempo: u32) -> u32 {
        tempo.clamp(self.min, self.max.max(self.min))
    }

    /// A usable range starts at 1 BPM and is not inverted.
    pub fn validate(&self) -> Result<()> {
        if self.min == 0 {
            return Err(Error::InvalidConfig(String::from("tempo range must start at 1 BPM or above")));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "tempo range {}..={} is inverted",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn check(&self, tempo: u32) -> Result<()> {
        if self.contains(tempo) {
            Ok(())
        } else {
            Err(Error::TempoOutOfRange {
                tempo,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// How much to cut from a baseline's sound data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimAmount {
    pub bytes: u32,
    pub frames: u32,
}

/// Compute the trim for `tempo` against a baseline whose SSND payload is
/// `payload_len` bytes at `range.min`.
///
/// `bytes = L - L * min / tempo` (truncating), rounded up to even;
/// `frames = bytes / bytes_per_frame`. Tempos outside `range` are
/// rejected, not clamped, and so is a `range` that fails `validate`.
pub fn trim_amount(
    tempo: u32,
    range: TempoRange,
    payload_len: u32,
    bytes_per_frame: u32,
) -> Result<TrimAmount> {
    range.validate()?;
    range.check(tempo)?;
    if bytes_per_frame == 0 {
        return Err(Error::UnsupportedLayout {
            channels: 0,
            sample_size: 0,
            form_type: String::from("AIFF"),
        });
    }

    let len = payload_len as u64;
    let kept = len * range.min as u64 / tempo as u64;
    let mut bytes = len - kept;
    if bytes % 2 != 0 {
        bytes += 1;
    }
    // Cannot exceed an even payload; an odd one is capped at its length.
    let bytes = bytes.min(len) as u32;

    Ok(TrimAmount {
        bytes,
        frames: bytes / bytes_per_frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const L: u32 = 529_208;

    #[test]
    fn double_tempo_halves_payload() {
        let amount = trim_amount(40, TempoRange::default(), L, 4).unwrap();
        assert_eq!(amount.bytes, 264_604);
        assert_eq!(amount.frames, 66_151);
    }

    #[test]
    fn baseline_tempo_removes_nothing() {
        let amount = trim_amount(20, TempoRange::default(), L, 4).unwrap();
        assert_eq!(amount, TrimAmount::default());
    }

    #[test]
    fn odd_removal_rounds_up_to_even() {
        // 529208 * 20 / 30 = 352805.33 -> kept 352805, remove 176403 -> 176404
        let amount = trim_amount(30, TempoRange::default(), L, 4).unwrap();
        assert_eq!(amount.bytes, 176_404);
        assert_eq!(amount.frames, 44_101);
    }

    #[test]
    fn removal_is_even_and_below_payload() {
        let range = TempoRange::default();
        for tempo in range.min..=range.max {
            let amount = trim_amount(tempo, range, L, 4).unwrap();
            assert_eq!(amount.bytes % 2, 0, "tempo {tempo}");
            assert!(amount.bytes < L, "tempo {tempo}");
            assert!(amount.frames * 4 <= amount.bytes);
            assert!(amount.bytes - amount.frames * 4 < 4);
        }
    }

    #[test]
    fn removal_grows_with_tempo() {
        let range = TempoRange::default();
        let mut last = 0;
        for tempo in range.min + 1..=range.max {
            let amount = trim_amount(tempo, range, L, 4).unwrap();
            assert!(amount.bytes > last, "tempo {tempo}");
            last = amount.bytes;
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        for tempo in [0, 19, 261, 300] {
            match trim_amount(tempo, TempoRange::default(), L, 4) {
                Err(Error::TempoOutOfRange { tempo: t, min, max }) => {
                    assert_eq!((t, min, max), (tempo, 20, 260));
                }
                other => panic!("expected TempoOutOfRange, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_or_inverted_range_is_rejected() {
        assert!(matches!(
            trim_amount(0, TempoRange::new(0, 260), L, 4),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            trim_amount(40, TempoRange::new(0, 260), L, 4),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            trim_amount(100, TempoRange::new(120, 60), L, 4),
            Err(Error::InvalidConfig(_))
        ));
        assert!(TempoRange::default().validate().is_ok());
        assert!(TempoRange::new(1, 1).validate().is_ok());
    }

    #[test]
    fn clamp_and_contains() {
        let range = TempoRange::default();
        assert_eq!(range.clamp(0), 20);
        assert_eq!(range.clamp(300), 260);
        assert_eq!(range.clamp(120), 120);
        assert!(range.contains(20) && range.contains(260));
        assert!(!range.contains(261));
    }

    #[test]
    fn no_overflow_on_large_payloads() {
        let amount = trim_amount(260, TempoRange::default(), u32::MAX - 1, 4).unwrap();
        assert!(amount.bytes < u32::MAX - 1);
    }
}
