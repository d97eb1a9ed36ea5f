//! Tempo buffer builder: derives a tempo-specific clip from a baseline.

use crate::aiff::layout::AiffLayout;
use crate::aiff::walker;
use crate::error::Result;
use crate::tempo::{trim_amount, TempoRange, TrimAmount};

/// Turns an immutable baseline buffer into a copy trimmed for a tempo.
#[derive(Debug, Clone, Copy, Default)]
pub struct TempoBufferBuilder {
    range: TempoRange,
}

impl TempoBufferBuilder {
    pub fn new(range: TempoRange) -> Self {
        TempoBufferBuilder { range }
    }

    pub fn range(&self) -> TempoRange {
        self.range
    }

    /// How much `build` would remove from `baseline` at `tempo`.
    pub fn plan(&self, baseline: &[u8], tempo: u32) -> Result<TrimAmount> {
        let layout = AiffLayout::parse(baseline)?;
        layout.ensure_supported()?;
        trim_amount(
            tempo,
            self.range,
            layout.sound_data_len(),
            layout.bytes_per_frame(),
        )
    }

    /// Build a new buffer for `tempo`. The baseline is only read.
    pub fn build(&self, baseline: &[u8], tempo: u32) -> Result<Vec<u8>> {
        let amount = self.plan(baseline, tempo)?;
        let out = walker::trim(baseline, amount)?;
        tracing::debug!(
            tempo,
            bytes_removed = amount.bytes,
            frames_removed = amount.frames,
            len = out.len(),
            "built tempo buffer"
        );
        Ok(out)
    }
}
