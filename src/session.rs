//! Sound session: owns the baseline for the selected sound and the most
//! recently built working buffer.
//!
//! Working buffers are shared as `Arc<[u8]>`. Once built they are never
//! written again; a new tempo always produces a fresh allocation, so a
//! buffer handed to playback stays valid and unchanged for as long as the
//! player holds it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builder::TempoBufferBuilder;
use crate::error::{Error, Result};
use crate::sound::Sound;
use crate::tempo::TempoRange;

/// Supplies the baseline asset for a sound.
pub trait AssetStore {
    fn load(&self, sound: Sound) -> Result<Vec<u8>>;
}

/// Assets held in memory, e.g. from `include_bytes!` or a test fixture.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<Sound, Arc<[u8]>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sound: Sound, bytes: impl Into<Arc<[u8]>>) {
        self.assets.insert(sound, bytes.into());
    }

    pub fn with(mut self, sound: Sound, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(sound, bytes);
        self
    }
}

impl AssetStore for MemoryAssetStore {
    fn load(&self, sound: Sound) -> Result<Vec<u8>> {
        self.assets
            .get(&sound)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| Error::AssetNotFound(sound.file_name()))
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Unloaded,
    Ready {
        sound: Sound,
        baseline: Arc<[u8]>,
    },
    Prepared {
        sound: Sound,
        baseline: Arc<[u8]>,
        tempo: u32,
        working: Arc<[u8]>,
    },
}

pub struct SoundSession<S> {
    store: S,
    builder: TempoBufferBuilder,
    state: SessionState,
}

impl<S: AssetStore> SoundSession<S> {
    pub fn new(store: S, range: TempoRange) -> Self {
        SoundSession {
            store,
            builder: TempoBufferBuilder::new(range),
            state: SessionState::Unloaded,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn range(&self) -> TempoRange {
        self.builder.range()
    }

    pub fn sound(&self) -> Option<Sound> {
        match &self.state {
            SessionState::Unloaded => None,
            SessionState::Ready { sound, .. } | SessionState::Prepared { sound, .. } => {
                Some(*sound)
            }
        }
    }

    pub fn tempo(&self) -> Option<u32> {
        match &self.state {
            SessionState::Prepared { tempo, .. } => Some(*tempo),
            _ => None,
        }
    }

    pub fn baseline(&self) -> Result<&Arc<[u8]>> {
        match &self.state {
            SessionState::Unloaded => Err(Error::NoSampleLoaded),
            SessionState::Ready { baseline, .. } | SessionState::Prepared { baseline, .. } => {
                Ok(baseline)
            }
        }
    }

    /// Load `sound`'s baseline and drop any working buffer.
    ///
    /// If loading fails the session keeps its previous state.
    pub fn select_sample(&mut self, sound: Sound) -> Result<()> {
        let baseline: Arc<[u8]> = self.store.load(sound)?.into();
        tracing::info!(%sound, len = baseline.len(), "selected sample");
        self.state = SessionState::Ready { sound, baseline };
        Ok(())
    }

    /// Build a working buffer for `tempo` from the current baseline.
    ///
    /// The previous working buffer is replaced only after the new one is
    /// complete; on error it stays as it was.
    pub fn set_tempo(&mut self, tempo: u32) -> Result<Arc<[u8]>> {
        let (sound, baseline) = match &self.state {
            SessionState::Unloaded => return Err(Error::NoSampleLoaded),
            SessionState::Ready { sound, baseline }
            | SessionState::Prepared { sound, baseline, .. } => (*sound, Arc::clone(baseline)),
        };

        let working: Arc<[u8]> = self.builder.build(&baseline, tempo)?.into();
        self.state = SessionState::Prepared {
            sound,
            baseline,
            tempo,
            working: Arc::clone(&working),
        };
        Ok(working)
    }

    /// Put back a state taken from `state()`, e.g. after the player
    /// rejected the buffer built from the current one.
    pub(crate) fn restore(&mut self, state: SessionState) {
        self.state = state;
    }

    /// The buffer most recently built by `set_tempo`.
    pub fn working(&self) -> Result<Arc<[u8]>> {
        match &self.state {
            SessionState::Unloaded => Err(Error::NoSampleLoaded),
            SessionState::Ready { .. } => Err(Error::NoWorkingBuffer),
            SessionState::Prepared { working, .. } => Ok(Arc::clone(working)),
        }
    }
}
