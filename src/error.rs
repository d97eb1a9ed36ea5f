use thiserror::Error;

/// Errors raised while inspecting, trimming, or handing off AIFF buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// A chunk tag or field could not be interpreted at the given offset.
    #[error("Malformed chunk at offset {offset}: {detail}")]
    MalformedChunk { offset: usize, detail: &'static str },

    /// A header or field access would run past the end of the buffer.
    #[error("Buffer too short: need {needed} bytes at offset {offset}, buffer has {len}")]
    BufferTooShort {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// The sample layout is not one the trim arithmetic supports.
    #[error("Unsupported layout: {channels} channel(s), {sample_size}-bit samples, form type {form_type}")]
    UnsupportedLayout {
        channels: u16,
        sample_size: u16,
        form_type: String,
    },

    /// Requested tempo outside the configured inclusive bounds.
    #[error("Tempo {tempo} bpm is outside the supported range {min}..={max}")]
    TempoOutOfRange { tempo: u32, min: u32, max: u32 },

    /// A tempo was set before any sample was selected.
    #[error("No sample loaded")]
    NoSampleLoaded,

    /// The working buffer was requested before a tempo was applied.
    #[error("No working buffer has been built yet")]
    NoWorkingBuffer,

    /// The asset store has nothing for the requested sound.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// An asset's bytes did not match the digest recorded for it.
    #[error("Checksum mismatch for {asset}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        asset: String,
        expected: String,
        actual: String,
    },

    /// Configuration values that deserialize but make no sense together.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The playback collaborator rejected a buffer or command.
    #[error("Playback error: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(offset: usize, detail: &'static str) -> Self {
        Error::MalformedChunk { offset, detail }
    }
}
