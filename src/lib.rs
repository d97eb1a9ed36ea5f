pub mod aiff;
pub mod builder;
#[cfg(feature = "catalog")]
pub mod catalog;
pub mod config;
pub mod error;
pub mod metronome;
pub mod session;
pub mod sound;
pub mod tempo;

pub use builder::TempoBufferBuilder;
pub use config::MetronomeConfig;
pub use error::Error;
pub use metronome::{Metronome, Playback};
pub use session::{AssetStore, MemoryAssetStore, SessionState, SoundSession};
pub use sound::Sound;
pub use tempo::{trim_amount, TempoRange, TrimAmount};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the metronome-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: trim a baseline AIFF clip (recorded at the slowest
/// supported tempo) so it loops once per beat at `bpm`.
/// Uses the default 20–260 bpm range; out-of-range tempos are an error.
#[wasm_bindgen]
pub fn retempo_aiff(baseline: &[u8], bpm: u32) -> Result<Vec<u8>, JsValue> {
    TempoBufferBuilder::default()
        .build(baseline, bpm)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: describe an AIFF buffer's chunk layout as a JS object.
#[wasm_bindgen]
pub fn inspect_aiff(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let layout = aiff::AiffLayout::parse(bytes).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&layout).map_err(|e| JsValue::from_str(&format!("{e}")))
}
