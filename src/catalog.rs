//! Directory-backed asset store.
//!
//! Sounds live as `<display name>.aif` files in one directory. An
//! optional `sounds.json` manifest next to them records a SHA-256 digest
//! per file; when present, loaded bytes are checked against it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::session::AssetStore;
use crate::sound::Sound;

pub const MANIFEST_FILE: &str = "sounds.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundManifest {
    /// Lowercase hex SHA-256, keyed by sound.
    pub sha256: HashMap<Sound, String>,
}

impl SoundManifest {
    /// Digest every bundled sound present in `root`.
    pub fn generate(root: &Path) -> Result<Self> {
        let mut sha256 = HashMap::new();
        for sound in Sound::ALL {
            let path = root.join(sound.file_name());
            if path.is_file() {
                sha256.insert(sound, sha256_hex(&std::fs::read(&path)?));
            }
        }
        Ok(SoundManifest { sha256 })
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Default sound directory: the platform data dir plus `sounds/`.
pub fn default_sound_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "metronome").map(|dirs| dirs.data_dir().join("sounds"))
}

#[derive(Debug, Clone)]
pub struct DirectoryAssetStore {
    root: PathBuf,
    manifest: Option<SoundManifest>,
}

impl DirectoryAssetStore {
    /// Open `root`, reading `sounds.json` if it exists.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = if manifest_path.is_file() {
            let json = std::fs::read_to_string(&manifest_path)?;
            Some(serde_json::from_str(&json)?)
        } else {
            None
        };
        Ok(DirectoryAssetStore { root, manifest })
    }

    pub fn open_default() -> Result<Self> {
        let root = default_sound_dir()
            .ok_or_else(|| Error::AssetNotFound("no home directory for sound assets".into()))?;
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, sound: Sound) -> PathBuf {
        self.root.join(sound.file_name())
    }
}

impl AssetStore for DirectoryAssetStore {
    fn load(&self, sound: Sound) -> Result<Vec<u8>> {
        let path = self.path_for(sound);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::AssetNotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(expected) = self.manifest.as_ref().and_then(|m| m.sha256.get(&sound)) {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(Error::ChecksumMismatch {
                    asset: sound.file_name(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        tracing::debug!(path = %path.display(), len = bytes.len(), "loaded sound asset");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiff::writer::AiffWriter;

    fn write_clip(root: &Path, sound: Sound) -> Vec<u8> {
        let bytes = AiffWriter::new(2, 44100.0).write_i16(&[3; 64]);
        std::fs::write(root.join(sound.file_name()), &bytes).unwrap();
        bytes
    }

    #[test]
    fn loads_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = write_clip(dir.path(), Sound::HiHat);
        let store = DirectoryAssetStore::open(dir.path()).unwrap();
        assert_eq!(store.load(Sound::HiHat).unwrap(), bytes);
        assert!(store.path_for(Sound::HiHat).ends_with("Hi-hat.aif"));
    }

    #[test]
    fn missing_file_is_asset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryAssetStore::open(dir.path()).unwrap();
        assert!(matches!(store.load(Sound::Clap), Err(Error::AssetNotFound(_))));
    }

    #[test]
    fn manifest_is_verified() {
        let dir = tempfile::tempdir().unwrap();
        write_clip(dir.path(), Sound::Rimshot);
        write_clip(dir.path(), Sound::Cowbell);
        let manifest = SoundManifest::generate(dir.path()).unwrap();
        assert_eq!(manifest.sha256.len(), 2);
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            serde_json::to_string(&manifest).unwrap(),
        )
        .unwrap();

        // Tamper with one asset after the manifest was written.
        let mut cowbell = std::fs::read(dir.path().join("Cowbell.aif")).unwrap();
        let last = cowbell.len() - 1;
        cowbell[last] ^= 0xFF;
        std::fs::write(dir.path().join("Cowbell.aif"), cowbell).unwrap();

        let store = DirectoryAssetStore::open(dir.path()).unwrap();
        assert!(store.load(Sound::Rimshot).is_ok());
        assert!(matches!(
            store.load(Sound::Cowbell),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn digest_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
