//! Metronome controller: drives a `SoundSession` and a player.
//!
//! Selection and tempo changes are explicit commands. Each one rebuilds
//! the working buffer first and only then decides what the player should
//! do with it. A failed rebuild leaves the player on its current buffer,
//! and a buffer the player rejects puts the session back as it was.

use std::sync::Arc;

use crate::config::MetronomeConfig;
use crate::error::Result;
use crate::session::{AssetStore, SessionState, SoundSession};
use crate::sound::Sound;

/// Loops a finished AIFF buffer. Implemented by the host's audio layer.
pub trait Playback {
    /// Take ownership of `buffer` and prepare it for looped playback.
    /// Replaces whatever was loaded before and leaves the player stopped.
    fn load_looped(&mut self, buffer: Arc<[u8]>) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn stop(&mut self);
}

pub struct Metronome<S, P> {
    session: SoundSession<S>,
    player: P,
    config: MetronomeConfig,
    tempo: u32,
    playing: bool,
}

impl<S: AssetStore, P: Playback> Metronome<S, P> {
    /// Load the configured default sound and prepare it at the default tempo.
    pub fn new(store: S, player: P, config: MetronomeConfig) -> Result<Self> {
        config.validate()?;
        let mut session = SoundSession::new(store, config.tempo_range);
        session.select_sample(config.default_sound)?;
        let tempo = config.default_tempo;
        let working = session.set_tempo(tempo)?;

        let mut player = player;
        player.load_looped(working)?;

        Ok(Metronome {
            session,
            player,
            config,
            tempo,
            playing: false,
        })
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn sound(&self) -> Option<Sound> {
        self.session.sound()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn config(&self) -> &MetronomeConfig {
        &self.config
    }

    pub fn session(&self) -> &SoundSession<S> {
        &self.session
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn play(&mut self) -> Result<()> {
        if !self.playing {
            self.player.play()?;
            self.playing = true;
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.player.stop();
            self.playing = false;
        }
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.playing {
            self.stop();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Change tempo, clamped into the configured range. Returns the tempo
    /// actually applied.
    ///
    /// If the rebuild or the player's load fails, the tempo and session
    /// stay as they were.
    pub fn set_tempo(&mut self, bpm: u32) -> Result<u32> {
        let tempo = self.config.tempo_range.clamp(bpm);
        if tempo == self.tempo && self.session.tempo() == Some(tempo) {
            return Ok(tempo);
        }
        let previous = self.session.state().clone();
        let working = self
            .session
            .set_tempo(tempo)
            .inspect_err(|e| tracing::warn!(tempo, error = %e, "keeping previous buffer"))?;
        self.hand_off(working, previous, tempo)?;
        Ok(tempo)
    }

    /// Switch to `sound`, rebuilt at the current tempo.
    ///
    /// On any failure the previous sound and its buffer stay selected.
    pub fn select_sound(&mut self, sound: Sound) -> Result<()> {
        let previous = self.session.state().clone();
        self.session.select_sample(sound)?;
        let working = match self.session.set_tempo(self.tempo) {
            Ok(working) => working,
            Err(e) => {
                tracing::warn!(%sound, error = %e, "rebuild failed, keeping previous sound");
                self.session.restore(previous);
                return Err(e);
            }
        };
        self.hand_off(working, previous, self.tempo)
    }

    /// Give the player a new buffer, restarting it if it was running.
    ///
    /// A rejected load puts the session back to `previous`; the player is
    /// left stopped. A failed restart keeps the new buffer and tempo.
    fn hand_off(&mut self, working: Arc<[u8]>, previous: SessionState, tempo: u32) -> Result<()> {
        let resume = self.playing;
        if resume {
            self.player.stop();
            self.playing = false;
        }
        if let Err(e) = self.player.load_looped(working) {
            tracing::warn!(tempo, error = %e, "player rejected buffer, restoring previous state");
            self.session.restore(previous);
            return Err(e);
        }
        self.tempo = tempo;
        if resume {
            self.player.play()?;
            self.playing = true;
        }
        Ok(())
    }
}
