//! Reporting of content that was asked for but isn't there.
//!
//! A missing cue is normal in modded or partial content, so it is never an
//! error. During development it should still be visible, once per name:
//! lookups run every frame and a rollback simulation replays the same frames
//! many times over.

use cuebank_audio::SoundEffect;
use cuebank_config::DiagnosticsMode;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt::Debug;

/// Sink for missing-content reports, chosen when a
/// [`Definitions`](crate::Definitions) is built.
///
/// Implementations must not influence lookup results; they observe only.
pub trait Diagnostics: Debug + Send + Sync {
    /// A cue named `name` was requested and isn't in the cue table.
    fn report_missing_cue(&self, name: &str, context: &dyn Debug);

    /// Stand-in music for a missing music cue. Production sinks have none.
    fn missing_music_sound(&self) -> Option<&SoundEffect> {
        None
    }
}

/// Production sink: reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    fn report_missing_cue(&self, _name: &str, _context: &dyn Debug) {}
}

/// Development sink: logs each distinct missing cue name once.
#[derive(Debug, Default)]
pub struct DeveloperDiagnostics {
    reported: Mutex<HashSet<Box<str>>>,
    placeholder_music: Option<SoundEffect>,
}

impl DeveloperDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play `music` in place of missing music cues.
    pub fn with_placeholder_music(mut self, music: SoundEffect) -> Self {
        self.placeholder_music = Some(music);
        self
    }

    /// Number of distinct names reported so far.
    pub fn report_count(&self) -> usize {
        self.reported.lock().len()
    }

    pub fn has_reported(&self, name: &str) -> bool {
        self.reported.lock().contains(name)
    }

    /// Forget everything reported, e.g. after content is reloaded.
    pub fn reset(&self) {
        self.reported.lock().clear();
    }
}

impl Diagnostics for DeveloperDiagnostics {
    fn report_missing_cue(&self, name: &str, context: &dyn Debug) {
        let mut reported = self.reported.lock();
        if reported.contains(name) {
            return;
        }
        reported.insert(Box::from(name));
        drop(reported);
        tracing::warn!(cue = name, context = ?context, "missing cue");
    }

    fn missing_music_sound(&self) -> Option<&SoundEffect> {
        self.placeholder_music.as_ref()
    }
}

/// The sink matching a configured [`DiagnosticsMode`].
pub fn for_mode(mode: DiagnosticsMode) -> Box<dyn Diagnostics> {
    match mode {
        DiagnosticsMode::Silent => Box::new(Silent),
        DiagnosticsMode::Developer => Box::new(DeveloperDiagnostics::new()),
    }
}
