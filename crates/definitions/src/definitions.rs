use crate::diagnostics::{self, Diagnostics};
use crate::error::{ErrorKind, Result};
use cuebank_audio::{CueRef, CueTable, SoundBank, SoundEffect};
use cuebank_config::ContentConfig;
use cuebank_package::Header;
use cuebank_strings::{StringBank, StringKey, StringList};
use exn::ResultExt;
use std::fmt::Debug;
use tracing::instrument;

/// The loaded content set and its query surface.
///
/// Everything is immutable after construction, so lookups can be made from
/// any thread without locking. Lookups for content that doesn't exist never
/// fail; they resolve to `None`, an empty list, or [`CueRef::Missing`].
#[derive(Debug)]
pub struct Definitions {
    cues: CueTable,
    sounds: SoundBank,
    strings: Vec<StringBank>,
    diagnostics: Box<dyn Diagnostics>,
}

impl Definitions {
    /// Load all three packages described by `config`, reporting missing cues
    /// to the sink selected by `config.diagnostics`.
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        Self::load(config, diagnostics::for_mode(config.diagnostics))
    }

    /// Load all three packages described by `config`. Any failure aborts the
    /// whole load.
    #[instrument(skip_all, fields(content_dir = %config.content_dir.display(), languages = config.language_count))]
    pub fn load(config: &ContentConfig, diagnostics: Box<dyn Diagnostics>) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Config)?;

        let path = config.path_of(&config.cues);
        let cues =
            CueTable::load(&path, Header::new(&config.cues.header)).or_raise(|| ErrorKind::Cues(path.clone()))?;

        let path = config.path_of(&config.sounds);
        let sounds =
            SoundBank::load(&path, Header::new(&config.sounds.header)).or_raise(|| ErrorKind::Sounds(path.clone()))?;

        let path = config.path_of(&config.strings);
        let strings = StringBank::load(&path, Header::new(&config.strings.header), config.language_count)
            .or_raise(|| ErrorKind::Strings(path.clone()))?;

        tracing::debug!(
            cues = cues.len(),
            cues_with_ids = cues.cues_with_ids(),
            sounds = sounds.len(),
            "loaded content"
        );
        Ok(Self::from_parts(cues, sounds, strings, diagnostics))
    }

    /// Assemble from already loaded tables. `strings` holds one bank per
    /// language, in language order.
    pub fn from_parts(
        cues: CueTable,
        sounds: SoundBank,
        strings: Vec<StringBank>,
        diagnostics: Box<dyn Diagnostics>,
    ) -> Self {
        Self {
            cues,
            sounds,
            strings,
            diagnostics,
        }
    }

    // Cues

    /// Resolve a cue by name.
    ///
    /// - A blank name means nothing was requested: `None`, nothing reported.
    /// - A known name is `Some(CueRef::Real(..))`.
    /// - Anything else is reported to the diagnostics sink (which decides
    ///   whether to say anything) and resolves to `Some(CueRef::Missing)`.
    ///
    /// The result never depends on the sink, so repeated and replayed frames
    /// see the same answer.
    pub fn get_cue(&self, name: &str, debug_context: &dyn Debug) -> Option<CueRef<'_>> {
        if name.trim().is_empty() {
            return None;
        }
        match self.cues.get(name) {
            Some(cue) => Some(CueRef::Real(cue)),
            None => {
                self.diagnostics.report_missing_cue(name, debug_context);
                Some(CueRef::Missing)
            },
        }
    }

    /// Number of cycling cues; their ids are `0..cues_with_ids`.
    pub fn cues_with_ids(&self) -> u32 {
        self.cues.cues_with_ids()
    }

    pub fn cues(&self) -> &CueTable {
        &self.cues
    }

    // Sounds

    /// See [`SoundBank::get_sound`].
    ///
    /// # Panics
    ///
    /// If `index` is out of range for a real cue's sounds.
    pub fn get_sound(&self, cue: Option<CueRef<'_>>, index: usize) -> Option<&SoundEffect> {
        self.sounds.get_sound(cue, index)
    }

    /// The sound to play for a music cue, right now, on this machine.
    ///
    /// Music cues carry a single sound. A missing music cue gets the
    /// diagnostics sink's placeholder, if it has one. Not for use inside the
    /// simulation: what comes back depends on local diagnostics setup.
    pub fn local_get_sound_for_music_cue(&self, cue: Option<CueRef<'_>>) -> Option<&SoundEffect> {
        match cue? {
            CueRef::Missing => self.diagnostics.missing_music_sound(),
            CueRef::Real(music) if music.sound_count() == 0 => None,
            CueRef::Real(music) => {
                debug_assert_eq!(music.sound_count(), 1, "music cue {} has variations", music.name);
                self.sounds.get_sound(Some(CueRef::Real(music)), 0)
            },
        }
    }

    pub fn sounds(&self) -> &SoundBank {
        &self.sounds
    }

    // Strings

    pub fn language_count(&self) -> usize {
        self.strings.len()
    }

    /// One language's strings, usable as a
    /// [`LocalizationProvider`](cuebank_strings::LocalizationProvider).
    ///
    /// # Panics
    ///
    /// If `language` is not below [`language_count`](Self::language_count).
    pub fn localized(&self, language: u8) -> &StringBank {
        &self.strings[usize::from(language)]
    }

    pub fn string_count(&self, key: impl StringKey, language: u8) -> usize {
        self.localized(language).string_count(key)
    }

    pub fn single_string(&self, key: impl StringKey, language: u8) -> Option<&str> {
        self.localized(language).single_string(key)
    }

    pub fn single_string_uppercase(&self, key: impl StringKey, language: u8) -> Option<&str> {
        self.localized(language).single_string_uppercase(key)
    }

    /// # Panics
    ///
    /// If `key` exists and `index` is out of range for it.
    pub fn indexed_string(&self, key: impl StringKey, language: u8, index: usize) -> Option<&str> {
        self.localized(language).indexed_string(key, index)
    }

    pub fn indexed_string_uppercase(&self, key: impl StringKey, language: u8, index: usize) -> Option<&str> {
        self.localized(language).indexed_string_uppercase(key, index)
    }

    /// Pure in its arguments; `choice_index` comes from the caller's own
    /// replayable random sequence.
    pub fn random_string(&self, key: impl StringKey, language: u8, choice_index: usize) -> Option<&str> {
        self.localized(language).random_string(key, choice_index)
    }

    pub fn random_string_uppercase(&self, key: impl StringKey, language: u8, choice_index: usize) -> Option<&str> {
        self.localized(language).random_string_uppercase(key, choice_index)
    }

    pub fn strings(&self, key: impl StringKey, language: u8) -> StringList<'_> {
        self.localized(language).strings(key)
    }

    pub fn strings_uppercase(&self, key: impl StringKey, language: u8) -> StringList<'_> {
        self.localized(language).strings_uppercase(key)
    }
}
