//! Sound bank: sound effect data keyed by path.

use crate::cue::CueRef;
use cuebank_package::error::Result;
use cuebank_package::{Header, PackageReader};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

/// An encoded sound effect, ready to hand to the playback layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundEffect {
    pub path: String,
    /// Encoded audio, opaque to this crate.
    pub data: Box<[u8]>,
}
impl SoundEffect {
    pub fn new(path: impl Into<String>, data: impl Into<Box<[u8]>>) -> Self {
        Self { path: path.into(), data: data.into() }
    }
}

/// Ordered `path → SoundEffect` map.
///
/// A path that isn't in the bank is a normal outcome (thin or partially
/// modded content) and resolves to "no sound", never an error.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    sounds: Vec<SoundEffect>,
    index: HashMap<String, usize>,
}

impl SoundBank {
    /// Open, validate and parse a sounds package file.
    pub fn load(path: impl AsRef<Path>, header: Header<'_>) -> Result<Self> {
        let mut reader = PackageReader::open(path, header)?;
        let bank = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(bank)
    }

    /// Payload: `i32 count`, then `count` × `{ string path; i32 length; bytes }`.
    #[instrument(skip_all, fields(path = %reader.path().display(), count))]
    pub fn read<R: Read>(reader: &mut PackageReader<R>) -> Result<Self> {
        let count = reader.read_count()?;
        tracing::Span::current().record("count", count);
        let mut bank = Self::default();
        for _ in 0..count {
            let path = reader.read_string()?;
            let data = reader.read_bytes()?;
            bank.insert(SoundEffect::new(path, data));
        }
        tracing::debug!(sounds = bank.len(), "loaded sound bank");
        Ok(bank)
    }

    fn insert(&mut self, sound: SoundEffect) {
        match self.index.get(sound.path.as_str()) {
            Some(&position) => {
                tracing::warn!(path = %sound.path, "duplicate sound path, later record wins");
                self.sounds[position] = sound;
            },
            None => {
                self.index.insert(sound.path.clone(), self.sounds.len());
                self.sounds.push(sound);
            },
        }
    }

    #[inline]
    pub fn get(&self, path: &str) -> Option<&SoundEffect> {
        self.index.get(path).map(|&position| &self.sounds[position])
    }

    /// Resolve the `index`th sound variant of `cue`.
    ///
    /// Returns `None` when no cue was requested, for the missing-cue
    /// sentinel, for a silent variant, and for a path the bank doesn't have.
    ///
    /// # Panics
    ///
    /// If `index` is out of range for the cue's sounds. That is a logic error
    /// in the caller, not missing content.
    pub fn get_sound(&self, cue: Option<CueRef<'_>>, index: usize) -> Option<&SoundEffect> {
        let cue = cue?.cue()?;
        match cue.sounds[index].path.as_deref() {
            None | Some("") => None,
            Some(path) => self.get(path),
        }
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Sounds in package order.
    pub fn iter(&self) -> impl Iterator<Item = &SoundEffect> {
        self.sounds.iter()
    }

    /// Encode `sounds` as a complete sounds package.
    #[cfg(any(test, feature = "writer"))]
    pub fn encode<'a>(sounds: impl IntoIterator<Item = &'a SoundEffect>, header: Header<'_>) -> Result<Vec<u8>> {
        let sounds: Vec<&SoundEffect> = sounds.into_iter().collect();
        let mut writer = cuebank_package::PackageWriter::new(header);
        writer.write_count(sounds.len());
        for sound in sounds {
            writer.write_string(&sound.path).write_bytes(&sound.data);
        }
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::{Cue, CueSound, CueType};
    use cuebank_package::error::ErrorKind;

    const HEADER: &[u8] = b"SND1";

    fn bank(sounds: &[SoundEffect]) -> SoundBank {
        let bytes = SoundBank::encode(sounds, Header::new(HEADER)).unwrap();
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        let bank = SoundBank::read(&mut reader).unwrap();
        reader.finish().unwrap();
        bank
    }

    fn jump_bank() -> SoundBank {
        bank(&[SoundEffect::new("sfx/jump.wav", vec![1, 2, 3]), SoundEffect::new("sfx/land.wav", vec![4])])
    }

    #[test]
    fn test_get_sound_resolves_path() {
        let bank = jump_bank();
        let cue = Cue::new("jump", CueType::Single).with_sound(CueSound::new("sfx/jump.wav"));
        let sound = bank.get_sound(Some(CueRef::Real(&cue)), 0).unwrap();
        assert_eq!(sound.path, "sfx/jump.wav");
        assert_eq!(&*sound.data, &[1, 2, 3]);
    }

    #[test]
    fn test_get_sound_no_cue_or_missing() {
        let bank = jump_bank();
        assert!(bank.get_sound(None, 0).is_none());
        // Index isn't even consulted for the sentinel.
        assert!(bank.get_sound(Some(CueRef::Missing), 7).is_none());
    }

    #[test]
    fn test_get_sound_absent_or_silent() {
        let bank = jump_bank();
        let cue = Cue::new("thin", CueType::Random)
            .with_sound(CueSound::silent())
            .with_sound(CueSound::new(""))
            .with_sound(CueSound::new("sfx/not_shipped.wav"))
            .with_sound(CueSound::new("sfx/land.wav"));
        let cue = Some(CueRef::Real(&cue));
        assert!(bank.get_sound(cue, 0).is_none());
        assert!(bank.get_sound(cue, 1).is_none());
        assert!(bank.get_sound(cue, 2).is_none());
        assert_eq!(bank.get_sound(cue, 3).unwrap().path, "sfx/land.wav");
    }

    #[test]
    #[should_panic]
    fn test_get_sound_index_out_of_range() {
        let bank = jump_bank();
        let cue = Cue::new("jump", CueType::Single).with_sound(CueSound::new("sfx/jump.wav"));
        bank.get_sound(Some(CueRef::Real(&cue)), 1);
    }

    #[test]
    fn test_duplicate_path_last_wins() {
        let bank = bank(&[SoundEffect::new("a.wav", vec![1]), SoundEffect::new("a.wav", vec![2])]);
        assert_eq!(bank.len(), 1);
        assert_eq!(&*bank.get("a.wav").unwrap().data, &[2]);
    }

    #[test]
    fn test_iteration_keeps_file_order() {
        let bank = bank(&[SoundEffect::new("b.wav", Vec::<u8>::new()), SoundEffect::new("a.wav", Vec::<u8>::new())]);
        let paths: Vec<&str> = bank.iter().map(|sound| sound.path.as_str()).collect();
        assert_eq!(paths, ["b.wav", "a.wav"]);
    }

    #[test]
    fn test_truncated_blob() {
        let mut writer = cuebank_package::PackageWriter::new(Header::new(HEADER));
        writer.write_count(1).write_string("a.wav").write_count(100).write_raw(&[0; 10]);
        let bytes = writer.finish().unwrap();
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        let err = SoundBank::read(&mut reader).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CorruptPackage(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sounds.rcru");
        let sounds = [SoundEffect::new("sfx/jump.wav", vec![9; 64])];
        std::fs::write(&path, SoundBank::encode(&sounds, Header::new(HEADER)).unwrap()).unwrap();
        let bank = SoundBank::load(&path, Header::new(HEADER)).unwrap();
        assert_eq!(bank.get("sfx/jump.wav"), Some(&sounds[0]));
    }
}
