use cuebank_package::PackageReader;
use cuebank_package::error::Result;
use derive_more::Display;
use std::fmt::{Display as FmtDisplay, Formatter, Result as FmtResult};
use std::io::Read;

/// Playback selection policy for a cue's sound variants.
///
/// Only [`Cycle`](Self::Cycle) and [`RandomCycle`](Self::RandomCycle) need
/// persistent per-cue state at the audio layer, and therefore a [`CueId`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CueType {
    /// Always the first sound.
    #[default]
    Single,
    /// Rotate through sounds in order.
    Cycle,
    /// Rotate through a shuffled order.
    RandomCycle,
    /// Pick any sound each time.
    Random,
    /// Play every sound at once.
    Parallel,
    /// Play every sound one after another.
    Serial,
}
impl CueType {
    /// Whether cues of this type need a dense id for rotation state.
    #[inline]
    #[must_use]
    pub fn is_cycling(&self) -> bool {
        matches!(self, CueType::Cycle | CueType::RandomCycle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CueType::Single => "Single",
            CueType::Cycle => "Cycle",
            CueType::RandomCycle => "RandomCycle",
            CueType::Random => "Random",
            CueType::Parallel => "Parallel",
            CueType::Serial => "Serial",
        }
    }

    /// On-disk tag.
    pub fn tag(&self) -> u8 {
        match self {
            CueType::Single => 0,
            CueType::Cycle => 1,
            CueType::RandomCycle => 2,
            CueType::Random => 3,
            CueType::Parallel => 4,
            CueType::Serial => 5,
        }
    }
}
impl TryFrom<u8> for CueType {
    type Error = u8;
    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            0 => CueType::Single,
            1 => CueType::Cycle,
            2 => CueType::RandomCycle,
            3 => CueType::Random,
            4 => CueType::Parallel,
            5 => CueType::Serial,
            other => return Err(other),
        })
    }
}
impl FmtDisplay for CueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Dense, zero-based id of a cycling cue, assigned in package load order.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("#{_0}")]
pub struct CueId(pub u32);
impl CueId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One sound variant of a cue.
#[derive(Clone, Debug, PartialEq)]
pub struct CueSound {
    /// Path into the sound bank. `None` for a deliberately silent variant.
    pub path: Option<String>,
    pub volume: f32,
    pub pitch: f32,
    pub pan: f32,
}
impl CueSound {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::silent()
        }
    }

    pub fn silent() -> Self {
        Self {
            path: None,
            volume: 1.0,
            pitch: 0.0,
            pan: 0.0,
        }
    }

    fn read<R: Read>(reader: &mut PackageReader<R>) -> Result<Self> {
        let path = match reader.read_bool()? {
            true => Some(reader.read_string()?),
            false => None,
        };
        Ok(Self {
            path,
            volume: reader.read_f32()?,
            pitch: reader.read_f32()?,
            pan: reader.read_f32()?,
        })
    }
}

/// A named audio event.
#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    /// Lookup identity; unique and case-sensitive within a table.
    pub name: String,
    pub kind: CueType,
    pub volume: f32,
    pub pitch: f32,
    pub pan: f32,
    pub sounds: Vec<CueSound>,
    /// Only set for cycling cues, by the table that loaded this cue.
    pub id: Option<CueId>,
}
impl Cue {
    pub fn new(name: impl Into<String>, kind: CueType) -> Self {
        Self {
            name: name.into(),
            kind,
            volume: 1.0,
            pitch: 0.0,
            pan: 0.0,
            sounds: Vec::new(),
            id: None,
        }
    }

    pub fn with_sound(mut self, sound: CueSound) -> Self {
        self.sounds.push(sound);
        self
    }

    #[inline]
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub(crate) fn read<R: Read>(name: String, reader: &mut PackageReader<R>) -> Result<Self> {
        let tag = reader.read_u8()?;
        let kind = CueType::try_from(tag).map_err(|_| reader.malformed("cue type"))?;
        let volume = reader.read_f32()?;
        let pitch = reader.read_f32()?;
        let pan = reader.read_f32()?;
        let count = reader.read_count()?;
        let sounds = (0..count).map(|_| CueSound::read(reader)).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name,
            kind,
            volume,
            pitch,
            pan,
            sounds,
            id: None,
        })
    }

    #[cfg(any(test, feature = "writer"))]
    pub(crate) fn write(&self, writer: &mut cuebank_package::PackageWriter) {
        writer
            .write_string(&self.name)
            .write_u8(self.kind.tag())
            .write_f32(self.volume)
            .write_f32(self.pitch)
            .write_f32(self.pan)
            .write_count(self.sounds.len());
        for sound in &self.sounds {
            writer.write_bool(sound.path.is_some());
            if let Some(path) = &sound.path {
                writer.write_string(path);
            }
            writer.write_f32(sound.volume).write_f32(sound.pitch).write_f32(sound.pan);
        }
    }
}

/// The result of resolving a requested cue name.
///
/// `Missing` is the sentinel for "requested, but the loaded content doesn't
/// have it". It is a distinct variant rather than a cue with a special name,
/// so a real cue called `"[missing cue]"` (a mod could ship one) never
/// compares equal to it. "Not requested" is expressed one level up, as
/// `Option::<CueRef>::None`.
#[derive(Clone, Copy, Debug)]
pub enum CueRef<'a> {
    Real(&'a Cue),
    Missing,
}
impl<'a> CueRef<'a> {
    /// Friendly name reported for the missing-cue sentinel.
    pub const MISSING_NAME: &'static str = "[missing cue]";

    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, CueRef::Missing)
    }

    #[inline]
    pub fn cue(&self) -> Option<&'a Cue> {
        match *self {
            CueRef::Real(cue) => Some(cue),
            CueRef::Missing => None,
        }
    }

    pub fn friendly_name(&self) -> &'a str {
        match *self {
            CueRef::Real(cue) => &cue.name,
            CueRef::Missing => Self::MISSING_NAME,
        }
    }

    pub fn id(&self) -> Option<CueId> {
        self.cue().and_then(|cue| cue.id)
    }

    pub fn sound_count(&self) -> usize {
        self.cue().map_or(0, Cue::sound_count)
    }
}
impl PartialEq for CueRef<'_> {
    /// Real cues compare by identity (the same table entry), never by value.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CueRef::Real(a), CueRef::Real(b)) => std::ptr::eq(*a, *b),
            (CueRef::Missing, CueRef::Missing) => true,
            _ => false,
        }
    }
}
impl Eq for CueRef<'_> {}
impl<'a> From<&'a Cue> for CueRef<'a> {
    fn from(value: &'a Cue) -> Self {
        CueRef::Real(value)
    }
}
