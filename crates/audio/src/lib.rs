//! Audio definitions loaded from asset packages.
//!
//! - [`CueTable`]: named audio events ([`Cue`]) with their playback policy and
//!   sound variants. Cycling cues get a dense, load-order [`CueId`] so the
//!   audio layer can keep rotation state that is identical on every peer.
//! - [`SoundBank`]: encoded sound effects keyed by path.
//! - [`CueRef`]: a resolved cue, or the missing-cue sentinel.
//!
//! Both tables are built once and never mutated, so they can be shared
//! across the simulation, render and audio threads without locking.

mod cue;
mod sounds;
mod table;

pub use crate::cue::{Cue, CueId, CueRef, CueSound, CueType};
pub use crate::sounds::{SoundBank, SoundEffect};
pub use crate::table::CueTable;
