//! The engine's view of its loaded content.
//!
//! [`Definitions`] owns the cue table, the sound bank and one string bank per
//! language, and answers the lookups the simulation and the UI make every
//! frame. Missing content never fails a lookup: a missing cue resolves to
//! [`CueRef::Missing`](cuebank_audio::CueRef::Missing) and is reported to the
//! injected [`Diagnostics`] sink, which decides whether anyone hears about it.
//!
//! ```no_run
//! use cuebank_config::ContentConfig;
//! use cuebank_definitions::Definitions;
//! use cuebank_definitions::error::{ErrorKind, Result};
//! use exn::ResultExt;
//!
//! # fn main() -> Result<()> {
//! let config = ContentConfig::load("cuebank.toml").or_raise(|| ErrorKind::Config)?;
//! let definitions = Definitions::from_config(&config)?;
//! let jump = definitions.get_cue("jump", &"player");
//! let sound = definitions.get_sound(jump, 0);
//! # let _ = sound;
//! # Ok(())
//! # }
//! ```

mod definitions;
pub mod diagnostics;
pub mod error;
mod palette;

pub use crate::definitions::Definitions;
pub use crate::diagnostics::{DeveloperDiagnostics, Diagnostics, Silent};
pub use crate::palette::{Palette, Rgba};
