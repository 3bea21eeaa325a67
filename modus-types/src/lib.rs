//! # modus-types
//!
//! Shared data model for the modus harmony analyzer: pitch classes and sets,
//! chords and progressions, scale families with the static scale table, and
//! the result types produced by `modus-core`.

pub mod analysis;
pub mod chord;
pub mod options;
pub mod pitch;
pub mod scale;
pub mod set;

pub use analysis::*;
pub use chord::{Chord, ChordQuality, Progression, TriadKind};
pub use options::AnalysisOptions;
pub use pitch::{AccidentalPreference, PitchClass, Spelling};
pub use scale::{DiatonicMode, KeyCenter, ScaleFamily, ScaleTable, ScaleTableEntry};
pub use set::PitchClassSet;
