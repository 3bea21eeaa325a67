//! # modus-core
//!
//! Harmony analysis engine. Turns a chord progression into a key center,
//! Roman numerals and harmonic functions, with a modal reading and chromatic
//! annotations layered on top. No I/O happens inside the engine; only
//! [`config`] touches the filesystem.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modus_core::analysis::analyze;
//!
//! let result = analyze("Am F C G", Some("C major"))?;
//! assert_eq!(result.roman_numerals, vec!["vi", "IV", "I", "V"]);
//! ```
//!
//! ## Module Overview
//!
//! - [`analysis`]: `analyze()` / `analyze_with()` pipeline
//!   - [`analysis::parser`]: chord symbols, progressions and key names
//!   - [`analysis::matcher`]: set-equality lookup in the scale table
//!   - [`analysis::classifier`]: key inference, numerals and functions
//!   - [`analysis::modal`]: modal lens over signature motions
//!   - [`analysis::chromatic`]: secondary dominants and borrowed chords
//!   - [`analysis::identify`]: chord naming from MIDI notes
//!   - [`analysis::profile`]: pitch-class profiles, key estimation, cadences
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod analysis;
pub mod config;

pub use analysis::parser::ParseError;
pub use analysis::{analyze, analyze_with};
