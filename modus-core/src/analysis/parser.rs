//! Chord-symbol and key-name parsing.
//!
//! A progression is chord symbols separated by whitespace (or commas), with
//! `|` marking measure boundaries. Empty measures are collapsed.

use std::sync::LazyLock;

use modus_types::{Chord, ChordQuality, DiatonicMode, KeyCenter, PitchClass, Progression};
use regex::Regex;

static CHORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Ga-g])([#♯b♭]*)([^/]*)(?:/([A-Ga-g])([#♯b♭]*))?$")
        .expect("chord symbol pattern is valid")
});

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Ga-g])([#♯b♭]*)\s*(.*)$").expect("key name pattern is valid")
});

/// Error from parsing a progression or key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `index` counts chord tokens from 0; `offset` is the byte offset in the input.
    UnrecognizedChord {
        token: String,
        index: usize,
        offset: usize,
    },
    InvalidKey(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedChord { token, index, offset } => write!(
                f,
                "unrecognized chord '{}' (chord {}, byte {})",
                token,
                index + 1,
                offset
            ),
            Self::InvalidKey(key) => write!(f, "unrecognized key '{}'", key),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Bar,
    Symbol { text: &'a str, offset: usize },
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in input.char_indices() {
        if is_separator(c) || c == '|' {
            if let Some(s) = start.take() {
                tokens.push(Token::Symbol {
                    text: &input[s..i],
                    offset: s,
                });
            }
            if c == '|' {
                tokens.push(Token::Bar);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token::Symbol {
            text: &input[s..],
            offset: s,
        });
    }
    tokens
}

/// Parse a whole progression. Blank input gives an empty progression.
pub fn parse_progression(input: &str) -> Result<Progression, ParseError> {
    let mut progression = Progression::new();
    let mut measure = 0usize;
    let mut measure_used = false;

    for token in tokenize(input) {
        match token {
            Token::Bar => {
                if measure_used {
                    measure += 1;
                    measure_used = false;
                }
            }
            Token::Symbol { text, offset } => {
                let chord = parse_chord(text).ok_or_else(|| ParseError::UnrecognizedChord {
                    token: text.to_string(),
                    index: progression.len(),
                    offset,
                })?;
                progression.push(chord, measure);
                measure_used = true;
            }
        }
    }

    log::trace!(
        target: "analysis",
        "tokenized {} chords over {} measures",
        progression.len(),
        progression.measure_count()
    );
    Ok(progression)
}

/// Parse one chord symbol such as `"F#m7b5"` or `"Am/C"`.
pub fn parse_chord(symbol: &str) -> Option<Chord> {
    let caps = CHORD_RE.captures(symbol.trim())?;
    let letter = caps.get(1)?.as_str().chars().next()?;
    let root = PitchClass::from_parts(letter, caps.get(2).map_or("", |m| m.as_str()))?;
    let quality = ChordQuality::from_suffix(caps.get(3).map_or("", |m| m.as_str()))?;
    let mut chord = Chord::new(root, quality);
    if let Some(bass_letter) = caps.get(4) {
        let bass_letter = bass_letter.as_str().chars().next()?;
        let bass = PitchClass::from_parts(bass_letter, caps.get(5).map_or("", |m| m.as_str()))?;
        chord = chord.with_bass(bass);
    }
    Some(chord)
}

/// Parse a key name: `"C"`, `"C major"`, `"Am"`, `"F# minor"`, `"D dorian"`.
pub fn parse_key(text: &str) -> Result<KeyCenter, ParseError> {
    let invalid = || ParseError::InvalidKey(text.to_string());
    let caps = KEY_RE.captures(text.trim()).ok_or_else(invalid)?;
    let letter = caps
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .ok_or_else(invalid)?;
    let tonic = PitchClass::from_parts(letter, caps.get(2).map_or("", |m| m.as_str()))
        .ok_or_else(invalid)?;
    let mode = match caps.get(3).map_or("", |m| m.as_str().trim()) {
        "" | "M" => DiatonicMode::Ionian,
        "m" | "-" => DiatonicMode::Aeolian,
        other => DiatonicMode::from_name(other).ok_or_else(invalid)?,
    };
    Ok(KeyCenter::new(tonic, mode))
}
