//! Roman-numeral spelling shared by the functional and modal lenses.

use modus_types::{Chord, ChordQuality, TriadKind};

const DEGREE_NAMES: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Major-scale degree used to spell each chromatic interval (b2, b3, #4, b6, b7).
const CHROMATIC_DEGREES: [usize; 12] = [0, 1, 1, 2, 2, 3, 3, 4, 5, 5, 6, 6];

pub(crate) const MAJOR_REFERENCE: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// A scale degree plus a chromatic alteration (negative = flat).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Degree {
    pub index: usize,
    pub accidental: i8,
}

impl Degree {
    pub fn is_natural(&self) -> bool {
        self.accidental == 0
    }
}

/// Degree of `interval` semitones above the tonic against `reference`.
pub(crate) fn degree_of(interval: u8, reference: &[u8; 7]) -> Degree {
    let interval = interval % 12;
    if let Some(index) = reference.iter().position(|&r| r == interval) {
        return Degree {
            index,
            accidental: 0,
        };
    }
    let index = CHROMATIC_DEGREES[interval as usize];
    let diff = (interval as i8 - reference[index] as i8 + 18).rem_euclid(12) - 6;
    Degree {
        index,
        accidental: diff,
    }
}

/// Quality mark appended to the numeral; sevenths carry a `7` that inversion figures replace.
fn quality_mark(quality: ChordQuality) -> &'static str {
    match quality {
        ChordQuality::Major | ChordQuality::Minor => "",
        ChordQuality::Diminished => "°",
        ChordQuality::Augmented => "+",
        ChordQuality::Dominant7 | ChordQuality::Minor7 => "7",
        ChordQuality::Major7 | ChordQuality::MinorMajor7 => "maj7",
        ChordQuality::HalfDiminished7 => "ø7",
        ChordQuality::Diminished7 => "°7",
        ChordQuality::Augmented7 => "+7",
        ChordQuality::Major6 | ChordQuality::Minor6 => "add6",
        ChordQuality::Sus2 => "sus2",
        ChordQuality::Sus4 => "sus4",
        ChordQuality::Dominant7Sus4 => "7sus4",
        ChordQuality::Power => "5",
        ChordQuality::Add9 => "add9",
        ChordQuality::Dominant9 | ChordQuality::Minor9 => "9",
        ChordQuality::Major9 => "maj9",
        ChordQuality::Dominant11 => "11",
        ChordQuality::Dominant13 => "13",
    }
}

/// Figured-bass inversion symbol when the slash bass is a chord tone.
fn inversion_figure(chord: &Chord) -> Option<&'static str> {
    let bass = chord.bass?;
    let above_root = chord.root.interval_to(bass);
    let intervals = chord.quality.intervals();
    if let Some(seventh) = chord.quality.seventh() {
        return match above_root {
            i if i == intervals[1] => Some("65"),
            i if i == intervals[2] => Some("43"),
            i if i == seventh => Some("42"),
            _ => None,
        };
    }
    let is_triad = matches!(
        chord.quality,
        ChordQuality::Major
            | ChordQuality::Minor
            | ChordQuality::Diminished
            | ChordQuality::Augmented
    );
    if !is_triad {
        return None;
    }
    match above_root {
        i if i == intervals[1] => Some("6"),
        i if i == intervals[2] => Some("64"),
        _ => None,
    }
}

/// Upper- or lower-case degree name with its accidental prefix.
pub(crate) fn degree_name(degree: Degree, kind: TriadKind) -> String {
    let mut out = String::new();
    let symbol = if degree.accidental < 0 { "b" } else { "#" };
    for _ in 0..degree.accidental.unsigned_abs() {
        out.push_str(symbol);
    }
    let base = DEGREE_NAMES[degree.index % 7];
    match kind {
        TriadKind::Minor | TriadKind::Diminished => out.push_str(&base.to_lowercase()),
        _ => out.push_str(base),
    }
    out
}

/// Full numeral for `chord` sitting on `degree`, e.g. `bVII`, `ii7`, `V65`.
pub(crate) fn format_numeral(chord: &Chord, degree: Degree) -> String {
    let mut out = degree_name(degree, chord.quality.triad_kind());
    let mark = quality_mark(chord.quality);
    match inversion_figure(chord) {
        Some(figure) if chord.quality.seventh().is_some() => {
            out.push_str(&mark.replace('7', figure));
        }
        Some(figure) => {
            out.push_str(mark);
            out.push_str(figure);
        }
        None => out.push_str(mark),
    }
    out
}

/// Triad built from scale steps on `degree` of a seven-note reference.
pub(crate) fn diatonic_triad(reference: &[u8; 7], degree: usize) -> TriadKind {
    let root = reference[degree % 7];
    let third = (reference[(degree + 2) % 7] + 12 - root) % 12;
    let fifth = (reference[(degree + 4) % 7] + 12 - root) % 12;
    match (third, fifth) {
        (4, 7) => TriadKind::Major,
        (3, 7) => TriadKind::Minor,
        (3, 6) => TriadKind::Diminished,
        (4, 8) => TriadKind::Augmented,
        _ => TriadKind::Suspended,
    }
}
