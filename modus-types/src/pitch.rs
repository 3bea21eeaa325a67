use serde::{Deserialize, Serialize};

/// A note modulo the octave, 0 = C through 11 = B.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", from = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);
    pub const D: PitchClass = PitchClass(2);
    pub const E: PitchClass = PitchClass(4);
    pub const F: PitchClass = PitchClass(5);
    pub const G: PitchClass = PitchClass(7);
    pub const A: PitchClass = PitchClass(9);
    pub const B: PitchClass = PitchClass(11);

    pub const ALL: [PitchClass; 12] = [
        PitchClass(0),
        PitchClass(1),
        PitchClass(2),
        PitchClass(3),
        PitchClass(4),
        PitchClass(5),
        PitchClass(6),
        PitchClass(7),
        PitchClass(8),
        PitchClass(9),
        PitchClass(10),
        PitchClass(11),
    ];

    /// Any integer, reduced modulo 12.
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    pub fn from_midi(note: u8) -> Self {
        Self(note % 12)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }

    /// Ascending distance in semitones from `self` up to `other` (0..12).
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    /// Build from a note letter and a run of accidentals (`#`, `♯`, `b`, `♭`).
    /// Returns `None` for anything else.
    pub fn from_parts(letter: char, accidentals: &str) -> Option<Self> {
        let base = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let mut offset = 0i32;
        for c in accidentals.chars() {
            match c {
                '#' | '♯' => offset += 1,
                'b' | '♭' => offset -= 1,
                _ => return None,
            }
        }
        Some(Self::new(base + offset))
    }

    /// Parse a full note name such as `"F#"`, `"Bb"` or `"E♭"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let letter = chars.next()?;
        Self::from_parts(letter, chars.as_str())
    }

    pub fn name(self, spelling: Spelling) -> &'static str {
        let table = match spelling {
            Spelling::Sharps => &SHARP_NAMES,
            Spelling::Flats => &FLAT_NAMES,
            Spelling::Mixed => &MIXED_NAMES,
        };
        table[self.0 as usize]
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> Self {
        pc.0
    }
}

impl From<u8> for PitchClass {
    fn from(value: u8) -> Self {
        Self(value % 12)
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name(Spelling::Mixed))
    }
}

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];
const MIXED_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// How black-key pitch classes are spelled when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Spelling {
    Sharps,
    Flats,
    /// `Db Eb F# Ab Bb`, the spelling most lead sheets use in C.
    #[default]
    Mixed,
}

impl Spelling {
    /// Conventional spelling for the major key (or parent collection) on `tonic`.
    pub fn for_major_tonic(tonic: PitchClass) -> Self {
        match tonic.get() {
            0 => Spelling::Mixed,
            1 | 3 | 5 | 8 | 10 => Spelling::Flats,
            _ => Spelling::Sharps,
        }
    }
}

/// User-facing accidental preference; `Auto` follows the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccidentalPreference {
    #[default]
    Auto,
    Sharps,
    Flats,
}

impl AccidentalPreference {
    pub fn resolve(self, key_spelling: Spelling) -> Spelling {
        match self {
            AccidentalPreference::Auto => key_spelling,
            AccidentalPreference::Sharps => Spelling::Sharps,
            AccidentalPreference::Flats => Spelling::Flats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wraps_negative() {
        assert_eq!(PitchClass::new(-1).get(), 11);
        assert_eq!(PitchClass::new(25).get(), 1);
    }

    #[test]
    fn interval_to_is_ascending() {
        assert_eq!(PitchClass::G.interval_to(PitchClass::C), 5);
        assert_eq!(PitchClass::C.interval_to(PitchClass::G), 7);
        assert_eq!(PitchClass::A.interval_to(PitchClass::A), 0);
    }

    #[test]
    fn enharmonic_spellings_agree() {
        assert_eq!(PitchClass::from_name("Bb"), PitchClass::from_name("A#"));
        assert_eq!(PitchClass::from_name("B♭"), PitchClass::from_name("A♯"));
        assert_eq!(PitchClass::from_name("Cb"), Some(PitchClass::B));
        assert_eq!(PitchClass::from_name("E#"), Some(PitchClass::F));
        assert_eq!(PitchClass::from_name("Dbb"), Some(PitchClass::new(0)));
    }

    #[test]
    fn rejects_unknown_letters() {
        assert_eq!(PitchClass::from_name("H"), None);
        assert_eq!(PitchClass::from_name("Cx"), None);
        assert_eq!(PitchClass::from_name(""), None);
    }

    #[test]
    fn spelling_tables() {
        let bb = PitchClass::new(10);
        assert_eq!(bb.name(Spelling::Sharps), "A#");
        assert_eq!(bb.name(Spelling::Flats), "Bb");
        assert_eq!(bb.name(Spelling::Mixed), "Bb");
        assert_eq!(PitchClass::new(6).name(Spelling::Mixed), "F#");
    }

    #[test]
    fn key_spelling() {
        assert_eq!(Spelling::for_major_tonic(PitchClass::F), Spelling::Flats);
        assert_eq!(Spelling::for_major_tonic(PitchClass::D), Spelling::Sharps);
        assert_eq!(Spelling::for_major_tonic(PitchClass::C), Spelling::Mixed);
    }

    #[test]
    fn midi_reduces_to_pitch_class() {
        assert_eq!(PitchClass::from_midi(60), PitchClass::C);
        assert_eq!(PitchClass::from_midi(69), PitchClass::A);
    }

    #[test]
    fn deserialized_values_reduce_modulo_12() {
        let pc: PitchClass = serde_json::from_str("200").unwrap();
        assert_eq!(pc.get(), 8);
        assert_eq!(pc.to_string(), "Ab");
        assert_eq!(serde_json::to_string(&PitchClass::new(14)).unwrap(), "2");
    }
}
