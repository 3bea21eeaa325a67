use serde::{Deserialize, Deserializer, Serialize};

use crate::pitch::{PitchClass, Spelling};
use crate::set::PitchClassSet;

/// Chord quality: the interval template stacked on the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Major7,
    Minor7,
    HalfDiminished7,
    Diminished7,
    MinorMajor7,
    Augmented7,
    Major6,
    Minor6,
    Sus2,
    Sus4,
    Dominant7Sus4,
    Power,
    Add9,
    Dominant9,
    Major9,
    Minor9,
    Dominant11,
    Dominant13,
}

/// The triad a quality is built on, used for numeral case and modal lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriadKind {
    Major,
    Minor,
    Diminished,
    Augmented,
    Suspended,
    Power,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 23] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::HalfDiminished7,
        ChordQuality::Diminished7,
        ChordQuality::MinorMajor7,
        ChordQuality::Augmented7,
        ChordQuality::Major6,
        ChordQuality::Minor6,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
        ChordQuality::Dominant7Sus4,
        ChordQuality::Power,
        ChordQuality::Add9,
        ChordQuality::Dominant9,
        ChordQuality::Major9,
        ChordQuality::Minor9,
        ChordQuality::Dominant11,
        ChordQuality::Dominant13,
    ];

    /// Pitch classes above the root, root first. Extensions are folded into one octave.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::HalfDiminished7 => &[0, 3, 6, 10],
            ChordQuality::Diminished7 => &[0, 3, 6, 9],
            ChordQuality::MinorMajor7 => &[0, 3, 7, 11],
            ChordQuality::Augmented7 => &[0, 4, 8, 10],
            ChordQuality::Major6 => &[0, 4, 7, 9],
            ChordQuality::Minor6 => &[0, 3, 7, 9],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Dominant7Sus4 => &[0, 5, 7, 10],
            ChordQuality::Power => &[0, 7],
            ChordQuality::Add9 => &[0, 4, 7, 2],
            ChordQuality::Dominant9 => &[0, 4, 7, 10, 2],
            ChordQuality::Major9 => &[0, 4, 7, 11, 2],
            ChordQuality::Minor9 => &[0, 3, 7, 10, 2],
            ChordQuality::Dominant11 => &[0, 4, 7, 10, 2, 5],
            ChordQuality::Dominant13 => &[0, 4, 7, 10, 2, 9],
        }
    }

    /// Canonical chord-symbol suffix. Always accepted by [`ChordQuality::from_suffix`].
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::HalfDiminished7 => "m7b5",
            ChordQuality::Diminished7 => "dim7",
            ChordQuality::MinorMajor7 => "mMaj7",
            ChordQuality::Augmented7 => "aug7",
            ChordQuality::Major6 => "6",
            ChordQuality::Minor6 => "m6",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Dominant7Sus4 => "7sus4",
            ChordQuality::Power => "5",
            ChordQuality::Add9 => "add9",
            ChordQuality::Dominant9 => "9",
            ChordQuality::Major9 => "maj9",
            ChordQuality::Minor9 => "m9",
            ChordQuality::Dominant11 => "11",
            ChordQuality::Dominant13 => "13",
        }
    }

    /// Look up a quality from the text that follows the root in a chord symbol.
    pub fn from_suffix(suffix: &str) -> Option<ChordQuality> {
        let quality = match suffix {
            "" | "M" | "maj" | "major" => ChordQuality::Major,
            "m" | "min" | "minor" | "-" => ChordQuality::Minor,
            "dim" | "°" | "o" => ChordQuality::Diminished,
            "aug" | "+" => ChordQuality::Augmented,
            "7" | "dom7" | "dom" => ChordQuality::Dominant7,
            "maj7" | "M7" | "ma7" | "Δ" | "Δ7" | "^" | "^7" => ChordQuality::Major7,
            "m7" | "min7" | "-7" => ChordQuality::Minor7,
            "m7b5" | "m7♭5" | "min7b5" | "-7b5" | "ø" | "ø7" => ChordQuality::HalfDiminished7,
            "dim7" | "°7" | "o7" => ChordQuality::Diminished7,
            "mMaj7" | "mmaj7" | "mM7" | "m(maj7)" | "minmaj7" | "-Δ7" => {
                ChordQuality::MinorMajor7
            }
            "aug7" | "+7" | "7#5" | "7♯5" => ChordQuality::Augmented7,
            "6" | "maj6" | "M6" => ChordQuality::Major6,
            "m6" | "min6" | "-6" => ChordQuality::Minor6,
            "sus2" => ChordQuality::Sus2,
            "sus4" | "sus" => ChordQuality::Sus4,
            "7sus4" | "7sus" => ChordQuality::Dominant7Sus4,
            "5" => ChordQuality::Power,
            "add9" | "add2" | "2" => ChordQuality::Add9,
            "9" => ChordQuality::Dominant9,
            "maj9" | "M9" | "Δ9" => ChordQuality::Major9,
            "m9" | "min9" | "-9" => ChordQuality::Minor9,
            "11" => ChordQuality::Dominant11,
            "13" => ChordQuality::Dominant13,
            _ => return None,
        };
        Some(quality)
    }

    pub fn triad_kind(&self) -> TriadKind {
        match self {
            ChordQuality::Major
            | ChordQuality::Dominant7
            | ChordQuality::Major7
            | ChordQuality::Major6
            | ChordQuality::Add9
            | ChordQuality::Dominant9
            | ChordQuality::Major9
            | ChordQuality::Dominant11
            | ChordQuality::Dominant13 => TriadKind::Major,
            ChordQuality::Minor
            | ChordQuality::Minor7
            | ChordQuality::MinorMajor7
            | ChordQuality::Minor6
            | ChordQuality::Minor9 => TriadKind::Minor,
            ChordQuality::Diminished
            | ChordQuality::HalfDiminished7
            | ChordQuality::Diminished7 => TriadKind::Diminished,
            ChordQuality::Augmented | ChordQuality::Augmented7 => TriadKind::Augmented,
            ChordQuality::Sus2 | ChordQuality::Sus4 | ChordQuality::Dominant7Sus4 => {
                TriadKind::Suspended
            }
            ChordQuality::Power => TriadKind::Power,
        }
    }

    /// Qualities that can act as the dominant of another degree.
    pub fn is_dominant(&self) -> bool {
        matches!(
            self,
            ChordQuality::Major
                | ChordQuality::Dominant7
                | ChordQuality::Dominant9
                | ChordQuality::Dominant11
                | ChordQuality::Dominant13
        )
    }

    /// Interval of the chord's seventh, if it is a four-note seventh chord.
    pub fn seventh(&self) -> Option<u8> {
        match self {
            ChordQuality::Dominant7
            | ChordQuality::Minor7
            | ChordQuality::HalfDiminished7
            | ChordQuality::Augmented7 => Some(10),
            ChordQuality::Major7 | ChordQuality::MinorMajor7 => Some(11),
            ChordQuality::Diminished7 => Some(9),
            _ => None,
        }
    }
}

/// A parsed chord symbol. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bass: Option<PitchClass>,
}

impl Chord {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self {
            root,
            quality,
            bass: None,
        }
    }

    /// Slash chord. A bass equal to the root is dropped.
    pub fn with_bass(mut self, bass: PitchClass) -> Self {
        self.bass = if bass == self.root { None } else { Some(bass) };
        self
    }

    /// Chord tones without the slash bass.
    pub fn tones(&self) -> PitchClassSet {
        self.quality
            .intervals()
            .iter()
            .map(|&i| self.root.transpose(i as i32))
            .collect()
    }

    /// Every sounding pitch class, slash bass included.
    pub fn pitch_classes(&self) -> PitchClassSet {
        let mut set = self.tones();
        if let Some(bass) = self.bass {
            set.insert(bass);
        }
        set
    }

    pub fn lowest(&self) -> PitchClass {
        self.bass.unwrap_or(self.root)
    }

    pub fn symbol(&self, spelling: Spelling) -> String {
        let mut out = String::from(self.root.name(spelling));
        out.push_str(self.quality.suffix());
        if let Some(bass) = self.bass {
            out.push('/');
            out.push_str(bass.name(spelling));
        }
        out
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.symbol(Spelling::Mixed))
    }
}

/// Chords in order, each tagged with the measure it sits in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Progression {
    chords: Vec<Chord>,
    measures: Vec<usize>,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// All chords in a single measure.
    pub fn from_chords(chords: Vec<Chord>) -> Self {
        let measures = vec![0; chords.len()];
        Self { chords, measures }
    }

    /// Append a chord to `measure`. Measures never decrease.
    pub fn push(&mut self, chord: Chord, measure: usize) {
        let measure = measure.max(self.measures.last().copied().unwrap_or(0));
        self.chords.push(chord);
        self.measures.push(measure);
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn measure_of(&self, index: usize) -> Option<usize> {
        self.measures.get(index).copied()
    }

    pub fn measure_count(&self) -> usize {
        self.measures.last().map_or(0, |m| m + 1)
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Union of every chord's pitch classes.
    pub fn pitch_classes(&self) -> PitchClassSet {
        self.chords
            .iter()
            .fold(PitchClassSet::new(), |acc, c| acc.union(c.pitch_classes()))
    }

    pub fn to_string_spelled(&self, spelling: Spelling) -> String {
        let mut out = String::new();
        for (i, chord) in self.chords.iter().enumerate() {
            if i > 0 {
                if self.measures[i] != self.measures[i - 1] {
                    out.push_str(" | ");
                } else {
                    out.push(' ');
                }
            }
            out.push_str(&chord.symbol(spelling));
        }
        out
    }
}

/// One measure tag per chord, never decreasing.
impl<'de> Deserialize<'de> for Progression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        #[derive(Deserialize)]
        struct Raw {
            chords: Vec<Chord>,
            measures: Vec<usize>,
        }

        let raw = Raw::deserialize(deserializer)?;
        if raw.chords.len() != raw.measures.len() {
            return Err(D::Error::custom(format!(
                "{} chords but {} measure tags",
                raw.chords.len(),
                raw.measures.len()
            )));
        }
        if raw.measures.windows(2).any(|w| w[1] < w[0]) {
            return Err(D::Error::custom("measure tags decrease"));
        }
        Ok(Self {
            chords: raw.chords,
            measures: raw.measures,
        })
    }
}

impl std::fmt::Display for Progression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_spelled(Spelling::Mixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_suffix_round_trips() {
        for q in ChordQuality::ALL {
            assert_eq!(ChordQuality::from_suffix(q.suffix()), Some(q), "{:?}", q);
        }
    }

    #[test]
    fn suffixes_unique() {
        let suffixes: HashSet<&str> = ChordQuality::ALL.iter().map(|q| q.suffix()).collect();
        assert_eq!(suffixes.len(), ChordQuality::ALL.len());
    }

    #[test]
    fn templates_start_at_root_and_stay_in_octave() {
        for q in ChordQuality::ALL {
            let iv = q.intervals();
            assert_eq!(iv[0], 0);
            assert!(iv.iter().all(|&i| i < 12));
        }
    }

    #[test]
    fn seventh_is_in_template() {
        for q in ChordQuality::ALL {
            if let Some(s) = q.seventh() {
                assert!(q.intervals().contains(&s), "{:?}", q);
            }
        }
    }

    #[test]
    fn aliases() {
        assert_eq!(ChordQuality::from_suffix("-7"), Some(ChordQuality::Minor7));
        assert_eq!(ChordQuality::from_suffix("ø"), Some(ChordQuality::HalfDiminished7));
        assert_eq!(ChordQuality::from_suffix("Δ7"), Some(ChordQuality::Major7));
        assert_eq!(ChordQuality::from_suffix("sus"), Some(ChordQuality::Sus4));
        assert_eq!(ChordQuality::from_suffix("zz"), None);
    }

    #[test]
    fn slash_chord_tones() {
        let am_c = Chord::new(PitchClass::A, ChordQuality::Minor).with_bass(PitchClass::C);
        assert_eq!(am_c.tones(), PitchClassSet::from_values(&[9, 0, 4]));
        assert_eq!(am_c.lowest(), PitchClass::C);
        assert_eq!(am_c.to_string(), "Am/C");

        let c_g = Chord::new(PitchClass::C, ChordQuality::Major).with_bass(PitchClass::D);
        assert_eq!(c_g.pitch_classes().len(), 4);
    }

    #[test]
    fn bass_equal_to_root_is_dropped() {
        let c = Chord::new(PitchClass::C, ChordQuality::Major).with_bass(PitchClass::C);
        assert_eq!(c.bass, None);
    }

    #[test]
    fn progression_display_marks_measures() {
        let mut p = Progression::new();
        p.push(Chord::new(PitchClass::C, ChordQuality::Major), 0);
        p.push(Chord::new(PitchClass::A, ChordQuality::Minor), 0);
        p.push(Chord::new(PitchClass::new(10), ChordQuality::Dominant7), 1);
        assert_eq!(p.to_string(), "C Am | Bb7");
        assert_eq!(p.to_string_spelled(Spelling::Sharps), "C Am | A#7");
        assert_eq!(p.measure_count(), 2);
    }

    #[test]
    fn progression_deserialize_checks_measure_tags() {
        let mut p = Progression::new();
        p.push(Chord::new(PitchClass::C, ChordQuality::Major), 0);
        p.push(Chord::new(PitchClass::G, ChordQuality::Major), 1);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<Progression>(&json).unwrap(), p);

        let chord = r#"{"root":0,"quality":"Major","bass":null}"#;
        let short = format!(r#"{{"chords":[{c},{c}],"measures":[0]}}"#, c = chord);
        assert!(serde_json::from_str::<Progression>(&short).is_err());
        let backwards = format!(r#"{{"chords":[{c},{c}],"measures":[1,0]}}"#, c = chord);
        assert!(serde_json::from_str::<Progression>(&backwards).is_err());
    }
}
