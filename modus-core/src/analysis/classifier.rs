//! Key inference and functional (Roman-numeral) classification.

use modus_types::{
    Chord, DiatonicMode, HarmonicFunction, KeyCenter, PitchClass, PitchClassSet, ScaleFamily,
    ScaleTable, TriadKind,
};

use super::numeral::{degree_of, format_numeral, Degree};

/// Outcome of key inference over a chord sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInference {
    pub key: KeyCenter,
    /// Major keys that scored exactly as well as the winner.
    pub alternatives: Vec<KeyCenter>,
}

/// Functional reading of each chord against one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub key: KeyCenter,
    pub roman_numerals: Vec<String>,
    pub functions: Vec<HarmonicFunction>,
    /// Per chord: every sounding pitch class belongs to the key's collection.
    pub diatonic: Vec<bool>,
}

impl Classification {
    /// Share of chords that are diatonic, 0.0 for an empty sequence.
    pub fn diatonic_share(&self) -> f64 {
        if self.diatonic.is_empty() {
            return 0.0;
        }
        self.diatonic.iter().filter(|d| **d).count() as f64 / self.diatonic.len() as f64
    }
}

/// Pitch classes treated as diatonic in `key`. Minor keys also admit the
/// raised sixth and seventh of the melodic and harmonic forms.
pub fn key_collection(key: &KeyCenter) -> PitchClassSet {
    let mut set = key.scale();
    if key.mode == DiatonicMode::Aeolian {
        set.insert(key.tonic.transpose(9));
        set.insert(key.tonic.transpose(11));
    }
    set
}

pub fn is_diatonic(chord: &Chord, key: &KeyCenter) -> bool {
    chord.pitch_classes().is_subset_of(key_collection(key))
}

/// Scale degree of `root` in `key`. The raised sixth and seventh of a minor
/// key count as natural sixth and seventh degrees, matching [`key_collection`].
pub(crate) fn degree_in_key(root: PitchClass, key: &KeyCenter) -> Degree {
    let interval = key.tonic.interval_to(root);
    if key.mode == DiatonicMode::Aeolian {
        let raised = match interval {
            9 => Some(5),
            11 => Some(6),
            _ => None,
        };
        if let Some(index) = raised {
            return Degree {
                index,
                accidental: 0,
            };
        }
    }
    degree_of(interval, &key.intervals())
}

/// Numeral of `chord` in `key`.
pub fn numeral_in_key(chord: &Chord, key: &KeyCenter) -> String {
    format_numeral(chord, degree_in_key(chord.root, key))
}

/// Pick the most-matched major collection, then decide between it and its
/// relative minor. `None` for an empty sequence.
pub fn infer_key(chords: &[Chord]) -> Option<KeyInference> {
    let first = chords.first()?;
    let last = chords.last()?;

    let mut candidates: Vec<(usize, usize, bool, PitchClass)> = ScaleTable::global()
        .family(ScaleFamily::Diatonic)
        .filter(|e| e.mode_index == 0)
        .map(|e| {
            let scale = e.pitch_classes;
            let fit = chords
                .iter()
                .filter(|c| c.pitch_classes().is_subset_of(scale))
                .count();
            let coverage = chords.iter().filter(|c| scale.contains(c.root)).count();
            let relative_minor = e.root_pitch.transpose(9);
            let emphasized = [first.root, last.root]
                .iter()
                .any(|r| *r == e.root_pitch || *r == relative_minor);
            (fit, coverage, emphasized, e.root_pitch)
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then(b.1.cmp(&a.1))
            .then(b.2.cmp(&a.2))
            .then(a.3.cmp(&b.3))
    });

    let (best_fit, best_coverage, _, tonic) = candidates[0];
    let alternatives: Vec<KeyCenter> = candidates[1..]
        .iter()
        .filter(|c| c.0 == best_fit && c.1 == best_coverage)
        .map(|c| KeyCenter::major(c.3))
        .collect();

    let minor_tonic = tonic.transpose(9);
    let is_vi = |c: &Chord| c.root == minor_tonic && c.quality.triad_kind() == TriadKind::Minor;
    let ends_home = last.root == tonic || last.root == tonic.transpose(7);
    let key = if is_vi(last) || (is_vi(first) && !ends_home) {
        KeyCenter::minor(minor_tonic)
    } else {
        KeyCenter::major(tonic)
    };

    log::debug!(
        target: "analysis",
        "inferred {} (fit {}/{}, coverage {}, {} tied)",
        key,
        best_fit,
        chords.len(),
        best_coverage,
        alternatives.len()
    );

    Some(KeyInference { key, alternatives })
}

/// Roman numeral, function and diatonic flag for each chord.
pub fn classify(chords: &[Chord], key: &KeyCenter) -> Classification {
    let collection = key_collection(key);
    let mut roman_numerals = Vec::with_capacity(chords.len());
    let mut functions = Vec::with_capacity(chords.len());
    let mut diatonic = Vec::with_capacity(chords.len());

    for chord in chords {
        let degree = degree_in_key(chord.root, key);
        let in_key = chord.pitch_classes().is_subset_of(collection);
        roman_numerals.push(format_numeral(chord, degree));
        functions.push(if in_key && degree.is_natural() {
            HarmonicFunction::for_degree(degree.index)
        } else {
            HarmonicFunction::Chromatic
        });
        diatonic.push(in_key);
    }

    Classification {
        key: *key,
        roman_numerals,
        functions,
        diatonic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::parse_progression;

    fn chords(text: &str) -> Vec<Chord> {
        parse_progression(text).unwrap().chords().to_vec()
    }

    #[test]
    fn pop_progression_in_c() {
        let c = classify(&chords("Am F C G"), &KeyCenter::major(PitchClass::C));
        assert_eq!(c.roman_numerals, vec!["vi", "IV", "I", "V"]);
        assert_eq!(
            c.functions,
            vec![
                HarmonicFunction::Tonic,
                HarmonicFunction::Predominant,
                HarmonicFunction::Tonic,
                HarmonicFunction::Dominant,
            ]
        );
        assert_eq!(c.diatonic_share(), 1.0);
    }

    #[test]
    fn minor_key_dominant_is_diatonic() {
        let key = KeyCenter::minor(PitchClass::A);
        let c = classify(&chords("Am Dm E7 Am G#dim"), &key);
        assert_eq!(c.roman_numerals, vec!["i", "iv", "V7", "i", "vii°"]);
        assert!(c.diatonic.iter().all(|d| *d));
        assert_eq!(c.functions[2], HarmonicFunction::Dominant);
        assert_eq!(c.functions[4], HarmonicFunction::Dominant);
    }

    #[test]
    fn raised_sixth_in_minor_is_a_natural_degree() {
        let key = KeyCenter::minor(PitchClass::A);
        for text in ["Am F#dim E Am", "Am F#m7b5 E Am"] {
            let c = classify(&chords(text), &key);
            assert!(c.diatonic[1], "{}", text);
            assert!(c.roman_numerals[1].starts_with("vi"), "{}", c.roman_numerals[1]);
            assert_eq!(c.functions[1], HarmonicFunction::Tonic);
        }
        let c = classify(&chords("Am F#dim E Am"), &key);
        assert_eq!(c.roman_numerals, vec!["i", "vi°", "V", "i"]);
    }

    #[test]
    fn borrowed_chord_is_chromatic() {
        let c = classify(&chords("C Bb F C"), &KeyCenter::major(PitchClass::C));
        assert_eq!(c.roman_numerals[1], "bVII");
        assert_eq!(c.functions[1], HarmonicFunction::Chromatic);
        assert!(!c.diatonic[1]);
    }

    #[test]
    fn infers_major_key() {
        let inf = infer_key(&chords("F G C")).unwrap();
        assert_eq!(inf.key, KeyCenter::major(PitchClass::C));
        assert!(inf.alternatives.is_empty());
    }

    #[test]
    fn starting_on_vi_but_ending_on_v_stays_major() {
        let inf = infer_key(&chords("Am F C G")).unwrap();
        assert_eq!(inf.key, KeyCenter::major(PitchClass::C));
    }

    #[test]
    fn andalusian_cadence_reads_as_minor() {
        let inf = infer_key(&chords("Am G F E")).unwrap();
        assert_eq!(inf.key, KeyCenter::minor(PitchClass::A));
    }

    #[test]
    fn emphasis_breaks_ties() {
        // Em and Am fit both C and G major; the framing Em points at G's relative minor.
        let inf = infer_key(&chords("Em Am Em")).unwrap();
        assert_eq!(inf.key, KeyCenter::minor(PitchClass::E));
        assert!(inf.alternatives.contains(&KeyCenter::major(PitchClass::C)));
    }

    #[test]
    fn root_coverage_breaks_equal_fit() {
        // C and F major each hold two of the chords; F also holds all three roots.
        let inf = infer_key(&chords("C Bb7 F")).unwrap();
        assert_eq!(inf.key, KeyCenter::major(PitchClass::F));
        assert!(inf.alternatives.is_empty());
    }

    #[test]
    fn empty_sequence_has_no_key() {
        assert!(infer_key(&[]).is_none());
    }

    #[test]
    fn inference_is_deterministic() {
        let input = chords("Dm7 G7 Cmaj7 A7 Dm7 G7");
        assert_eq!(infer_key(&input), infer_key(&input));
    }
}
