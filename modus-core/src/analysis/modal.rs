//! Modal lens: signature motions that point at a modal tonic.
//!
//! Runs beside the functional classifier and never replaces it. A motion is
//! a chord a fixed interval away from a candidate tonic, followed later by
//! the tonic itself.

use modus_types::{
    Chord, DiatonicMode, KeyCenter, ModalEnhancement, ModalSignature, PitchClass, Progression,
    ScaleFamily, ScaleTable, TriadKind,
};

use super::numeral::{degree_of, format_numeral, MAJOR_REFERENCE};

struct MotionRule {
    /// Tonic triad is major (`I`) rather than minor (`i`).
    major_tonic: bool,
    /// Semitones from the tonic up to the signature chord's root.
    interval: u8,
    kind: TriadKind,
    family: ScaleFamily,
    mode: u8,
    motion: &'static str,
    description: &'static str,
}

const RULES: [MotionRule; 10] = [
    MotionRule {
        major_tonic: true,
        interval: 10,
        kind: TriadKind::Major,
        family: ScaleFamily::Diatonic,
        mode: 4,
        motion: "bVII–I",
        description: "flat-seven major chord moving to a major tonic",
    },
    MotionRule {
        major_tonic: true,
        interval: 7,
        kind: TriadKind::Minor,
        family: ScaleFamily::Diatonic,
        mode: 4,
        motion: "v–I",
        description: "minor dominant with a lowered seventh",
    },
    MotionRule {
        major_tonic: true,
        interval: 2,
        kind: TriadKind::Major,
        family: ScaleFamily::Diatonic,
        mode: 3,
        motion: "II–I",
        description: "major supertonic carrying the raised fourth",
    },
    MotionRule {
        major_tonic: true,
        interval: 1,
        kind: TriadKind::Major,
        family: ScaleFamily::HarmonicMinor,
        mode: 4,
        motion: "bII–I",
        description: "flat-two major chord falling a semitone to a major tonic",
    },
    MotionRule {
        major_tonic: false,
        interval: 1,
        kind: TriadKind::Major,
        family: ScaleFamily::Diatonic,
        mode: 2,
        motion: "bII–i",
        description: "flat-two major chord falling a semitone to a minor tonic",
    },
    MotionRule {
        major_tonic: false,
        interval: 5,
        kind: TriadKind::Major,
        family: ScaleFamily::Diatonic,
        mode: 1,
        motion: "IV–i",
        description: "major subdominant carrying the raised sixth",
    },
    MotionRule {
        major_tonic: false,
        interval: 7,
        kind: TriadKind::Major,
        family: ScaleFamily::HarmonicMinor,
        mode: 0,
        motion: "V–i",
        description: "major dominant with a raised seventh in a minor context",
    },
    MotionRule {
        major_tonic: false,
        interval: 11,
        kind: TriadKind::Diminished,
        family: ScaleFamily::HarmonicMinor,
        mode: 0,
        motion: "vii°–i",
        description: "leading-tone diminished chord in a minor context",
    },
    MotionRule {
        major_tonic: false,
        interval: 10,
        kind: TriadKind::Major,
        family: ScaleFamily::Diatonic,
        mode: 5,
        motion: "bVII–i",
        description: "subtonic major chord moving to a minor tonic",
    },
    MotionRule {
        major_tonic: false,
        interval: 8,
        kind: TriadKind::Major,
        family: ScaleFamily::Diatonic,
        mode: 5,
        motion: "bVI–i",
        description: "flat-six major chord moving to a minor tonic",
    },
];

impl MotionRule {
    fn matches(&self, chord: &Chord, tonic: PitchClass, major_tonic: bool) -> bool {
        self.major_tonic == major_tonic
            && tonic.interval_to(chord.root) == self.interval
            && chord.quality.triad_kind() == self.kind
    }

    /// Motion already implied by the key's own scale.
    fn native_to(&self, key: &KeyCenter) -> bool {
        match self.family {
            ScaleFamily::Diatonic => self.mode as usize == key.mode.index(),
            ScaleFamily::HarmonicMinor => key.mode == DiatonicMode::Aeolian,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TonicSource {
    Framing,
    Cadence,
    Key,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    tonic: PitchClass,
    major: bool,
    source: TonicSource,
}

fn tonic_kind(chord: &Chord) -> Option<bool> {
    match chord.quality.triad_kind() {
        TriadKind::Major => Some(true),
        TriadKind::Minor => Some(false),
        _ => None,
    }
}

fn candidates(chords: &[Chord], key: &KeyCenter) -> Vec<Candidate> {
    let mut out = Vec::new();
    let (Some(first), Some(last)) = (chords.first(), chords.last()) else {
        return out;
    };

    if chords.len() > 1 && first.root == last.root {
        if let Some(major) = tonic_kind(last) {
            out.push(Candidate {
                tonic: last.root,
                major,
                source: TonicSource::Framing,
            });
        }
    }

    if let (Some(major), Some(penultimate)) = (tonic_kind(last), chords.len().checked_sub(2)) {
        let approach = &chords[penultimate];
        if RULES.iter().any(|r| r.matches(approach, last.root, major)) {
            out.push(Candidate {
                tonic: last.root,
                major,
                source: TonicSource::Cadence,
            });
        }
    }

    out.push(Candidate {
        tonic: key.tonic,
        major: key.mode.is_major(),
        source: TonicSource::Key,
    });

    out.dedup_by(|b, a| a.tonic == b.tonic && a.major == b.major);
    out
}

/// (rule index, chord index) for each signature chord that a later tonic chord answers.
fn signatures_for(chords: &[Chord], candidate: &Candidate, key: &KeyCenter) -> Vec<(usize, usize)> {
    let own_key = candidate.tonic == key.tonic && candidate.major == key.mode.is_major();
    let mut found = Vec::new();
    for (i, chord) in chords.iter().enumerate() {
        if chord.root == candidate.tonic {
            continue;
        }
        let answered = chords[i + 1..].iter().any(|c| c.root == candidate.tonic);
        if !answered {
            continue;
        }
        let rule = RULES.iter().position(|r| {
            r.matches(chord, candidate.tonic, candidate.major) && !(own_key && r.native_to(key))
        });
        if let Some(rule) = rule {
            found.push((rule, i));
        }
    }
    found
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Modal reading of `progression` around `key`, or `None` when no signature
/// motion is present.
pub fn detect_modal(progression: &Progression, key: &KeyCenter) -> Option<ModalEnhancement> {
    let chords = progression.chords();
    let collection = progression.pitch_classes();
    let table = ScaleTable::global();

    let (candidate, found) = candidates(chords, key).into_iter().find_map(|c| {
        let found = signatures_for(chords, &c, key);
        (!found.is_empty()).then_some((c, found))
    })?;

    let tonic = candidate.tonic;
    let mut modes: Vec<(ScaleFamily, u8)> = Vec::new();
    for (rule, _) in &found {
        let mode = (RULES[*rule].family, RULES[*rule].mode);
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    let entries: Vec<_> = modes
        .iter()
        .filter_map(|(family, mode)| table.find(*family, *mode as usize, tonic))
        .collect();
    let (entry, contains_all_tones) = match entries
        .iter()
        .find(|e| collection.is_subset_of(e.pitch_classes))
    {
        Some(e) => (*e, true),
        None => (*entries.first()?, false),
    };

    let signatures: Vec<ModalSignature> = found
        .iter()
        .map(|&(rule, i)| ModalSignature {
            motion: RULES[rule].motion.to_string(),
            chord_index: i,
            resolves_directly: chords.get(i + 1).is_some_and(|c| c.root == tonic),
            description: RULES[rule].description.to_string(),
        })
        .collect();

    let mut confidence = 0.5;
    if candidate.source == TonicSource::Framing {
        confidence += 0.2;
    }
    if signatures.iter().any(|s| s.resolves_directly) {
        confidence += 0.15;
    }
    if contains_all_tones {
        confidence += 0.15;
    }
    let confidence = round2(f64::min(confidence, 1.0));

    let roman_numerals = chords
        .iter()
        .map(|c| format_numeral(c, degree_of(tonic.interval_to(c.root), &MAJOR_REFERENCE)))
        .collect();

    let motions: Vec<String> = signatures
        .iter()
        .map(|s| format!("{} at chord {}", s.motion, s.chord_index + 1))
        .collect();
    let tonic_reason = match candidate.source {
        TonicSource::Framing => "framing chord",
        TonicSource::Cadence => "cadential arrival",
        TonicSource::Key => "key tonic",
    };
    let fit = if contains_all_tones {
        "every chord tone fits the mode"
    } else {
        "some chord tones lie outside the mode"
    };
    let explanation = format!(
        "{} ({} of {}; tonic from the {}): {}; {}.",
        entry.common_name,
        entry.mode_name(),
        entry.parent_name(),
        tonic_reason,
        motions.join(", "),
        fit
    );

    log::debug!(target: "analysis", "modal lens: {}", explanation);

    Some(ModalEnhancement {
        tonic,
        family: entry.table_id,
        mode_index: entry.mode_index,
        mode_name: entry.common_name.clone(),
        parent_key: entry.parent_name(),
        roman_numerals,
        signatures,
        contains_all_tones,
        confidence,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::parse_progression;

    fn modal(text: &str, key: KeyCenter) -> Option<ModalEnhancement> {
        detect_modal(&parse_progression(text).unwrap(), &key)
    }

    #[test]
    fn mixolydian_vamp() {
        let m = modal("G F C G", KeyCenter::major(PitchClass::C)).unwrap();
        assert_eq!(m.mode_name, "G Mixolydian");
        assert_eq!(m.parent_key, "C major");
        assert_eq!(m.signatures.len(), 1);
        assert_eq!(m.signatures[0].motion, "bVII–I");
        assert_eq!(m.signatures[0].chord_index, 1);
        assert!(!m.signatures[0].resolves_directly);
        assert!(m.contains_all_tones);
        assert_eq!(m.roman_numerals, vec!["I", "bVII", "IV", "I"]);
        assert_eq!(m.confidence, 0.85);
    }

    #[test]
    fn plain_pop_progression_has_no_modal_reading() {
        assert!(modal("Am F C G", KeyCenter::major(PitchClass::C)).is_none());
        assert!(modal("C F G C", KeyCenter::major(PitchClass::C)).is_none());
    }

    #[test]
    fn minor_key_dominant_is_not_modal() {
        assert!(modal("Am Dm E Am", KeyCenter::minor(PitchClass::A)).is_none());
    }

    #[test]
    fn dorian_major_four() {
        let m = modal("Dm G Dm", KeyCenter::major(PitchClass::C)).unwrap();
        assert_eq!(m.mode_name, "D Dorian");
        assert_eq!(m.signatures[0].motion, "IV–i");
        assert!(m.signatures[0].resolves_directly);
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn andalusian_cadence_lands_on_phrygian_dominant() {
        let m = modal("Am G F E", KeyCenter::minor(PitchClass::A)).unwrap();
        assert_eq!(m.tonic, PitchClass::E);
        assert_eq!(m.family, ScaleFamily::HarmonicMinor);
        assert_eq!(m.signatures[0].motion, "bII–I");
        assert!(!m.contains_all_tones);
        assert_eq!(m.confidence, 0.65);
    }

    #[test]
    fn key_tonic_with_borrowed_subtonic() {
        let m = modal("C Am Bb C", KeyCenter::major(PitchClass::C)).unwrap();
        assert_eq!(m.mode_name, "C Mixolydian");
        assert_eq!(m.parent_key, "F major");
    }

    #[test]
    fn native_motions_are_skipped_for_the_key_tonic() {
        let aeolian = KeyCenter::new(PitchClass::A, DiatonicMode::Aeolian);
        assert!(modal("F G Am", aeolian).is_none());
    }

    #[test]
    fn unanswered_signature_is_ignored() {
        assert!(modal("C F Bb", KeyCenter::major(PitchClass::C)).is_none());
    }
}
