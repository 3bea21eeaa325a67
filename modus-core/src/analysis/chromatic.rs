//! Annotations for chords outside the key: secondary dominants, leading-tone
//! chords and borrowings from parallel modes. Never alters the functional
//! classification.

use modus_types::{
    Chord, ChordQuality, ChromaticElement, ChromaticKind, DiatonicMode, KeyCenter, PitchClass,
    Spelling, TriadKind,
};

use super::classifier::{is_diatonic, numeral_in_key};
use super::numeral::{degree_name, degree_of, diatonic_triad};

const MAJOR_BORROWING: [DiatonicMode; 6] = [
    DiatonicMode::Aeolian,
    DiatonicMode::Mixolydian,
    DiatonicMode::Dorian,
    DiatonicMode::Phrygian,
    DiatonicMode::Lydian,
    DiatonicMode::Locrian,
];

const MINOR_BORROWING: [DiatonicMode; 6] = [
    DiatonicMode::Ionian,
    DiatonicMode::Dorian,
    DiatonicMode::Mixolydian,
    DiatonicMode::Lydian,
    DiatonicMode::Phrygian,
    DiatonicMode::Locrian,
];

/// Numeral of a possible tonicization target, or `None` when `target` is the
/// tonic, outside the scale, or carries a diminished triad.
fn target_numeral(target: PitchClass, key: &KeyCenter) -> Option<String> {
    if target == key.tonic || !key.scale().contains(target) {
        return None;
    }
    let reference = key.intervals();
    let degree = degree_of(key.tonic.interval_to(target), &reference);
    let kind = match diatonic_triad(&reference, degree.index) {
        // Minor keys tonicize the raised dominant.
        _ if key.mode == DiatonicMode::Aeolian && degree.index == 4 => TriadKind::Major,
        TriadKind::Diminished => return None,
        kind => kind,
    };
    Some(degree_name(degree, kind))
}

fn dominant_prefix(quality: ChordQuality) -> Option<&'static str> {
    match quality {
        ChordQuality::Major => Some("V"),
        ChordQuality::Dominant7 => Some("V7"),
        ChordQuality::Dominant9 => Some("V9"),
        ChordQuality::Dominant11 => Some("V11"),
        ChordQuality::Dominant13 => Some("V13"),
        _ => None,
    }
}

fn leading_tone_prefix(quality: ChordQuality) -> Option<&'static str> {
    match quality {
        ChordQuality::Diminished => Some("vii°"),
        ChordQuality::Diminished7 => Some("vii°7"),
        ChordQuality::HalfDiminished7 => Some("viiø7"),
        _ => None,
    }
}

fn is_picardy(chord: &Chord, next: Option<&Chord>, key: &KeyCenter) -> bool {
    key.mode == DiatonicMode::Aeolian
        && chord.root == key.tonic
        && chord.quality.triad_kind() == TriadKind::Major
        && next.map_or(true, |n| n.root != key.tonic.transpose(5))
}

fn borrowed_from(chord: &Chord, key: &KeyCenter) -> Option<DiatonicMode> {
    let order = if key.mode.is_major() {
        &MAJOR_BORROWING
    } else {
        &MINOR_BORROWING
    };
    order
        .iter()
        .copied()
        .filter(|m| *m != key.mode)
        .find(|m| {
            chord
                .pitch_classes()
                .is_subset_of(KeyCenter::new(key.tonic, *m).scale())
        })
}

fn annotate_one(
    index: usize,
    chord: &Chord,
    next: Option<&Chord>,
    key: &KeyCenter,
    spelling: Spelling,
) -> ChromaticElement {
    let symbol = chord.symbol(spelling);
    let returns_to_key = next.is_some_and(|n| is_diatonic(n, key));
    let element = |kind, label: String, resolves, explanation: String| ChromaticElement {
        chord_index: index,
        symbol: symbol.clone(),
        kind,
        label,
        resolves,
        explanation,
    };

    if is_picardy(chord, next, key) {
        return element(
            ChromaticKind::Borrowed {
                source: DiatonicMode::Ionian,
            },
            numeral_in_key(chord, key),
            returns_to_key,
            format!("{} raises the third of the minor tonic (Picardy third)", symbol),
        );
    }

    if let Some(prefix) = dominant_prefix(chord.quality) {
        let target = chord.root.transpose(5);
        if let Some(numeral) = target_numeral(target, key) {
            let resolves = next.is_some_and(|n| n.root == target);
            let arrival = if resolves { " and resolves to it" } else { "" };
            return element(
                ChromaticKind::SecondaryDominant { target },
                format!("{}/{}", prefix, numeral),
                resolves,
                format!(
                    "{} is the dominant of {} ({}){}",
                    symbol,
                    target.name(spelling),
                    numeral,
                    arrival
                ),
            );
        }
    }

    if let Some(prefix) = leading_tone_prefix(chord.quality) {
        let target = chord.root.transpose(1);
        if let Some(numeral) = target_numeral(target, key) {
            let resolves = next.is_some_and(|n| n.root == target);
            let arrival = if resolves { " and resolves to it" } else { "" };
            return element(
                ChromaticKind::SecondaryLeadingTone { target },
                format!("{}/{}", prefix, numeral),
                resolves,
                format!(
                    "{} is the leading-tone chord of {} ({}){}",
                    symbol,
                    target.name(spelling),
                    numeral,
                    arrival
                ),
            );
        }
    }

    if let Some(source) = borrowed_from(chord, key) {
        let parallel = KeyCenter::new(key.tonic, source);
        return element(
            ChromaticKind::Borrowed { source },
            numeral_in_key(chord, key),
            returns_to_key,
            format!("{} is borrowed from {}", symbol, parallel.name(spelling)),
        );
    }

    element(
        ChromaticKind::Unclassified,
        numeral_in_key(chord, key),
        returns_to_key,
        format!(
            "{} lies outside {} and fits no parallel mode",
            symbol,
            key.name(spelling)
        ),
    )
}

/// One element per chord that is not diatonic to `key`, in chord order.
pub fn annotate_chromatic(
    chords: &[Chord],
    key: &KeyCenter,
    spelling: Spelling,
) -> Vec<ChromaticElement> {
    let elements: Vec<ChromaticElement> = chords
        .iter()
        .enumerate()
        .filter(|(_, c)| !is_diatonic(c, key))
        .map(|(i, c)| annotate_one(i, c, chords.get(i + 1), key, spelling))
        .collect();
    log::debug!(
        target: "analysis",
        "{} chromatic chords against {}",
        elements.len(),
        key
    );
    elements
}
