//! Chord identification from sounding MIDI notes.

use std::cmp::Reverse;

use modus_types::{Chord, ChordQuality, PitchClass, PitchClassSet};

/// Name the chord formed by `notes`.
///
/// Every sounding pitch class is tried as a root against every quality
/// template. Exact matches beat templates that cover only part of the notes,
/// larger templates beat smaller ones, and a root on the lowest note wins
/// what is left. A lowest note other than the root becomes the slash bass.
/// `None` for fewer than two distinct pitch classes or when no template fits.
pub fn identify_chord(notes: &[u8]) -> Option<Chord> {
    let set = PitchClassSet::from_midi(notes);
    if set.len() < 2 {
        return None;
    }
    let lowest = PitchClass::from_midi(*notes.iter().min()?);

    let mut best: Option<((bool, usize, bool, Reverse<usize>), Chord)> = None;
    for root in set.iter() {
        for (index, quality) in ChordQuality::ALL.iter().enumerate() {
            let template = Chord::new(root, *quality).tones();
            if !template.is_subset_of(set) {
                continue;
            }
            let score = (
                template == set,
                template.len(),
                root == lowest,
                Reverse(index),
            );
            if best.as_ref().map_or(true, |(prev, _)| score > *prev) {
                best = Some((score, Chord::new(root, *quality).with_bass(lowest)));
            }
        }
    }

    let chord = best.map(|(_, chord)| chord);
    log::trace!(target: "analysis", "identified {:?} as {:?}", notes, chord);
    chord
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(v: u8) -> PitchClass {
        PitchClass::new(v as i32)
    }

    fn chord(root: u8, quality: ChordQuality) -> Option<Chord> {
        Some(Chord::new(pc(root), quality))
    }

    #[test]
    fn detect_c_major() {
        assert_eq!(identify_chord(&[60, 64, 67]), chord(0, ChordQuality::Major));
    }

    #[test]
    fn detect_c_minor() {
        assert_eq!(identify_chord(&[60, 63, 67]), chord(0, ChordQuality::Minor));
    }

    #[test]
    fn detect_g_major() {
        assert_eq!(identify_chord(&[67, 71, 74]), chord(7, ChordQuality::Major));
    }

    #[test]
    fn detect_c_dom7() {
        assert_eq!(identify_chord(&[60, 64, 67, 70]), chord(0, ChordQuality::Dominant7));
    }

    #[test]
    fn detect_a_minor7_over_c6() {
        // Same pitch classes as C6; the lowest note decides.
        assert_eq!(identify_chord(&[69, 72, 76, 79]), chord(9, ChordQuality::Minor7));
        assert_eq!(identify_chord(&[60, 64, 67, 69]), chord(0, ChordQuality::Major6));
    }

    #[test]
    fn detect_half_diminished() {
        assert_eq!(
            identify_chord(&[71, 74, 77, 81]),
            chord(11, ChordQuality::HalfDiminished7)
        );
    }

    #[test]
    fn detect_ninth() {
        assert_eq!(
            identify_chord(&[48, 52, 55, 58, 62]),
            chord(0, ChordQuality::Dominant9)
        );
    }

    #[test]
    fn detect_power_chord() {
        assert_eq!(identify_chord(&[60, 67]), chord(0, ChordQuality::Power));
    }

    #[test]
    fn sus4_on_lowest_note() {
        // C F G is also F sus2.
        assert_eq!(identify_chord(&[60, 65, 67]), chord(0, ChordQuality::Sus4));
    }

    #[test]
    fn inversions_carry_the_bass() {
        assert_eq!(
            identify_chord(&[64, 67, 72]),
            Some(Chord::new(PitchClass::C, ChordQuality::Major).with_bass(PitchClass::E))
        );
        assert_eq!(
            identify_chord(&[65, 67, 71, 74]),
            Some(Chord::new(PitchClass::G, ChordQuality::Dominant7).with_bass(PitchClass::F))
        );
    }

    #[test]
    fn extra_note_falls_back_to_subset() {
        // C E G B plus F#: no exact template, the seventh chord covers most.
        let c = identify_chord(&[60, 64, 66, 67, 71]).unwrap();
        assert_eq!(c.root, PitchClass::C);
        assert_eq!(c.quality, ChordQuality::Major7);
    }

    #[test]
    fn too_few_pitch_classes() {
        assert_eq!(identify_chord(&[]), None);
        assert_eq!(identify_chord(&[64]), None);
        assert_eq!(identify_chord(&[60, 72]), None);
    }

    #[test]
    fn duplicate_pitches_ignored() {
        assert_eq!(identify_chord(&[60, 64, 67, 72]), chord(0, ChordQuality::Major));
    }

    #[test]
    fn unmatched_cluster() {
        assert_eq!(identify_chord(&[60, 61]), None);
    }
}
