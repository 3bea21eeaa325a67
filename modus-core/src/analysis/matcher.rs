//! Scale/mode lookup against the static scale table.

use modus_types::{PitchClass, PitchClassSet, ScaleFamily, ScaleTable, ScaleTableEntry};

/// Largest collection any table entry holds.
const MAX_SCALE_SIZE: usize = 7;

/// Every table entry whose collection equals `set`, over all families.
///
/// Ranked by family (diatonic first), then entries rooted on `lowest`, then
/// mode order. Empty sets and sets larger than seven give an empty result.
pub fn match_scales(set: PitchClassSet, lowest: Option<PitchClass>) -> Vec<ScaleTableEntry> {
    match_scales_in(set, lowest, &ScaleFamily::ALL)
}

/// Same as [`match_scales`] but restricted to `families`, ranked in the order given.
pub fn match_scales_in(
    set: PitchClassSet,
    lowest: Option<PitchClass>,
    families: &[ScaleFamily],
) -> Vec<ScaleTableEntry> {
    if set.is_empty() || set.len() > MAX_SCALE_SIZE {
        return Vec::new();
    }

    let mut matches: Vec<(usize, &ScaleTableEntry)> = ScaleTable::global()
        .entries()
        .iter()
        .filter(|e| e.pitch_classes == set)
        .filter_map(|e| {
            families
                .iter()
                .position(|f| *f == e.table_id)
                .map(|rank| (rank, e))
        })
        .collect();

    matches.sort_by_key(|(rank, e)| {
        (*rank, lowest != Some(e.root_pitch), e.mode_index, e.root_pitch)
    });

    log::trace!(target: "analysis", "{} matched {} scale entries", set, matches.len());
    matches.into_iter().map(|(_, e)| e.clone()).collect()
}

/// Match the pitch classes of played MIDI notes; the lowest note is the tie-break root.
pub fn match_notes(notes: &[u8]) -> Vec<ScaleTableEntry> {
    let lowest = notes.iter().min().map(|&n| PitchClass::from_midi(n));
    match_scales(PitchClassSet::from_midi(notes), lowest)
}
