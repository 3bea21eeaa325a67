//! Scale families, diatonic modes and the static scale table.
//!
//! The table is a pure function of the interval constants below: every parent
//! key (0..12) times every mode of every family. It is built once on first use
//! and never mutated.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::pitch::{PitchClass, Spelling};
use crate::set::PitchClassSet;

/// Scale family. Declaration order is the matcher's preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleFamily {
    Diatonic,
    MelodicMinor,
    HarmonicMinor,
    HarmonicMajor,
    Pentatonic,
}

impl ScaleFamily {
    pub const ALL: [ScaleFamily; 5] = [
        ScaleFamily::Diatonic,
        ScaleFamily::MelodicMinor,
        ScaleFamily::HarmonicMinor,
        ScaleFamily::HarmonicMajor,
        ScaleFamily::Pentatonic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScaleFamily::Diatonic => "Diatonic",
            ScaleFamily::MelodicMinor => "Melodic Minor",
            ScaleFamily::HarmonicMinor => "Harmonic Minor",
            ScaleFamily::HarmonicMajor => "Harmonic Major",
            ScaleFamily::Pentatonic => "Pentatonic",
        }
    }

    /// Config-file identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ScaleFamily::Diatonic => "diatonic",
            ScaleFamily::MelodicMinor => "melodic_minor",
            ScaleFamily::HarmonicMinor => "harmonic_minor",
            ScaleFamily::HarmonicMajor => "harmonic_major",
            ScaleFamily::Pentatonic => "pentatonic",
        }
    }

    pub fn from_id(id: &str) -> Option<ScaleFamily> {
        ScaleFamily::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Semitone intervals of the parent (first) mode.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ScaleFamily::Diatonic => &[0, 2, 4, 5, 7, 9, 11],
            ScaleFamily::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            ScaleFamily::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleFamily::HarmonicMajor => &[0, 2, 4, 5, 7, 8, 11],
            ScaleFamily::Pentatonic => &[0, 2, 4, 7, 9],
        }
    }

    pub fn mode_names(&self) -> &'static [&'static str] {
        match self {
            ScaleFamily::Diatonic => &[
                "Ionian",
                "Dorian",
                "Phrygian",
                "Lydian",
                "Mixolydian",
                "Aeolian",
                "Locrian",
            ],
            ScaleFamily::MelodicMinor => &[
                "Melodic Minor",
                "Dorian b2",
                "Lydian Augmented",
                "Lydian Dominant",
                "Mixolydian b6",
                "Locrian #2",
                "Altered",
            ],
            ScaleFamily::HarmonicMinor => &[
                "Harmonic Minor",
                "Locrian #6",
                "Ionian #5",
                "Dorian #4",
                "Phrygian Dominant",
                "Lydian #2",
                "Altered Diminished",
            ],
            ScaleFamily::HarmonicMajor => &[
                "Harmonic Major",
                "Dorian b5",
                "Phrygian b4",
                "Lydian b3",
                "Mixolydian b2",
                "Lydian Augmented #2",
                "Locrian bb7",
            ],
            ScaleFamily::Pentatonic => &[
                "Major Pentatonic",
                "Suspended Pentatonic",
                "Blues Minor Pentatonic",
                "Blues Major Pentatonic",
                "Minor Pentatonic",
            ],
        }
    }

    pub fn mode_count(&self) -> usize {
        self.intervals().len()
    }

    /// Intervals of mode `mode` measured from that mode's own root.
    pub fn mode_intervals(&self, mode: usize) -> Vec<u8> {
        let parent = self.intervals();
        let offset = parent[mode % parent.len()];
        let mut out: Vec<u8> = parent.iter().map(|&i| (i + 12 - offset) % 12).collect();
        out.sort_unstable();
        out
    }

    /// Preference rank; lower sorts first.
    pub fn rank(&self) -> usize {
        ScaleFamily::ALL
            .iter()
            .position(|f| f == self)
            .unwrap_or(ScaleFamily::ALL.len())
    }
}

/// The seven church modes of the diatonic collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiatonicMode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl DiatonicMode {
    pub const ALL: [DiatonicMode; 7] = [
        DiatonicMode::Ionian,
        DiatonicMode::Dorian,
        DiatonicMode::Phrygian,
        DiatonicMode::Lydian,
        DiatonicMode::Mixolydian,
        DiatonicMode::Aeolian,
        DiatonicMode::Locrian,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<DiatonicMode> {
        DiatonicMode::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        ScaleFamily::Diatonic.mode_names()[self.index()]
    }

    /// Seven ascending intervals from the mode's tonic.
    pub fn intervals(&self) -> [u8; 7] {
        let v = ScaleFamily::Diatonic.mode_intervals(self.index());
        let mut out = [0u8; 7];
        out.copy_from_slice(&v);
        out
    }

    /// True for modes whose third degree is a major third.
    pub fn is_major(&self) -> bool {
        self.intervals()[2] == 4
    }

    /// Accepts mode names and the usual major/minor aliases, case-insensitively.
    pub fn from_name(name: &str) -> Option<DiatonicMode> {
        match name.to_ascii_lowercase().as_str() {
            "major" | "maj" | "ionian" => Some(DiatonicMode::Ionian),
            "minor" | "min" | "aeolian" => Some(DiatonicMode::Aeolian),
            "dorian" => Some(DiatonicMode::Dorian),
            "phrygian" => Some(DiatonicMode::Phrygian),
            "lydian" => Some(DiatonicMode::Lydian),
            "mixolydian" => Some(DiatonicMode::Mixolydian),
            "locrian" => Some(DiatonicMode::Locrian),
            _ => None,
        }
    }
}

/// A tonic plus the diatonic mode built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCenter {
    pub tonic: PitchClass,
    pub mode: DiatonicMode,
}

impl KeyCenter {
    pub fn new(tonic: PitchClass, mode: DiatonicMode) -> Self {
        Self { tonic, mode }
    }

    pub fn major(tonic: PitchClass) -> Self {
        Self::new(tonic, DiatonicMode::Ionian)
    }

    pub fn minor(tonic: PitchClass) -> Self {
        Self::new(tonic, DiatonicMode::Aeolian)
    }

    /// Intervals of the key's scale from its tonic.
    pub fn intervals(&self) -> [u8; 7] {
        self.mode.intervals()
    }

    pub fn scale(&self) -> PitchClassSet {
        self.intervals()
            .iter()
            .map(|&i| self.tonic.transpose(i as i32))
            .collect()
    }

    /// Tonic of the Ionian collection this key belongs to.
    pub fn parent_tonic(&self) -> PitchClass {
        let offset = ScaleFamily::Diatonic.intervals()[self.mode.index()];
        self.tonic.transpose(-(offset as i32))
    }

    pub fn spelling(&self) -> Spelling {
        Spelling::for_major_tonic(self.parent_tonic())
    }

    pub fn name(&self, spelling: Spelling) -> String {
        let mode = match self.mode {
            DiatonicMode::Ionian => "major",
            DiatonicMode::Aeolian => "minor",
            other => other.name(),
        };
        format!("{} {}", self.tonic.name(spelling), mode)
    }
}

impl std::fmt::Display for KeyCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name(self.spelling()))
    }
}

/// One row of the scale table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTableEntry {
    pub table_id: ScaleFamily,
    /// Pitch class of the family's first-mode tonic.
    pub parent_key_index: u8,
    pub mode_index: u8,
    pub root_pitch: PitchClass,
    pub pitch_classes: PitchClassSet,
    pub common_name: String,
}

impl ScaleTableEntry {
    pub fn mode_name(&self) -> &'static str {
        self.table_id.mode_names()[self.mode_index as usize]
    }

    /// `"C major"` for any diatonic mode of the C collection, otherwise the
    /// family's first mode on the parent tonic.
    pub fn parent_name(&self) -> String {
        let parent = PitchClass::new(self.parent_key_index as i32);
        let spelling = Spelling::for_major_tonic(parent);
        match self.table_id {
            ScaleFamily::Diatonic => format!("{} major", parent.name(spelling)),
            family => format!("{} {}", parent.name(spelling), family.mode_names()[0]),
        }
    }
}

/// Every family, mode and parent key.
#[derive(Debug, Clone)]
pub struct ScaleTable {
    entries: Vec<ScaleTableEntry>,
}

static SCALE_TABLE: LazyLock<ScaleTable> = LazyLock::new(ScaleTable::build);

impl ScaleTable {
    pub fn build() -> Self {
        let mut entries = Vec::new();
        for family in ScaleFamily::ALL {
            let parent_intervals = family.intervals();
            for parent in PitchClass::ALL {
                let pitch_classes: PitchClassSet = parent_intervals
                    .iter()
                    .map(|&i| parent.transpose(i as i32))
                    .collect();
                let spelling = match family {
                    ScaleFamily::Diatonic => Spelling::for_major_tonic(parent),
                    _ => Spelling::Mixed,
                };
                for (mode_index, &offset) in parent_intervals.iter().enumerate() {
                    let root = parent.transpose(offset as i32);
                    entries.push(ScaleTableEntry {
                        table_id: family,
                        parent_key_index: parent.get(),
                        mode_index: mode_index as u8,
                        root_pitch: root,
                        pitch_classes,
                        common_name: format!(
                            "{} {}",
                            root.name(spelling),
                            family.mode_names()[mode_index]
                        ),
                    });
                }
            }
        }
        Self { entries }
    }

    /// Process-wide table, built on first access.
    pub fn global() -> &'static ScaleTable {
        &SCALE_TABLE
    }

    pub fn entries(&self) -> &[ScaleTableEntry] {
        &self.entries
    }

    pub fn family(&self, family: ScaleFamily) -> impl Iterator<Item = &ScaleTableEntry> {
        self.entries.iter().filter(move |e| e.table_id == family)
    }

    /// Entry for a specific mode on a specific root.
    pub fn find(
        &self,
        family: ScaleFamily,
        mode_index: usize,
        root: PitchClass,
    ) -> Option<&ScaleTableEntry> {
        self.family(family)
            .find(|e| e.mode_index as usize == mode_index && e.root_pitch == root)
    }
}
