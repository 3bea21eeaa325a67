//! Order-independent collection of pitch classes, stored as a 12-bit mask.

use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", from = "Vec<u8>")]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Set from raw values; each is reduced modulo 12.
    pub fn from_values(values: &[u8]) -> Self {
        values.iter().map(|&v| PitchClass::new(v as i32)).collect()
    }

    /// Set of pitch classes sounding in a list of MIDI notes.
    pub fn from_midi(notes: &[u8]) -> Self {
        notes.iter().map(|&n| PitchClass::from_midi(n)).collect()
    }

    pub fn mask(self) -> u16 {
        self.0
    }

    pub fn insert(&mut self, pc: PitchClass) {
        self.0 |= 1 << pc.get();
    }

    pub fn remove(&mut self, pc: PitchClass) {
        self.0 &= !(1 << pc.get());
    }

    pub fn contains(self, pc: PitchClass) -> bool {
        self.0 & (1 << pc.get()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_subset_of(self, other: PitchClassSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn union(self, other: PitchClassSet) -> Self {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: PitchClassSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn transpose(self, semitones: i32) -> Self {
        self.iter().map(|pc| pc.transpose(semitones)).collect()
    }

    /// Ascending pitch classes.
    pub fn iter(self) -> impl Iterator<Item = PitchClass> {
        PitchClass::ALL.into_iter().filter(move |pc| self.contains(*pc))
    }
}

impl FromIterator<PitchClass> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        let mut set = PitchClassSet::new();
        for pc in iter {
            set.insert(pc);
        }
        set
    }
}

impl From<PitchClassSet> for Vec<u8> {
    fn from(set: PitchClassSet) -> Self {
        set.iter().map(PitchClass::get).collect()
    }
}

impl From<Vec<u8>> for PitchClassSet {
    fn from(values: Vec<u8>) -> Self {
        PitchClassSet::from_values(&values)
    }
}

impl std::fmt::Display for PitchClassSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .iter()
            .map(|pc| pc.name(crate::Spelling::Mixed))
            .collect();
        write!(f, "{{{}}}", names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_order_and_duplicates() {
        let a = PitchClassSet::from_values(&[0, 4, 7]);
        let b = PitchClassSet::from_values(&[7, 0, 4, 12]);
        assert_eq!(a, b);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn transpose_wraps() {
        let c_major = PitchClassSet::from_values(&[0, 4, 7]);
        let a_major = c_major.transpose(9);
        assert_eq!(a_major, PitchClassSet::from_values(&[9, 1, 4]));
    }

    #[test]
    fn subset_and_difference() {
        let scale = PitchClassSet::from_values(&[0, 2, 4, 5, 7, 9, 11]);
        let triad = PitchClassSet::from_values(&[2, 5, 9]);
        assert!(triad.is_subset_of(scale));
        assert!(!scale.is_subset_of(triad));
        assert_eq!(scale.difference(triad).len(), 4);
    }

    #[test]
    fn serializes_as_sorted_list() {
        let set = PitchClassSet::from_values(&[7, 0, 4]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[0,4,7]");
        let back: PitchClassSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn display_lists_names() {
        let set = PitchClassSet::from_values(&[10, 2, 5]);
        assert_eq!(set.to_string(), "{D F Bb}");
    }
}
