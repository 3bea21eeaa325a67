//! Result types produced by the harmony analysis pipeline.

use serde::{Deserialize, Serialize};

use crate::chord::Chord;
use crate::pitch::PitchClass;
use crate::scale::{DiatonicMode, KeyCenter, ScaleFamily};

/// Role of a chord relative to the key center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonicFunction {
    Tonic,
    Predominant,
    Dominant,
    /// Not diatonic to the key; see the chromatic annotations.
    Chromatic,
}

impl HarmonicFunction {
    pub fn name(&self) -> &'static str {
        match self {
            HarmonicFunction::Tonic => "tonic",
            HarmonicFunction::Predominant => "predominant",
            HarmonicFunction::Dominant => "dominant",
            HarmonicFunction::Chromatic => "chromatic",
        }
    }

    /// Function of a diatonic chord on scale degree `degree` (0-based).
    pub fn for_degree(degree: usize) -> HarmonicFunction {
        match degree {
            0 | 2 | 5 => HarmonicFunction::Tonic,
            1 | 3 => HarmonicFunction::Predominant,
            _ => HarmonicFunction::Dominant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    Supplied,
    Inferred,
}

/// One characteristic modal motion found in the progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalSignature {
    /// Motion label such as `"bVII–I"`.
    pub motion: String,
    /// Index of the signature chord in the progression.
    pub chord_index: usize,
    /// The signature chord moves straight to the modal tonic.
    pub resolves_directly: bool,
    pub description: String,
}

/// Secondary, modal reading of a progression. Sits beside the functional one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalEnhancement {
    pub tonic: PitchClass,
    pub family: ScaleFamily,
    pub mode_index: u8,
    /// e.g. `"G Mixolydian"`.
    pub mode_name: String,
    /// Parent collection, e.g. `"C major"`.
    pub parent_key: String,
    /// Numerals relative to the modal tonic, major-scale reference.
    pub roman_numerals: Vec<String>,
    pub signatures: Vec<ModalSignature>,
    /// Every chord tone lies inside the mode's scale.
    pub contains_all_tones: bool,
    pub confidence: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChromaticKind {
    SecondaryDominant { target: PitchClass },
    SecondaryLeadingTone { target: PitchClass },
    Borrowed { source: DiatonicMode },
    Unclassified,
}

/// Annotation on a chord that falls outside the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromaticElement {
    pub chord_index: usize,
    pub symbol: String,
    #[serde(flatten)]
    pub kind: ChromaticKind,
    /// Label such as `"V/V"` or `"bVII"`.
    pub label: String,
    /// The next chord is the expected resolution.
    pub resolves: bool,
    pub explanation: String,
}

/// Everything one `analyze` call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub chords: Vec<Chord>,
    pub chord_symbols: Vec<String>,
    pub key_center: Option<KeyCenter>,
    pub key_name: Option<String>,
    pub key_source: Option<KeySource>,
    /// Keys that tied with the inferred one.
    pub key_alternatives: Vec<KeyCenter>,
    pub roman_numerals: Vec<String>,
    pub functions: Vec<HarmonicFunction>,
    /// Scales whose collection equals the progression's pitch classes.
    pub collection_matches: Vec<String>,
    pub modal_enhancement: Option<ModalEnhancement>,
    pub chromatic_elements: Vec<ChromaticElement>,
    pub confidence: f64,
    pub explanation: String,
}

impl AnalysisResult {
    /// No-op result for an empty progression.
    pub fn empty(key_center: Option<KeyCenter>) -> Self {
        Self {
            chords: Vec::new(),
            chord_symbols: Vec::new(),
            key_center,
            key_name: key_center.map(|k| k.to_string()),
            key_source: key_center.map(|_| KeySource::Supplied),
            key_alternatives: Vec::new(),
            roman_numerals: Vec::new(),
            functions: Vec::new(),
            collection_matches: Vec::new(),
            modal_enhancement: None,
            chromatic_elements: Vec::new(),
            confidence: 0.0,
            explanation: "No chords to analyze.".to_string(),
        }
    }
}
