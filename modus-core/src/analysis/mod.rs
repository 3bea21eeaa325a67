//! The analysis pipeline: parse, match, classify, then the modal and
//! chromatic passes. Every call builds a fresh [`AnalysisResult`].

pub mod chromatic;
pub mod classifier;
pub mod identify;
pub mod matcher;
pub mod modal;
pub(crate) mod numeral;
pub mod parser;
pub mod profile;

use modus_types::{AnalysisOptions, AnalysisResult, Chord, KeySource};

use chromatic::annotate_chromatic;
use classifier::{classify, infer_key};
use matcher::match_scales_in;
use modal::detect_modal;
use parser::{parse_key, parse_progression, ParseError};

/// Penalty per major key that tied with the inferred one.
const AMBIGUITY_PENALTY: f64 = 0.1;

/// Analyze a progression with default options.
///
/// `known_key` overrides key inference when given (`"C major"`, `"Am"`, ...).
pub fn analyze(text: &str, known_key: Option<&str>) -> Result<AnalysisResult, ParseError> {
    analyze_with(text, known_key, &AnalysisOptions::default())
}

pub fn analyze_with(
    text: &str,
    known_key: Option<&str>,
    options: &AnalysisOptions,
) -> Result<AnalysisResult, ParseError> {
    let supplied = known_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(parse_key)
        .transpose()?;
    let progression = parse_progression(text)?;
    if progression.is_empty() {
        return Ok(AnalysisResult::empty(supplied));
    }
    let chords = progression.chords();

    let collection = progression.pitch_classes();
    let collection_matches: Vec<String> = match_scales_in(
        collection,
        chords.first().map(Chord::lowest),
        &options.scale_families,
    )
    .into_iter()
    .map(|e| e.common_name)
    .collect();

    let (key, key_source, key_alternatives) = match supplied {
        Some(key) => (key, KeySource::Supplied, Vec::new()),
        None => match infer_key(chords) {
            Some(inference) => (inference.key, KeySource::Inferred, inference.alternatives),
            None => return Ok(AnalysisResult::empty(None)),
        },
    };

    let classification = classify(chords, &key);
    let confidence = classification.diatonic_share()
        - AMBIGUITY_PENALTY * key_alternatives.len() as f64;
    let confidence = (confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0;

    let modal_enhancement = if options.modal_enhancement {
        detect_modal(&progression, &key)
    } else {
        None
    };

    let spelling = options.accidentals.resolve(key.spelling());
    let chromatic_elements = if options.chromatic_annotation {
        annotate_chromatic(chords, &key, spelling)
    } else {
        Vec::new()
    };

    let key_name = key.name(spelling);
    let diatonic_count = classification.diatonic.iter().filter(|d| **d).count();
    let mut explanation = format!(
        "{} ({}): {}. {} of {} chords are diatonic.",
        key_name,
        match key_source {
            KeySource::Supplied => "supplied",
            KeySource::Inferred => "inferred",
        },
        classification.roman_numerals.join(" "),
        diatonic_count,
        chords.len()
    );
    if !key_alternatives.is_empty() {
        let names: Vec<String> = key_alternatives.iter().map(|k| k.name(spelling)).collect();
        explanation.push_str(&format!(" Equally consistent with {}.", names.join(", ")));
    }
    if let Some(modal) = &modal_enhancement {
        explanation.push_str(&format!(" Modal reading: {}", modal.explanation));
    }
    if !chromatic_elements.is_empty() {
        let labels: Vec<String> = chromatic_elements
            .iter()
            .map(|e| format!("{} as {}", e.symbol, e.label))
            .collect();
        explanation.push_str(&format!(" Chromatic: {}.", labels.join(", ")));
    }

    log::debug!(target: "analysis", "{}", explanation);

    Ok(AnalysisResult {
        chords: chords.to_vec(),
        chord_symbols: chords.iter().map(|c| c.symbol(spelling)).collect(),
        key_center: Some(key),
        key_name: Some(key_name),
        key_source: Some(key_source),
        key_alternatives,
        roman_numerals: classification.roman_numerals,
        functions: classification.functions,
        collection_matches,
        modal_enhancement,
        chromatic_elements,
        confidence,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modus_types::{AccidentalPreference, HarmonicFunction, KeyCenter, PitchClass, ScaleFamily};

    #[test]
    fn supplied_key_is_used() {
        let r = analyze("Am F C G", Some("C major")).unwrap();
        assert_eq!(r.key_center, Some(KeyCenter::major(PitchClass::C)));
        assert_eq!(r.key_source, Some(KeySource::Supplied));
        assert_eq!(r.roman_numerals, vec!["vi", "IV", "I", "V"]);
        assert_eq!(r.confidence, 1.0);
        assert!(r.modal_enhancement.is_none());
        assert!(r.chromatic_elements.is_empty());
    }

    #[test]
    fn inferred_key_reports_source() {
        let r = analyze("C F G C", None).unwrap();
        assert_eq!(r.key_source, Some(KeySource::Inferred));
        assert_eq!(r.key_name.as_deref(), Some("C major"));
        assert!(r.explanation.starts_with("C major (inferred): I IV V I."));
    }

    #[test]
    fn tied_keys_lower_confidence() {
        let r = analyze("Em Am Em", None).unwrap();
        assert!(!r.key_alternatives.is_empty());
        assert!(r.confidence < 1.0);
        assert!(r.explanation.contains("Equally consistent with"));
    }

    #[test]
    fn blank_key_string_means_infer() {
        let r = analyze("G C D G", Some("  ")).unwrap();
        assert_eq!(r.key_source, Some(KeySource::Inferred));
        assert_eq!(r.key_center, Some(KeyCenter::major(PitchClass::G)));
    }

    #[test]
    fn bad_key_is_an_error() {
        assert_eq!(
            analyze("C G", Some("Q major")),
            Err(ParseError::InvalidKey("Q major".into()))
        );
    }

    #[test]
    fn options_switch_off_passes() {
        let opts = AnalysisOptions {
            modal_enhancement: false,
            chromatic_annotation: false,
            ..AnalysisOptions::default()
        };
        let r = analyze_with("G F C G", Some("C"), &opts).unwrap();
        assert!(r.modal_enhancement.is_none());
        assert!(r.chromatic_elements.is_empty());

        let r = analyze_with("C Bb F C", Some("C"), &opts).unwrap();
        assert!(r.chromatic_elements.is_empty());
        assert_eq!(r.functions[1], HarmonicFunction::Chromatic);
    }

    #[test]
    fn collection_matches_follow_family_option() {
        let text = "C Dm Em F G Am Bdim";
        let r = analyze(text, None).unwrap();
        assert_eq!(r.collection_matches.len(), 7);
        assert_eq!(r.collection_matches[0], "C Ionian");

        let opts = AnalysisOptions {
            scale_families: vec![ScaleFamily::Pentatonic],
            ..AnalysisOptions::default()
        };
        assert!(analyze_with(text, None, &opts).unwrap().collection_matches.is_empty());
    }

    #[test]
    fn accidental_preference_spells_symbols() {
        let opts = AnalysisOptions {
            accidentals: AccidentalPreference::Sharps,
            ..AnalysisOptions::default()
        };
        let r = analyze_with("Bb Eb F Bb", None, &opts).unwrap();
        assert_eq!(r.chord_symbols, vec!["A#", "D#", "F", "A#"]);
        assert_eq!(r.key_name.as_deref(), Some("A# major"));

        let r = analyze("Bb Eb F Bb", None).unwrap();
        assert_eq!(r.chord_symbols, vec!["Bb", "Eb", "F", "Bb"]);
    }
}
