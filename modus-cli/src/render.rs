//! Plain-text rendering of engine results.

use serde::Serialize;

use modus_core::analysis::profile::{Cadence, KeyEstimate, ModeScore, RegionClassification};
use modus_types::{
    AnalysisResult, Chord, HarmonicFunction, KeySource, PitchClassSet, ScaleTableEntry, Spelling,
};

/// Everything the `key` command reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyReport {
    pub estimate: KeyEstimate,
    /// Runner-up keys, best first.
    pub alternatives: Vec<KeyEstimate>,
    pub mode_scores: Vec<ModeScore>,
    pub cadence: Cadence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionClassification>,
}

fn function_abbrev(f: HarmonicFunction) -> &'static str {
    match f {
        HarmonicFunction::Tonic => "T",
        HarmonicFunction::Predominant => "PD",
        HarmonicFunction::Dominant => "D",
        HarmonicFunction::Chromatic => "chr",
    }
}

/// Rows of cells padded so columns line up.
fn columns(rows: &[(&str, Vec<String>)]) -> String {
    let cells = rows.iter().map(|(_, r)| r.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cells)
        .map(|i| {
            rows.iter()
                .filter_map(|(_, r)| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, row) in rows {
        let mut line = format!("{:<w$}", label, w = label_width + 1);
        for (i, cell) in row.iter().enumerate() {
            line.push_str(&format!(" {:<w$}", cell, w = widths[i]));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_analysis(result: &AnalysisResult) -> String {
    if result.chords.is_empty() {
        return format!("{}\n", result.explanation);
    }

    let mut out = String::new();
    if let (Some(name), Some(source)) = (&result.key_name, &result.key_source) {
        let source = match source {
            KeySource::Supplied => "supplied",
            KeySource::Inferred => "inferred",
        };
        out.push_str(&format!("Key: {} ({})\n", name, source));
    }
    out.push('\n');
    out.push_str(&columns(&[
        ("Chords", result.chord_symbols.clone()),
        ("Numerals", result.roman_numerals.clone()),
        (
            "Function",
            result
                .functions
                .iter()
                .map(|f| function_abbrev(*f).to_string())
                .collect(),
        ),
    ]));
    out.push('\n');
    out.push_str(&format!("Confidence: {:.2}\n", result.confidence));

    if let Some(modal) = &result.modal_enhancement {
        out.push_str(&format!(
            "\nModal: {} (parent {}), confidence {:.2}\n",
            modal.mode_name, modal.parent_key, modal.confidence
        ));
        out.push_str(&format!("  numerals: {}\n", modal.roman_numerals.join(" ")));
        for sig in &modal.signatures {
            out.push_str(&format!(
                "  {} at chord {}: {}{}\n",
                sig.motion,
                sig.chord_index + 1,
                sig.description,
                if sig.resolves_directly { " (direct)" } else { "" }
            ));
        }
        if !modal.contains_all_tones {
            out.push_str("  some chord tones lie outside the mode\n");
        }
    }

    if !result.chromatic_elements.is_empty() {
        out.push_str("\nChromatic:\n");
        for el in &result.chromatic_elements {
            out.push_str(&format!(
                "  {} {:<8} {}\n",
                el.chord_index + 1,
                el.label,
                el.explanation
            ));
        }
    }

    if !result.collection_matches.is_empty() {
        out.push_str(&format!(
            "\nCollection: {}\n",
            result.collection_matches.join(", ")
        ));
    }
    if !result.key_alternatives.is_empty() {
        let names: Vec<String> = result.key_alternatives.iter().map(|k| k.to_string()).collect();
        out.push_str(&format!("Also consistent with: {}\n", names.join(", ")));
    }
    out
}

pub fn render_scales(set: PitchClassSet, entries: &[ScaleTableEntry]) -> String {
    if entries.is_empty() {
        return format!("{}: no matching scale\n", set);
    }
    let mut out = format!("{}: {} match(es)\n", set, entries.len());
    for entry in entries {
        out.push_str(&format!(
            "  {:<28} {} (mode {} of {})\n",
            entry.common_name,
            entry.table_id.name(),
            entry.mode_index + 1,
            entry.parent_name()
        ));
    }
    out
}

pub fn render_chord(notes: &[u8], chord: Option<&Chord>, spelling: Spelling) -> String {
    match chord {
        Some(chord) => format!("{}\n", chord.symbol(spelling)),
        None => format!("{:?}: no chord recognized\n", notes),
    }
}

pub fn render_key(report: Option<&KeyReport>) -> String {
    let Some(report) = report else {
        return "No key estimate (silent or flat profile)\n".to_string();
    };
    let mut out = format!(
        "Key: {} (r = {:.3}, confidence {:.2})\n",
        report.estimate.key, report.estimate.correlation, report.estimate.confidence
    );
    if !report.alternatives.is_empty() {
        let alts: Vec<String> = report
            .alternatives
            .iter()
            .map(|e| format!("{} ({:.2})", e.key, e.confidence))
            .collect();
        out.push_str(&format!("Next: {}\n", alts.join(", ")));
    }
    out.push_str(&format!("\nModes on {}:\n", report.estimate.key.tonic));
    for score in &report.mode_scores {
        out.push_str(&format!("  {:<11} {:>5.1}%\n", score.mode.name(), score.share * 100.0));
    }
    if report.cadence.detected {
        out.push_str(&format!(
            "\nCadence: tonic and dominant prominent (strength {:.2})\n",
            report.cadence.strength
        ));
    }
    if let Some(region) = &report.region {
        out.push_str(&format!(
            "\nRegion: {} (confidence {:.2})",
            region.kind.name(),
            region.confidence
        ));
        if !region.borrowed.is_empty() {
            let notes: Vec<String> = region.borrowed.iter().map(|pc| pc.to_string()).collect();
            out.push_str(&format!(", borrowed {}", notes.join(" ")));
        }
        out.push('\n');
    }
    out
}
