mod args;
mod render;

use std::process::ExitCode;

use modus_core::analysis::identify::identify_chord;
use modus_core::analysis::matcher::match_scales_in;
use modus_core::analysis::parser::parse_key;
use modus_core::analysis::profile::{
    classify_region, detect_cadence, mode_scores, rank_keys, PitchClassProfile,
};
use modus_core::analyze_with;
use modus_core::config::{Config, OutputFormat};
use modus_types::{AnalysisOptions, PitchClassSet, Spelling};

use args::{parse_args, CliError, Command, NoteArg, USAGE};
use render::KeyReport;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Error)
        .build();

    if TermLogger::init(log_level, config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("modus: logger already initialized");
    }

    log::debug!("modus starting (log level: {:?})", log_level);
}

/// Pretty JSON or the text form, per the flag and config.
fn emit<T: serde::Serialize>(json: bool, value: &T, text: String) -> Result<String, CliError> {
    if json {
        Ok(serde_json::to_string_pretty(value)? + "\n")
    } else {
        Ok(text)
    }
}

fn run(command: Command, options: &AnalysisOptions, json: bool) -> Result<String, CliError> {
    match command {
        Command::Help => Ok(format!("{}\n", USAGE)),

        Command::Analyze { progression, key } => {
            let result = analyze_with(&progression, key.as_deref(), options)?;
            emit(json, &result, render::render_analysis(&result))
        }

        Command::Scales { notes } => {
            let set: PitchClassSet = notes.iter().map(|n| n.pitch_class()).collect();
            let lowest = if notes.iter().all(|n| matches!(n, NoteArg::Midi(_))) {
                notes.iter().min_by_key(|n| match n {
                    NoteArg::Midi(m) => *m,
                    NoteArg::Name(_) => u8::MAX,
                })
            } else {
                notes.first()
            }
            .map(|n| n.pitch_class());
            let entries = match_scales_in(set, lowest, &options.scale_families);
            emit(json, &entries, render::render_scales(set, &entries))
        }

        Command::Chord { notes } => {
            let chord = identify_chord(&notes);
            let spelling = options.accidentals.resolve(Spelling::Mixed);
            emit(json, &chord, render::render_chord(&notes, chord.as_ref(), spelling))
        }

        Command::Key { notes, against } => {
            let global = against.as_deref().map(parse_key).transpose()?;
            let profile = PitchClassProfile::from_midi(&notes);
            let ranked = rank_keys(&profile);
            let report = ranked.first().copied().map(|estimate| {
                let cadence = detect_cadence(&profile, &estimate.key);
                KeyReport {
                    estimate,
                    alternatives: ranked.iter().skip(1).take(3).copied().collect(),
                    mode_scores: mode_scores(&profile, estimate.key.tonic),
                    cadence,
                    region: global.map(|g| {
                        classify_region(&g, &estimate.key, estimate.confidence, &cadence)
                    }),
                }
            });
            emit(json, &report, render::render_key(report.as_ref()))
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let invocation = match parse_args(&args) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("modus: {}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(e.exit_code() as u8);
        }
    };
    init_logging(invocation.verbose);

    let config = Config::load();
    let json = invocation.json || config.output_format() == OutputFormat::Json;

    match run(invocation.command, &config.analysis_options(), json) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("modus: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_default(command: Command, json: bool) -> Result<String, CliError> {
        run(command, &AnalysisOptions::default(), json)
    }

    #[test]
    fn analyze_text_output() {
        let out = run_default(
            Command::Analyze {
                progression: "Am F C G".into(),
                key: Some("C".into()),
            },
            false,
        )
        .unwrap();
        assert!(out.contains("vi IV I V"));
    }

    #[test]
    fn analyze_json_output() {
        let out = run_default(
            Command::Analyze {
                progression: "G F C G".into(),
                key: Some("C major".into()),
            },
            true,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["modal_enhancement"]["mode_name"], "G Mixolydian");
        assert_eq!(value["roman_numerals"][1], "IV");
    }

    #[test]
    fn analyze_parse_error_exits_one() {
        let err = run_default(
            Command::Analyze {
                progression: "C Q7".into(),
                key: None,
            },
            false,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Q7"));
    }

    #[test]
    fn scales_use_lowest_midi_note() {
        let notes = [62u8, 64, 65, 67, 69, 71, 72]
            .iter()
            .map(|&n| NoteArg::Midi(n))
            .collect();
        let out = run_default(Command::Scales { notes }, false).unwrap();
        let first = out.lines().nth(1).unwrap();
        assert!(first.trim_start().starts_with("D Dorian"), "{}", out);
    }

    #[test]
    fn chord_json_is_null_when_unrecognized() {
        let out = run_default(Command::Chord { notes: vec![60] }, true).unwrap();
        assert_eq!(out.trim(), "null");
    }

    #[test]
    fn key_with_region() {
        let out = run_default(
            Command::Key {
                notes: vec![60, 62, 64, 65, 67, 69, 71],
                against: Some("C major".into()),
            },
            false,
        )
        .unwrap();
        assert!(out.starts_with("Key: C major"));
        assert!(out.contains("Region: stable"));
    }

    #[test]
    fn key_with_bad_global_key() {
        let err = run_default(
            Command::Key {
                notes: vec![60],
                against: Some("X lydian".into()),
            },
            false,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
