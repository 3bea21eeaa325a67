use std::path::{Path, PathBuf};

use serde::Deserialize;

use modus_types::{AccidentalPreference, AnalysisOptions, ScaleFamily};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    analysis: AnalysisConfig,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Deserialize, Default)]
struct AnalysisConfig {
    modal_enhancement: Option<bool>,
    chromatic_annotation: Option<bool>,
    scale_families: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct DisplayConfig {
    accidentals: Option<String>,
    format: Option<String>,
}

/// How the front end prints results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Config {
    analysis: AnalysisConfig,
    display: DisplayConfig,
}

impl Config {
    /// Embedded defaults overlaid with `<config dir>/modus/config.toml`, if present.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::embedded(),
        }
    }

    /// Embedded defaults overlaid with the file at `path`. A missing,
    /// unreadable or malformed file leaves the defaults in place.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::embedded();
        if !path.exists() {
            return config;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => {
                    merge_analysis(&mut config.analysis, user.analysis);
                    merge_display(&mut config.display, user.display);
                    log::debug!(target: "config", "loaded {}", path.display());
                }
                Err(e) => {
                    log::warn!(
                        target: "config",
                        "ignoring malformed config {}: {}",
                        path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
        config
    }

    fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            analysis: base.analysis,
            display: base.display,
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        let fallback = AnalysisOptions::default();
        AnalysisOptions {
            modal_enhancement: self
                .analysis
                .modal_enhancement
                .unwrap_or(fallback.modal_enhancement),
            chromatic_annotation: self
                .analysis
                .chromatic_annotation
                .unwrap_or(fallback.chromatic_annotation),
            scale_families: self
                .analysis
                .scale_families
                .as_deref()
                .map(parse_families)
                .filter(|f| !f.is_empty())
                .unwrap_or(fallback.scale_families),
            accidentals: self
                .display
                .accidentals
                .as_deref()
                .and_then(parse_accidentals)
                .unwrap_or(fallback.accidentals),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.display
            .format
            .as_deref()
            .and_then(parse_format)
            .unwrap_or_default()
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("modus").join("config.toml"))
}

fn merge_analysis(base: &mut AnalysisConfig, user: AnalysisConfig) {
    if user.modal_enhancement.is_some() {
        base.modal_enhancement = user.modal_enhancement;
    }
    if user.chromatic_annotation.is_some() {
        base.chromatic_annotation = user.chromatic_annotation;
    }
    if user.scale_families.is_some() {
        base.scale_families = user.scale_families;
    }
}

fn merge_display(base: &mut DisplayConfig, user: DisplayConfig) {
    if user.accidentals.is_some() {
        base.accidentals = user.accidentals;
    }
    if user.format.is_some() {
        base.format = user.format;
    }
}

/// Known family ids in the order given; unknown and repeated ids are dropped.
fn parse_families(ids: &[String]) -> Vec<ScaleFamily> {
    let mut out = Vec::new();
    for id in ids {
        match ScaleFamily::from_id(&id.to_lowercase()) {
            Some(family) if !out.contains(&family) => out.push(family),
            Some(_) => {}
            None => log::warn!(target: "config", "unknown scale family '{}'", id),
        }
    }
    out
}

fn parse_accidentals(s: &str) -> Option<AccidentalPreference> {
    match s.to_lowercase().as_str() {
        "auto" => Some(AccidentalPreference::Auto),
        "sharps" | "sharp" => Some(AccidentalPreference::Sharps),
        "flats" | "flat" => Some(AccidentalPreference::Flats),
        _ => {
            log::warn!(target: "config", "unknown accidental preference '{}'", s);
            None
        }
    }
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    match s.to_lowercase().as_str() {
        "text" => Some(OutputFormat::Text),
        "json" => Some(OutputFormat::Json),
        _ => {
            log::warn!(target: "config", "unknown output format '{}'", s);
            None
        }
    }
}
