//! Command-line parsing. Flags may appear anywhere; the first bare word is
//! the command.

use modus_core::ParseError;
use modus_types::PitchClass;

pub const USAGE: &str = "\
usage: modus [--json] [-v|--verbose] <command> [args]

commands:
  analyze \"<progression>\" [--key \"<key>\"]   numerals, functions, modal and chromatic reading
  scales <note>...                           scales whose pitch collection equals the notes
  chord <midi>...                            name the chord formed by MIDI notes
  key <midi>... [--key \"<key>\"]              estimate the key of MIDI notes, optionally vs a key
  help                                       show this message

notes are names (C, F#, Bb) or MIDI numbers (60 = middle C)
measures in a progression are separated by '|'";

/// A note argument: a bare name or a MIDI number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteArg {
    Name(PitchClass),
    Midi(u8),
}

impl NoteArg {
    pub fn pitch_class(self) -> PitchClass {
        match self {
            NoteArg::Name(pc) => pc,
            NoteArg::Midi(n) => PitchClass::from_midi(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze {
        progression: String,
        key: Option<String>,
    },
    Scales {
        notes: Vec<NoteArg>,
    },
    Chord {
        notes: Vec<u8>,
    },
    Key {
        notes: Vec<u8>,
        against: Option<String>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub json: bool,
    pub verbose: bool,
}

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    UnknownCommand(String),
    Parse(ParseError),
    Json(serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnknownCommand(_) => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "{}", msg),
            Self::UnknownCommand(cmd) => write!(f, "unknown command '{}'", cmd),
            Self::Parse(e) => write!(f, "{}", e),
            Self::Json(e) => write!(f, "could not encode JSON: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

fn parse_midi(arg: &str) -> Result<u8, CliError> {
    arg.parse::<u8>()
        .ok()
        .filter(|n| *n <= 127)
        .ok_or_else(|| CliError::Usage(format!("'{}' is not a MIDI note (0-127)", arg)))
}

fn parse_note(arg: &str) -> Result<NoteArg, CliError> {
    if arg.chars().all(|c| c.is_ascii_digit()) {
        return parse_midi(arg).map(NoteArg::Midi);
    }
    PitchClass::from_name(arg)
        .map(NoteArg::Name)
        .ok_or_else(|| CliError::Usage(format!("'{}' is not a note name", arg)))
}

fn require_notes<T>(notes: Vec<T>, command: &str) -> Result<Vec<T>, CliError> {
    if notes.is_empty() {
        return Err(CliError::Usage(format!("{} needs at least one note", command)));
    }
    Ok(notes)
}

/// Parse everything after the program name.
pub fn parse_args(args: &[String]) -> Result<Invocation, CliError> {
    let mut json = false;
    let mut verbose = false;
    let mut help = false;
    let mut key: Option<String> = None;
    let mut words: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => help = true,
            "-k" | "--key" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--key needs a value".into()))?;
                key = Some(value.clone());
            }
            other => words.push(other),
        }
    }

    let command = match words.split_first() {
        _ if help => Command::Help,
        None => Command::Help,
        Some((&"help", _)) => Command::Help,
        Some((&"analyze", rest)) => {
            if rest.is_empty() {
                return Err(CliError::Usage("analyze needs a progression".into()));
            }
            Command::Analyze {
                progression: rest.join(" "),
                key,
            }
        }
        Some((&"scales", rest)) => Command::Scales {
            notes: require_notes(
                rest.iter().map(|a| parse_note(a)).collect::<Result<_, _>>()?,
                "scales",
            )?,
        },
        Some((&"chord", rest)) => Command::Chord {
            notes: require_notes(
                rest.iter().map(|a| parse_midi(a)).collect::<Result<_, _>>()?,
                "chord",
            )?,
        },
        Some((&"key", rest)) => Command::Key {
            notes: require_notes(
                rest.iter().map(|a| parse_midi(a)).collect::<Result<_, _>>()?,
                "key",
            )?,
            against: key,
        },
        Some((other, _)) => return Err(CliError::UnknownCommand(other.to_string())),
    };

    Ok(Invocation {
        command,
        json,
        verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn analyze_with_key() {
        let inv = parse_args(&args(&["analyze", "Am F C G", "--key", "C major"])).unwrap();
        assert_eq!(
            inv.command,
            Command::Analyze {
                progression: "Am F C G".into(),
                key: Some("C major".into()),
            }
        );
        assert!(!inv.json);
    }

    #[test]
    fn unquoted_progression_is_joined() {
        let inv = parse_args(&args(&["analyze", "Am", "F", "|", "C", "G"])).unwrap();
        assert_eq!(
            inv.command,
            Command::Analyze {
                progression: "Am F | C G".into(),
                key: None,
            }
        );
    }

    #[test]
    fn flags_anywhere() {
        let inv = parse_args(&args(&["-v", "chord", "60", "--json", "64", "67"])).unwrap();
        assert!(inv.json);
        assert!(inv.verbose);
        assert_eq!(inv.command, Command::Chord { notes: vec![60, 64, 67] });
    }

    #[test]
    fn scales_accept_names_and_numbers() {
        let inv = parse_args(&args(&["scales", "C", "Eb", "62"])).unwrap();
        assert_eq!(
            inv.command,
            Command::Scales {
                notes: vec![
                    NoteArg::Name(PitchClass::C),
                    NoteArg::Name(PitchClass::new(3)),
                    NoteArg::Midi(62),
                ]
            }
        );
    }

    #[test]
    fn key_against_global() {
        let inv = parse_args(&args(&["key", "60", "62", "--key", "G"])).unwrap();
        assert_eq!(
            inv.command,
            Command::Key {
                notes: vec![60, 62],
                against: Some("G".into()),
            }
        );
    }

    #[test]
    fn help_variants() {
        assert_eq!(parse_args(&[]).unwrap().command, Command::Help);
        assert_eq!(parse_args(&args(&["help"])).unwrap().command, Command::Help);
        assert_eq!(
            parse_args(&args(&["analyze", "C", "--help"])).unwrap().command,
            Command::Help
        );
    }

    #[test]
    fn usage_errors_exit_one() {
        for bad in [
            vec!["analyze"],
            vec!["chord", "C"],
            vec!["chord", "200"],
            vec!["scales", "H"],
            vec!["key"],
            vec!["analyze", "C", "--key"],
        ] {
            let err = parse_args(&args(&bad)).unwrap_err();
            assert_eq!(err.exit_code(), 1, "{:?}", bad);
        }
    }

    #[test]
    fn unknown_command_exits_two() {
        let err = parse_args(&args(&["transpose", "C"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "unknown command 'transpose'");
    }
}
