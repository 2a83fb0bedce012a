//! Pick mode (--pick option)
//!
//! Allows external tools to use shelfview as an entity picker.
//! Selected entity id(s) are output to stdout when the user confirms.

use std::io::{self, Write};
use std::str::FromStr;

use crate::key::EntityKind;

/// Exit codes for the application
///
/// These codes are stable and can be relied upon for scripting:
/// - `SUCCESS` (0): Normal exit or entity selected in pick mode
/// - `CANCELLED` (1): User cancelled selection in pick mode (Esc/q)
/// - `ERROR` (2): Runtime error (I/O error, terminal error, etc.)
/// - `INVALID` (3): Invalid command-line arguments or option values
pub mod exit_code {
    /// User selected entit(ies) successfully or normal exit
    pub const SUCCESS: i32 = 0;
    /// User cancelled selection (pick mode only)
    pub const CANCELLED: i32 = 1;
    /// Runtime error occurred
    pub const ERROR: i32 = 2;
    /// Invalid arguments or options (e.g., unknown flag, invalid format)
    pub const INVALID: i32 = 3;
}

/// Which kinds of entities are pickable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PickTarget {
    /// Content blocks only (default)
    #[default]
    Components,
    /// Collections only
    Collections,
    /// Anything in the listing
    All,
}

impl PickTarget {
    /// Whether an entity of this kind can be picked.
    pub fn accepts(&self, kind: EntityKind) -> bool {
        match self {
            PickTarget::Components => kind == EntityKind::Component,
            PickTarget::Collections => kind == EntityKind::Collection,
            PickTarget::All => true,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PickTarget::Components => "components",
            PickTarget::Collections => "collections",
            PickTarget::All => "entities",
        }
    }
}

impl FromStr for PickTarget {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "components" | "component" => Ok(Self::Components),
            "collections" | "collection" => Ok(Self::Collections),
            "all" | "any" => Ok(Self::All),
            _ => Err(()),
        }
    }
}

/// Output format for picked entity ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One id per line (default)
    #[default]
    Lines,
    /// Null-separated ids (for xargs -0)
    NullSeparated,
    /// JSON array
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" | "line" => Ok(Self::Lines),
            "null" | "nul" | "0" => Ok(Self::NullSeparated),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Output selected ids to stdout
pub fn output_ids(ids: &[String], format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_ids(&mut handle, ids, format)?;
    handle.flush()
}

fn write_ids(out: &mut impl Write, ids: &[String], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Lines => {
            for id in ids {
                writeln!(out, "{}", id)?;
            }
        }
        OutputFormat::NullSeparated => {
            for id in ids {
                write!(out, "{}\0", id)?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string(ids).map_err(io::Error::other)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

/// Pick mode result
#[derive(Debug, PartialEq, Eq)]
pub enum PickResult {
    /// User selected entity ids
    Selected(Vec<String>),
    /// User cancelled
    Cancelled,
}

impl PickResult {
    /// Get exit code for this result
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Selected(_) => exit_code::SUCCESS,
            Self::Cancelled => exit_code::CANCELLED,
        }
    }

    /// Output result to stdout if ids were selected
    pub fn output(&self, format: OutputFormat) -> io::Result<i32> {
        match self {
            Self::Selected(ids) => {
                output_ids(ids, format)?;
                Ok(exit_code::SUCCESS)
            }
            Self::Cancelled => Ok(exit_code::CANCELLED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(ids: &[&str], format: OutputFormat) -> String {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        let mut buf = Vec::new();
        write_ids(&mut buf, &ids, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_lines_output() {
        assert_eq!(
            rendered(&["lb:a:b:html:x", "coll-1"], OutputFormat::Lines),
            "lb:a:b:html:x\ncoll-1\n"
        );
    }

    #[test]
    fn test_null_output() {
        assert_eq!(
            rendered(&["lb:a:b:html:x", "coll-1"], OutputFormat::NullSeparated),
            "lb:a:b:html:x\0coll-1\0"
        );
    }

    #[test]
    fn test_json_output() {
        assert_eq!(
            rendered(&["lb:a:b:html:x"], OutputFormat::Json),
            "[\"lb:a:b:html:x\"]\n"
        );
        assert_eq!(rendered(&[], OutputFormat::Json), "[]\n");
    }

    #[test]
    fn test_output_format_parse() {
        assert!(matches!(
            OutputFormat::from_str("lines"),
            Ok(OutputFormat::Lines)
        ));
        assert!(matches!(
            OutputFormat::from_str("null"),
            Ok(OutputFormat::NullSeparated)
        ));
        assert!(matches!(
            OutputFormat::from_str("json"),
            Ok(OutputFormat::Json)
        ));
        assert!(OutputFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_pick_target_parse_and_accepts() {
        assert_eq!(PickTarget::from_str("components"), Ok(PickTarget::Components));
        assert_eq!(PickTarget::from_str("collection"), Ok(PickTarget::Collections));
        assert_eq!(PickTarget::from_str("ALL"), Ok(PickTarget::All));
        assert!(PickTarget::from_str("units").is_err());

        assert!(PickTarget::Components.accepts(EntityKind::Component));
        assert!(!PickTarget::Components.accepts(EntityKind::Collection));
        assert!(PickTarget::All.accepts(EntityKind::Unit));
    }

    #[test]
    fn test_pick_result_exit_codes() {
        assert_eq!(
            PickResult::Selected(vec!["coll-1".to_string()]).exit_code(),
            exit_code::SUCCESS
        );
        assert_eq!(PickResult::Cancelled.exit_code(), exit_code::CANCELLED);
    }
}
