//! Module with the pattern definition file loader.
//!
//! A pattern definition file is a JSON array of entries. Each entry carries
//! an id, a display name, one or more regexes, optional boundary pairs and
//! the ignore/disabled flags:
//!
//! ```json
//! [
//!     {
//!         "id": 1,
//!         "name": "ssn",
//!         "regexes": ["[[:digit:]]{3}[ -][[:digit:]]{2}[ -][[:digit:]]{4}"],
//!         "boundaries": [],
//!         "ignore": false,
//!         "disabled": false
//!     }
//! ]
//! ```
//!
//! Loading expands every entry into concrete [Pattern]s: disabled entries
//! are dropped; each regex is expanded once per boundary (or once bare when
//! no boundaries are given); minor ids are assigned 0 upward per expansion
//! within an entry.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{DescanError, DescanErrorKind, Result};
use crate::{Pattern, PatternId};

/// A boundary pair; each regex of the owning entry is wrapped once per
/// boundary into `prefix ++ regex ++ suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// Prepended to the regex.
    pub prefix: String,
    /// Appended to the regex.
    pub suffix: String,
}

/// One entry of a pattern definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// The major component of the ids of all patterns expanded from this
    /// entry.
    pub id: u32,
    /// The display name.
    pub name: String,
    /// The regexes; at least one is required.
    pub regexes: Vec<String>,
    /// Optional boundary pairs.
    #[serde(default)]
    pub boundaries: Vec<Boundary>,
    /// Suppress matches of this entry's patterns instead of reporting them.
    #[serde(default)]
    pub ignore: bool,
    /// Drop the entry at load time.
    #[serde(default)]
    pub disabled: bool,
}

/// Load a pattern definition file and expand it into concrete patterns.
pub fn load_patterns<P: AsRef<Path>>(path: P) -> Result<Vec<Pattern>> {
    let content = fs::read_to_string(path.as_ref())?;
    let entries: Vec<PatternEntry> = serde_json::from_str(&content)
        .map_err(|err| DescanError::new(DescanErrorKind::PatternFile(err.to_string())))?;
    let patterns = expand_patterns(&entries)?;
    debug!(
        "loaded {} patterns from {}",
        patterns.len(),
        path.as_ref().display()
    );
    Ok(patterns)
}

/// Expand pattern entries into concrete patterns; see the module docs for
/// the expansion rules.
pub fn expand_patterns(entries: &[PatternEntry]) -> Result<Vec<Pattern>> {
    let mut patterns = Vec::new();
    for entry in entries {
        if entry.disabled {
            continue;
        }
        if entry.regexes.is_empty() {
            return Err(DescanError::new(DescanErrorKind::PatternFile(format!(
                "pattern {} ({}) has no regexes",
                entry.id, entry.name
            ))));
        }
        let mut minor = 0;
        let mut push = |patterns: &mut Vec<Pattern>, regex: String| {
            let mut pattern =
                Pattern::new(PatternId::new(entry.id, minor), entry.name.clone(), regex);
            if entry.ignore {
                pattern = pattern.with_ignore();
            }
            patterns.push(pattern);
            minor += 1;
        };
        for regex in &entry.regexes {
            if entry.boundaries.is_empty() {
                push(&mut patterns, regex.clone());
            } else {
                for boundary in &entry.boundaries {
                    push(
                        &mut patterns,
                        format!("{}{}{}", boundary.prefix, regex, boundary.suffix),
                    );
                }
            }
        }
    }
    Ok(patterns)
}
