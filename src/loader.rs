//! This module provides the `ProgramLoader` struct, responsible for reading machine definitions
//! from JSON documents, either from files or from strings.

use crate::program::Program;
use crate::types::TuringMachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// `ProgramLoader` reads machine definitions supplied by a front-end.
///
/// A definition is a JSON object mirroring [`Program`]:
///
/// ```json
/// {
///   "name": "Unary marker",
///   "states": ["q0"],
///   "symbols": ["1", "X"],
///   "accept_state": "halt",
///   "reject_state": "reject",
///   "initial_state": "q0",
///   "input": "111",
///   "rules": {
///     "q0": {
///       "1": { "write": "X", "next_state": "q0", "direction": "Right" }
///     }
///   }
/// }
/// ```
///
/// Loaded definitions pass the construction checks but may still have an incomplete table.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read, decoded and well formed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if the content is not a definition.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content)
    }

    /// Loads a single definition from JSON text.
    ///
    /// # Arguments
    ///
    /// * `content` - The JSON document.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        let program: Program = serde_json::from_str(content)
            .map_err(|e| TuringMachineError::ParseError(e.to_string()))?;
        program.check()?;
        Ok(program)
    }

    /// Loads every `.json` definition in a directory, skipping subdirectories and other files.
    ///
    /// # Returns
    ///
    /// One entry per candidate file, holding either its path and definition or the error
    /// met while loading it.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();
                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, BLANK_SYMBOL};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const UNARY: &str = r#"{
        "name": "Test Program",
        "states": ["q0"],
        "symbols": ["1", "X"],
        "accept_state": "halt",
        "reject_state": "reject",
        "initial_state": "q0",
        "input": "11",
        "rules": {
            "q0": {
                "1": { "write": "X", "next_state": "q0", "direction": "Right" },
                "_": { "write": "_", "next_state": "halt" }
            }
        }
    }"#;

    #[test]
    fn test_load_program_from_string() {
        let program = ProgramLoader::load_program_from_string(UNARY).unwrap();

        assert_eq!(program.name, "Test Program");
        assert_eq!(program.input, "11");
        assert_eq!(program.symbols(), &['1', 'X']);
        assert_eq!(program.initial_state(), Some("q0"));

        let blank_rule = program.rule("q0", BLANK_SYMBOL).unwrap();
        assert_eq!(blank_rule.direction, Direction::Right);
        assert!(program.rule("q0", 'X').is_none());
    }

    #[test]
    fn test_loaded_program_may_be_incomplete() {
        let program = ProgramLoader::load_program_from_string(UNARY).unwrap();
        let failure = program.validate().unwrap_err();
        assert_eq!(failure.symbol, 'X');
    }

    #[test]
    fn test_load_rejects_malformed_definitions() {
        let result = ProgramLoader::load_program_from_string("This is not a valid program");
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));

        let conflicting = UNARY.replace("\"reject_state\": \"reject\"", "\"reject_state\": \"halt\"");
        let result = ProgramLoader::load_program_from_string(&conflicting);
        assert!(matches!(result, Err(TuringMachineError::TerminalConflict(_))));
    }

    #[test]
    fn test_load_valid_program_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.json");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(UNARY.as_bytes()).unwrap();

        let program = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(program.name, "Test Program");

        let missing = ProgramLoader::load_program(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        let mut valid_file = File::create(dir.path().join("valid.json")).unwrap();
        valid_file.write_all(UNARY.as_bytes()).unwrap();

        let mut invalid_file = File::create(dir.path().join("invalid.json")).unwrap();
        invalid_file.write_all(b"{}").unwrap();

        // Not a definition file
        let mut ignored_file = File::create(dir.path().join("notes.txt")).unwrap();
        ignored_file.write_all(b"ignored").unwrap();

        let results = ProgramLoader::load_programs(dir.path());

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let results = ProgramLoader::load_programs(Path::new("/nonexistent/programs"));
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
