//! Request validation ahead of the analyzer.
//!
//! Failures are collected per field rather than stopping at the first one, so
//! a caller can report everything wrong with a request at once.

use crate::core::types::{AnalysisInput, AnalysisSource, ExcludeSet, FileInput};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const FIELD_TEXT: &str = "text";
pub const FIELD_TEXT_FILE: &str = "text-file";
pub const FIELD_TOP: &str = "top";

/// A request as it arrives, before any checks.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub text: Option<String>,
    pub text_file: Option<PathBuf>,
    pub top: Option<i64>,
    pub exclude: Option<Vec<String>>,
}

/// Field name -> messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, messages) in self.fields() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                f.write_str(message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub type ValidatedRequest = AnalysisInput;

impl RawRequest {
    pub fn validate(self) -> Result<ValidatedRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        // An empty path counts as absent.
        let text_file = self.text_file.filter(|p| !p.as_os_str().is_empty());

        let source = match (self.text, text_file) {
            (Some(text), None) => Some(AnalysisSource::Text(text)),
            (None, Some(path)) => check_text_file(&path, &mut errors).map(AnalysisSource::File),
            (None, None) => {
                errors.add(FIELD_TEXT, "The text field is required when the text-file is not present.");
                errors.add(
                    FIELD_TEXT_FILE,
                    "The text-file field is required when the text field is not present.",
                );
                None
            }
            (Some(_), Some(_)) => {
                errors.add(FIELD_TEXT, "Only one of text or text-file may be present.");
                None
            }
        };

        let top = match self.top {
            None => {
                errors.add(FIELD_TOP, "The top field is required.");
                None
            }
            Some(n) => match usize::try_from(n) {
                Ok(n) if n >= 1 => Some(n),
                _ => {
                    errors.add(FIELD_TOP, "The top field must be a positive integer.");
                    None
                }
            },
        };

        let exclude = ExcludeSet::new(self.exclude.unwrap_or_default());

        match (source, top) {
            (Some(source), Some(top)) if errors.is_empty() => Ok(AnalysisInput { source, exclude, top }),
            _ => Err(errors),
        }
    }
}

fn check_text_file(path: &Path, errors: &mut ValidationErrors) -> Option<FileInput> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        _ => {
            errors.add(FIELD_TEXT_FILE, "The text-file must be a file.");
            return None;
        }
    };
    let is_txt = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if !is_txt {
        errors.add(FIELD_TEXT_FILE, "The text-file must be a text file with .txt extension.");
        return None;
    }
    Some(FileInput {
        path: path.to_path_buf(),
        size_hint: Some(metadata.len()),
    })
}
