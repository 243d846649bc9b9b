//! Minimal `.ini` codec for persisted aircraft-state configuration.
//!
//! Supports `[SECTION]` headers and `key=value` pairs, with `;`/`#` comment
//! lines. This is the wire format of existing persisted state files, so it is
//! preserved as-is rather than migrating to another configuration format.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parsed ini document: section name -> key -> raw value.
///
/// BTreeMap keeps write-out ordering stable across runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from text. Unknown lines are an error; blank and
    /// comment lines are skipped.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let mut doc = Self::new();
        let mut current: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[') {
                let name = name.strip_suffix(']').ok_or(CoreError::ConfigParse {
                    what: format!("unterminated section header {line:?}"),
                    line: idx + 1,
                })?;
                current = Some(name.trim().to_string());
                doc.sections.entry(name.trim().to_string()).or_default();
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(CoreError::ConfigParse {
                    what: format!("expected key=value, got {line:?}"),
                    line: idx + 1,
                });
            };
            let Some(section) = &current else {
                return Err(CoreError::ConfigParse {
                    what: format!("key {key:?} outside of any section"),
                    line: idx + 1,
                });
            };
            doc.sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(doc)
    }

    pub fn read_file(path: &Path) -> CoreResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn write_file(&self, path: &Path) -> CoreResult<()> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (section, keys) in &self.sections {
            out.push('[');
            out.push_str(section);
            out.push_str("]\n");
            for (key, value) in keys {
                out.push_str(key);
                out.push('=');
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    /// Numeric lookup with a default for missing or unparseable values.
    pub fn get_f64_or(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get(section, key)
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(default)
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl ToString) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }
}
