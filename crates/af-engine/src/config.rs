//! Persisted fuel configuration (`.ini` wire format).
//!
//! Read once at session start; written back on fuel checkpoints while the
//! aircraft is on the ground with engines not running. Both directions are
//! best-effort: a missing or corrupt file yields defaults with a warning,
//! and a failed write is logged and dropped, never retried in the same tick.

use af_core::ini::IniDocument;
use af_core::CoreResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

const SECTION_FUEL: &str = "FUEL";
const KEY_CENTER: &str = "FUEL_CENTER_QUANTITY";
const KEY_LEFT: &str = "FUEL_LEFT_QUANTITY";
const KEY_RIGHT: &str = "FUEL_RIGHT_QUANTITY";
const KEY_LEFT_AUX: &str = "FUEL_LEFT_AUX_QUANTITY";
const KEY_RIGHT_AUX: &str = "FUEL_RIGHT_AUX_QUANTITY";

/// Tank quantities in US gallons.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelConfiguration {
    pub center_gal: f64,
    pub left_gal: f64,
    pub right_gal: f64,
    pub left_aux_gal: f64,
    pub right_aux_gal: f64,
}

impl Default for FuelConfiguration {
    fn default() -> Self {
        Self {
            center_gal: 0.0,
            left_gal: 400.0,
            right_gal: 400.0,
            left_aux_gal: 228.0,
            right_aux_gal: 228.0,
        }
    }
}

impl FuelConfiguration {
    /// Load from the configuration file; any failure falls back to the
    /// defaults (logged, never fatal).
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                let defaults = Self::default();
                warn!(
                    path = %path.display(),
                    %err,
                    "failed to read fuel configuration, using defaults \
                     {}/{}/{} gal",
                    defaults.left_gal,
                    defaults.left_aux_gal,
                    defaults.center_gal,
                );
                defaults
            }
        }
    }

    fn load(path: &Path) -> CoreResult<Self> {
        let doc = IniDocument::read_file(path)?;
        let defaults = Self::default();
        Ok(Self {
            center_gal: doc.get_f64_or(SECTION_FUEL, KEY_CENTER, defaults.center_gal),
            left_gal: doc.get_f64_or(SECTION_FUEL, KEY_LEFT, defaults.left_gal),
            right_gal: doc.get_f64_or(SECTION_FUEL, KEY_RIGHT, defaults.right_gal),
            left_aux_gal: doc.get_f64_or(SECTION_FUEL, KEY_LEFT_AUX, defaults.left_aux_gal),
            right_aux_gal: doc.get_f64_or(SECTION_FUEL, KEY_RIGHT_AUX, defaults.right_aux_gal),
        })
    }

    /// Merge into the existing file (other sections are preserved) and write
    /// it back. A failed write is logged and swallowed.
    pub fn save(&self, path: &Path) {
        // The file may not exist yet, so a read failure here is expected.
        let mut doc = IniDocument::read_file(path).unwrap_or_default();
        doc.set(SECTION_FUEL, KEY_CENTER, self.center_gal);
        doc.set(SECTION_FUEL, KEY_LEFT, self.left_gal);
        doc.set(SECTION_FUEL, KEY_RIGHT, self.right_gal);
        doc.set(SECTION_FUEL, KEY_LEFT_AUX, self.left_aux_gal);
        doc.set(SECTION_FUEL, KEY_RIGHT_AUX, self.right_aux_gal);
        if let Err(err) = doc.write_file(path) {
            warn!(path = %path.display(), %err, "failed to write fuel configuration");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_on_missing_file() {
        let config = FuelConfiguration::load_or_default(Path::new("/nonexistent/fuel.ini"));
        assert_eq!(config, FuelConfiguration::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ACFT123.ini");

        let config = FuelConfiguration {
            center_gal: 12.5,
            left_gal: 350.0,
            right_gal: 351.0,
            left_aux_gal: 100.0,
            right_aux_gal: 101.0,
        };
        config.save(&path);

        let loaded = FuelConfiguration::load_or_default(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn save_preserves_foreign_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.ini");
        std::fs::write(&path, "[OTHER]\nkey=value\n").unwrap();

        FuelConfiguration::default().save(&path);

        let doc = IniDocument::read_file(&path).unwrap();
        assert_eq!(doc.get("OTHER", "key"), Some("value"));
        assert_eq!(
            doc.get_f64_or(SECTION_FUEL, KEY_LEFT, 0.0),
            FuelConfiguration::default().left_gal
        );
    }

    #[test]
    fn partial_file_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.ini");
        std::fs::write(&path, "[FUEL]\nFUEL_CENTER_QUANTITY=55\n").unwrap();

        let config = FuelConfiguration::load_or_default(&path);
        assert_eq!(config.center_gal, 55.0);
        assert_eq!(config.left_gal, 400.0);
    }
}
