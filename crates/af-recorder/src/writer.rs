//! Recorder stream writer with file rotation.

use crate::error::RecorderResult;
use crate::frame::{RecorderFrame, INTERFACE_VERSION};
use af_core::ini::IniDocument;
use byteorder::{LittleEndian, WriteBytesExt};
use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const SETTINGS_SECTION: &str = "FLIGHT_DATA_RECORDER";
const KEY_ENABLED: &str = "ENABLED";
const KEY_MAXIMUM_NUMBER_OF_FILES: &str = "MAXIMUM_NUMBER_OF_FILES";
const KEY_MAXIMUM_NUMBER_OF_ENTRIES_PER_FILE: &str = "MAXIMUM_NUMBER_OF_ENTRIES_PER_FILE";

const FILE_EXTENSION: &str = "fdr";

/// Recorder configuration, loaded from the same ini store as the rest of the
/// persisted settings. Any read failure yields the defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecorderSettings {
    pub enabled: bool,
    pub maximum_number_of_files: usize,
    pub maximum_entries_per_file: usize,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            maximum_number_of_files: 15,
            maximum_entries_per_file: 864_000,
        }
    }
}

impl RecorderSettings {
    pub fn load_or_default(path: &Path) -> Self {
        let defaults = Self::default();
        match IniDocument::read_file(path) {
            Ok(doc) => Self {
                enabled: doc.get_f64_or(
                    SETTINGS_SECTION,
                    KEY_ENABLED,
                    if defaults.enabled { 1.0 } else { 0.0 },
                ) > 0.5,
                maximum_number_of_files: doc.get_f64_or(
                    SETTINGS_SECTION,
                    KEY_MAXIMUM_NUMBER_OF_FILES,
                    defaults.maximum_number_of_files as f64,
                ) as usize,
                maximum_entries_per_file: doc.get_f64_or(
                    SETTINGS_SECTION,
                    KEY_MAXIMUM_NUMBER_OF_ENTRIES_PER_FILE,
                    defaults.maximum_entries_per_file as f64,
                ) as usize,
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read recorder settings, using defaults");
                defaults
            }
        }
    }
}

/// Gzip-compressed frame stream with version prefix and oldest-file cleanup.
///
/// All write failures are logged and swallowed: the recorder must never take
/// the simulation tick down with it.
pub struct FlightDataRecorder {
    settings: RecorderSettings,
    directory: PathBuf,
    stream: Option<BufWriter<GzEncoder<File>>>,
    entries_in_file: usize,
}

impl FlightDataRecorder {
    pub fn new(directory: PathBuf, settings: RecorderSettings) -> Self {
        Self {
            settings,
            directory,
            stream: None,
            entries_in_file: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    fn filename(&self) -> PathBuf {
        let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
        self.directory.join(format!("{stamp}.{FILE_EXTENSION}"))
    }

    fn open_stream(&mut self) -> RecorderResult<()> {
        fs::create_dir_all(&self.directory)?;
        self.cleanup_old_files()?;
        let file = File::create(self.filename())?;
        let mut writer = BufWriter::new(GzEncoder::new(file, Compression::default()));
        writer.write_u64::<LittleEndian>(INTERFACE_VERSION)?;
        self.stream = Some(writer);
        self.entries_in_file = 0;
        Ok(())
    }

    /// Delete the oldest recorder files beyond the configured count.
    fn cleanup_old_files(&self) -> RecorderResult<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == FILE_EXTENSION)
            })
            .collect();
        files.sort();

        // Keep one slot free for the file about to be created
        let keep = self.settings.maximum_number_of_files.saturating_sub(1);
        let excess = files.len().saturating_sub(keep);
        for path in files.into_iter().take(excess) {
            if let Err(err) = fs::remove_file(&path) {
                warn!(path = %path.display(), %err, "failed to remove old recorder file");
            }
        }
        Ok(())
    }

    /// Append one frame, rotating files as configured.
    pub fn record(&mut self, frame: &RecorderFrame) {
        if !self.settings.enabled {
            return;
        }

        if self.stream.is_none() || self.entries_in_file >= self.settings.maximum_entries_per_file {
            self.stream = None;
            if let Err(err) = self.open_stream() {
                warn!(%err, "failed to open recorder stream, disabling recorder");
                self.settings.enabled = false;
                return;
            }
        }

        if let Some(stream) = &mut self.stream {
            if let Err(err) = frame.write_to(stream) {
                warn!(%err, "failed to write recorder frame");
                return;
            }
            self.entries_in_file += 1;
        }
    }

    /// Flush and close the current stream.
    pub fn finish(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.flush() {
                warn!(%err, "failed to flush recorder stream");
            }
        }
    }
}

impl Drop for FlightDataRecorder {
    fn drop(&mut self) {
        self.finish();
    }
}
