// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, io};

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Typed error for config load/parse failures so callers can distinguish
/// e.g. file-not-found from parse errors without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),
}

/// The storage layout for the dataset pipeline. Every component receives its
/// directories from this struct rather than from process-wide constants, so
/// tests can point the whole pipeline at a temporary directory.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Directories {
    /// Raw MIDI files, as collected.
    midi_data: PathBuf,
    /// MIDI files that passed upstream validity checks.
    midi_data_valid: PathBuf,
    /// Valid MIDI files with repaired metadata.
    midi_data_valid_repaired: PathBuf,
    /// Quantized renderings of the valid MIDI files.
    midi_data_valid_quantized: PathBuf,
    /// Per-song quantized input feature arrays (.mid.npy).
    quantized_inputs: PathBuf,
    /// Per-song quantized velocity arrays (.mid.npy).
    quantized_velocities: PathBuf,
    /// General artefact output.
    output: PathBuf,
    /// Trained model artefacts.
    model_output: PathBuf,
    /// Baseline model artefacts.
    baseline_output: PathBuf,
}

impl Default for Directories {
    fn default() -> Self {
        Directories::with_root(Path::new("."))
    }
}

impl Directories {
    /// Creates the standard directory layout rooted at the given path.
    pub fn with_root(root: &Path) -> Directories {
        Directories {
            midi_data: root.join("midi_data"),
            midi_data_valid: root.join("midi_data_valid"),
            midi_data_valid_repaired: root.join("midi_data_valid_repaired"),
            midi_data_valid_quantized: root.join("midi_data_valid_quantized"),
            quantized_inputs: root.join("midi_data_valid_quantized_inputs"),
            quantized_velocities: root.join("midi_data_valid_quantized_velocities"),
            output: root.join("output"),
            model_output: root.join("output_model"),
            baseline_output: root.join("output_baseline"),
        }
    }

    /// Deserializes a file from the path into a directories configuration struct.
    pub fn deserialize(path: &Path) -> Result<Directories, Box<dyn Error>> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(ConfigError::Load)?
            .try_deserialize::<Directories>()
            .map_err(ConfigError::Load)?)
    }

    /// Serialize and save a directories configuration struct to a file at given path.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let serialized = serde_yml::to_string(self)?;

        let mut file = fs::File::create(path)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    /// Gets the directory holding quantized input feature arrays.
    pub fn quantized_inputs(&self) -> &Path {
        &self.quantized_inputs
    }

    /// Gets the directory holding quantized velocity arrays.
    pub fn quantized_velocities(&self) -> &Path {
        &self.quantized_velocities
    }

    /// Creates any missing directories in the layout. Returns the paths that
    /// were created.
    pub fn bootstrap(&self) -> io::Result<Vec<PathBuf>> {
        let all = [
            &self.midi_data,
            &self.midi_data_valid,
            &self.midi_data_valid_repaired,
            &self.midi_data_valid_quantized,
            &self.quantized_inputs,
            &self.quantized_velocities,
            &self.output,
            &self.model_output,
            &self.baseline_output,
        ];

        let mut created: Vec<PathBuf> = Vec::new();
        for dir in all {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
                created.push(dir.to_path_buf());
            }
        }

        info!(created = created.len(), "Bootstrapped directory layout");
        Ok(created)
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::path::Path;

    use super::Directories;

    #[test]
    fn test_with_root() {
        let directories = Directories::with_root(Path::new("/data"));
        assert_eq!(
            Path::new("/data/midi_data_valid_quantized_inputs"),
            directories.quantized_inputs()
        );
        assert_eq!(
            Path::new("/data/midi_data_valid_quantized_velocities"),
            directories.quantized_velocities()
        );
    }

    #[test]
    fn test_bootstrap_creates_missing_directories() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path());

        let created = directories.bootstrap()?;
        assert_eq!(9, created.len(), "Expected all directories to be created.");
        assert!(directories.quantized_inputs().is_dir());
        assert!(directories.quantized_velocities().is_dir());

        // A second bootstrap finds everything in place.
        let created = directories.bootstrap()?;
        assert!(created.is_empty(), "Expected no directories to be created.");

        Ok(())
    }

    #[test]
    fn test_save_and_deserialize_round_trip() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path().join("data").as_path());

        let config_path = tempdir.path().join("directories.yaml");
        directories.save(&config_path)?;

        let loaded = Directories::deserialize(&config_path)?;
        assert_eq!(directories.quantized_inputs(), loaded.quantized_inputs());
        assert_eq!(
            directories.quantized_velocities(),
            loaded.quantized_velocities()
        );

        Ok(())
    }
}
