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
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ndarray_npy::read_npy;
use tracing::debug;

use crate::config::Directories;

/// File suffix shared by input and velocity array files.
pub const ARRAY_FILE_SUFFIX: &str = ".mid.npy";

/// Number of playable pitches on a piano keyboard.
pub const NUM_PITCHES: usize = 88;

/// Each timestep of an input array holds, per pitch, a sustain flag and a
/// note-on flag (88 * 2 = 176 columns), followed by:
/// - 1 stress of beat (strong/weak)
/// - 2 number of notes played and sustained
/// - 1 time progression
/// - 1 average pitch value
/// - 9 values for chord quality (minor, major, suspended, etc.)
pub const NOTE_COLUMNS: usize = NUM_PITCHES * 2;

/// Total width of one input timestep.
pub const INPUT_WIDTH: usize = 190;

/// Width of one velocity timestep: one velocity per pitch.
pub const VELOCITY_WIDTH: usize = NUM_PITCHES;

/// Error types for sample loading.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("array file {0} does not exist")]
    NotFound(PathBuf),

    #[error("{name}: inputs hold {inputs} timesteps but velocities hold {velocities}")]
    ShapeMismatch {
        name: String,
        inputs: usize,
        velocities: usize,
    },

    #[error("{name}: expected {expected} {kind} columns, found {found}")]
    BadWidth {
        name: String,
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("array read error: {0}")]
    ReadError(#[from] ndarray_npy::ReadNpyError),
}

/// One song's worth of co-indexed sequences: quantized input features and the
/// velocities they produced. Immutable once loaded.
pub struct Sample {
    /// The song (or augmented variant) name this sample was loaded from.
    pub name: String,
    /// Input features, one row per timestep, `INPUT_WIDTH` columns.
    pub inputs: Array2<f64>,
    /// Velocities, one row per timestep, one column per pitch.
    pub velocities: Array2<f64>,
}

impl Sample {
    /// Gets the number of timesteps in this sample.
    pub fn frames(&self) -> usize {
        self.inputs.nrows()
    }
}

/// Loads matched (inputs, velocities) array pairs by song name.
pub struct Loader {
    inputs_dir: PathBuf,
    velocities_dir: PathBuf,
}

impl Loader {
    /// Creates a new loader over the configured storage directories.
    pub fn new(directories: &Directories) -> Loader {
        Loader {
            inputs_dir: directories.quantized_inputs().to_path_buf(),
            velocities_dir: directories.quantized_velocities().to_path_buf(),
        }
    }

    /// Loads the input and velocity arrays for the given song name. The two
    /// arrays must agree on their timestep count; a disagreement is a fatal
    /// data-integrity error for the sample.
    pub fn load(&self, name: &str) -> Result<Sample, SampleError> {
        let filename = format!("{}{}", name, ARRAY_FILE_SUFFIX);
        let inputs = read_array(&self.inputs_dir.join(&filename))?;
        let velocities = read_array(&self.velocities_dir.join(&filename))?;

        if inputs.ncols() != INPUT_WIDTH {
            return Err(SampleError::BadWidth {
                name: name.to_string(),
                kind: "input",
                expected: INPUT_WIDTH,
                found: inputs.ncols(),
            });
        }
        if velocities.ncols() != VELOCITY_WIDTH {
            return Err(SampleError::BadWidth {
                name: name.to_string(),
                kind: "velocity",
                expected: VELOCITY_WIDTH,
                found: velocities.ncols(),
            });
        }
        if inputs.nrows() != velocities.nrows() {
            return Err(SampleError::ShapeMismatch {
                name: name.to_string(),
                inputs: inputs.nrows(),
                velocities: velocities.nrows(),
            });
        }

        debug!(name, frames = inputs.nrows(), "Loaded sample");
        Ok(Sample {
            name: name.to_string(),
            inputs,
            velocities,
        })
    }
}

/// Deserializes a 2-D array from an .npy file, checking existence first so
/// the error names the missing path.
fn read_array(path: &Path) -> Result<Array2<f64>, SampleError> {
    if !path.exists() {
        return Err(SampleError::NotFound(path.to_path_buf()));
    }
    Ok(read_npy(path)?)
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use ndarray::Array2;

    use crate::config::Directories;
    use crate::testutil::{consistent_sample, write_sample};

    use super::{Loader, SampleError, INPUT_WIDTH, VELOCITY_WIDTH};

    #[test]
    fn test_load_round_trip() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path());
        directories.bootstrap()?;

        let (inputs, velocities) = consistent_sample(7);
        write_sample(&directories, "ALB01", &inputs, &velocities)?;

        let sample = Loader::new(&directories).load("ALB01")?;
        assert_eq!("ALB01", sample.name);
        assert_eq!(7, sample.frames());
        // Serialization must be lossless.
        assert_eq!(inputs, sample.inputs);
        assert_eq!(velocities, sample.velocities);

        Ok(())
    }

    #[test]
    fn test_load_shape_mismatch() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path());
        directories.bootstrap()?;

        let inputs = Array2::<f64>::zeros((5, INPUT_WIDTH));
        let velocities = Array2::<f64>::zeros((4, VELOCITY_WIDTH));
        write_sample(&directories, "ALB01", &inputs, &velocities)?;

        match Loader::new(&directories).load("ALB01") {
            Err(SampleError::ShapeMismatch {
                name,
                inputs,
                velocities,
            }) => {
                assert_eq!("ALB01", name);
                assert_eq!(5, inputs);
                assert_eq!(4, velocities);
            }
            other => panic!("Expected a shape mismatch, got {:?}", other.map(|s| s.name)),
        }

        Ok(())
    }

    #[test]
    fn test_load_bad_width() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path());
        directories.bootstrap()?;

        let inputs = Array2::<f64>::zeros((5, INPUT_WIDTH - 1));
        let velocities = Array2::<f64>::zeros((5, VELOCITY_WIDTH));
        write_sample(&directories, "ALB01", &inputs, &velocities)?;

        assert!(matches!(
            Loader::new(&directories).load("ALB01"),
            Err(SampleError::BadWidth { kind: "input", .. })
        ));

        Ok(())
    }

    #[test]
    fn test_load_missing_file() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path());
        directories.bootstrap()?;

        assert!(matches!(
            Loader::new(&directories).load("NOPE01"),
            Err(SampleError::NotFound(_))
        ));

        Ok(())
    }
}
