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

#[cfg(test)]
use std::error::Error;

#[cfg(test)]
use ndarray::Array2;
#[cfg(test)]
use ndarray_npy::write_npy;

#[cfg(test)]
use crate::config::Directories;
#[cfg(test)]
use crate::sample::{ARRAY_FILE_SUFFIX, INPUT_WIDTH, NOTE_COLUMNS, NUM_PITCHES, VELOCITY_WIDTH};

/// Writes a matched (inputs, velocities) array pair for the given song name
/// into the configured storage directories.
#[cfg(test)]
pub fn write_sample(
    directories: &Directories,
    name: &str,
    inputs: &Array2<f64>,
    velocities: &Array2<f64>,
) -> Result<(), Box<dyn Error>> {
    let filename = format!("{}{}", name, ARRAY_FILE_SUFFIX);
    write_npy(directories.quantized_inputs().join(&filename), inputs)?;
    write_npy(directories.quantized_velocities().join(&filename), velocities)?;
    Ok(())
}

/// Writes an input-side array file only, for catalog tests that never load
/// the contents.
#[cfg(test)]
pub fn write_empty_input_file(
    directories: &Directories,
    name: &str,
) -> Result<(), Box<dyn Error>> {
    let filename = format!("{}{}", name, ARRAY_FILE_SUFFIX);
    write_npy(
        directories.quantized_inputs().join(&filename),
        &Array2::<f64>::zeros((1, INPUT_WIDTH)),
    )?;
    Ok(())
}

/// Builds a synthetic sample that satisfies every validator invariant: one
/// sounding pitch per timestep with matching note-on flag and velocity, plus
/// nonzero beat, counter, progression, pitch-average and chord features.
#[cfg(test)]
pub fn consistent_sample(frames: usize) -> (Array2<f64>, Array2<f64>) {
    let mut inputs = Array2::<f64>::zeros((frames, INPUT_WIDTH));
    let mut velocities = Array2::<f64>::zeros((frames, VELOCITY_WIDTH));

    for timestep in 0..frames {
        let pitch = (timestep * 7 + 11) % NUM_PITCHES;
        inputs[[timestep, 2 * pitch]] = 1.0;
        inputs[[timestep, 2 * pitch + 1]] = 1.0;
        velocities[[timestep, pitch]] = 64.0;

        // Beat stress, note counters, time progression, average pitch and a
        // chord-quality one-hot.
        inputs[[timestep, NOTE_COLUMNS]] = if timestep % 4 == 0 { 1.0 } else { 0.5 };
        inputs[[timestep, NOTE_COLUMNS + 1]] = 1.0;
        inputs[[timestep, NOTE_COLUMNS + 2]] = 1.0;
        inputs[[timestep, NOTE_COLUMNS + 3]] = timestep as f64 / frames as f64;
        inputs[[timestep, NOTE_COLUMNS + 4]] = 21.0 + pitch as f64;
        inputs[[timestep, NOTE_COLUMNS + 5 + timestep % 9]] = 1.0;
    }

    (inputs, velocities)
}
