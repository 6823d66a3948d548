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
use tracing::debug;

use crate::sample::{Sample, NUM_PITCHES};

/// Error types for sample validation. Each variant carries the sample name so
/// the offending file can be located on disk.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("found all-zero input in: {0}")]
    AllZeroInputs(String),

    #[error("found nan or inf input in: {0}")]
    NonFiniteInputs(String),

    #[error("found all-zero velocities in: {0}")]
    AllZeroVelocities(String),

    #[error("found nan or inf velocities in: {0}")]
    NonFiniteVelocities(String),

    #[error("note-on and velocity disagree in {name} at timestep {timestep}, pitch {pitch}")]
    NoteVelocityMismatch {
        name: String,
        timestep: usize,
        pitch: usize,
    },
}

/// Checks a loaded sample for numeric sanity and for the invariant linking
/// note-on flags to velocities: a pitch sounding at a timestep must have a
/// nonzero velocity there, and a silent pitch must not. Validation is purely
/// diagnostic; it never repairs data.
pub fn validate_sample(sample: &Sample) -> Result<(), ValidationError> {
    debug!(name = sample.name.as_str(), "Validating sample");

    if sample.inputs.iter().all(|value| *value == 0.0) {
        return Err(ValidationError::AllZeroInputs(sample.name.clone()));
    }
    if sample.inputs.iter().any(|value| !value.is_finite()) {
        return Err(ValidationError::NonFiniteInputs(sample.name.clone()));
    }
    if sample.velocities.iter().all(|value| *value == 0.0) {
        return Err(ValidationError::AllZeroVelocities(sample.name.clone()));
    }
    if sample.velocities.iter().any(|value| !value.is_finite()) {
        return Err(ValidationError::NonFiniteVelocities(sample.name.clone()));
    }

    // The note-on flag for pitch k lives at input column 1 + 2k.
    for (timestep, (input_row, velocity_row)) in sample
        .inputs
        .outer_iter()
        .zip(sample.velocities.outer_iter())
        .enumerate()
    {
        for pitch in 0..NUM_PITCHES {
            let note_on = input_row[1 + 2 * pitch] > 0.0;
            let sounding = velocity_row[pitch] > 0.0;
            if note_on != sounding {
                return Err(ValidationError::NoteVelocityMismatch {
                    name: sample.name.clone(),
                    timestep,
                    pitch,
                });
            }
        }
    }

    Ok(())
}
