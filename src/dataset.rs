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
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError};
use crate::config::Directories;
use crate::sample::{Loader, SampleError};
use crate::validate::{validate_sample, ValidationError};

/// Marker substring identifying augmented renderings of a song. Augmented
/// variants only ever enter the training set; letting them reach the test set
/// would leak training material across the split.
pub const AUGMENTATION_MARKER: &str = "_aug_";

/// Error types for dataset assembly. Any failure aborts the whole build; a
/// partially assembled dataset is never returned.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("test fraction must be within (0, 1), got {0}")]
    InvalidTestFraction(f64),

    #[error("need at least two songs to split, found {0}")]
    TooFewSongs(usize),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The assembled train/test arrays. Songs vary in timestep count, so each
/// entry is one song's full 2-D array; batching and padding are left to the
/// model trainer.
pub struct Dataset {
    /// Training inputs, one `[T, 190]` array per song or augmented variant.
    pub x_train: Vec<Array2<f64>>,
    /// Test inputs, one `[T, 190]` array per unaugmented song.
    pub x_test: Vec<Array2<f64>>,
    /// Training velocities, co-indexed with `x_train`.
    pub y_train: Vec<Array2<f64>>,
    /// Test velocities, co-indexed with `x_test`.
    pub y_test: Vec<Array2<f64>>,
}

/// Partitions base song names into (train, test) sets. The names are sorted
/// before the seeded shuffle so the partition depends only on the name set,
/// the fraction, and the seed, never on filesystem enumeration order.
///
/// The first `round(n * test_fraction)` shuffled names (clamped so neither
/// side is empty) form the test set.
pub fn split_names(
    names: &[String],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<String>, Vec<String>), DatasetError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DatasetError::InvalidTestFraction(test_fraction));
    }
    if names.len() < 2 {
        return Err(DatasetError::TooFewSongs(names.len()));
    }

    let mut shuffled = names.to_vec();
    shuffled.sort();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    let num_test = ((names.len() as f64 * test_fraction).round() as usize)
        .clamp(1, names.len() - 1);
    let train = shuffled.split_off(num_test);
    Ok((train, shuffled))
}

/// Builds train/test datasets from the stored array files.
pub struct Assembler {
    catalog: Catalog,
    loader: Loader,
}

impl Assembler {
    /// Creates a new assembler over the configured storage directories.
    pub fn new(directories: &Directories) -> Assembler {
        Assembler {
            catalog: Catalog::new(directories),
            loader: Loader::new(directories),
        }
    }

    /// Loads the musical performances and returns sets of inputs and labels
    /// (notes and resulting velocities), one for training and one for testing.
    ///
    /// The split is made at the song level over unaugmented names; each
    /// training song is then expanded to all of its augmented variants, while
    /// test songs load only the exact unaugmented file.
    pub fn load_dataset(
        &self,
        test_fraction: f64,
        seed: u64,
        validate: bool,
    ) -> Result<Dataset, DatasetError> {
        info!("Loading data ...");

        let base_names = self.catalog.list_names("", Some(AUGMENTATION_MARKER))?;
        let (train_names, test_names) = split_names(&base_names, test_fraction, seed)?;
        debug!(
            train = train_names.len(),
            test = test_names.len(),
            "Split songs"
        );

        let mut dataset = Dataset {
            x_train: Vec::new(),
            x_test: Vec::new(),
            y_train: Vec::new(),
            y_test: Vec::new(),
        };

        for name in &train_names {
            // The base song plus every augmented rendering of it.
            for variant in self.catalog.list_names(name, None)? {
                let sample = self.loader.load(&variant)?;
                if validate {
                    validate_sample(&sample)?;
                }
                dataset.x_train.push(sample.inputs);
                dataset.y_train.push(sample.velocities);
            }
        }

        for name in &test_names {
            let sample = self.loader.load(name)?;
            if validate {
                validate_sample(&sample)?;
            }
            dataset.x_test.push(sample.inputs);
            dataset.y_test.push(sample.velocities);
        }

        info!(
            train = dataset.x_train.len(),
            test = dataset.x_test.len(),
            "Loaded train and test samples"
        );
        Ok(dataset)
    }
}
