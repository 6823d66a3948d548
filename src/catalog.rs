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
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Directories;
use crate::sample::ARRAY_FILE_SUFFIX;

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("quantized inputs directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("no quantized input arrays found in {0}")]
    NoFiles(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Enumerates the songs present in the quantized inputs directory.
///
/// Filename nomenclature:
/// - Name: the name of the song, e.g. `ZHOU02`.
/// - Filename: the name including file extensions, e.g. `ZHOU02.mid.npy`.
/// - Filepath: the filename joined onto a storage directory.
pub struct Catalog {
    /// The directory holding one input feature array per song.
    inputs_dir: PathBuf,
}

impl Catalog {
    /// Creates a new catalog over the configured quantized inputs directory.
    pub fn new(directories: &Directories) -> Catalog {
        Catalog {
            inputs_dir: directories.quantized_inputs().to_path_buf(),
        }
    }

    /// Lists the names of all stored songs whose filename starts with
    /// `name_filter`. When an exclusion filter is given, filenames containing
    /// it are skipped. Names are returned in filesystem enumeration order,
    /// which is not guaranteed stable across platforms; callers that need a
    /// reproducible order must sort.
    pub fn list_names(
        &self,
        name_filter: &str,
        exclusion_filter: Option<&str>,
    ) -> Result<Vec<String>, CatalogError> {
        if !self.inputs_dir.is_dir() {
            return Err(CatalogError::MissingDirectory(self.inputs_dir.clone()));
        }

        let mut names: Vec<String> = Vec::new();
        for entry in fs::read_dir(&self.inputs_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            if !filename.starts_with(name_filter) || !filename.ends_with(ARRAY_FILE_SUFFIX) {
                continue;
            }
            if exclusion_filter.is_some_and(|exclusion| filename.contains(exclusion)) {
                continue;
            }

            if let Some(name) = name_from_filepath(&entry.path()) {
                names.push(name);
            }
        }

        debug!(
            count = names.len(),
            filter = name_filter,
            "Listed song names"
        );
        Ok(names)
    }

    /// Returns the lexicographically first known song name. Intended for
    /// diagnostics and sampling, not for dataset assembly.
    pub fn any_name(&self) -> Result<String, CatalogError> {
        let mut names = self.list_names("", None)?;
        if names.is_empty() {
            return Err(CatalogError::NoFiles(self.inputs_dir.clone()));
        }
        names.sort();
        Ok(names.swap_remove(0))
    }
}

/// Extracts the bare song name from a filepath: the last path component with
/// all extensions stripped.
fn name_from_filepath(filepath: &Path) -> Option<String> {
    let filename = filepath.file_name()?.to_str()?;
    let name = filename.split('.').next()?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::path::Path;

    use crate::config::Directories;
    use crate::testutil::write_empty_input_file;

    use super::{name_from_filepath, Catalog, CatalogError};

    #[test]
    fn test_name_from_filepath() {
        assert_eq!(
            Some("ZHOU02".to_string()),
            name_from_filepath(Path::new("./inputs/ZHOU02.mid.npy"))
        );
        assert_eq!(
            Some("ZHOU02_aug_1".to_string()),
            name_from_filepath(Path::new("ZHOU02_aug_1.mid.npy"))
        );
        assert_eq!(None, name_from_filepath(Path::new(".hidden")));
    }

    #[test]
    fn test_list_names_filters() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path());
        directories.bootstrap()?;

        for name in ["ALB01", "ALB01_aug_1", "ALB02", "CHOP05"] {
            write_empty_input_file(&directories, name)?;
        }
        // Files without the array suffix are not songs.
        std::fs::write(directories.quantized_inputs().join("notes.txt"), "x")?;

        let catalog = Catalog::new(&directories);

        let mut all = catalog.list_names("", None)?;
        all.sort();
        assert_eq!(vec!["ALB01", "ALB01_aug_1", "ALB02", "CHOP05"], all);

        let mut prefixed = catalog.list_names("ALB01", None)?;
        prefixed.sort();
        assert_eq!(vec!["ALB01", "ALB01_aug_1"], prefixed);

        let mut unaugmented = catalog.list_names("", Some("_aug_"))?;
        unaugmented.sort();
        assert_eq!(vec!["ALB01", "ALB02", "CHOP05"], unaugmented);

        Ok(())
    }

    #[test]
    fn test_any_name() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let directories = Directories::with_root(tempdir.path());
        directories.bootstrap()?;

        let catalog = Catalog::new(&directories);
        assert!(
            matches!(catalog.any_name(), Err(CatalogError::NoFiles(_))),
            "Expected an empty directory to have no names."
        );

        for name in ["CHOP05", "ALB01"] {
            write_empty_input_file(&directories, name)?;
        }
        assert_eq!("ALB01", catalog.any_name()?);

        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let directories = Directories::with_root(Path::new("/nonexistent"));
        let catalog = Catalog::new(&directories);
        assert!(matches!(
            catalog.list_names("", None),
            Err(CatalogError::MissingDirectory(_))
        ));
    }
}
