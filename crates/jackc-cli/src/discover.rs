//! Resolves the CLI's single positional `path` argument into the ordered
//! list of `.jack` files to translate.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("{path}: not a .jack file or a directory")]
    NotJackOrDirectory { path: PathBuf },
    #[error("{path}: no .jack files found")]
    Empty { path: PathBuf },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single file that ends in `.jack` is returned as-is. A directory is
/// scanned non-recursively and its `.jack` entries are returned sorted, so
/// batch output and exit status are reproducible across runs and platforms.
pub fn jack_files(path: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    let metadata = std::fs::metadata(path).map_err(|source| DiscoverError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.is_file() {
        if path.extension().and_then(|e| e.to_str()) == Some("jack") {
            return Ok(vec![path.to_path_buf()]);
        }
        return Err(DiscoverError::NotJackOrDirectory {
            path: path.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(|source| DiscoverError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("jack"))
        .collect();

    if files.is_empty() {
        return Err(DiscoverError::Empty {
            path: path.to_path_buf(),
        });
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_jack_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Main.jack");
        std::fs::write(&file, "class Main {}").unwrap();

        assert_eq!(jack_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn non_jack_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hi").unwrap();

        assert!(matches!(
            jack_files(&file),
            Err(DiscoverError::NotJackOrDirectory { .. })
        ));
    }

    #[test]
    fn directory_scan_is_sorted_and_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Zebra.jack"), "class Zebra {}").unwrap();
        std::fs::write(dir.path().join("Alpha.jack"), "class Alpha {}").unwrap();
        std::fs::write(dir.path().join("skip.txt"), "nope").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("Hidden.jack"), "class Hidden {}").unwrap();

        let found = jack_files(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alpha.jack", "Zebra.jack"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(jack_files(dir.path()), Err(DiscoverError::Empty { .. })));
    }
}
