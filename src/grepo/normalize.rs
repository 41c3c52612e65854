// src/grepo/normalize.rs
// =============================================================================
// Re-roots explored files on the sub-path that was requested.
//
// The explorer returns paths relative to the repository root. When we
// explore "java/junit5", a file comes back as "java/junit5/pom.xml" but it
// must land at "<kata dir>/pom.xml". normalize() strips the requested
// sub-path from every file.
// =============================================================================

use std::path::{Path, PathBuf};

use super::models::DownloadableFile;
use crate::error::{KataError, Result};

/// Makes every file path relative to `requested_sub_path`
///
/// An empty sub-path leaves the files untouched. A file that isn't under the
/// sub-path means the API broke its contract, and fails with
/// `PathOutsideSubPath`.
pub fn normalize(
    files: Vec<DownloadableFile>,
    requested_sub_path: &str,
) -> Result<Vec<DownloadableFile>> {
    let sub_path = requested_sub_path.trim_matches('/');
    if sub_path.is_empty() {
        return Ok(files);
    }

    files
        .into_iter()
        .map(|file| relative_to(file, sub_path))
        .collect()
}

fn relative_to(file: DownloadableFile, sub_path: &str) -> Result<DownloadableFile> {
    let stripped = match file.relative_path().strip_prefix(sub_path) {
        Ok(rest) => rest.to_path_buf(),
        Err(_) => {
            return Err(KataError::PathOutsideSubPath {
                path: file.into_relative_path(),
                sub_path: sub_path.to_string(),
            })
        }
    };

    // Exploring a single file: "java/README.md" under "java/README.md"
    let relative_path = if stripped.as_os_str().is_empty() {
        file_name_of(file.relative_path())
    } else {
        stripped
    };

    file.relocated(relative_path)
}

fn file_name_of(path: &Path) -> PathBuf {
    path.file_name().map(PathBuf::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> DownloadableFile {
        DownloadableFile::new(path, format!("https://raw/{path}")).unwrap()
    }

    #[test]
    fn test_empty_sub_path_is_identity() {
        let files = vec![file("a.txt"), file("sub/b.txt")];
        assert_eq!(normalize(files.clone(), "").unwrap(), files);
    }

    #[test]
    fn test_strips_sub_path_prefix() {
        let normalized = normalize(vec![file("sub/b.txt")], "sub").unwrap();
        assert_eq!(
            normalized,
            vec![DownloadableFile::new("b.txt", "https://raw/sub/b.txt").unwrap()]
        );
    }

    #[test]
    fn test_strips_nested_sub_path_and_keeps_deeper_dirs() {
        let files = vec![
            file("java/junit5/pom.xml"),
            file("java/junit5/src/test/java/KataTest.java"),
        ];

        let normalized = normalize(files, "java/junit5/").unwrap();
        let paths: Vec<_> = normalized.iter().map(|f| f.relative_path()).collect();

        assert_eq!(
            paths,
            vec![
                Path::new("pom.xml"),
                Path::new("src/test/java/KataTest.java")
            ]
        );
    }

    #[test]
    fn test_matches_whole_components_only() {
        // "subway/x" is not under "sub"
        let result = normalize(vec![file("subway/x.txt")], "sub");
        assert!(matches!(result, Err(KataError::PathOutsideSubPath { .. })));
    }

    #[test]
    fn test_single_file_sub_path_keeps_file_name() {
        let normalized = normalize(vec![file("java/README.md")], "java/README.md").unwrap();
        assert_eq!(normalized[0].relative_path(), Path::new("README.md"));
    }
}
