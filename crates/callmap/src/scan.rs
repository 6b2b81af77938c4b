//! Source discovery and reading.
//!
//! Walks a root directory for compilation units, skipping hidden and build
//! output directories. Unreadable directories are recorded and the walk
//! continues; only an unreadable root is fatal.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::IndexerConfig;
use crate::error::{Error, Result};

/// Files found under a root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Source files, sorted by path
    pub files: Vec<PathBuf>,
    /// Directories that could not be read (path, error reason)
    pub directories_skipped: Vec<(PathBuf, String)>,
}

/// Find every source file under `root`.
///
/// The result is sorted so a parallel run merges units in the same order a
/// sequential run would visit them.
///
/// # Errors
///
/// Returns [`Error::Io`] if `root` does not exist or is not a directory.
pub fn discover_sources(root: &Path, config: &IndexerConfig) -> Result<Discovery> {
    let metadata = std::fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            format!("{} is not a directory", root.display()),
        )));
    }

    let mut discovery = Discovery::default();
    let walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .into_iter()
        .filter_entry(|entry| {
            // The root itself may be hidden (temp dirs often are).
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !config.is_excluded_dir(&entry.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                warn!(path = %path.display(), error = %e, "Skipping unreadable directory entry");
                discovery.directories_skipped.push((path, e.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let is_source = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| config.is_source_extension(ext));
        if is_source {
            discovery.files.push(entry.into_path());
        }
    }

    discovery.files.sort();
    debug!(
        root = %root.display(),
        files = discovery.files.len(),
        skipped_dirs = discovery.directories_skipped.len(),
        "Discovered source files"
    );
    Ok(discovery)
}

/// Read a unit as UTF-8 text.
///
/// Undecodable sequences become U+FFFD before parsing, so positions are
/// counted over the replaced text.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(&bytes))
}

/// Decode bytes as UTF-8, replacing invalid sequences with U+FFFD.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        for path in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).expect("failed to create parent dirs");
            }
            fs::write(&full, "class X {}").expect("failed to write file");
        }
        dir
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn finds_java_files_sorted() {
        let dir = tree(&["src/b/B.java", "src/a/A.java", "README.md", "Top.java"]);

        let found = discover_sources(dir.path(), &IndexerConfig::default()).expect("scan");

        assert_eq!(
            relative(dir.path(), &found.files),
            vec!["Top.java", "src/a/A.java", "src/b/B.java"]
        );
    }

    #[test]
    fn skips_hidden_and_build_directories() {
        let dir = tree(&[
            ".git/Hook.java",
            "target/Gen.java",
            "build/Out.java",
            "src/Kept.java",
        ]);

        let found = discover_sources(dir.path(), &IndexerConfig::default()).expect("scan");

        assert_eq!(relative(dir.path(), &found.files), vec!["src/Kept.java"]);
    }

    #[test]
    fn custom_extensions_are_honored() {
        let dir = tree(&["A.java", "B.jav"]);
        let config = IndexerConfig {
            extensions: vec!["jav".to_string()],
            ..IndexerConfig::default()
        };

        let found = discover_sources(dir.path(), &config).expect("scan");

        assert_eq!(relative(dir.path(), &found.files), vec!["B.jav"]);
    }

    #[test]
    fn read_source_replaces_invalid_bytes() {
        let dir = tree(&[]);
        let path = dir.path().join("Odd.java");
        fs::write(&path, b"class A { /*\xFF*/ }").expect("failed to write file");

        let text = read_source(&path).expect("read");

        assert_eq!(text, "class A { /*\u{FFFD}*/ }");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tree(&[]);
        let missing = dir.path().join("nope");

        assert!(matches!(
            discover_sources(&missing, &IndexerConfig::default()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn file_root_is_an_error() {
        let dir = tree(&["A.java"]);

        assert!(matches!(
            discover_sources(&dir.path().join("A.java"), &IndexerConfig::default()),
            Err(Error::Io(_))
        ));
    }
}
