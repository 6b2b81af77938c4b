//! Indexing of a single compilation unit.
//!
//! A unit is parsed and walked into a fresh [`Registry`] of its own. The caller
//! merges that registry into the session afterwards, so a unit that fails
//! halfway leaves nothing behind.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::IndexerConfig;
use crate::error::IndexError;
use crate::languages::java;
use crate::parser::JavaParser;
use crate::registry::Registry;
use crate::scan::read_source;
use crate::types::UnitSummary;

/// Everything one unit contributed, ready to merge.
#[derive(Debug)]
pub struct ParsedUnit {
    /// Path (or label) of the unit
    pub path: PathBuf,
    /// Packages and classes found in this unit alone
    pub registry: Registry,
    /// Counters from the walk
    pub summary: UnitSummary,
}

/// Parse and walk one unit from memory.
///
/// # Errors
///
/// Returns an [`IndexError`] if the parser produced no tree, ran out of its
/// budget, or the orphan policy rejected the unit.
pub fn index_unit(
    parser: &mut JavaParser,
    source: &str,
    path: &Path,
    config: &IndexerConfig,
) -> Result<ParsedUnit, IndexError> {
    let content = source.as_bytes();
    let tree = parser.parse(content, path)?;
    let mut registry = Registry::new();
    let summary = java::index_tree(&tree, content, &mut registry, config)
        .map_err(|e| IndexError::from_unit_error(path.to_path_buf(), &e))?;

    debug!(
        path = %path.display(),
        package = summary.package.as_deref().unwrap_or(""),
        classes = summary.classes_registered,
        methods = summary.methods_registered,
        calls = summary.calls_found,
        "Indexed unit"
    );

    Ok(ParsedUnit {
        path: path.to_path_buf(),
        registry,
        summary,
    })
}

/// Read a unit from disk, then parse and walk it.
///
/// # Errors
///
/// Returns an I/O [`IndexError`] if the file cannot be read, otherwise as
/// [`index_unit`].
pub fn index_file(
    parser: &mut JavaParser,
    path: &Path,
    config: &IndexerConfig,
) -> Result<ParsedUnit, IndexError> {
    let source = read_source(path).map_err(|e| IndexError::io_error(path.to_path_buf(), &e))?;
    index_unit(parser, &source, path, config)
}
