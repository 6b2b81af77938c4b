//! # callmap: a structural index of Java sources
//!
//! callmap parses Java compilation units with tree-sitter and records what is
//! declared where: packages, classes (nested ones included), methods with
//! their overloads, and the calls each method body makes. It does not resolve
//! a call to its target; receivers are kept as the text written in the source.
//!
//! ## Design Philosophy
//!
//! - **Syntactic, not semantic** - no type inference, no classpath
//! - **Error tolerant** - malformed units index whatever tree-sitter recovers,
//!   and a failing unit never stops a run
//! - **Caller-owned state** - a [`Registry`] is a plain value lent to the
//!   [`Indexer`], so independent sessions never interfere
//!
//! ## Quick Start
//!
//! ```no_run
//! use callmap::{Indexer, Registry, Report};
//! use std::path::Path;
//!
//! let mut indexer = Indexer::new()?;
//! let mut registry = Registry::new();
//!
//! let stats = indexer.index_directory(Path::new("/path/to/project"), &mut registry)?;
//! println!("Indexed {} units", stats.units_indexed);
//!
//! print!("{}", Report::new(&registry));
//! println!("{}", callmap::render::to_json(&registry)?);
//! # Ok::<(), callmap::Error>(())
//! ```

mod error;
mod parallel;
mod parser;
mod scan;
mod types;
mod unit;

pub mod config;
pub mod languages;
pub mod registry;
pub mod render;

pub use config::{DuplicatePolicy, IndexerConfig, OrphanPolicy};
pub use error::{Error, IndexError, IndexErrorKind, Result};
pub use parser::JavaParser;
pub use registry::{MergeOutcome, Registry};
pub use render::{IndexSnapshot, Report};
pub use scan::{Discovery, discover_sources};
pub use types::{
    CONSTRUCTOR_MARKER_PREFIX, ClassInfo, IndexStats, Location, MethodCall, MethodInfo,
    OverloadSet, UnitSummary,
};

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use unit::{ParsedUnit, index_file, index_unit};

/// Entry point for indexing Java sources.
///
/// Holds a parser and the session configuration. The registry being filled is
/// always passed in by the caller.
#[derive(Debug)]
pub struct Indexer {
    parser: JavaParser,
    config: IndexerConfig,
}

impl Indexer {
    /// Create an indexer with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderUnavailable`] if the Java grammar cannot be
    /// loaded.
    pub fn new() -> Result<Self> {
        Self::with_config(IndexerConfig::default())
    }

    /// Create an indexer with a specific configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid configuration and
    /// [`Error::ProviderUnavailable`] if the Java grammar cannot be loaded.
    pub fn with_config(config: IndexerConfig) -> Result<Self> {
        config.validate()?;
        let mut parser = JavaParser::new()?;
        parser.set_timeout(config.unit_timeout_ms);
        Ok(Self { parser, config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Index one unit of Java source text.
    ///
    /// `label` only identifies the unit in errors and logs. The unit is
    /// merged into `registry` only if it indexes completely.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`] if the unit could not be indexed; `registry`
    /// is left untouched in that case.
    pub fn index_source(
        &mut self,
        source: &str,
        label: impl AsRef<Path>,
        registry: &mut Registry,
    ) -> std::result::Result<UnitSummary, IndexError> {
        let unit = index_unit(&mut self.parser, source, label.as_ref(), &self.config)?;
        Ok(self.commit(registry, unit))
    }

    /// Index one unit given as raw bytes.
    ///
    /// Invalid UTF-8 does not fail the unit; it is replaced with U+FFFD before
    /// parsing, exactly as files read from disk are.
    ///
    /// # Errors
    ///
    /// As [`Indexer::index_source`].
    pub fn index_bytes(
        &mut self,
        source: &[u8],
        label: impl AsRef<Path>,
        registry: &mut Registry,
    ) -> std::result::Result<UnitSummary, IndexError> {
        let text = scan::decode_lossy(source);
        self.index_source(&text, label, registry)
    }

    /// Index a list of files, isolating failures per unit.
    ///
    /// Units are merged into `registry` in the order given, whether they were
    /// parsed in parallel or not.
    pub fn index_paths(&mut self, paths: &[PathBuf], registry: &mut Registry) -> IndexStats {
        let start = Instant::now();
        let results = if self.config.parallel {
            parallel::parse_units(paths, &self.config)
        } else {
            paths
                .iter()
                .map(|path| index_file(&mut self.parser, path, &self.config))
                .collect()
        };

        let mut stats = IndexStats::default();
        for result in results {
            match result {
                Ok(unit) => {
                    let summary = self.commit(registry, unit);
                    stats.totals.absorb(&summary);
                    stats.units_indexed += 1;
                }
                Err(error) => {
                    warn!(
                        path = %error.path.display(),
                        kind = %error.kind,
                        error = %error.message,
                        "Failed to index unit"
                    );
                    stats.units_failed += 1;
                    stats.errors.push(error);
                }
            }
        }
        stats.duration = start.elapsed();

        info!(
            indexed = stats.units_indexed,
            failed = stats.units_failed,
            classes = stats.totals.classes_registered,
            methods = stats.totals.methods_registered,
            calls = stats.totals.calls_found,
            duration_ms = stats.duration.as_millis(),
            "Indexing complete"
        );
        stats
    }

    /// Index every source file under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `root` cannot be read. Failures inside the
    /// tree are reported in the returned [`IndexStats`].
    pub fn index_directory(&mut self, root: &Path, registry: &mut Registry) -> Result<IndexStats> {
        let start = Instant::now();
        let discovery = discover_sources(root, &self.config)?;
        let mut stats = self.index_paths(&discovery.files, registry);
        stats.directories_skipped = discovery.directories_skipped;
        stats.duration = start.elapsed();
        Ok(stats)
    }

    /// Merge a unit into the session and correct its counters for what the
    /// session already held.
    fn commit(&self, registry: &mut Registry, unit: ParsedUnit) -> UnitSummary {
        let mut summary = unit.summary;
        let outcome = registry.merge(unit.registry, self.config.duplicate_classes);

        summary.classes_registered = outcome.classes_added;
        summary.duplicate_classes += outcome.duplicate_classes;
        summary.methods_dropped += outcome.methods_dropped;
        summary.methods_registered = summary
            .methods_registered
            .saturating_sub(outcome.methods_dropped);

        debug!(
            path = %unit.path.display(),
            added = outcome.classes_added,
            duplicates = outcome.duplicate_classes,
            "Merged unit"
        );
        summary
    }
}
