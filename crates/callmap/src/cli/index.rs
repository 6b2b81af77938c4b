//! `callmap [ROOT]` implementation.

use std::path::PathBuf;

use callmap::{DuplicatePolicy, Indexer, IndexerConfig, OrphanPolicy, Registry, Report, render};
use colored::Colorize;

use super::display::print_stats;
use super::sample::{SAMPLE_JAVA, SAMPLE_LABEL};
use crate::OutputFormat;

/// Command-line settings, layered over the configuration file.
pub struct Options {
    /// Directory to index; `None` indexes the sample unit
    pub root: Option<PathBuf>,
    /// YAML configuration file
    pub config: Option<PathBuf>,
    /// Disable the thread pool
    pub sequential: bool,
    /// Per-unit parse budget override
    pub timeout_ms: Option<u64>,
    /// Use the merge duplicate policy
    pub merge_duplicates: bool,
    /// Orphan policy override
    pub orphans: Option<OrphanPolicy>,
    /// What to print
    pub format: OutputFormat,
}

impl Options {
    /// Load the configuration file (if any) and apply flag overrides.
    fn resolve_config(&self) -> Result<IndexerConfig, callmap::Error> {
        let mut config = match &self.config {
            Some(path) => IndexerConfig::load(path)?,
            None => IndexerConfig::default(),
        };
        if self.sequential {
            config.parallel = false;
        }
        if self.timeout_ms.is_some() {
            config.unit_timeout_ms = self.timeout_ms;
        }
        if self.merge_duplicates {
            config.duplicate_classes = DuplicatePolicy::Merge;
        }
        if let Some(policy) = self.orphans {
            config.orphan_methods = policy;
        }
        Ok(config)
    }
}

/// Run the index command.
pub fn run(options: &Options) -> Result<(), callmap::Error> {
    let config = options.resolve_config()?;
    let mut indexer = Indexer::with_config(config)?;
    let mut registry = Registry::new();

    match &options.root {
        Some(root) => {
            eprintln!("{} {}...", "Indexing".cyan().bold(), root.display());
            let stats = indexer.index_directory(root, &mut registry)?;
            print_stats(&stats);
        }
        None => {
            if let Err(e) = indexer.index_source(SAMPLE_JAVA, SAMPLE_LABEL, &mut registry) {
                eprintln!("{}: {e}", "warning".yellow().bold());
            }
        }
    }

    match options.format {
        OutputFormat::Text => print!("{}", Report::new(&registry)),
        OutputFormat::Json => println!("{}", render::to_json(&registry)?),
        OutputFormat::Both => {
            print!("{}", Report::new(&registry));
            println!("\n=== JSON ===");
            println!("{}", render::to_json(&registry)?);
        }
    }

    Ok(())
}
