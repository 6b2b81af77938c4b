//! Parallel unit indexing.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        index_paths                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Phase 1 (Parallel):   rayon map_init, one parser per worker │
//! │                        → ParsedUnit (local Registry) per path │
//! │  Phase 2 (Sequential): merge local registries in path order   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results come back in input order, so merging them one by one gives the
//! same registry a sequential run would.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use crate::config::IndexerConfig;
use crate::error::{IndexError, IndexErrorKind};
use crate::parser::JavaParser;
use crate::unit::{ParsedUnit, index_file};

/// Parse and walk every path on the rayon pool.
///
/// Each worker builds its own parser once and reuses it for every path it
/// is handed. The output has one entry per input path, in input order.
pub fn parse_units(
    paths: &[PathBuf],
    config: &IndexerConfig,
) -> Vec<Result<ParsedUnit, IndexError>> {
    debug!(units = paths.len(), "Parsing units in parallel");
    paths
        .par_iter()
        .map_init(
            || {
                JavaParser::new().map(|mut parser| {
                    parser.set_timeout(config.unit_timeout_ms);
                    parser
                })
            },
            |parser, path| match parser {
                Ok(parser) => index_file(parser, path, config),
                Err(e) => Err(IndexError::new(
                    path.clone(),
                    IndexErrorKind::ParseFailed,
                    e.to_string(),
                )),
            },
        )
        .collect()
}
