//! Tree-sitter parsing coordination.
//!
//! Wraps one tree-sitter parser with the Java grammar loaded. The parser is
//! stateful, so each worker thread owns its own `JavaParser` and reuses it for
//! every unit it handles.

use std::path::Path;

use tracing::debug;
use tree_sitter::{Parser, Tree};

use crate::error::{Error, IndexError, Result};
use crate::languages::{JavaLanguage, LanguageSupport};

/// A reusable parser with a grammar loaded.
pub struct JavaParser {
    parser: Parser,
    timeout_ms: Option<u64>,
}

impl std::fmt::Debug for JavaParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaParser")
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl JavaParser {
    /// Create a parser for Java sources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderUnavailable`] if the grammar is incompatible
    /// with the linked tree-sitter runtime.
    pub fn new() -> Result<Self> {
        Self::for_language(&JavaLanguage)
    }

    /// Create a parser for any supported language's grammar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderUnavailable`] if the grammar cannot be loaded.
    pub fn for_language(language: &dyn LanguageSupport) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|e| {
                Error::ProviderUnavailable(format!("{} grammar: {e}", language.name()))
            })?;
        debug!(language = language.name(), "Loaded tree-sitter grammar");
        Ok(Self {
            parser,
            timeout_ms: None,
        })
    }

    /// Limit how long a single parse may run. `None` removes the limit.
    pub fn set_timeout(&mut self, timeout_ms: Option<u64>) {
        self.timeout_ms = timeout_ms;
        self.parser
            .set_timeout_micros(timeout_ms.map_or(0, |ms| ms.saturating_mul(1000)));
    }

    /// The current per-parse budget.
    #[must_use]
    pub fn timeout(&self) -> Option<u64> {
        self.timeout_ms
    }

    /// Parse one unit.
    ///
    /// Syntax errors do not fail the parse; tree-sitter recovers and marks the
    /// damaged regions. Only a missing tree is an error, reported against `path`.
    pub fn parse(&mut self, source: &[u8], path: &Path) -> std::result::Result<Tree, IndexError> {
        if let Some(tree) = self.parser.parse(source, None) {
            if tree.root_node().has_error() {
                debug!(path = %path.display(), "Parsed with syntax errors, indexing recovered tree");
            }
            return Ok(tree);
        }

        // A parse that stops early leaves state behind; clear it before reuse.
        self.parser.reset();
        Err(match self.timeout_ms {
            Some(budget) => IndexError::timeout(path.to_path_buf(), budget),
            None => IndexError::parse_failed(path.to_path_buf(), "parser produced no tree"),
        })
    }
}
