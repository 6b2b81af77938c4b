//! Language-specific extraction.
//!
//! Each supported language implements `LanguageSupport`, which tells the
//! parser which grammar to load and which files belong to it. Java is the only
//! language the indexer walks today; the trait keeps grammar loading separate
//! from the traversal so the parse tree provider can be swapped in tests.

pub mod java;
pub mod tree_sitter_utils;

/// Grammar and file-type information for one language.
pub trait LanguageSupport: Send + Sync {
    /// Human-readable language name.
    fn name(&self) -> &'static str;

    /// File extensions this language handles.
    fn extensions(&self) -> &[&str];

    /// Get the tree-sitter language for parsing.
    fn tree_sitter_language(&self) -> tree_sitter::Language;
}

/// Java language support.
pub struct JavaLanguage;

impl LanguageSupport for JavaLanguage {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &[&str] {
        &["java"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_language_extensions() {
        assert_eq!(JavaLanguage.extensions(), &["java"]);
        assert_eq!(JavaLanguage.name(), "java");
    }

    #[test]
    fn java_grammar_loads() {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&JavaLanguage.tree_sitter_language())
            .expect("tree-sitter-java language should be valid");
    }
}
