use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors raised by individual analysis strategies.
///
/// These never reach callers of [`crate::StructuralAnalyzer::analyze`]; a failing
/// strategy hands over to the next one in the chain.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// No grammar registered for the language tag
    #[error("No grammar registered for language: {0}")]
    NoGrammar(String),

    /// Tree-sitter rejected the grammar
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// Failed to parse the source code
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl AnalyzerError {
    /// Create a missing grammar error
    pub fn no_grammar(lang: impl Into<String>) -> Self {
        Self::NoGrammar(lang.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
