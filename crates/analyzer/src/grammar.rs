use crate::language::Language;
use std::collections::HashMap;

/// Immutable map from language tag to tree-sitter grammar.
///
/// Built once at startup and handed to every analyzer by reference, so callers
/// (and tests) decide exactly which languages get a real parse.
#[derive(Clone, Default)]
pub struct GrammarRegistry {
    grammars: HashMap<String, tree_sitter::Language>,
}

impl GrammarRegistry {
    /// Registry without any grammar: every file goes through the line scanner
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every bundled grammar
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::builder()
            .register(
                Language::TypeScript.as_str(),
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            )
            .register(
                Language::TypeScriptReact.as_str(),
                tree_sitter_typescript::LANGUAGE_TSX.into(),
            )
            .register(
                Language::JavaScript.as_str(),
                tree_sitter_javascript::LANGUAGE.into(),
            )
            .register(
                Language::JavaScriptReact.as_str(),
                tree_sitter_javascript::LANGUAGE.into(),
            )
            .register(Language::Python.as_str(), tree_sitter_python::LANGUAGE.into())
            .register(Language::Rust.as_str(), tree_sitter_rust::LANGUAGE.into())
            .build()
    }

    #[must_use]
    pub fn builder() -> GrammarRegistryBuilder {
        GrammarRegistryBuilder::default()
    }

    /// Grammar for a language tag, if registered
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&tree_sitter::Language> {
        self.grammars.get(tag)
    }

    #[must_use]
    pub fn supports(&self, tag: &str) -> bool {
        self.grammars.contains_key(tag)
    }

    /// Registered tags, sorted
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl std::fmt::Debug for GrammarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Collects grammars before freezing them into a [`GrammarRegistry`]
#[derive(Default)]
pub struct GrammarRegistryBuilder {
    grammars: HashMap<String, tree_sitter::Language>,
}

impl GrammarRegistryBuilder {
    #[must_use]
    pub fn register(mut self, tag: impl Into<String>, grammar: tree_sitter::Language) -> Self {
        self.grammars.insert(tag.into(), grammar);
        self
    }

    #[must_use]
    pub fn build(self) -> GrammarRegistry {
        GrammarRegistry {
            grammars: self.grammars,
        }
    }
}
