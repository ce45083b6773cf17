//! # Tourgen Analyzer
//!
//! Language-agnostic structural summaries of source files: classes, functions,
//! methods, interfaces and raw import/export statements, each with 1-based
//! line positions.
//!
//! ## Architecture
//!
//! ```text
//! Source Code + language tag
//!     │
//!     ├──> Grammar registry lookup (explicit, injected)
//!     │
//!     ├──> Tree-sitter parse → NodeKind classification
//!     │    ├─> Export wrappers unwrapped one level
//!     │    ├─> Bindings classified by bound value
//!     │    └─> Class bodies own their methods
//!     │
//!     └──> Fallback: line scanner (indentation-scoped classes)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tourgen_analyzer::{GrammarRegistry, StructuralAnalyzer};
//!
//! let grammars = GrammarRegistry::with_defaults();
//! let analyzer = StructuralAnalyzer::new(&grammars);
//!
//! let analysis = analyzer.analyze("src/app.ts", "export class App {\n  run() {}\n}\n", "typescript");
//! assert_eq!(analysis.elements[0].name, "App");
//! assert_eq!(analysis.elements[0].children[0].name, "run");
//! ```

mod analyzer;
mod ast_analyzer;
mod error;
mod grammar;
mod imports;
mod language;
mod line_scanner;
mod node_kind;
mod types;

pub use analyzer::StructuralAnalyzer;
pub use error::{AnalyzerError, Result};
pub use grammar::{GrammarRegistry, GrammarRegistryBuilder};
pub use imports::module_specifiers;
pub use language::Language;
pub use node_kind::NodeKind;
pub use types::{CodeElement, ElementKind, FileAnalysis, ProjectStructure, ANONYMOUS};

/// Borrowed input of one analysis
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceFile<'a> {
    pub path: &'a str,
    pub content: &'a str,
    pub language: &'a str,
}
