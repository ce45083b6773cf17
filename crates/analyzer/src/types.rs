use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Name used for declarations that carry no identifier
pub const ANONYMOUS: &str = "<anonymous>";

/// Kind of a structural element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Class,
    Function,
    AsyncFunction,
    Method,
    Interface,
    Enum,
    Variable,
    Import,
}

impl ElementKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::AsyncFunction => "async-function",
            Self::Method => "method",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Variable => "variable",
            Self::Import => "import",
        }
    }

    /// Class-like elements own method children
    #[must_use]
    pub const fn is_class_like(self) -> bool {
        matches!(self, Self::Class)
    }
}

/// A named, positioned unit of code found in a file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeElement {
    pub kind: ElementKind,

    /// Identifier text, or [`ANONYMOUS`]
    pub name: String,

    /// Workspace-relative path
    pub file: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Methods nested under a class; empty for everything else
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CodeElement>,
}

impl CodeElement {
    /// Create a leaf element
    pub fn new(
        kind: ElementKind,
        name: impl Into<String>,
        file: impl Into<String>,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            file: file.into(),
            start_line,
            end_line: end_line.max(start_line),
            children: Vec::new(),
        }
    }

    /// Builder: attach a child element
    #[must_use]
    pub fn with_child(mut self, child: CodeElement) -> Self {
        self.children.push(child);
        self
    }

    /// Get the number of lines spanned by this element
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if element contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Count this element and all nested children
    #[must_use]
    pub fn total_count(&self) -> usize {
        1 + self.children.iter().map(Self::total_count).sum::<usize>()
    }
}

/// Structural summary of one file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub file: String,
    pub language: String,
    pub elements: Vec<CodeElement>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    /// Number of lines in the analyzed text
    #[serde(default)]
    pub line_count: usize,
}

impl FileAnalysis {
    /// Create an empty analysis for a file
    pub fn empty(file: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            language: language.into(),
            elements: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            line_count: 0,
        }
    }

    /// Count every element including nested methods
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.iter().map(CodeElement::total_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Aggregate structure of one generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStructure {
    pub root: PathBuf,
    pub files: Vec<FileAnalysis>,
    pub entry_points: BTreeSet<String>,
    /// file -> imported module specifiers (not resolved against the file system)
    pub dependencies: BTreeMap<String, Vec<String>>,
}

impl ProjectStructure {
    /// Check if a workspace-relative path was analyzed
    #[must_use]
    pub fn contains_file(&self, file: &str) -> bool {
        self.files.iter().any(|analysis| analysis.file == file)
    }

    /// Look up the analysis for a path
    #[must_use]
    pub fn file(&self, file: &str) -> Option<&FileAnalysis> {
        self.files.iter().find(|analysis| analysis.file == file)
    }

    /// Distinct language tags in first-seen order
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for analysis in &self.files {
            if !seen.contains(&analysis.language.as_str()) {
                seen.push(analysis.language.as_str());
            }
        }
        seen
    }

    #[must_use]
    pub fn is_entry_point(&self, file: &str) -> bool {
        self.entry_points.contains(file)
    }
}
