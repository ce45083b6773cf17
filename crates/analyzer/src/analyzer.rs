use crate::ast_analyzer;
use crate::error::Result;
use crate::grammar::GrammarRegistry;
use crate::line_scanner;
use crate::types::FileAnalysis;
use crate::SourceFile;

/// One way of turning source text into a [`FileAnalysis`]
type Strategy = fn(&GrammarRegistry, &SourceFile<'_>) -> Result<FileAnalysis>;

/// Strategies in preference order; the first one that succeeds wins
const STRATEGIES: &[(&str, Strategy)] = &[
    ("tree-sitter", ast_analyzer::analyze),
    ("line-scanner", scan_lines),
];

fn scan_lines(_: &GrammarRegistry, source: &SourceFile<'_>) -> Result<FileAnalysis> {
    Ok(line_scanner::scan(source))
}

/// Main analyzer interface
pub struct StructuralAnalyzer<'g> {
    grammars: &'g GrammarRegistry,
}

impl<'g> StructuralAnalyzer<'g> {
    #[must_use]
    pub fn new(grammars: &'g GrammarRegistry) -> Self {
        Self { grammars }
    }

    /// Analyze one file.
    ///
    /// Never fails: a file without a grammar, or one the grammar cannot parse,
    /// is handed to the line scanner.
    pub fn analyze(&self, file_path: &str, content: &str, language: &str) -> FileAnalysis {
        let source = SourceFile {
            path: file_path,
            content,
            language,
        };

        for (name, strategy) in STRATEGIES {
            match strategy(self.grammars, &source) {
                Ok(analysis) => {
                    log::debug!(
                        "Analyzed {file_path} with {name}: {} elements",
                        analysis.element_count()
                    );
                    return analysis;
                }
                Err(e) => log::debug!("{name} analysis of {file_path} failed, falling back: {e}"),
            }
        }

        // The line scanner cannot fail; keep the contract even if the chain changes.
        line_scanner::scan(&source)
    }

    #[must_use]
    pub fn grammars(&self) -> &GrammarRegistry {
        self.grammars
    }
}
