//! Grammar-free fallback: line patterns and indentation instead of a parse tree.

use crate::types::{CodeElement, ElementKind, FileAnalysis};
use crate::SourceFile;
use regex::Regex;
use std::sync::OnceLock;

/// Identifiers that look like definitions but open control flow
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "with", "elif", "else", "function",
    "match", "loop", "until", "unless", "foreach", "sizeof", "typeof", "new",
];

fn class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<indent>\s*)(?:(?:export|default|public|private|protected|internal|abstract|final|sealed|static|pub(?:\([^)]*\))?|data|open)\s+)*(?:class|struct|object)\s+(?P<name>[A-Za-z_$][\w$]*)",
        )
        .unwrap_or_else(|e| unreachable!("class pattern is valid: {e}"))
    })
}

fn callable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<indent>\s*)(?P<mods>(?:(?:export|default|public|private|protected|internal|static|async|override|virtual|abstract|final|pub(?:\([^)]*\))?|def|fn|func|function|fun|sub)\s+)*)(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\((?P<rest>.*)$",
        )
        .unwrap_or_else(|e| unreachable!("callable pattern is valid: {e}"))
    })
}

/// Open class context bound to the indentation of its declaration
struct ClassContext {
    element: CodeElement,
    indent: usize,
}

/// Scan lines for declarations. Never fails.
pub(crate) fn scan(source: &SourceFile<'_>) -> FileAnalysis {
    let mut analysis = FileAnalysis::empty(source.path, source.language);
    let mut current: Option<ClassContext> = None;

    for (idx, line) in source.content.lines().enumerate() {
        let line_no = idx + 1;
        analysis.line_count = line_no;

        if line.contains("import ") {
            analysis.imports.push(line.trim().to_string());
        }
        if line.contains("export ") {
            analysis.exports.push(line.trim().to_string());
        }

        if let Some(caps) = class_pattern().captures(line) {
            if let Some(open) = current.take() {
                analysis.elements.push(open.element);
            }
            current = Some(ClassContext {
                element: CodeElement::new(
                    ElementKind::Class,
                    &caps["name"],
                    source.path,
                    line_no,
                    line_no,
                ),
                indent: indent_width(&caps["indent"]),
            });
            continue;
        }

        let Some((indent, name, is_async)) = match_callable(line) else {
            continue;
        };

        let inside_class = current
            .as_ref()
            .is_some_and(|open| indent > open.indent);

        if inside_class {
            if let Some(open) = current.as_mut() {
                open.element.children.push(CodeElement::new(
                    ElementKind::Method,
                    name,
                    source.path,
                    line_no,
                    line_no,
                ));
            }
            continue;
        }

        if let Some(open) = current.take() {
            analysis.elements.push(open.element);
        }
        let kind = if is_async {
            ElementKind::AsyncFunction
        } else {
            ElementKind::Function
        };
        analysis
            .elements
            .push(CodeElement::new(kind, name, source.path, line_no, line_no));
    }

    if let Some(open) = current.take() {
        analysis.elements.push(open.element);
    }

    analysis
}

/// Match a function or method definition line: `(indent, name, async)`
fn match_callable(line: &str) -> Option<(usize, &str, bool)> {
    let caps = callable_pattern().captures(line)?;
    let name = caps.name("name")?.as_str();
    if CONTROL_KEYWORDS.contains(&name) {
        return None;
    }

    // A definition opens a body; a bare call ends with `;` or `)`.
    let rest = caps.name("rest")?.as_str().trim_end();
    let opens_body = rest.ends_with('{') || rest.ends_with(':') || rest.ends_with("=>");
    if !opens_body {
        return None;
    }

    let mods = caps.name("mods").map_or("", |m| m.as_str());
    let is_async = mods.split_whitespace().any(|m| m == "async");
    Some((indent_width(&caps["indent"]), name, is_async))
}

/// Tabs count as four columns
fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}
