use crate::error::{AnalyzerError, Result};
use crate::grammar::GrammarRegistry;
use crate::node_kind::{is_export_kind, is_function_literal, is_import_kind, NodeKind};
use crate::types::{CodeElement, ElementKind, FileAnalysis, ANONYMOUS};
use crate::SourceFile;
use tree_sitter::{Node, Parser};

/// Longest raw import statement kept after whitespace collapsing
const MAX_STATEMENT_CHARS: usize = 240;

/// Analyze a file with the grammar registered for its language tag
pub(crate) fn analyze(grammars: &GrammarRegistry, source: &SourceFile<'_>) -> Result<FileAnalysis> {
    let grammar = grammars
        .get(source.language)
        .ok_or_else(|| AnalyzerError::no_grammar(source.language))?;

    let mut parser = Parser::new();
    parser
        .set_language(grammar)
        .map_err(|e| AnalyzerError::tree_sitter(format!("Failed to set language: {e}")))?;

    let tree = parser
        .parse(source.content, None)
        .ok_or_else(|| AnalyzerError::parse("Failed to parse source code"))?;
    let root = tree.root_node();

    let walker = TreeWalker::new(source);

    let mut elements = Vec::new();
    walker.collect_elements(root, &mut elements);

    let mut imports = Vec::new();
    let mut exports = Vec::new();
    walker.collect_statements(root, &mut imports, &mut exports);

    Ok(FileAnalysis {
        file: source.path.to_string(),
        language: source.language.to_string(),
        elements,
        imports,
        exports,
        line_count: source.content.lines().count(),
    })
}

/// Walks one syntax tree and emits language-agnostic elements
struct TreeWalker<'a> {
    source: &'a str,
    file: &'a str,
}

impl<'a> TreeWalker<'a> {
    fn new(source: &SourceFile<'a>) -> Self {
        Self {
            source: source.content,
            file: source.path,
        }
    }

    /// Emit top-level elements below `node`.
    ///
    /// Unclassified nodes are transparent containers; declarations are not
    /// descended into, so function bodies never leak nested helpers.
    fn collect_elements(&self, node: Node, out: &mut Vec<CodeElement>) {
        for child in named_children(node) {
            match NodeKind::from_kind(child.kind()) {
                NodeKind::Other => self.collect_elements(child, out),
                _ => self.declaration(child, out),
            }
        }
    }

    fn declaration(&self, node: Node, out: &mut Vec<CodeElement>) {
        match NodeKind::from_kind(node.kind()) {
            NodeKind::ClassDecl => out.push(self.class_element(node)),
            NodeKind::FunctionDecl => out.push(self.function_element(node)),
            NodeKind::MethodDecl => out.push(self.leaf(node, ElementKind::Method)),
            NodeKind::InterfaceDecl => out.push(self.leaf(node, ElementKind::Interface)),
            NodeKind::EnumDecl => out.push(self.leaf(node, ElementKind::Enum)),
            NodeKind::VariableDecl => out.extend(self.variable_elements(node)),
            NodeKind::ExportWrapper => {
                // One level only: `export { a, b }` and friends carry no declaration.
                if let Some(inner) = unwrap_wrapper(node) {
                    if NodeKind::from_kind(inner.kind()) != NodeKind::Other {
                        self.declaration(inner, out);
                    }
                }
            }
            NodeKind::Other => {}
        }
    }

    /// Methods and nested classes become children; other members are skipped
    fn class_element(&self, node: Node) -> CodeElement {
        let name = if node.kind() == "impl_item" {
            self.impl_target(node)
        } else {
            self.symbol_name(node)
        };
        let mut class = CodeElement::new(
            ElementKind::Class,
            name.unwrap_or_else(|| ANONYMOUS.to_string()),
            self.file,
            start_line(node),
            end_line(node),
        );

        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(body) {
                let member = match NodeKind::from_kind(member.kind()) {
                    NodeKind::ExportWrapper => match unwrap_wrapper(member) {
                        Some(inner) => inner,
                        None => continue,
                    },
                    _ => member,
                };
                match NodeKind::from_kind(member.kind()) {
                    NodeKind::ClassDecl => class.children.push(self.class_element(member)),
                    kind if kind.is_callable() => {
                        class.children.push(self.leaf(member, ElementKind::Method));
                    }
                    _ => {}
                }
            }
        }

        class
    }

    fn function_element(&self, node: Node) -> CodeElement {
        let kind = if has_async_token(node) {
            ElementKind::AsyncFunction
        } else {
            ElementKind::Function
        };
        self.leaf(node, kind)
    }

    /// Bindings are classified by the value they bind
    fn variable_elements(&self, node: Node) -> Vec<CodeElement> {
        let declarators: Vec<Node> = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "variable_declarator")
            .collect();

        // Rust `const`/`static` items bind directly
        let bindings = if declarators.is_empty() {
            vec![node]
        } else {
            declarators
        };

        bindings
            .into_iter()
            .map(|binding| {
                let value = binding.child_by_field_name("value");
                let kind = match value {
                    Some(value) if is_function_literal(value.kind()) => {
                        if has_async_token(value) {
                            ElementKind::AsyncFunction
                        } else {
                            ElementKind::Function
                        }
                    }
                    _ => ElementKind::Variable,
                };
                self.leaf(binding, kind)
            })
            .collect()
    }

    fn leaf(&self, node: Node, kind: ElementKind) -> CodeElement {
        CodeElement::new(
            kind,
            self.symbol_name(node)
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            self.file,
            start_line(node),
            end_line(node),
        )
    }

    /// Collect raw import/export statements.
    ///
    /// Matching nodes are not descended into, so an `import_statement` is not
    /// reported again through its `import_clause`.
    fn collect_statements(&self, node: Node, imports: &mut Vec<String>, exports: &mut Vec<String>) {
        for child in named_children(node) {
            let kind = child.kind();
            if is_import_kind(kind) {
                if let Some(statement) = self.statement_text(child, true) {
                    imports.push(statement);
                }
            } else if is_export_kind(kind) {
                if let Some(statement) = self.statement_text(child, false) {
                    exports.push(statement);
                }
            } else {
                self.collect_statements(child, imports, exports);
            }
        }
    }

    fn statement_text(&self, node: Node, collapse: bool) -> Option<String> {
        let raw = self.text(node)?.trim();

        let cleaned = if collapse {
            // Multi-line imports keep their module specifier
            let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            truncate_chars(&collapsed, MAX_STATEMENT_CHARS)
        } else {
            raw.lines().next().unwrap_or(raw).trim().to_string()
        };
        let cleaned = cleaned.trim_end_matches(';').trim().to_string();

        // Bare keyword nodes (dynamic `import(...)` callee) carry no statement
        if cleaned.is_empty() || cleaned == "import" || cleaned == "export" {
            return None;
        }
        Some(cleaned)
    }

    /// Extract symbol name from AST node
    fn symbol_name(&self, node: Node) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return self.text(name).map(str::to_string);
        }

        named_children(node)
            .into_iter()
            .find(|child| {
                matches!(
                    child.kind(),
                    "identifier" | "name" | "type_identifier" | "property_identifier"
                )
            })
            .and_then(|child| self.text(child))
            .map(str::to_string)
    }

    /// Extract the target of an impl block (struct/trait name)
    fn impl_target(&self, node: Node) -> Option<String> {
        let target = node.child_by_field_name("type")?;
        match target.kind() {
            // impl<T> MyStruct<T>
            "generic_type" => target
                .child_by_field_name("type")
                .and_then(|inner| self.text(inner))
                .map(str::to_string),
            _ => self.text(target).map(str::to_string),
        }
    }

    fn text(&self, node: Node) -> Option<&'a str> {
        node.utf8_text(self.source.as_bytes()).ok()
    }
}

/// The declaration a wrapper (`export`, decorator) carries
fn unwrap_wrapper(node: Node) -> Option<Node> {
    node.child_by_field_name("declaration")
        .or_else(|| node.child_by_field_name("definition"))
        .or_else(|| {
            named_children(node)
                .into_iter()
                .find(|child| !matches!(child.kind(), "decorator" | "comment"))
        })
}

/// `async` among the node's immediate tokens (Rust keeps it in `function_modifiers`)
fn has_async_token(node: Node) -> bool {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.iter().any(|child| match child.kind() {
        "async" => true,
        "function_modifiers" => {
            let mut inner = child.walk();
            let found = child.children(&mut inner).any(|m| m.kind() == "async");
            found
        }
        _ => false,
    })
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

fn end_line(node: Node) -> usize {
    node.end_position().row + 1
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(path: &str, language: &str, content: &str) -> FileAnalysis {
        let grammars = GrammarRegistry::with_defaults();
        let source = SourceFile {
            path,
            content,
            language,
        };
        analyze(&grammars, &source).unwrap()
    }

    fn summary(elements: &[CodeElement]) -> Vec<(ElementKind, String, usize)> {
        elements
            .iter()
            .map(|e| (e.kind, e.name.clone(), e.start_line))
            .collect()
    }

    #[test]
    fn test_typescript_class_with_methods() {
        let code = r#"class Foo {
  private count = 0;

  bar(): void {
    this.count++;
  }

  async baz(): Promise<void> {
    await Promise.resolve();
  }
}
"#;
        let analysis = run("a.ts", "typescript", code);
        assert_eq!(analysis.elements.len(), 1);

        let class = &analysis.elements[0];
        assert_eq!(class.kind, ElementKind::Class);
        assert_eq!(class.name, "Foo");
        assert_eq!((class.start_line, class.end_line), (1, 11));
        assert_eq!(
            summary(&class.children),
            vec![
                (ElementKind::Method, "bar".to_string(), 4),
                (ElementKind::Method, "baz".to_string(), 8),
            ]
        );
    }

    #[test]
    fn test_const_arrow_functions_are_classified_by_value() {
        let code = r#"const add = (a: number, b: number) => a + b;
const load = async () => {
  return 1;
};
const LIMIT = 10;
"#;
        let analysis = run("util.ts", "typescript", code);
        assert_eq!(
            summary(&analysis.elements),
            vec![
                (ElementKind::Function, "add".to_string(), 1),
                (ElementKind::AsyncFunction, "load".to_string(), 2),
                (ElementKind::Variable, "LIMIT".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_export_wrapper_unwrapped_once() {
        let code = r#"import { readFile } from "fs";
export interface Options {
  verbose: boolean;
}
export enum Mode { A, B }
export async function main() {
  function helper() {}
}
export { Options as Opts };
"#;
        let analysis = run("main.ts", "typescript", code);
        assert_eq!(
            summary(&analysis.elements),
            vec![
                (ElementKind::Interface, "Options".to_string(), 2),
                (ElementKind::Enum, "Mode".to_string(), 5),
                (ElementKind::AsyncFunction, "main".to_string(), 6),
            ]
        );
        assert_eq!(analysis.imports, vec![r#"import { readFile } from "fs""#]);
        assert_eq!(analysis.exports.len(), 4);
        assert!(analysis.exports[0].starts_with("export interface Options"));
    }

    #[test]
    fn test_nested_class_is_a_child() {
        let code = r#"class Outer:
    class Meta:
        ordering = 1

    def run(self):
        pass
"#;
        let analysis = run("outer.py", "python", code);
        assert_eq!(analysis.elements.len(), 1);

        let outer = &analysis.elements[0];
        assert_eq!(
            summary(&outer.children),
            vec![
                (ElementKind::Class, "Meta".to_string(), 2),
                (ElementKind::Method, "run".to_string(), 5),
            ]
        );
        assert_eq!(outer.children[0].end_line, 3);
        assert!(outer.children[0].children.is_empty());
    }

    #[test]
    fn test_python_class_and_decorated_method() {
        let code = r#"import os
from typing import List

class Repo:
    def __init__(self, path):
        self.path = path

    @property
    def name(self):
        return os.path.basename(self.path)

async def fetch(url):
    pass
"#;
        let analysis = run("repo.py", "python", code);
        assert_eq!(analysis.elements.len(), 2);

        let class = &analysis.elements[0];
        assert_eq!(class.name, "Repo");
        assert_eq!(
            summary(&class.children),
            vec![
                (ElementKind::Method, "__init__".to_string(), 5),
                (ElementKind::Method, "name".to_string(), 9),
            ]
        );
        assert_eq!(analysis.elements[1].kind, ElementKind::AsyncFunction);
        assert_eq!(analysis.elements[1].name, "fetch");
        assert_eq!(analysis.imports, vec!["import os", "from typing import List"]);
    }

    #[test]
    fn test_rust_impl_methods_are_children() {
        let code = r#"use std::fmt;

pub struct Car;

impl Car {
    pub fn drive(&self) {}
    async fn park(&self) {}
}

pub async fn run() {}
"#;
        let analysis = run("car.rs", "rust", code);
        let names: Vec<_> = summary(&analysis.elements);
        assert_eq!(
            names,
            vec![
                (ElementKind::Class, "Car".to_string(), 3),
                (ElementKind::Class, "Car".to_string(), 5),
                (ElementKind::AsyncFunction, "run".to_string(), 10),
            ]
        );
        assert_eq!(
            summary(&analysis.elements[1].children),
            vec![
                (ElementKind::Method, "drive".to_string(), 6),
                (ElementKind::Method, "park".to_string(), 7),
            ]
        );
        assert_eq!(analysis.imports, vec!["use std::fmt"]);
    }

    #[test]
    fn test_missing_grammar_is_an_error() {
        let grammars = GrammarRegistry::empty();
        let source = SourceFile {
            path: "a.ts",
            content: "class A {}",
            language: "typescript",
        };
        assert!(matches!(
            analyze(&grammars, &source),
            Err(AnalyzerError::NoGrammar(_))
        ));
    }
}
