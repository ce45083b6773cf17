use serde::Serialize;
use tourgen_analyzer::{CodeElement, FileAnalysis, ProjectStructure};

/// Import statements carried per file
const MAX_IMPORTS: usize = 8;
const MAX_EXPORTS: usize = 8;
/// Top-level elements carried per file
const MAX_ELEMENTS: usize = 40;
const MAX_METHODS: usize = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementDigest<'a> {
    kind: &'static str,
    name: &'a str,
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_line: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    methods: Vec<MemberDigest<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    classes: Vec<MemberDigest<'a>>,
}

#[derive(Debug, Serialize)]
struct MemberDigest<'a> {
    name: &'a str,
    line: usize,
}

/// Compact per-file summary sent to the service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileDigest<'a> {
    file: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    entry_point: bool,
    lines: usize,
    elements: Vec<ElementDigest<'a>>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    imports: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    exports: &'a [String],
}

impl<'a> FileDigest<'a> {
    fn new(analysis: &'a FileAnalysis, entry_point: bool) -> Self {
        Self {
            file: &analysis.file,
            language: &analysis.language,
            entry_point,
            lines: analysis.line_count,
            elements: analysis
                .elements
                .iter()
                .take(MAX_ELEMENTS)
                .map(element_digest)
                .collect(),
            imports: head(&analysis.imports, MAX_IMPORTS),
            exports: head(&analysis.exports, MAX_EXPORTS),
        }
    }
}

fn head(items: &[String], max: usize) -> &[String] {
    &items[..items.len().min(max)]
}

fn element_digest(element: &CodeElement) -> ElementDigest<'_> {
    let (classes, methods): (Vec<&CodeElement>, Vec<&CodeElement>) = element
        .children
        .iter()
        .partition(|child| child.kind.is_class_like());
    ElementDigest {
        kind: element.kind.as_str(),
        name: &element.name,
        line: element.start_line,
        end_line: (element.end_line > element.start_line).then_some(element.end_line),
        methods: members(methods),
        classes: members(classes),
    }
}

fn members(children: Vec<&CodeElement>) -> Vec<MemberDigest<'_>> {
    children
        .into_iter()
        .take(MAX_METHODS)
        .map(|child| MemberDigest {
            name: &child.name,
            line: child.start_line,
        })
        .collect()
}

/// Compact JSON digest of the given files, in the given order.
///
/// Paths missing from the structure are skipped.
pub fn digest_files(structure: &ProjectStructure, files: &[String]) -> String {
    let digests: Vec<FileDigest<'_>> = files
        .iter()
        .filter_map(|file| structure.file(file))
        .map(|analysis| FileDigest::new(analysis, structure.is_entry_point(&analysis.file)))
        .collect();
    serde_json::to_string(&digests).unwrap_or_else(|e| {
        log::warn!("Failed to serialize digest: {e}");
        "[]".to_string()
    })
}

/// One-paragraph overview of the whole project
pub fn project_summary(structure: &ProjectStructure) -> String {
    let languages = structure.languages();
    let mut summary = format!(
        "{} analyzed file{}",
        structure.files.len(),
        if structure.files.len() == 1 { "" } else { "s" }
    );
    if !languages.is_empty() {
        summary.push_str(&format!(" ({})", languages.join(", ")));
    }
    summary.push('.');
    if !structure.entry_points.is_empty() {
        let entries: Vec<&str> = structure.entry_points.iter().map(String::as_str).collect();
        summary.push_str(&format!(" Entry points: {}.", entries.join(", ")));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tourgen_analyzer::ElementKind;

    fn structure() -> ProjectStructure {
        let mut index = FileAnalysis::empty("src/index.ts", "typescript");
        index.line_count = 20;
        index.imports = vec!["import { a } from './a'".to_string()];
        index.elements = vec![
            CodeElement::new(ElementKind::Class, "App", "src/index.ts", 3, 12).with_child(
                CodeElement::new(ElementKind::Method, "run", "src/index.ts", 5, 7),
            ),
        ];
        let mut util = FileAnalysis::empty("src/util.py", "python");
        util.line_count = 2;
        util.elements = vec![CodeElement::new(
            ElementKind::Function,
            "helper",
            "src/util.py",
            1,
            1,
        )];

        ProjectStructure {
            files: vec![index, util],
            entry_points: ["src/index.ts".to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn digest_is_compact_and_ordered() {
        let digest = digest_files(
            &structure(),
            &["src/util.py".to_string(), "src/index.ts".to_string(), "gone.ts".to_string()],
        );
        assert_eq!(
            digest,
            concat!(
                r#"[{"file":"src/util.py","language":"python","lines":2,"#,
                r#""elements":[{"kind":"function","name":"helper","line":1}]},"#,
                r#"{"file":"src/index.ts","language":"typescript","entryPoint":true,"lines":20,"#,
                r#""elements":[{"kind":"class","name":"App","line":3,"endLine":12,"#,
                r#""methods":[{"name":"run","line":5}]}],"#,
                r#""imports":["import { a } from './a'"]}]"#
            )
        );
    }

    #[test]
    fn nested_classes_are_listed_apart_from_methods() {
        let mut model = FileAnalysis::empty("app/models.py", "python");
        model.elements = vec![CodeElement::new(ElementKind::Class, "User", "app/models.py", 1, 6)
            .with_child(CodeElement::new(ElementKind::Class, "Meta", "app/models.py", 2, 3))
            .with_child(CodeElement::new(ElementKind::Method, "save", "app/models.py", 5, 6))];
        let structure = ProjectStructure {
            files: vec![model],
            ..Default::default()
        };

        let digest = digest_files(&structure, &["app/models.py".to_string()]);
        assert!(digest.contains(r#""methods":[{"name":"save","line":5}]"#), "{digest}");
        assert!(digest.contains(r#""classes":[{"name":"Meta","line":2}]"#), "{digest}");
    }

    #[test]
    fn summary_mentions_counts_and_entries() {
        assert_eq!(
            project_summary(&structure()),
            "2 analyzed files (typescript, python). Entry points: src/index.ts."
        );
        assert_eq!(project_summary(&ProjectStructure::default()), "0 analyzed files.");
    }
}
