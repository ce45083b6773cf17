use crate::provider::WorkspaceFiles;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tourgen_analyzer::{module_specifiers, FileAnalysis, ProjectStructure, StructuralAnalyzer};

/// File stems treated as entry points
const ENTRY_STEMS: &[&str] = &["index", "main", "app"];

/// Read and analyze every file, in the given order.
///
/// A file that cannot be read is logged and skipped; the rest of the run
/// continues without it.
pub async fn build_structure(
    workspace: &dyn WorkspaceFiles,
    analyzer: &StructuralAnalyzer<'_>,
    files: &[String],
) -> ProjectStructure {
    let mut analyses: Vec<FileAnalysis> = Vec::with_capacity(files.len());

    for rel_path in files {
        let document = match workspace.read_document(rel_path).await {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Skipping {rel_path}: {e}");
                continue;
            }
        };
        analyses.push(analyzer.analyze(rel_path, &document.text, &document.language));
    }

    let entry_points: BTreeSet<String> = analyses
        .iter()
        .filter(|analysis| is_entry_point(&analysis.file))
        .map(|analysis| analysis.file.clone())
        .collect();

    let dependencies: BTreeMap<String, Vec<String>> = analyses
        .iter()
        .filter_map(|analysis| {
            let specs = module_specifiers(&analysis.imports);
            (!specs.is_empty()).then(|| (analysis.file.clone(), specs))
        })
        .collect();

    log::info!(
        "Analyzed {} files ({} entry points)",
        analyses.len(),
        entry_points.len()
    );

    ProjectStructure {
        root: workspace.root().to_path_buf(),
        files: analyses,
        entry_points,
        dependencies,
    }
}

/// `index`, `main` or `app`, whatever the extension
pub fn is_entry_point(rel_path: &str) -> bool {
    Path::new(rel_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| {
            ENTRY_STEMS
                .iter()
                .any(|entry| stem.eq_ignore_ascii_case(entry))
        })
}
