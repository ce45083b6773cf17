use crate::step::{GeneratedTourStep, TourStep};
use crate::welcome::WELCOME_MARKER;
use serde::{Deserialize, Serialize};
use tourgen_analyzer::ProjectStructure;

/// Validation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Input steps beyond this count are discarded (first come, first kept)
    pub max_steps: usize,

    /// Also clamp `line` to the target file's line count
    pub strict_line_bounds: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_steps: 50,
            strict_line_bounds: false,
        }
    }
}

/// Reconcile untrusted steps against the analyzed file set.
///
/// - Only index 0 may skip the file check, and only when its title carries
///   the welcome marker.
/// - An unknown file is rewritten to the first analyzed file with the same
///   basename (case-insensitive); otherwise the step is dropped.
/// - `line < 1` becomes 1.
/// - Relative order is preserved.
pub fn validate(
    steps: Vec<GeneratedTourStep>,
    structure: &ProjectStructure,
    options: &ValidationOptions,
) -> Vec<TourStep> {
    let input = steps.len();
    let mut validated = Vec::with_capacity(input.min(options.max_steps));

    for (index, step) in steps.into_iter().take(options.max_steps).enumerate() {
        if index == 0 && step.title.contains(WELCOME_MARKER) {
            let file = step.file.clone();
            validated.push(trusted(step, file, None));
            continue;
        }

        let Some(file) = resolve_file(&step.file, structure) else {
            log::debug!("Dropping step {:?}: unknown file {:?}", step.title, step.file);
            continue;
        };
        let max_line = options
            .strict_line_bounds
            .then(|| structure.file(&file).map(|a| a.line_count))
            .flatten()
            .filter(|count| *count > 0);
        validated.push(trusted(step, file, max_line));
    }

    if validated.len() != input {
        log::info!("Validated {} of {input} steps", validated.len());
    }
    validated
}

fn trusted(step: GeneratedTourStep, file: String, max_line: Option<usize>) -> TourStep {
    let clamp = |line: usize| match max_line {
        Some(max) => line.min(max),
        None => line,
    };
    TourStep {
        file,
        line: step.line.map(|line| clamp(line.max(1) as usize)),
        selection: step.selection.map(|selection| {
            let mut selection = selection.normalized();
            selection.start.line = clamp(selection.start.line);
            selection.end.line = clamp(selection.end.line);
            selection
        }),
        title: step.title,
        description: step.description,
    }
}

/// Known file, or the first same-basename match in structure order
fn resolve_file(file: &str, structure: &ProjectStructure) -> Option<String> {
    let normalized = file.trim().replace('\\', "/");
    let normalized = normalized.trim_start_matches("./").trim_start_matches('/');
    if normalized.is_empty() {
        return None;
    }
    if structure.contains_file(normalized) {
        return Some(normalized.to_string());
    }

    let basename = normalized.rsplit('/').next().unwrap_or(normalized);
    let remapped = structure
        .files
        .iter()
        .map(|analysis| analysis.file.as_str())
        .find(|known| {
            known
                .rsplit('/')
                .next()
                .is_some_and(|name| name.eq_ignore_ascii_case(basename))
        })?;
    log::debug!("Remapped step file {file:?} to {remapped:?}");
    Some(remapped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{Position, Selection};
    use pretty_assertions::assert_eq;
    use tourgen_analyzer::FileAnalysis;

    fn structure(files: &[(&str, usize)]) -> ProjectStructure {
        ProjectStructure {
            files: files
                .iter()
                .map(|(file, lines)| {
                    let mut analysis = FileAnalysis::empty(*file, "typescript");
                    analysis.line_count = *lines;
                    analysis
                })
                .collect(),
            ..Default::default()
        }
    }

    fn step(title: &str, file: &str, line: Option<i64>) -> GeneratedTourStep {
        GeneratedTourStep::new(title, file, line)
    }

    #[test]
    fn unknown_file_is_dropped() {
        let s = structure(&[("src/real.ts", 10)]);
        let out = validate(
            vec![step("x", "missing.ts", Some(3))],
            &s,
            &ValidationOptions::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn welcome_at_index_zero_is_kept_unchanged() {
        let s = structure(&[("src/real.ts", 10)]);
        let out = validate(
            vec![step("Welcome", "", Some(1))],
            &s,
            &ValidationOptions::default(),
        );
        assert_eq!(
            out,
            vec![TourStep {
                title: "Welcome".into(),
                file: String::new(),
                line: Some(1),
                description: String::new(),
                selection: None,
            }]
        );
    }

    #[test]
    fn welcome_exemption_only_at_index_zero() {
        let s = structure(&[("src/real.ts", 10)]);
        let out = validate(
            vec![
                step("Intro", "", Some(1)),
                step("Welcome again", "nowhere.md", Some(1)),
            ],
            &s,
            &ValidationOptions::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn basename_remap_is_case_insensitive_and_first_match() {
        let s = structure(&[("src/a/Util.ts", 10), ("src/b/util.ts", 10)]);
        let out = validate(
            vec![step("u", "lib/UTIL.ts", Some(2)), step("v", "./src/b/util.ts", None)],
            &s,
            &ValidationOptions::default(),
        );
        let files: Vec<&str> = out.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(files, vec!["src/a/Util.ts", "src/b/util.ts"]);
        assert_eq!(out[1].line, None);
    }

    #[test]
    fn lines_floor_at_one_without_upper_bound() {
        let s = structure(&[("a.ts", 5)]);
        let out = validate(
            vec![step("x", "a.ts", Some(-4)), step("y", "a.ts", Some(500))],
            &s,
            &ValidationOptions::default(),
        );
        assert_eq!(out[0].line, Some(1));
        assert_eq!(out[1].line, Some(500));
    }

    #[test]
    fn strict_mode_clamps_to_line_count() {
        let s = structure(&[("a.ts", 5)]);
        let mut long = step("y", "a.ts", Some(500));
        long.selection = Some(Selection {
            start: Position { line: 4, character: 0 },
            end: Position { line: 9, character: 2 },
        });
        let options = ValidationOptions {
            strict_line_bounds: true,
            ..Default::default()
        };
        let out = validate(vec![step("Welcome", "", Some(99)), long], &s, &options);
        assert_eq!(out[0].line, Some(99));
        assert_eq!(out[1].line, Some(5));
        let selection = out[1].selection.unwrap();
        assert_eq!((selection.start.line, selection.end.line), (4, 5));
    }

    #[test]
    fn truncates_to_max_steps_in_order() {
        let s = structure(&[("a.ts", 5), ("b.ts", 5)]);
        let steps = vec![
            step("1", "a.ts", None),
            step("2", "gone.ts", None),
            step("3", "b.ts", None),
            step("4", "a.ts", None),
        ];
        let options = ValidationOptions {
            max_steps: 3,
            ..Default::default()
        };
        let titles: Vec<String> = validate(steps, &s, &options)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["1", "3"]);
    }
}
