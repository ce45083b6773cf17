use regex::Regex;
use std::sync::OnceLock;

fn quoted_specifier() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?:from|import|require\s*\()\s*['"](?P<module>[^'"]+)['"]"#)
            .unwrap_or_else(|e| unreachable!("specifier pattern is valid: {e}"))
    })
}

fn python_specifier() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:from\s+(?P<from>[\w.]+)\s+import\b|import\s+(?P<import>[\w.]+))")
            .unwrap_or_else(|e| unreachable!("python pattern is valid: {e}"))
    })
}

fn rust_specifier() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?use\s+(?P<path>[\w:]+)")
            .unwrap_or_else(|e| unreachable!("rust pattern is valid: {e}"))
    })
}

/// Module specifiers referenced by raw import statements, in first-seen order.
///
/// Best effort: specifiers are not resolved against the file system.
pub fn module_specifiers(imports: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for statement in imports {
        let statement = statement.trim();
        let module = if let Some(caps) = quoted_specifier().captures(statement) {
            caps.name("module").map(|m| m.as_str().to_string())
        } else if let Some(caps) = python_specifier().captures(statement) {
            caps.name("from")
                .or_else(|| caps.name("import"))
                .map(|m| m.as_str().to_string())
        } else if let Some(caps) = rust_specifier().captures(statement) {
            caps.name("path")
                .map(|m| m.as_str().trim_end_matches("::").to_string())
        } else {
            None
        };

        if let Some(module) = module.filter(|s| !s.is_empty()) {
            if !found.contains(&module) {
                found.push(module);
            }
        }
    }

    found
}
