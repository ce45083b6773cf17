use std::path::Path;

/// Language recognised from a file extension.
///
/// The tag returned by [`Language::as_str`] is the key used by the grammar
/// registry and the `language` field of every analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    JavaScriptReact,
    TypeScript,
    TypeScriptReact,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Swift,
    Kotlin,
    Php,
    Unknown,
}

/// (language, tag, extensions)
const TABLE: &[(Language, &str, &[&str])] = &[
    (Language::Rust, "rust", &["rs"]),
    (Language::Python, "python", &["py", "pyw", "pyi"]),
    (Language::JavaScript, "javascript", &["js", "mjs", "cjs"]),
    (Language::JavaScriptReact, "javascriptreact", &["jsx"]),
    (Language::TypeScript, "typescript", &["ts", "mts", "cts"]),
    (Language::TypeScriptReact, "typescriptreact", &["tsx"]),
    (Language::Go, "go", &["go"]),
    (Language::Java, "java", &["java"]),
    (Language::C, "c", &["c", "h"]),
    (Language::Cpp, "cpp", &["cpp", "cc", "cxx", "hpp", "hh", "hxx"]),
    (Language::CSharp, "csharp", &["cs"]),
    (Language::Ruby, "ruby", &["rb"]),
    (Language::Swift, "swift", &["swift"]),
    (Language::Kotlin, "kotlin", &["kt", "kts"]),
    (Language::Php, "php", &["php"]),
];

const UNKNOWN_TAG: &str = "plaintext";

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        TABLE
            .iter()
            .find(|(_, _, exts)| exts.contains(&ext.as_str()))
            .map_or(Language::Unknown, |(lang, _, _)| *lang)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(Language::Unknown, Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        TABLE
            .iter()
            .find(|(lang, _, _)| *lang == self)
            .map_or(UNKNOWN_TAG, |(_, tag, _)| tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("mts"), Language::TypeScript);
        assert_eq!(Language::from_extension("tsx"), Language::TypeScriptReact);
        assert_eq!(Language::from_extension("md"), Language::Unknown);
    }

    #[test]
    fn paths_map_to_tags() {
        assert_eq!(Language::from_path("src/app.py").as_str(), "python");
        assert_eq!(Language::from_path("web/App.jsx").as_str(), "javascriptreact");
        assert_eq!(Language::from_path("Makefile").as_str(), "plaintext");
    }
}
