/// Closed classification of syntax node kinds across the bundled grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ClassDecl,
    FunctionDecl,
    MethodDecl,
    InterfaceDecl,
    EnumDecl,
    /// Wrapper around a declaration (`export ...`, Python decorators)
    ExportWrapper,
    /// Binding whose classification depends on the bound value
    VariableDecl,
    Other,
}

impl NodeKind {
    /// Map a parser-reported node kind to its classification.
    ///
    /// Unknown kinds map to [`NodeKind::Other`].
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "class_declaration"
            | "abstract_class_declaration"
            | "class"
            | "class_definition"
            | "struct_item"
            | "impl_item" => Self::ClassDecl,

            "function_declaration"
            | "generator_function_declaration"
            | "function_definition"
            | "function_item" => Self::FunctionDecl,

            "method_definition" | "abstract_method_signature" => Self::MethodDecl,

            "interface_declaration" | "trait_item" => Self::InterfaceDecl,

            "enum_declaration" | "enum_item" => Self::EnumDecl,

            "export_statement" | "decorated_definition" => Self::ExportWrapper,

            "lexical_declaration" | "variable_declaration" | "const_item" | "static_item" => {
                Self::VariableDecl
            }

            _ => Self::Other,
        }
    }

    /// Kinds that may be nested under a class as children
    pub fn is_callable(self) -> bool {
        matches!(self, Self::FunctionDecl | Self::MethodDecl)
    }
}

/// Node kinds that bind a function literal
pub(crate) fn is_function_literal(kind: &str) -> bool {
    matches!(
        kind,
        "arrow_function"
            | "function_expression"
            | "function"
            | "generator_function"
            | "closure_expression"
            | "lambda"
    )
}

/// Node kinds collected as raw import statements
pub(crate) fn is_import_kind(kind: &str) -> bool {
    kind.contains("import") || kind == "use_declaration"
}

/// Node kinds collected as raw export statements
pub(crate) fn is_export_kind(kind: &str) -> bool {
    kind.contains("export")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_declarations() {
        assert_eq!(NodeKind::from_kind("class_declaration"), NodeKind::ClassDecl);
        assert_eq!(NodeKind::from_kind("class_definition"), NodeKind::ClassDecl);
        assert_eq!(
            NodeKind::from_kind("function_declaration"),
            NodeKind::FunctionDecl
        );
        assert_eq!(NodeKind::from_kind("method_definition"), NodeKind::MethodDecl);
        assert_eq!(
            NodeKind::from_kind("interface_declaration"),
            NodeKind::InterfaceDecl
        );
        assert_eq!(NodeKind::from_kind("enum_declaration"), NodeKind::EnumDecl);
        assert_eq!(NodeKind::from_kind("export_statement"), NodeKind::ExportWrapper);
        assert_eq!(
            NodeKind::from_kind("lexical_declaration"),
            NodeKind::VariableDecl
        );
    }

    #[test]
    fn unknown_kinds_are_other() {
        assert_eq!(NodeKind::from_kind("program"), NodeKind::Other);
        assert_eq!(NodeKind::from_kind(""), NodeKind::Other);
        assert_eq!(NodeKind::from_kind("totally_new_node"), NodeKind::Other);
    }

    #[test]
    fn import_export_kinds() {
        assert!(is_import_kind("import_statement"));
        assert!(is_import_kind("import_from_statement"));
        assert!(is_import_kind("use_declaration"));
        assert!(is_export_kind("export_statement"));
        assert!(!is_export_kind("class_declaration"));
    }
}
