//! Shared identifier helpers for Go code generation.

use std::path::Path;

/// Check whether `s` is a valid Go identifier (letters, digits, underscores;
/// not starting with a digit; not a keyword).
pub fn is_go_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !is_go_keyword(s)
}

fn is_go_keyword(s: &str) -> bool {
    matches!(
        s,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}

/// Derive a Go package name from the last component of a directory path.
///
/// Characters that cannot appear in an identifier are dropped and the
/// result is lowercased (e.g., "internal/log-mw" -> "logmw").
pub fn package_name_from_dir(dir: &Path) -> Option<String> {
    let last = dir.file_name()?.to_str()?;
    let name: String = last
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect();
    is_go_identifier(&name).then_some(name)
}
