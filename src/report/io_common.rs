use std::path::{Path, PathBuf};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Resolves a source path against the directory of the configuration file.
pub fn resolve_path(root: Option<&Path>, file_path: &str) -> PathBuf {
    match root {
        Some(root) if Path::new(file_path).is_relative() => root.join(file_path),
        _ => PathBuf::from(file_path),
    }
}

/// A cell value, or None for a missing value.
pub fn normalize_cell(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// The file name of the chart of a column.
///
/// Path separators in the column name would escape the output directory:
/// they are replaced.
pub fn figure_file_name(identifier: &str) -> String {
    let name: String = identifier
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.jpg", name)
}
