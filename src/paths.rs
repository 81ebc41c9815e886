//! Output filename derivation: turns an input path (or `stdin`) plus the
//! configured output target into the concrete filename for a given
//! recovery-edge index.

use std::path::Path;

/// Compute `<stem>` for an input path: strip any leading directory, then
/// strip a trailing `.gz` suffix if present. Standard input is represented
/// by the literal stem `"stdin"`.
pub fn derive_stem(input_path: Option<&Path>) -> String {
    let Some(path) = input_path else { return "stdin".to_string() };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    name.strip_suffix(".gz").map(str::to_string).unwrap_or(name)
}

/// The effective output base name before any split suffix is applied:
/// either the user's `-o NAME`, or `<stem>.recovered` when not specified.
pub fn derived_base(input_path: Option<&Path>, user_name: Option<&str>) -> String {
    match user_name {
        Some(name) => name.to_string(),
        None => format!("{}.recovered", derive_stem(input_path)),
    }
}

/// Build the filename for output artifact number `index` (1-based; only
/// meaningful in split mode, where it counts recovery edges plus the initial
/// artifact).
pub fn artifact_name(base: &str, split: bool, index: u32) -> String {
    if split {
        format!("{base}.{index}")
    } else {
        base.to_string()
    }
}
