//! Resolution of import paths against the importing file's directory.

use crate::error::ScanError;

/// Resolves one import written in the source at `importer`.
///
/// Imports starting with `.` are relative: they are joined onto the
/// importer's directory and normalized, and must stay inside the contracts
/// directory. Any other import is already canonical and is returned
/// unchanged.
pub fn resolve_import(importer: &str, import: &str) -> Result<String, ScanError> {
    if !import.starts_with('.') {
        return Ok(import.to_string());
    }

    let dir = importer.rsplit_once('/').map_or("", |(dir, _)| dir);
    let mut parts: Vec<&str> = dir.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    for segment in import.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(ScanError::ImportEscapesRoot {
                        importer: importer.to_string(),
                        import: import.to_string(),
                    });
                }
            }
            other => parts.push(other),
        }
    }
    Ok(parts.join("/"))
}

/// Resolves every import of the source at `importer`, failing on the first
/// import that escapes the contracts directory.
pub fn resolve_imports(importer: &str, imports: &[String]) -> Result<Vec<String>, ScanError> {
    imports.iter().map(|i| resolve_import(importer, i)).collect()
}
