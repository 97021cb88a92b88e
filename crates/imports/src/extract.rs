use crate::context::BuildContext;
use crate::error::Result;
use crate::reader::PackageReader;
use std::path::Path;

/// Direct imports of the package at `dir` that name real packages.
///
/// Test imports are appended when `include_tests` is set. A directory with
/// no buildable Go files yields an empty list.
pub fn extract_imports<R: PackageReader + ?Sized>(
    reader: &mut R,
    import_path: &str,
    dir: &Path,
    ctx: &BuildContext,
    include_tests: bool,
) -> Result<Vec<String>> {
    let pkg = match reader.read_package(import_path, dir, ctx) {
        Ok(pkg) => pkg,
        Err(err) if err.is_no_buildable_source() => {
            log::info!("Getting imports of {import_path}: {err}");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let mut raw = pkg.imports;
    if include_tests {
        raw.extend(pkg.test_imports);
    }

    let mut imports: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        if !is_resolvable(&name) || imports.contains(&name) {
            continue;
        }
        imports.push(name);
    }
    Ok(imports)
}

/// False for the cgo pseudo-package and relative import paths
pub fn is_resolvable(import: &str) -> bool {
    import != "C"
        && import != "."
        && import != ".."
        && !import.starts_with("./")
        && !import.starts_with("../")
}
