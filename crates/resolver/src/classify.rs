use crate::error::{ResolveError, Result};
use crate::stdlib::StdLib;
use crate::types::{Classification, PkgKind, Roots};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Decide which root holds `name`.
///
/// Precedence: project source, project vendor (only when it has `.go`
/// files), global workspace (per [`Roots::global_lookup`]), standard
/// library. Anything else is an absent global package.
pub fn classify(name: &str, roots: &Roots, std: &StdLib) -> Result<Classification> {
    validate_import_path(name)?;

    let project_dir = roots.project_src.join(name);
    if dir_exists(&project_dir)? {
        return Ok(Classification::found(PkgKind::ProjectSource, project_dir));
    }

    let vendor_dir = roots.project_vendor.join(name);
    if dir_exists(&vendor_dir)? {
        if has_go_files(&vendor_dir)? {
            return Ok(Classification::found(PkgKind::ProjectVendor, vendor_dir));
        }
        log::debug!(
            "{} has no Go files, not treating it as vendored",
            vendor_dir.display()
        );
    }

    for base in roots.global_candidates() {
        let dir = base.join(name);
        if dir_exists(&dir)? {
            return Ok(Classification::found(PkgKind::GlobalWorkspace, dir));
        }
    }

    if std.contains(name) {
        return Ok(Classification::standard());
    }

    Ok(Classification::missing())
}

/// Reject paths that could escape the roots
pub fn validate_import_path(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.starts_with('/')
        || name.contains('\\')
        || Path::new(name).is_absolute()
        || name
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(ResolveError::InvalidImportPath(name.to_string()));
    }
    Ok(())
}

/// `Ok(false)` when missing; an error when a file sits where a directory should be
pub fn dir_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(ResolveError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ResolveError::io(path, e)),
    }
}

/// Whether `dir` directly contains a `.go` file
pub fn has_go_files(dir: &Path) -> Result<bool> {
    let entries = fs::read_dir(dir).map_err(|e| ResolveError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ResolveError::io(dir, e))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "go") {
            return Ok(true);
        }
    }
    Ok(false)
}
