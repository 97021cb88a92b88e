use crate::classify::classify;
use crate::error::{ResolveError, Result};
use crate::stdlib::StdLib;
use crate::types::{Classification, PackageRef, PkgKind, Roots};
use gop_imports::{extract_imports, BuildContext, PackageReader};
use std::collections::HashSet;
use std::path::Path;

/// Walks the import graph of a package and flattens it into a dependency list
pub struct Resolver<'a, R: PackageReader> {
    roots: &'a Roots,
    std: &'a StdLib,
    reader: R,
    ctx: BuildContext,
    include_tests: bool,
}

/// Per-run traversal state
#[derive(Default)]
struct Walk {
    seen: HashSet<String>,
    out: Vec<PackageRef>,
}

impl<'a, R: PackageReader> Resolver<'a, R> {
    pub fn new(roots: &'a Roots, std: &'a StdLib, reader: R) -> Self {
        Self {
            roots,
            std,
            reader,
            ctx: BuildContext::host(),
            include_tests: false,
        }
    }

    pub fn build_context(mut self, ctx: BuildContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Follow test imports of every visited package
    pub fn include_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    pub fn roots(&self) -> &Roots {
        self.roots
    }

    /// Classify a single name against this resolver's roots
    pub fn classify(&self, name: &str) -> Result<Classification> {
        classify(name, self.roots, self.std)
    }

    /// All non-standard packages reachable from the package at `src_dir`.
    ///
    /// Pre-order depth-first: each package is followed immediately by its
    /// own dependencies. A name appears at most once. Absent packages are
    /// recorded but not followed. Any error discards the whole walk.
    pub fn list_imports(&mut self, import_path: &str, src_dir: &Path) -> Result<Vec<PackageRef>> {
        log::debug!(
            "Import/root path: {} : {}",
            import_path,
            self.roots.project_src.display()
        );
        let mut walk = Walk::default();
        self.walk(import_path, src_dir, &mut walk)?;
        Ok(walk.out)
    }

    fn walk(&mut self, import_path: &str, dir: &Path, walk: &mut Walk) -> Result<()> {
        log::debug!("Source path: {}", dir.display());
        let imports = extract_imports(
            &mut self.reader,
            import_path,
            dir,
            &self.ctx,
            self.include_tests,
        )
        .map_err(|e| ResolveError::extract(import_path, e))?;

        for name in imports {
            if !walk.seen.insert(name.clone()) {
                continue;
            }

            let class = classify(&name, self.roots, self.std)?;
            log::debug!("Found dependency: {} ({})", name, class.kind);
            if class.kind == PkgKind::StandardLibrary {
                continue;
            }

            let next = class.dir.clone();
            walk.out.push(PackageRef::new(name.as_str(), class));
            if let Some(next) = next {
                self.walk(&name, &next, walk)?;
            }
        }
        Ok(())
    }
}
