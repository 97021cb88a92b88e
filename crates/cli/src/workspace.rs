use crate::project::{Project, Target};
use crate::toolchain::{self, GoEnv};
use anyhow::{Context as AnyhowContext, Result};
use gop_imports::{BuildContext, GoSourceReader, GO_RELEASE_MINOR};
use gop_resolver::{GlobalLookup, PackageRef, Resolver, Roots, StdLib};
use gop_vendor::Synchronizer;
use std::cell::OnceCell;
use std::env;
use std::path::Path;

/// Everything a dependency command needs: the project, the Go
/// environment, and the roots derived from both
pub struct Workspace {
    pub project: Project,
    pub go: GoEnv,
    pub roots: Roots,
    release_minor: OnceCell<u32>,
}

impl Workspace {
    /// Discover the project around the current directory
    pub fn open(lookup: Option<GlobalLookup>) -> Result<Self> {
        let cwd = env::current_dir().context("Cannot read current directory")?;
        let project = Project::discover(&cwd)?;
        let go = GoEnv::from_env()?;
        Ok(Self::new(project, go, lookup))
    }

    pub fn new(project: Project, go: GoEnv, lookup: Option<GlobalLookup>) -> Self {
        let lookup = lookup.unwrap_or(project.config.resolve.global_lookup);
        let roots = Roots::new(&project.root, &go.gopath).with_global_lookup(lookup);
        log::debug!(
            "Project {} at {}, global lookup {:?}",
            project.name(),
            project.root.display(),
            lookup
        );
        Self {
            project,
            go,
            roots,
            release_minor: OnceCell::new(),
        }
    }

    pub fn std(&self) -> &'static StdLib {
        StdLib::global(&self.go.go_bin)
    }

    /// Release the `go1.N` tags are checked against, asked of the toolchain once
    pub fn release_minor(&self) -> u32 {
        *self.release_minor.get_or_init(|| {
            toolchain::release_minor(&self.go.go_bin).unwrap_or_else(|| {
                log::debug!("Assuming go1.{GO_RELEASE_MINOR} release tags");
                GO_RELEASE_MINOR
            })
        })
    }

    /// Environment context plus configured and command-line tags
    pub fn build_context(&self, tags: Option<&str>) -> BuildContext {
        self.go
            .ctx
            .clone()
            .with_release_minor(self.release_minor())
            .with_tags(&self.project.config.resolve.tags)
            .with_tags(tags.unwrap_or_default())
    }

    pub fn target(&self, name: Option<&str>) -> Result<Target> {
        self.project.target(name)
    }

    /// Transitive non-standard dependencies of a target
    pub fn resolve_target(
        &self,
        target: &Target,
        include_tests: bool,
        tags: Option<&str>,
    ) -> Result<Vec<PackageRef>> {
        let dir = self.roots.project_src.join(target.dir());
        log::debug!("Resolving target {} in {}", target.name, dir.display());
        self.resolve_package(target.dir(), &dir, include_tests, tags)
    }

    /// Transitive non-standard dependencies of the package in `dir`
    pub fn resolve_package(
        &self,
        import_path: &str,
        dir: &Path,
        include_tests: bool,
        tags: Option<&str>,
    ) -> Result<Vec<PackageRef>> {
        let reader = GoSourceReader::new()?;
        let mut resolver = Resolver::new(&self.roots, self.std(), reader)
            .build_context(self.build_context(tags))
            .include_tests(include_tests);
        let deps = resolver.list_imports(import_path, dir)?;
        log::debug!("{import_path}: {} dependencies", deps.len());
        Ok(deps)
    }

    /// Repository-granular synchronizer over the project vendor tree
    pub fn synchronizer(&self, include_tests: bool) -> Synchronizer {
        Synchronizer::new(&self.roots.project_vendor)
            .upstream(self.roots.global_candidates())
            .include_tests(include_tests)
            .by_repository(true)
    }
}
