use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a package physically lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PkgKind {
    /// Shipped with the toolchain
    StandardLibrary,

    /// `<project>/src/<name>`
    ProjectSource,

    /// `<project>/src/vendor/<name>`
    ProjectVendor,

    /// `$GOPATH/src/<name>` (also used for packages found nowhere)
    GlobalWorkspace,

    #[default]
    Unknown,
}

impl PkgKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PkgKind::StandardLibrary => "std",
            PkgKind::ProjectSource => "project",
            PkgKind::ProjectVendor => "vendor",
            PkgKind::GlobalWorkspace => "global",
            PkgKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PkgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one import path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: PkgKind,
    pub present: bool,

    /// Matched package directory; `None` for the standard library and absent packages
    pub dir: Option<PathBuf>,
}

impl Classification {
    pub(crate) fn found(kind: PkgKind, dir: PathBuf) -> Self {
        Self {
            kind,
            present: true,
            dir: Some(dir),
        }
    }

    pub(crate) fn standard() -> Self {
        Self {
            kind: PkgKind::StandardLibrary,
            present: true,
            dir: None,
        }
    }

    pub(crate) fn missing() -> Self {
        Self {
            kind: PkgKind::GlobalWorkspace,
            present: false,
            dir: None,
        }
    }
}

/// One entry of a dependency list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    /// Import path
    pub name: String,

    pub kind: PkgKind,

    pub present: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, classification: Classification) -> Self {
        Self {
            name: name.into(),
            kind: classification.kind,
            present: classification.present,
            dir: classification.dir,
        }
    }
}

/// Order in which the global workspace is searched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalLookup {
    /// `<global>/src/vendor/<name>`, then `<global>/src/<name>`
    #[default]
    VendorThenFlat,

    /// `<global>/src/<name>`, then `<global>/src/vendor/<name>`
    FlatThenVendor,

    /// Only `<global>/src/<name>`
    FlatOnly,
}

/// The fixed roots every classification in one run is relative to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    /// `<project>/src`
    pub project_src: PathBuf,

    /// `<project>/src/vendor`
    pub project_vendor: PathBuf,

    /// `<global>/src`
    pub global_src: PathBuf,

    pub global_lookup: GlobalLookup,
}

impl Roots {
    /// Standard layout for a project root and a global workspace root
    pub fn new(project_root: impl AsRef<Path>, global_root: impl AsRef<Path>) -> Self {
        let project_src = project_root.as_ref().join("src");
        Self {
            project_vendor: project_src.join("vendor"),
            project_src,
            global_src: global_root.as_ref().join("src"),
            global_lookup: GlobalLookup::default(),
        }
    }

    pub fn with_global_lookup(mut self, lookup: GlobalLookup) -> Self {
        self.global_lookup = lookup;
        self
    }

    /// Global directories to search, in policy order
    pub fn global_candidates(&self) -> Vec<PathBuf> {
        let vendor = self.global_src.join("vendor");
        match self.global_lookup {
            GlobalLookup::VendorThenFlat => vec![vendor, self.global_src.clone()],
            GlobalLookup::FlatThenVendor => vec![self.global_src.clone(), vendor],
            GlobalLookup::FlatOnly => vec![self.global_src.clone()],
        }
    }
}
