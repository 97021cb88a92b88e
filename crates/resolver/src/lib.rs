//! # Gop Resolver
//!
//! Classifies Go import paths by where they live and walks a package's
//! transitive import graph.
//!
//! ## Architecture
//!
//! ```text
//! list_imports(main)
//!     │
//!     ├──> extract_imports (gop-imports)
//!     │
//!     └──> for each import, in declaration order
//!          ├─> seen before?            → skip
//!          ├─> classify
//!          │    ├─> <project>/src/<name>          ProjectSource
//!          │    ├─> <project>/src/vendor/<name>   ProjectVendor (needs *.go)
//!          │    ├─> <global>/src[/vendor]/<name>  GlobalWorkspace
//!          │    ├─> standard library prefix       StandardLibrary (dropped)
//!          │    └─> nowhere                       GlobalWorkspace, absent
//!          ├─> record PackageRef
//!          └─> present → recurse into its directory
//! ```

mod classify;
mod error;
mod stdlib;
mod types;
mod walker;

pub use classify::{classify, dir_exists, has_go_files, validate_import_path};
pub use error::{ResolveError, Result};
pub use stdlib::StdLib;
pub use types::{Classification, GlobalLookup, PackageRef, PkgKind, Roots};
pub use walker::Resolver;
