//! # Gop Imports
//!
//! Reads just enough of a Go package to list what it imports.
//!
//! ## Architecture
//!
//! ```text
//! package dir
//!     │
//!     ├──> File selection (BuildContext)
//!     │    ├─> skip `_x.go`, `.x.go`
//!     │    ├─> `_GOOS` / `_GOARCH` file name suffixes
//!     │    └─> `//go:build` / `// +build` header constraints
//!     │
//!     ├──> Tree-sitter parse of package clause + import block
//!     │
//!     └──> extract_imports
//!          ├─> drop "C" and relative paths
//!          ├─> append test imports on request
//!          └─> NoBuildableSource → empty list
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use gop_imports::{extract_imports, BuildContext, GoSourceReader};
//! use std::path::Path;
//!
//! let mut reader = GoSourceReader::new().unwrap();
//! let ctx = BuildContext::host().with_tags("integration");
//! let imports = extract_imports(&mut reader, "main", Path::new("src/main"), &ctx, true).unwrap();
//! for name in imports {
//!     println!("{name}");
//! }
//! ```

mod constraint;
mod context;
mod error;
mod extract;
mod reader;

pub use constraint::{file_constraint, Constraint};
pub use context::{BuildContext, GO_RELEASE_MINOR, KNOWN_ARCH, KNOWN_OS};
pub use error::{ExtractError, Result};
pub use extract::{extract_imports, is_resolvable};
pub use reader::{GoSourceReader, PackageImports, PackageReader};
