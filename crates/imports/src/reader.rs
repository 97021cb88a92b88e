use crate::constraint::file_constraint;
use crate::context::BuildContext;
use crate::error::{ExtractError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};


/// Imports and file lists of one package directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageImports {
    /// Package name from the package clause (without `_test`)
    pub name: String,

    /// Imports of non-test files, first occurrence order
    pub imports: Vec<String>,

    /// Imports of in-package and external test files
    pub test_imports: Vec<String>,

    pub go_files: Vec<String>,
    pub test_go_files: Vec<String>,

    /// Go files excluded by the build context
    pub ignored_files: Vec<String>,
}

/// Source of package metadata for a directory.
///
/// Implementations must report an empty package through
/// [`ExtractError::NoBuildableSource`] rather than an empty result.
pub trait PackageReader {
    fn read_package(
        &mut self,
        import_path: &str,
        dir: &Path,
        ctx: &BuildContext,
    ) -> Result<PackageImports>;
}

/// Reads Go packages by parsing package clauses and import declarations
pub struct GoSourceReader {
    parser: Parser,
}

struct FileHeader {
    package: String,
    imports: Vec<String>,
}

impl GoSourceReader {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| ExtractError::tree_sitter(format!("Failed to set language: {}", e)))?;
        Ok(Self { parser })
    }

    fn parse_header(&mut self, file: &Path, source: &str) -> Result<FileHeader> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::tree_sitter(format!("no tree for {}", file.display())))?;
        let root = tree.root_node();

        let mut package = None;
        let mut imports = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "comment" => {}
                "package_clause" => {
                    if child.has_error() {
                        return Err(syntax_error(file, child, "malformed package clause"));
                    }
                    let mut inner = child.walk();
                    package = child
                        .named_children(&mut inner)
                        .find(|n| n.kind() == "package_identifier")
                        .and_then(|n| node_text(n, source))
                        .map(str::to_string);
                }
                "import_declaration" => {
                    if package.is_none() {
                        return Err(syntax_error(file, child, "expected 'package', found 'import'"));
                    }
                    if child.has_error() {
                        return Err(syntax_error(file, child, "malformed import declaration"));
                    }
                    collect_import_specs(child, source, file, &mut imports)?;
                }
                "ERROR" => {
                    let text = node_text(child, source).unwrap_or_default().trim_start();
                    // Past the package clause only a broken import is fatal.
                    if package.is_some() && !text.starts_with("import") {
                        break;
                    }
                    return Err(syntax_error(file, child, "syntax error"));
                }
                // First other declaration ends the header.
                _ => break,
            }
        }

        let package =
            package.ok_or_else(|| ExtractError::parse(file, "expected 'package' clause"))?;
        Ok(FileHeader { package, imports })
    }
}

impl PackageReader for GoSourceReader {
    fn read_package(
        &mut self,
        import_path: &str,
        dir: &Path,
        ctx: &BuildContext,
    ) -> Result<PackageImports> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ExtractError::PackageNotFound {
                    import_path: import_path.to_string(),
                    dir: dir.to_path_buf(),
                })
            }
            Err(e) => return Err(ExtractError::io(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ExtractError::io(dir, e))?;
            let path = entry.path();
            let is_file = match fs::metadata(&path) {
                Ok(meta) => meta.is_file(),
                // Dangling symlink
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(ExtractError::io(&path, e)),
            };
            if !is_file {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.ends_with(".go") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let mut pkg = PackageImports::default();
        let mut first_file: Option<String> = None;

        for name in names {
            if name.starts_with('_') || name.starts_with('.') || !ctx.matches_file_name(&name) {
                pkg.ignored_files.push(name);
                continue;
            }

            let path = dir.join(&name);
            let bytes = fs::read(&path).map_err(|e| ExtractError::io(&path, e))?;
            let source = String::from_utf8_lossy(&bytes);

            match file_constraint(&source) {
                Err(message) => {
                    return Err(ExtractError::InvalidConstraint {
                        file: path,
                        message,
                    })
                }
                Ok(Some(constraint)) if !constraint.eval(ctx) => {
                    log::debug!("{}: excluded by build constraints", path.display());
                    pkg.ignored_files.push(name);
                    continue;
                }
                Ok(_) => {}
            }

            let header = self.parse_header(&path, &source)?;
            if header.package == "documentation" {
                pkg.ignored_files.push(name);
                continue;
            }
            if !ctx.cgo_enabled && header.imports.iter().any(|i| i == "C") {
                pkg.ignored_files.push(name);
                continue;
            }

            let is_test = name.ends_with("_test.go");
            let mut package = header.package;
            if is_test && package.ends_with("_test") && pkg.name != package {
                package.truncate(package.len() - "_test".len());
            }

            match &first_file {
                None => {
                    pkg.name = package;
                    first_file = Some(name.clone());
                }
                Some(first) if package != pkg.name => {
                    return Err(ExtractError::MultiplePackages {
                        dir: dir.to_path_buf(),
                        first: format!("{} ({})", pkg.name, first),
                        second: format!("{} ({})", package, name),
                    });
                }
                Some(_) => {}
            }

            if is_test {
                push_unique(&mut pkg.test_imports, header.imports);
                pkg.test_go_files.push(name);
            } else {
                push_unique(&mut pkg.imports, header.imports);
                pkg.go_files.push(name);
            }
        }

        if pkg.go_files.is_empty() && pkg.test_go_files.is_empty() {
            return Err(ExtractError::NoBuildableSource {
                dir: dir.to_path_buf(),
            });
        }

        Ok(pkg)
    }
}

fn collect_import_specs(
    node: Node,
    source: &str,
    file: &Path,
    out: &mut Vec<String>,
) -> Result<()> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let path_node = child
                    .child_by_field_name("path")
                    .ok_or_else(|| syntax_error(file, child, "import spec without path"))?;
                let literal = node_text(path_node, source).unwrap_or_default();
                let import = unquote(literal)
                    .ok_or_else(|| syntax_error(file, path_node, "invalid import path"))?;
                out.push(import);
            }
            "import_spec_list" => collect_import_specs(child, source, file, out)?,
            _ => {}
        }
    }
    Ok(())
}

fn node_text<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

fn unquote(literal: &str) -> Option<String> {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')))?;
    if inner.is_empty() || inner.contains('\\') {
        return None;
    }
    Some(inner.to_string())
}

fn syntax_error(file: &Path, node: Node, message: &str) -> ExtractError {
    let pos = node.start_position();
    ExtractError::parse(
        PathBuf::from(file),
        format!("{}:{}: {}", pos.row + 1, pos.column + 1, message),
    )
}

fn push_unique(into: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}
