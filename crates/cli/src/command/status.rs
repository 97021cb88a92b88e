use crate::workspace::Workspace;
use anyhow::Result;
use gop_resolver::{dir_exists, PackageRef, PkgKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusRow<'a> {
    name: &'a str,
    kind: PkgKind,
    present: bool,
    vendored: bool,
}

/// List a target's dependencies and whether each one is vendored
pub fn run_status(ws: &Workspace, target: Option<&str>, tags: Option<&str>, json: bool) -> Result<()> {
    let target = ws.target(target)?;
    let deps = ws.resolve_target(&target, true, tags)?;
    let rows = status_rows(ws, &deps)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in &rows {
        let mark = if row.vendored { "[X]" } else { "[ ]" };
        println!("{mark} {}", row.name);
    }
    Ok(())
}

fn status_rows<'a>(ws: &Workspace, deps: &'a [PackageRef]) -> Result<Vec<StatusRow<'a>>> {
    let mut rows = Vec::new();
    for pkg in deps {
        if pkg.kind == PkgKind::ProjectSource {
            continue;
        }
        rows.push(StatusRow {
            name: &pkg.name,
            kind: pkg.kind,
            present: pkg.present,
            vendored: dir_exists(&ws.roots.project_vendor.join(&pkg.name))?,
        });
    }
    Ok(rows)
}
