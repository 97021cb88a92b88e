use super::print_report;
use crate::workspace::Workspace;
use anyhow::{bail, Result};
use gop_resolver::dir_exists;
use gop_vendor::{validate_package_name, SyncMode, Synchronizer};
use std::path::PathBuf;

pub struct UpdateOptions<'a> {
    pub include_tests: bool,
    pub tags: Option<&'a str>,
    /// Refresh every dependency, not just the missing ones
    pub full: bool,
}

/// Vendor packages from the global workspace, then whatever they import
pub fn run_add(ws: &Workspace, names: &[String], update: bool) -> Result<()> {
    let mut sync = ws.synchronizer(false);
    let mode = if update {
        SyncMode::ForceUpdate
    } else {
        SyncMode::AddMissing
    };

    for name in names {
        validate_package_name(name)?;
        let unit = sync.unit_of(name).to_string();
        let source = upstream_of(&sync, name, &unit)?;

        if sync.is_vendored(&unit)? && !update {
            log::info!("{unit} is already vendored, use -u to replace it");
            continue;
        }
        if update {
            if sync.was_updated(&unit) {
                continue;
            }
            println!("Copying {unit}");
            sync.refresh(&unit, &source)?;
        } else {
            println!("Copying {unit}");
            sync.copy_unit(&unit, &source)?;
        }

        vendor_dependencies(ws, &mut sync, name, false, None, mode)?;
    }
    Ok(())
}

/// Replace vendored packages with fresh copies from the global workspace
pub fn run_update(ws: &Workspace, names: &[String], opts: &UpdateOptions<'_>) -> Result<()> {
    let mut sync = ws.synchronizer(opts.include_tests);
    let mode = if opts.full {
        SyncMode::ForceUpdate
    } else {
        SyncMode::AddMissing
    };

    for name in names {
        validate_package_name(name)?;
        let unit = sync.unit_of(name).to_string();
        let source = upstream_of(&sync, name, &unit)?;

        if sync.refresh(&unit, &source)? {
            println!("Updating {unit}");
        }
        vendor_dependencies(ws, &mut sync, name, opts.include_tests, opts.tags, mode)?;
    }
    Ok(())
}

/// Delete vendored packages; a sub-package removes its whole repository
pub fn run_rm(ws: &Workspace, names: &[String]) -> Result<()> {
    let sync = ws.synchronizer(false);
    for name in names {
        validate_package_name(name)?;
        let unit = sync.unit_of(name);
        println!("removing {unit}");
        if !sync.remove(unit)? {
            log::warn!("{unit} is not vendored");
        }
    }
    Ok(())
}

fn upstream_of(sync: &Synchronizer, name: &str, unit: &str) -> Result<PathBuf> {
    match sync.find_upstream(unit) {
        Some(source) => Ok(source),
        None => bail!("Package {name} not found on $GOPATH, please use go get at first"),
    }
}

/// Resolve the freshly vendored repository root, and `name` if it is a
/// sub-package, then sync what they import
fn vendor_dependencies(
    ws: &Workspace,
    sync: &mut Synchronizer,
    name: &str,
    include_tests: bool,
    tags: Option<&str>,
    mode: SyncMode,
) -> Result<()> {
    let unit = sync.unit_of(name).to_string();
    let mut packages = vec![unit.as_str()];
    if name != unit {
        packages.push(name);
    }

    for package in packages {
        let dir = sync.vendor_dir(package);
        if !dir_exists(&dir)? {
            bail!("{package} is not a package of {unit}");
        }
        let deps = ws.resolve_package(package, &dir, include_tests, tags)?;
        let report = sync.sync(&deps, mode)?;
        print_report(&report, true);
    }
    Ok(())
}
