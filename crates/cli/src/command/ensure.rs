use super::print_report;
use crate::project::Target;
use crate::toolchain::GoCommand;
use crate::workspace::Workspace;
use anyhow::Result;
use gop_vendor::{normalize_name, SyncMode, SyncReport, Synchronizer};

pub struct EnsureOptions<'a> {
    pub target: Option<&'a str>,
    pub dry: bool,
    pub update: bool,
    pub get: bool,
    pub tags: Option<&'a str>,
    pub include_tests: bool,
}

impl EnsureOptions<'_> {
    fn mode(&self) -> SyncMode {
        if self.dry {
            SyncMode::DryRun
        } else if self.update {
            SyncMode::ForceUpdate
        } else {
            SyncMode::AddMissing
        }
    }
}

/// Vendor every dependency of a target that is missing from `src/vendor`
pub fn run_ensure(ws: &Workspace, opts: &EnsureOptions<'_>) -> Result<()> {
    let target = ws.target(opts.target)?;
    let fetch = opts.get && !opts.dry;
    let mut sync = ws.synchronizer(opts.include_tests);

    let report = ensure_once(ws, &mut sync, &target, opts)?;
    print_report(&report, !fetch);

    if !fetch {
        return Ok(());
    }

    let mut missing: Vec<&str> = Vec::new();
    for unit in report.unresolved().map(|p| normalize_name(p).0) {
        if !missing.contains(&unit) {
            missing.push(unit);
        }
    }
    if missing.is_empty() {
        return Ok(());
    }
    for unit in &missing {
        println!("Downloading {unit}");
        GoCommand::new(&ws.go.go_bin, "get")
            .args(["-d", *unit])
            .gopath_mode()
            .run()?;
    }

    // Downloads add packages, and with them more imports.
    let report = ensure_once(ws, &mut sync, &target, opts)?;
    print_report(&report, true);
    Ok(())
}

fn ensure_once(
    ws: &Workspace,
    sync: &mut Synchronizer,
    target: &Target,
    opts: &EnsureOptions<'_>,
) -> Result<SyncReport> {
    let deps = ws.resolve_target(target, opts.include_tests, opts.tags)?;
    let report = sync.sync(&deps, opts.mode())?;
    log::info!(
        "{}: {} dependencies, {} copied",
        target.name,
        report.entries.len(),
        report.changed()
    );
    Ok(report)
}
