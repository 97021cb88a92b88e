use super::go::{run_go, GoAction};
use crate::workspace::Workspace;
use anyhow::{bail, Context as AnyhowContext, Result};
use std::fs;
use std::path::{Component, Path};

/// Build a target into bin/, then refresh its assets next to the binary
pub fn run_release(
    ws: &Workspace,
    target: Option<&str>,
    ensure: bool,
    extra: &[String],
) -> Result<()> {
    let selected = ws.target(target)?;
    for asset in &selected.assets {
        check_asset_path(asset)?;
    }

    run_go(ws, GoAction::Build, target, ensure, extra)?;

    let bin_dir = ws.project.bin_dir();
    for asset in &selected.assets {
        let src = ws.roots.project_src.join(asset);
        let dst = bin_dir.join(asset);
        let Ok(meta) = fs::metadata(&src) else {
            log::warn!("Asset {asset} not found in {}", ws.roots.project_src.display());
            continue;
        };

        println!("Copying asset {asset}");
        remove_existing(&dst)?;
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        if meta.is_dir() {
            let stats = gop_vendor::copy_dir(&src, &dst, |_| false)?;
            log::debug!("{asset}: {} files", stats.files);
        } else {
            gop_vendor::copy_file(&src, &dst)?;
        }
    }
    Ok(())
}

/// Assets are relative to src/ and must stay inside it
fn check_asset_path(asset: &str) -> Result<()> {
    let path = Path::new(asset);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if asset.is_empty() || escapes {
        bail!("asset {asset:?} must be a relative path inside src/");
    }
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.with_context(|| format!("Failed to remove {}", path.display()))
}
