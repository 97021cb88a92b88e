use super::ensure::{run_ensure, EnsureOptions};
use crate::toolchain::GoCommand;
use crate::workspace::Workspace;
use anyhow::{Context as AnyhowContext, Result};
use std::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoAction {
    Build,
    Test,
    Vet,
}

impl GoAction {
    fn subcommand(self) -> &'static str {
        match self {
            GoAction::Build => "build",
            GoAction::Test => "test",
            GoAction::Vet => "vet",
        }
    }
}

/// Run the go tool on a target with the project as GOPATH
pub fn run_go(
    ws: &Workspace,
    action: GoAction,
    target: Option<&str>,
    ensure: bool,
    extra: &[String],
) -> Result<()> {
    let selected = ws.target(target)?;

    if ensure {
        run_ensure(
            ws,
            &EnsureOptions {
                target,
                dry: false,
                update: false,
                get: false,
                tags: None,
                include_tests: action == GoAction::Test,
            },
        )?;
    }

    let mut args: Vec<String> = extra.to_vec();
    if action == GoAction::Build && !args.iter().any(|a| a == "-o") {
        let bin_dir = ws.project.bin_dir();
        fs::create_dir_all(&bin_dir)
            .with_context(|| format!("Failed to create {}", bin_dir.display()))?;
        let ext = if ws.go.ctx.goos == "windows" { ".exe" } else { "" };
        let output = bin_dir.join(format!("{}{ext}", selected.name));
        args.push("-o".to_string());
        args.push(output.display().to_string());
    }

    let dir = ws.roots.project_src.join(selected.dir());
    log::info!("{} {} in {}", action.subcommand(), selected.name, dir.display());
    GoCommand::new(&ws.go.go_bin, action.subcommand())
        .args(&args)
        .project_gopath(&ws.project.root)
        .current_dir(&dir)
        .run()
}
