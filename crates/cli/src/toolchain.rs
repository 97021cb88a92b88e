use anyhow::{bail, Context as AnyhowContext, Result};
use gop_imports::BuildContext;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Go binary used for `build`, `test`, `vet`, `get` and `list std`
pub const GO_BIN_ENV: &str = "GOP_GO";

/// The parts of the Go environment gop cares about
#[derive(Debug, Clone)]
pub struct GoEnv {
    /// First `$GOPATH` entry
    pub gopath: PathBuf,
    pub go_bin: String,
    pub ctx: BuildContext,
}

impl GoEnv {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var_os(key))
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let gopath = lookup("GOPATH")
            .and_then(|raw| env::split_paths(&raw).find(|p| !p.as_os_str().is_empty()))
            .context("GOPATH is not set")?;

        let go_bin = lookup(GO_BIN_ENV)
            .map(|v| v.to_string_lossy().into_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "go".to_string());

        let host = BuildContext::host();
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.to_string_lossy().into_owned())
                .filter(|v| !v.is_empty())
        };
        let mut ctx = BuildContext::for_target(
            var("GOOS").unwrap_or(host.goos),
            var("GOARCH").unwrap_or(host.goarch),
        );
        if let Some(cgo) = var("CGO_ENABLED") {
            ctx = ctx.with_cgo(cgo == "1");
        }

        log::debug!(
            "GOPATH={} go={} target={}/{} cgo={}",
            gopath.display(),
            go_bin,
            ctx.goos,
            ctx.goarch,
            ctx.cgo_enabled
        );
        Ok(Self { gopath, go_bin, ctx })
    }
}

/// Minor release of the toolchain, from `go env GOVERSION`
pub fn release_minor(go_bin: &str) -> Option<u32> {
    let output = match Command::new(go_bin).args(["env", "GOVERSION"]).output() {
        Ok(output) => output,
        Err(e) => {
            log::debug!("Cannot run {go_bin} env GOVERSION: {e}");
            return None;
        }
    };
    if !output.status.success() {
        log::debug!("{go_bin} env GOVERSION failed: {}", output.status);
        return None;
    }
    parse_release_minor(String::from_utf8_lossy(&output.stdout).trim())
}

/// `go1.23.4` and `go1.24rc1` give the minor; devel builds give nothing
fn parse_release_minor(version: &str) -> Option<u32> {
    let rest = version.strip_prefix("go1.")?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// One invocation of the go tool
pub struct GoCommand {
    command: Command,
    display: String,
}

impl GoCommand {
    pub fn new(go_bin: &str, subcommand: &str) -> Self {
        let mut command = Command::new(go_bin);
        command.arg(subcommand);
        Self {
            command,
            display: format!("{go_bin} {subcommand}"),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            self.display.push(' ');
            self.display.push_str(arg);
            self.command.arg(arg);
        }
        self
    }

    /// Classic GOPATH resolution, no modules
    pub fn gopath_mode(mut self) -> Self {
        self.command.env("GO111MODULE", "off");
        self
    }

    /// Build inside `project` as if it were the only GOPATH entry
    pub fn project_gopath(mut self, project: &Path) -> Self {
        self.command.env("GOPATH", project);
        self.gopath_mode()
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.command.current_dir(dir);
        self
    }

    /// Run with inherited stdio; a non-zero exit is an error
    pub fn run(mut self) -> Result<()> {
        log::debug!("Running {}", self.display);
        let status = self
            .command
            .status()
            .with_context(|| format!("Failed to start {}", self.display))?;
        if !status.success() {
            bail!("{} failed: {}", self.display, status);
        }
        Ok(())
    }
}
