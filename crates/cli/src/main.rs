use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use command::{EnsureOptions, GoAction, UpdateOptions};
use std::env;
use std::fs;
use workspace::Workspace;

mod command;
mod flags;
mod global_config;
mod project;
mod toolchain;
mod workspace;

use flags::GlobalLookupFlag;

#[derive(Parser)]
#[command(name = "gop")]
#[command(about = "Build and vendor GOPATH-style Go projects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Search order inside $GOPATH/src (overrides gop.toml)
    #[arg(long, global = true, value_enum)]
    global_lookup: Option<GlobalLookupFlag>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    Init(InitArgs),

    /// List a target's dependencies and whether they are vendored
    Status(StatusArgs),

    /// Copy every missing dependency of a target into src/vendor
    Ensure(EnsureArgs),

    /// Vendor packages from $GOPATH along with their dependencies
    Add(AddArgs),

    /// Refresh vendored packages from $GOPATH
    Update(UpdateArgs),

    /// Remove vendored packages
    Rm(RmArgs),

    /// Build a target into bin/
    Build(GoArgs),

    /// Build a target, then copy its assets into bin/
    Release(GoArgs),

    /// Test a target
    Test(GoArgs),

    /// Vet a target
    Vet(VetArgs),

    /// Read or write the global configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
struct InitArgs {
    /// Create the project in a new directory instead of the current one
    name: Option<String>,
}

#[derive(Args)]
struct StatusArgs {
    target: Option<String>,

    /// Space-separated build tags
    #[arg(long)]
    tags: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct EnsureArgs {
    target: Option<String>,

    /// Print what would be copied
    #[arg(short, long, conflicts_with = "update")]
    dry: bool,

    /// Replace vendored copies with the ones on $GOPATH
    #[arg(short, long)]
    update: bool,

    /// Run `go get` for packages missing from $GOPATH
    #[arg(short, long)]
    get: bool,

    /// Space-separated build tags
    #[arg(long)]
    tags: Option<String>,

    /// Ignore imports of _test.go files
    #[arg(long)]
    no_tests: bool,
}

#[derive(Args)]
struct AddArgs {
    /// Replace packages that are already vendored
    #[arg(short, long)]
    update: bool,

    #[arg(required = true)]
    packages: Vec<String>,
}

#[derive(Args)]
struct UpdateArgs {
    /// Include test files and their imports
    #[arg(short, long)]
    tests: bool,

    /// Space-separated build tags
    #[arg(long)]
    tags: Option<String>,

    /// Refresh every dependency, not only missing ones
    #[arg(short, long)]
    full: bool,

    #[arg(required = true)]
    packages: Vec<String>,
}

#[derive(Args)]
struct RmArgs {
    #[arg(required = true)]
    packages: Vec<String>,
}

#[derive(Args)]
struct GoArgs {
    target: Option<String>,

    /// Run `gop ensure` first
    #[arg(short, long)]
    ensure: bool,

    /// Passed through to the go tool
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Args)]
struct VetArgs {
    target: Option<String>,

    /// Passed through to the go tool
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print one key, or every key
    Get {
        key: Option<String>,

        /// Show all the config options
        #[arg(short, long)]
        all: bool,
    },

    /// Set a key
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let lookup = cli.global_lookup.map(GlobalLookupFlag::as_domain);

    match cli.command {
        Commands::Init(args) => run_init(args)?,
        Commands::Status(args) => {
            let ws = Workspace::open(lookup)?;
            command::run_status(&ws, args.target.as_deref(), args.tags.as_deref(), args.json)?;
        }
        Commands::Ensure(args) => {
            let ws = Workspace::open(lookup)?;
            let opts = EnsureOptions {
                target: args.target.as_deref(),
                dry: args.dry,
                update: args.update,
                get: args.get,
                tags: args.tags.as_deref(),
                include_tests: !args.no_tests,
            };
            command::run_ensure(&ws, &opts)?;
        }
        Commands::Add(args) => {
            let ws = Workspace::open(lookup)?;
            command::run_add(&ws, &args.packages, args.update)?;
        }
        Commands::Update(args) => {
            let ws = Workspace::open(lookup)?;
            let opts = UpdateOptions {
                include_tests: args.tests,
                tags: args.tags.as_deref(),
                full: args.full,
            };
            command::run_update(&ws, &args.packages, &opts)?;
        }
        Commands::Rm(args) => {
            let ws = Workspace::open(lookup)?;
            command::run_rm(&ws, &args.packages)?;
        }
        Commands::Build(args) => run_go(lookup, GoAction::Build, args)?,
        Commands::Release(args) => {
            let ws = Workspace::open(lookup)?;
            command::run_release(&ws, args.target.as_deref(), args.ensure, &args.args)?;
        }
        Commands::Test(args) => run_go(lookup, GoAction::Test, args)?,
        Commands::Vet(args) => {
            let ws = Workspace::open(lookup)?;
            command::run_go(&ws, GoAction::Vet, args.target.as_deref(), false, &args.args)?;
        }
        Commands::Config(ConfigCommands::Get { key, all }) => {
            command::run_config_get(key.as_deref(), all)?
        }
        Commands::Config(ConfigCommands::Set { key, value }) => {
            command::run_config_set(&key, &value)?
        }
    }

    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    let cwd = env::current_dir().context("Cannot read current directory")?;
    let dir = match &args.name {
        Some(name) => {
            let dir = cwd.join(name);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            dir
        }
        None => cwd,
    };
    command::run_init(&dir)
}

fn run_go(lookup: Option<gop_resolver::GlobalLookup>, action: GoAction, args: GoArgs) -> Result<()> {
    let ws = Workspace::open(lookup)?;
    command::run_go(&ws, action, args.target.as_deref(), args.ensure, &args.args)
}
