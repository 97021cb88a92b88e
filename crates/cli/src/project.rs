use anyhow::{bail, Context as AnyhowContext, Result};
use gop_resolver::GlobalLookup;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const CONFIG_FILE: &str = "gop.toml";

/// `gop.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Defaults to the project directory name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub targets: Vec<Target>,

    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub name: String,

    /// Directory under `src/`; defaults to `name`
    pub dir: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,
}

impl Target {
    pub fn new(name: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            assets: Vec::new(),
        }
    }

    pub fn dir(&self) -> &str {
        if self.dir.is_empty() {
            &self.name
        } else {
            &self.dir
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    pub global_lookup: GlobalLookup,

    /// Space-separated build tags applied to every resolution
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Where the current directory sits inside the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirLevel {
    Root,
    Src,
    /// Inside `src/<dir>`
    Target(String),
}

#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub level: DirLevel,
}

impl Project {
    /// Locate the project enclosing `cwd`.
    ///
    /// The nearest ancestor with a `gop.toml` wins. Without one, `cwd` is
    /// accepted if it has a `src` directory, is `src`, or sits directly
    /// inside `src`.
    pub fn discover(cwd: &Path) -> Result<Self> {
        if let Some(root) = cwd.ancestors().find(|dir| dir.join(CONFIG_FILE).is_file()) {
            let config = ProjectConfig::load(&root.join(CONFIG_FILE))?;
            return Ok(Self::new(root, config, cwd));
        }

        let parent = cwd.parent();
        let grandparent = parent.and_then(Path::parent);
        let root = if cwd.join("src").is_dir() {
            Some(cwd)
        } else if is_named(cwd, "src") {
            parent
        } else if parent.is_some_and(|p| is_named(p, "src")) {
            grandparent
        } else {
            None
        };

        match root {
            Some(root) => Ok(Self::new(root, ProjectConfig::default(), cwd)),
            None => bail!(
                "{} is not inside a gop project (no {} found, run `gop init`)",
                cwd.display(),
                CONFIG_FILE
            ),
        }
    }

    fn new(root: &Path, config: ProjectConfig, cwd: &Path) -> Self {
        let level = match cwd.strip_prefix(root.join("src")) {
            Ok(rel) => match rel.components().next() {
                Some(Component::Normal(first)) => DirLevel::Target(first.to_string_lossy().into()),
                _ => DirLevel::Src,
            },
            Err(_) => DirLevel::Root,
        };
        Self {
            root: root.to_path_buf(),
            config,
            level,
        }
    }

    pub fn name(&self) -> String {
        self.config.name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "main".to_string())
        })
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Pick the target a command operates on.
    ///
    /// An explicit name matches a configured target by name or dir, then
    /// an existing `src/<name>`. Without a name, the target the current
    /// directory is in, then the first configured one, then `main`.
    pub fn target(&self, name: Option<&str>) -> Result<Target> {
        if let Some(name) = name {
            if let Some(target) = self
                .config
                .targets
                .iter()
                .find(|t| t.name == name || t.dir() == name)
            {
                return Ok(target.clone());
            }
            if name != "vendor" && self.src_dir().join(name).is_dir() {
                return Ok(Target::new(name, name));
            }
            bail!("unknown target {name:?}");
        }

        if let DirLevel::Target(dir) = &self.level {
            if dir != "vendor" {
                let configured = self.config.targets.iter().find(|t| t.dir() == dir);
                return Ok(configured
                    .cloned()
                    .unwrap_or_else(|| Target::new(dir.as_str(), dir.as_str())));
            }
        }

        if let Some(first) = self.config.targets.first() {
            return Ok(first.clone());
        }
        Ok(Target::new(self.name(), "main"))
    }
}

fn is_named(path: &Path, name: &str) -> bool {
    path.file_name().is_some_and(|n| n == name)
}
