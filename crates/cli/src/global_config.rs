use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the global config location
pub const CONFIG_ENV: &str = "GOP_CONFIG";

/// `~/.gop.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub init: InitSection,
    pub repos: ReposSection,
    pub sources: BTreeMap<String, Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitSection {
    pub default_editor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReposSection {
    pub default_dir: String,
}

impl Default for ReposSection {
    fn default() -> Self {
        let default_dir = dirs::home_dir()
            .map(|home| home.join(".gop").join("repos").display().to_string())
            .unwrap_or_default();
        Self { default_dir }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub url_prefix: String,
    pub pkg_prefix: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            "github".to_string(),
            Source {
                url_prefix: "https://github.com".to_string(),
                pkg_prefix: "github.com".to_string(),
            },
        );
        Self {
            init: InitSection::default(),
            repos: ReposSection::default(),
            sources,
        }
    }
}

/// A dotted key resolved against the config layout
enum Key<'a> {
    DefaultEditor,
    ReposDir,
    SourceUrl(&'a str),
    SourcePkg(&'a str),
}

impl<'a> Key<'a> {
    fn parse(key: &'a str) -> Result<Self> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["init", "default_editor"] => Ok(Key::DefaultEditor),
            ["repos", "default_dir"] => Ok(Key::ReposDir),
            ["sources", name, "url_prefix"] if !name.is_empty() => Ok(Key::SourceUrl(*name)),
            ["sources", name, "pkg_prefix"] if !name.is_empty() => Ok(Key::SourcePkg(*name)),
            _ => bail!(
                "unknown config key {key:?} (expected init.default_editor, repos.default_dir, \
                 sources.<name>.url_prefix or sources.<name>.pkg_prefix)"
            ),
        }
    }
}

impl GlobalConfig {
    /// `$GOP_CONFIG`, else `~/.gop.toml`
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Cannot determine home directory")?;
        Ok(home.join(".gop.toml"))
    }

    /// Missing file means defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        log::debug!("Found global config file {}", path.display());
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match Key::parse(key)? {
            Key::DefaultEditor => Some(self.init.default_editor.clone()),
            Key::ReposDir => Some(self.repos.default_dir.clone()),
            Key::SourceUrl(name) => self.sources.get(name).map(|s| s.url_prefix.clone()),
            Key::SourcePkg(name) => self.sources.get(name).map(|s| s.pkg_prefix.clone()),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.to_string();
        match Key::parse(key)? {
            Key::DefaultEditor => self.init.default_editor = value,
            Key::ReposDir => self.repos.default_dir = value,
            Key::SourceUrl(name) => self.sources.entry(name.to_string()).or_default().url_prefix = value,
            Key::SourcePkg(name) => self.sources.entry(name.to_string()).or_default().pkg_prefix = value,
        }
        Ok(())
    }

    /// Every key with its value, in display order
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("init.default_editor".to_string(), self.init.default_editor.clone()),
            ("repos.default_dir".to_string(), self.repos.default_dir.clone()),
        ];
        for (name, source) in &self.sources {
            out.push((format!("sources.{name}.url_prefix"), source.url_prefix.clone()));
            out.push((format!("sources.{name}.pkg_prefix"), source.pkg_prefix.clone()));
        }
        out
    }
}
