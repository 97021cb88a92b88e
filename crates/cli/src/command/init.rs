use crate::project::{ProjectConfig, Target, CONFIG_FILE};
use anyhow::{Context as AnyhowContext, Result};
use std::fs;
use std::path::Path;

const MAIN_FILE: &str = "package main\n\nfunc main() {\n}\n";

/// Scaffold a project in `dir`; existing files are left alone
pub fn run_init(dir: &Path) -> Result<()> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "main".to_string());

    for sub in ["bin", "src/main", "src/vendor"] {
        let path = dir.join(sub);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }

    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        log::info!("{} already exists", config_path.display());
    } else {
        let config = ProjectConfig {
            name: Some(name.clone()),
            targets: vec![Target::new(name.as_str(), "main")],
            ..ProjectConfig::default()
        };
        config.save(&config_path)?;
    }

    let main_file = dir.join("src/main/main.go");
    if !main_file.exists() {
        fs::write(&main_file, MAIN_FILE)
            .with_context(|| format!("Failed to write {}", main_file.display()))?;
    }

    println!("Initialized project {} in {}", name, dir.display());
    Ok(())
}
