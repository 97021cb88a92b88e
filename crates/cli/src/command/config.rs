use crate::global_config::GlobalConfig;
use anyhow::{bail, Result};

pub fn run_config_get(key: Option<&str>, all: bool) -> Result<()> {
    let path = GlobalConfig::path()?;
    let config = GlobalConfig::load(&path)?;

    match key {
        Some(key) if !all => match config.get(key)? {
            Some(value) => println!("{value}"),
            None => bail!("{key} is not set"),
        },
        _ => {
            for (key, value) in config.entries() {
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    let path = GlobalConfig::path()?;
    let mut config = GlobalConfig::load(&path)?;
    config.set(key, value)?;
    config.save(&path)?;
    log::info!("Saved {key} to {}", path.display());
    Ok(())
}
