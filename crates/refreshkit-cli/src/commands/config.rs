use std::path::Path;

use anyhow::Result;

use refreshkit_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        println!("Configuration already exists: {}", path.display());
        return Ok(());
    }

    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

pub fn path(explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", AppConfig::config_path().display()),
    }
    Ok(())
}
