//! Initialize .relint.toml configuration

use anyhow::Result;
use relint_core::RelintConfig;
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(".relint.toml");

    if config_path.exists() {
        println!("⚠️  .relint.toml already exists at {:?}", config_path);
        return Ok(());
    }

    let config = RelintConfig::default();
    config.save(&config_path)?;

    println!("✅ Created .relint.toml at {:?}", config_path);
    println!("\nSet [tool] path to your analysis tool, then run:");
    println!("  relint");

    Ok(())
}
