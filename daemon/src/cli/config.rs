use anyhow::{Context, Result};
use common::config::ServiceConfig;

/// Prints the effective configuration with the password masked.
pub fn execute(config: &ServiceConfig) -> Result<()> {
    let rendered = config
        .to_redacted_toml()
        .context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
