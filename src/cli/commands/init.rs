use anyhow::{Result, bail};

use crate::config::{ConfigFile, ConfigManager};
use crate::ui::Style;

/// Writes a config file populated with the built-in defaults.
pub fn run_init(force: bool) -> Result<()> {
    let manager = ConfigManager::new();

    if manager.exists() && !force {
        bail!(
            "Config file already exists: {}\n\n\
             Use 'blogtl init --force' to overwrite it.",
            manager.config_path().display()
        );
    }

    manager.save(&ConfigFile::with_defaults())?;

    crate::status!(
        "{} {}",
        Style::success("Saved to"),
        manager.config_path().display()
    );

    Ok(())
}
