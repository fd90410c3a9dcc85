//! Target language listing command handler.

use anyhow::Result;

use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::ui::Style;

/// Prints the configured target languages to stdout.
///
/// Shows built-in targets when the config file defines none.
pub fn print_targets() -> Result<()> {
    let manager = ConfigManager::new();
    let file = manager.load_or_default()?;
    let config = resolve_config(&ResolveOptions::default(), &file)?;

    if file.targets.is_empty() {
        println!("Target languages (built-in):\n");
    } else {
        println!("Target languages ({}):\n", manager.config_path().display());
    }

    for target in &config.targets {
        println!(
            "  {:<4} {}  {}",
            Style::code(&target.code),
            Style::value(&target.model),
            Style::secondary(format!("-> {}/", target.dir_segment()))
        );
    }

    println!(
        "\n{} {}",
        Style::label("Source:"),
        config.source_dir.display()
    );
    println!("{} {}", Style::label("Endpoint:"), config.endpoint);

    Ok(())
}
