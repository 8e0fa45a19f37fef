//! Implementation of the `xforge init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use xforge_lib::settings::Settings;

use crate::output::symbols;

/// Write a default `.xforge.json` into `dir`.
///
/// # Errors
///
/// Returns an error if the directory is missing or a config file already exists.
pub fn cmd_init(dir: &Path) -> Result<()> {
  let workspace = dunce::canonicalize(dir).with_context(|| format!("Workspace not found: {}", dir.display()))?;
  let path = Settings::write_default(&workspace).context("Failed to initialize configuration")?;

  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    "Initialized xforge configuration!".if_supports_color(Stream::Stdout, |s| s.green())
  );
  println!();
  println!(
    "  {} Config file: {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.cyan()),
    path.display()
  );
  println!();
  println!("Next: {}", format!("xforge build {}", workspace.display()).cyan());

  Ok(())
}
