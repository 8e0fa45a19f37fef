mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::BuildArgs;

/// xforge - Cross-compile a toolchain project for many platforms and package the results
#[derive(Parser)]
#[command(name = "xforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Log compiler invocations and debug output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build, sign and archive the workspace for every selected platform
  Build(BuildArgs),

  /// List the platforms a build would target
  Platforms {
    /// Comma-separated OS filter (empty element matches all)
    #[arg(long, default_value = "")]
    os: String,

    /// Comma-separated architecture filter (empty element matches all)
    #[arg(long, default_value = "")]
    arch: String,
  },

  /// Write a default .xforge.json into a workspace
  Init {
    /// Workspace directory
    #[arg(default_value = ".")]
    dir: PathBuf,
  },

  /// Show host platform information
  Info,
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Commands::Build(args) => cmd::cmd_build(args, cli.verbose),
    Commands::Platforms { os, arch } => {
      cmd::cmd_platforms(&os, &arch);
      Ok(())
    }
    Commands::Init { dir } => cmd::cmd_init(&dir),
    Commands::Info => {
      cmd::cmd_info();
      Ok(())
    }
  }
}
