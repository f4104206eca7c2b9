mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use output::{OutputFormat, print_error};

/// buildplan - Toolchain build orchestrator
#[derive(Parser)]
#[command(name = "buildplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// JSON preset with products, flags and build variants
  #[arg(short, long, global = true)]
  preset: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Schedule the selected products and show every step a build would dispatch
  Plan {
    /// Products to build (overrides the preset's selection)
    products: Vec<String>,
  },

  /// Show the resolved SDKs and build-tool targets of each host
  Targets {
    /// Host to resolve (default: the preset's host and cross-compile hosts)
    #[arg(long = "host")]
    hosts: Vec<String>,
  },

  /// Print the build directory name for the preset's variants
  BuildDir,

  /// List the products of the registry
  Products,

  /// Show the detected host and tool information
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let preset = cli.preset.as_deref();
  let result = match cli.command {
    Commands::Plan { products } => cmd::cmd_plan(preset, &products, cli.verbose, cli.output),
    Commands::Targets { hosts } => cmd::cmd_targets(preset, &hosts, cli.output),
    Commands::BuildDir => cmd::cmd_build_dir(preset, cli.output),
    Commands::Products => cmd::cmd_products(preset, cli.verbose, cli.output),
    Commands::Info => cmd::cmd_info(cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
