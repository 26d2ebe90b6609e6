mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{CommandKind, cmd_command, cmd_config, cmd_sandbox};
use output::{OutputFormat, print_error};

/// Masterless salt provisioner for test-kitchen instances
#[derive(Parser)]
#[command(name = "saltsolo")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short = 'o', long = "format", global = true, value_enum, default_value_t)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

/// Which instance to provision and where its options live.
#[derive(Args)]
pub struct InstanceArgs {
  /// Provisioner config file; relative paths are taken from the kitchen root
  #[arg(short, long, default_value = ".kitchen.yml", env = "SALTSOLO_CONFIG")]
  pub config: PathBuf,

  /// Instance name, used as the minion id
  #[arg(long, default_value = "default", env = "SALTSOLO_INSTANCE")]
  pub instance: String,

  /// Suite the instance belongs to
  #[arg(long, default_value = "default", env = "SALTSOLO_SUITE")]
  pub suite: String,

  /// Platform OS type of the instance (e.g. unix)
  #[arg(long, env = "SALTSOLO_OS_TYPE")]
  pub os_type: Option<String>,

  /// Directory holding the formula (default: current directory)
  #[arg(long, env = "SALTSOLO_KITCHEN_ROOT")]
  pub kitchen_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
  /// Build a sandbox for the instance and print its path
  Sandbox {
    #[command(flatten)]
    instance: InstanceArgs,
  },

  /// Print one of the generated shell commands
  Command {
    /// Which command to print
    #[arg(value_enum)]
    kind: CommandKind,

    #[command(flatten)]
    instance: InstanceArgs,
  },

  /// Print the resolved provisioner configuration
  Config {
    #[command(flatten)]
    instance: InstanceArgs,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Sandbox { instance } => cmd_sandbox(&instance, cli.format),
    Commands::Command { kind, instance } => cmd_command(kind, &instance, cli.format),
    Commands::Config { instance } => cmd_config(&instance, cli.format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
