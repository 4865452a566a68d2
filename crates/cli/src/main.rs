mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_hash, cmd_hash_rename, cmd_page_tmpl, cmd_watch};
use output::OutputFormat;

/// pagekit - fingerprinted asset utilities for web builds
#[derive(Parser)]
#[command(name = "pagekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Output more logging info (manifest contents, template lookups)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compute and print a hash for a file (32-bit FNV-1a)
  Hash {
    /// Input file
    #[arg(value_name = "IN")]
    input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Rename a file to include its hash (32-bit FNV-1a)
  HashRename {
    /// Input file
    #[arg(value_name = "IN")]
    input: PathBuf,

    /// Output file (defaults to renaming alongside the input file)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Wait for a change in any of the given directories
  Watch {
    /// Directories to watch (append /... to make one recursive)
    #[arg(required = true)]
    dirs: Vec<String>,
  },

  /// Render a page template against fingerprinted asset files
  PageTmpl {
    /// Input template file (defaults to the built-in template)
    #[arg(long = "in", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output HTML file
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Write the default template to this path and exit (won't overwrite unless --force)
    #[arg(long, value_name = "FILE")]
    tmpl_out: Option<PathBuf>,

    /// Overwrite an existing --tmpl-out file
    #[arg(short, long)]
    force: bool,

    /// Files to make the template aware of
    files: Vec<PathBuf>,
  },
}

fn init_tracing(verbose: bool) {
  let default_filter = if verbose {
    "info,pagekit=debug,pagekit_lib=debug"
  } else {
    "info"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

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
    Commands::Hash { input, format } => cmd_hash(&input, format),
    Commands::HashRename { input, out, format } => cmd_hash_rename(&input, out.as_deref(), format),
    Commands::Watch { dirs } => cmd_watch(&dirs),
    Commands::PageTmpl {
      input,
      out,
      tmpl_out,
      force,
      files,
    } => cmd_page_tmpl(input, out, tmpl_out, force, files),
  }
}
