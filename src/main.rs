mod commands;
mod core;
mod github;
mod manifest;
mod npm;
mod pipeline;
mod publish;
mod ui;

use clap::{Parser, Subcommand};
use crate::core::error::{EXIT_FAILURE, PublishError, PublishResult, print_error};
use std::path::PathBuf;

/// Stage, verify and publish the npm package for an upstream release
#[derive(Parser)]
#[command(name = "npm-publisher")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Package the npm distribution, verify it installs, and publish it
  Publish {
    /// npm dist-tag to publish under
    #[arg(long, default_value = "latest")]
    tag: String,
    /// Run every stage but pass --dry-run to npm publish
    #[arg(long)]
    dry_run: bool,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
    /// Project root (default: current directory)
    #[arg(long)]
    root: Option<PathBuf>,
  },

  /// Print the Buildkite pipeline for the current build
  Pipeline {
    /// Project root (default: current directory)
    #[arg(long)]
    root: Option<PathBuf>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Publish {
      tag,
      dry_run,
      json,
      root,
    } => resolve_root(root).and_then(|root| commands::run_publish(&root, tag, dry_run, json)),
    Commands::Pipeline { root } => resolve_root(root).and_then(|root| commands::run_pipeline(&root)),
  };

  // Every run has been dropped by now, so its workspace is already gone.
  if let Err(err) = result {
    handle_error(err);
  }
}

fn resolve_root(root: Option<PathBuf>) -> PublishResult<PathBuf> {
  match root {
    Some(root) => Ok(root),
    None => std::env::current_dir().map_err(|e| PublishError::message(format!("Failed to get current directory: {}", e))),
  }
}

fn handle_error(err: PublishError) -> ! {
  print_error(&err);
  std::process::exit(EXIT_FAILURE);
}
