mod commands;
mod script;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, init, replay, CheckArgs, InitArgs, ReplayArgs};

/// Vitae CLI - drive the dual-pane resume editor from the terminal
#[derive(Parser, Debug)]
#[command(name = "vitae")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default vitae.config.json
    Init(InitArgs),

    /// Validate an editor config and resume
    Check(CheckArgs),

    /// Replay a scripted editing session against simulated panes
    Replay(ReplayArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Replay(args) => replay(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
