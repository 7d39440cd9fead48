use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use folio::pipeline::{self, MountOptions, RenderMode};
use folio::{PageKind, SiteConfig};

/// Terminal portfolio page.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// How to draw on the terminal
    #[arg(long, value_enum, default_value_t = RenderMode::Fullscreen)]
    mode: RenderMode,

    /// Page to open first
    #[arg(long, global = true, value_enum, default_value_t = PageKind::Home)]
    page: PageKind,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, env = "FOLIO_LOG_PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the page interactively (default)
    Run,
    /// Print the settled page as plain text
    Snapshot {
        #[arg(long, default_value_t = 80)]
        width: u16,
        #[arg(long, default_value_t = 24)]
        height: u16,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    folio::logging::init(cli.log_file.as_deref(), cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "exiting");
            eprintln!("folio: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> folio::Result<()> {
    let config = SiteConfig::load(SiteConfig::resolve_path(cli.config).as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let options = MountOptions {
                mode: cli.mode,
                page: cli.page,
            };
            let mut handle = pipeline::mount(config, options)?;
            let result = pipeline::run(&mut handle);
            handle.unmount();
            result
        }
        Command::Snapshot { width, height } => {
            println!("{}", pipeline::snapshot(&config, cli.page, width, height)?);
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
