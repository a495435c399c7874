use std::path::PathBuf;

use clap::Parser;

mod commands;

use commands::{Backend, Commands, Context};

#[derive(Parser)]
#[command(name = "x4projector")]
#[command(about = "X4: Foundations game data extraction toolkit", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the game installation
    #[arg(short = 'g', long, global = true, default_value = ".")]
    game_root: PathBuf,

    /// File loader backend
    #[arg(long, global = true, value_enum, default_value = "archive")]
    file_loader: Backend,

    /// Language used for localized names
    #[arg(short = 'l', long = "lang", global = true, default_value = "en")]
    language: String,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let ctx = Context {
        game_root: cli.game_root,
        backend: cli.file_loader,
        language: cli.language,
    };

    cli.command.execute(&ctx)
}
