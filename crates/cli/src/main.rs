use anyhow::Result;
use clap::Parser;

mod commands;
mod input;
mod render;

#[derive(Parser)]
#[command(name = "semdiff")]
#[command(
    about = "Structural, language-aware diff of two source files",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(flatten)]
    diff: commands::diff::Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(level));

    commands::diff::handler(&cli.diff)
}
