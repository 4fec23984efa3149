//! CLI entry point for the line-up engine

use clap::Parser;
use lineup::io::cli::{Cli, CommandProcessor};
use lineup::io::logging::init_tracing;

fn main() -> lineup::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    let mut processor = CommandProcessor::new(cli);
    processor.process()
}
