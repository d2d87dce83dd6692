// Mon Feb 02 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{Args, Command, KindFilter, OutputArgs, ParseArgs, RenderArgs, RunArgs};
pub use handler::CommandHandler;

use clap::Parser;

pub fn parse_args() -> Args {
    Args::parse()
}

/// Entry point for the binary. Returns the process exit code.
pub fn run() -> anyhow::Result<i32> {
    CommandHandler::run(parse_args())
}
