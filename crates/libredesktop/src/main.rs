//! Entry point wiring that parses the CLI, initialises tracing, and hands
//! off to `run.rs`.
//!
//! Functions:
//!
//! - `main` parses CLI input, initialises tracing, and runs the desktop.

mod cli;
mod paths;
mod run;

use anyhow::Result;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();
    run::run(cli)
}
