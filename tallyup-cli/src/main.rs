use clap::Parser;
use std::process;

mod bootstrap;
mod cli;

fn main() {
    if let Err(err) = bootstrap::run(cli::Cli::parse()) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
