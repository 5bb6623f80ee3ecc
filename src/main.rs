use clap::Parser;
use dealdesk::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
