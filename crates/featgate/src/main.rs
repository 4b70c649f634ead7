use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

fn main() -> Result<()> {
    let parsed = cli::Cli::parse();

    match parsed.dispatch() {
        Ok(()) => Ok(()),
        Err(err) => {
            // `check --exit-code` reports a disabled flag through the exit status only
            if let Some(exit) = err.downcast_ref::<commands::check::DisabledExitCode>() {
                std::process::exit(exit.0);
            }

            Err(err)
        }
    }
}
