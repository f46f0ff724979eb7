mod completions;
mod generate;
mod list;

use clap::{ArgAction, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use list::ListCommand;

/// Extension trait for exiting on reflector and config errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T, E> UnwrapOrExit<T> for std::result::Result<T, Box<E>>
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "mwgen")]
#[command(version)]
#[command(about = "Generate logging and tracing middleware for Go service interfaces")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(self.verbose > 0),
            Commands::List(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a middleware wrapper for an interface
    #[command(visible_alias = "gen")]
    Generate(GenerateCommand),

    /// List the interfaces declared in a package
    List(ListCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_counted() {
        let cli = Cli::try_parse_from(["mwgen", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose(), 2);
    }

    #[test]
    fn test_gen_alias() {
        let cli =
            Cli::try_parse_from(["mwgen", "gen", "-i", "Service", "-a", "tracing"]).unwrap();
        assert!(matches!(cli.command, Commands::Generate(_)));
    }
}
