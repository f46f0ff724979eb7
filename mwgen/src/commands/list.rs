use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use mwgen_core::Config;
use mwgen_reflect::{GoModule, LoadOptions};

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ListCommand {
    /// Package directory to scan (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Print the interfaces as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let config = Config::discover(&self.dir)
            .unwrap_or_exit()
            .unwrap_or_default();
        let options = LoadOptions {
            include_tests: config.include_tests,
        };
        let mut module = GoModule::open_with(&self.dir, options).unwrap_or_exit();
        if let Some(import_path) = &config.import_path {
            module = module.with_import_path(import_path);
        }

        let report = ops::list(&module);
        if self.json {
            println!("{}", report.to_json()?);
        } else {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}
