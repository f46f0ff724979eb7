use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use mwgen_codegen::Aspect;
use mwgen_core::{Config, DEFAULT_OUTPUT, is_go_identifier, package_name_from_dir};
use mwgen_reflect::{GoModule, LoadOptions};

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Name of the interface to wrap
    #[arg(short, long, value_parser = parse_identifier)]
    pub interface: String,

    /// Aspect woven around every method (logging or tracing)
    #[arg(short, long)]
    pub aspect: Aspect,

    /// Package directory declaring the interface (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Output directory, relative to --dir (defaults to middleware)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Package name of the generated file (defaults to the output directory name)
    #[arg(short, long, value_parser = parse_identifier)]
    pub package: Option<String>,

    /// Default service or tracer name (defaults to the interface name)
    #[arg(short, long)]
    pub label: Option<String>,

    /// Path to mwgen.toml (defaults to <dir>/mwgen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the generated file instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self, verbose: bool) -> Result<()> {
        let config = self.load_config();

        let mut module = GoModule::open_with(
            &self.dir,
            LoadOptions {
                include_tests: config.include_tests,
            },
        )
        .unwrap_or_exit();
        if let Some(import_path) = &config.import_path {
            module = module.with_import_path(import_path);
        }
        let iface = module.reflect(&self.interface).unwrap_or_exit();

        let options = self.options(&config);
        let report = ops::generate(&iface, &options)?;
        report.with_notes(verbose).render(&mut TerminalOutput::new());
        Ok(())
    }

    fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => Config::open(path).unwrap_or_exit(),
            None => Config::discover(&self.dir)
                .unwrap_or_exit()
                .unwrap_or_default(),
        }
    }

    /// Resolve every setting: flag, then mwgen.toml, then default.
    fn options(&self, config: &Config) -> GenerateOptions {
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| config.output().to_path_buf());
        let package = self
            .package
            .clone()
            .or_else(|| config.package.clone())
            .or_else(|| package_name_from_dir(&output))
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

        GenerateOptions {
            dir: self.dir.clone(),
            aspect: self.aspect,
            output,
            package,
            label: self.label.clone().or_else(|| config.label.clone()),
            layer: config.layer().to_string(),
            logger_import: config.logger_import().to_string(),
            tracer_import: config.tracer_import().to_string(),
            dry_run: self.dry_run,
        }
    }
}

fn parse_identifier(s: &str) -> std::result::Result<String, String> {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    if !is_go_identifier(s) {
        return Err(format!("'{}' is not a valid Go identifier", s));
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        cmd: GenerateCommand,
    }

    fn parse(args: &[&str]) -> GenerateCommand {
        let argv = std::iter::once("mwgen").chain(args.iter().copied());
        Harness::try_parse_from(argv).unwrap().cmd
    }

    #[test]
    fn test_defaults_without_config() {
        let cmd = parse(&["-i", "Service", "-a", "logging"]);
        let options = cmd.options(&Config::default());

        assert_eq!(options.output, Path::new("middleware"));
        assert_eq!(options.package, "middleware");
        assert_eq!(options.label, None);
        assert_eq!(options.layer, "service");
        assert_eq!(options.logger_import, "github.com/sirupsen/logrus");
        assert!(!options.dry_run);
    }

    #[test]
    fn test_config_overrides_defaults() {
        let cmd = parse(&["-i", "Service", "-a", "tracing"]);
        let config = Config {
            output: Some("internal/mw".into()),
            label: Some("orders".to_string()),
            layer: Some("repository".to_string()),
            ..Config::default()
        };
        let options = cmd.options(&config);

        assert_eq!(options.output, Path::new("internal/mw"));
        assert_eq!(options.package, "mw");
        assert_eq!(options.label.as_deref(), Some("orders"));
        assert_eq!(options.layer, "repository");
    }

    #[test]
    fn test_flags_override_config() {
        let cmd = parse(&[
            "-i", "Service", "-a", "tracing", "-o", "gen", "-p", "wrap", "-l", "api",
        ]);
        let config = Config {
            output: Some("internal/mw".into()),
            package: Some("mw".to_string()),
            label: Some("orders".to_string()),
            ..Config::default()
        };
        let options = cmd.options(&config);

        assert_eq!(options.output, Path::new("gen"));
        assert_eq!(options.package, "wrap");
        assert_eq!(options.label.as_deref(), Some("api"));
    }

    #[test]
    fn test_usage_errors() {
        let argv = |args: &[&'static str]| std::iter::once("mwgen").chain(args.to_vec());

        assert!(Harness::try_parse_from(argv(&["-a", "logging"])).is_err());
        assert!(Harness::try_parse_from(argv(&["-i", "", "-a", "logging"])).is_err());
        assert!(Harness::try_parse_from(argv(&["-i", "Service", "-a", ""])).is_err());
        assert!(Harness::try_parse_from(argv(&["-i", "Service", "-a", "metrics"])).is_err());
        assert!(Harness::try_parse_from(argv(&["-i", "Service", "-a", "trace"])).is_err());
        assert!(
            Harness::try_parse_from(argv(&["-i", "Service", "-a", "logging", "-p", "my-pkg"]))
                .is_err()
        );
    }
}
