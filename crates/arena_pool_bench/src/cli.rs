//! Command-line arguments for `arena_bench`.

use std::path::PathBuf;

use crate::config::SuiteConfig;
use crate::error::{BenchError, BenchResult};

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: arena_bench [CONFIG.toml] [options]

Options:
  --output <path>  Append results to this CSV file
  --quick          1,000,000 operations, one repetition per combination
  --help           Show this message";

/// Parsed command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Suite config file; the built-in suite is used when absent.
    pub config: Option<PathBuf>,
    /// Overrides the config's output path.
    pub output: Option<PathBuf>,
    /// Shrink the suite for a smoke run.
    pub quick: bool,
    /// Print usage and exit.
    pub help: bool,
}

impl CliArgs {
    /// Parses arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] for unknown flags, a missing
    /// `--output` value, or more than one config path.
    pub fn parse<I>(args: I) -> BenchResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quick" => parsed.quick = true,
                "--help" | "-h" => parsed.help = true,
                "--output" => {
                    let path = args
                        .next()
                        .ok_or_else(|| BenchError::InvalidConfig("--output needs a path".into()))?;
                    parsed.output = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => {
                    return Err(BenchError::InvalidConfig(format!("unknown option: {flag}")));
                }
                path => {
                    if parsed.config.is_some() {
                        return Err(BenchError::InvalidConfig(format!(
                            "unexpected argument: {path}"
                        )));
                    }
                    parsed.config = Some(PathBuf::from(path));
                }
            }
        }

        Ok(parsed)
    }

    /// Builds the suite these arguments describe.
    ///
    /// # Errors
    ///
    /// Propagates config loading and validation errors.
    pub fn suite(&self) -> BenchResult<SuiteConfig> {
        let mut suite = match &self.config {
            Some(path) => SuiteConfig::from_toml_file(path)?,
            None => SuiteConfig::default(),
        };
        if let Some(output) = &self.output {
            suite.output.clone_from(output);
        }
        if self.quick {
            suite = suite.quick();
        }
        Ok(suite)
    }
}
