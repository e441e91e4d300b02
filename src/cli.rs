//! Command-line handling shared by the binaries.
//!
//! Every tool takes positional log paths, optionally preceded by mode toggles. Asking for help in
//! any form (`--help`, `-help`, `help`, ...) prints the usage line and exits with status 1.

use std::process;
use thiserror::Error;

/// Command-line shape of one binary.
#[derive(Debug, Clone)]
pub struct CliSpec {
    pub program: String,
    pub synopsis: &'static str,
    /// Mode toggles accepted before the paths.
    pub toggles: &'static [&'static str],
    /// `None` for any number of paths (at least one).
    pub max_paths: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub toggles: Vec<String>,
    pub paths: Vec<String>,
}

impl CliArgs {
    pub fn has(&self, toggle: &str) -> bool {
        self.toggles.iter().any(|t| t == toggle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("USAGE: {0}")]
    Usage(String),
    #[error("Bad option: '{0}'.")]
    BadOption(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 1,
            CliError::BadOption(_) => 2,
        }
    }
}

impl CliSpec {
    pub fn usage(&self) -> String {
        format!("{} {}", self.program, self.synopsis)
    }

    /// Parses `args` (without the program name).
    pub fn parse(&self, args: &[String]) -> Result<CliArgs, CliError> {
        if wants_help(args) {
            return Err(CliError::Usage(self.usage()));
        }

        let mut parsed = CliArgs::default();
        let mut rest = args.iter().peekable();
        while let Some(arg) = rest.next_if(|arg| arg.starts_with("--")) {
            if !self.toggles.contains(&arg.as_str()) {
                return Err(CliError::BadOption(arg.clone()));
            }
            parsed.toggles.push(arg.clone());
        }
        parsed.paths = rest.cloned().collect();

        let too_many = self
            .max_paths
            .is_some_and(|max| parsed.paths.len() > max);
        if parsed.paths.is_empty() || too_many {
            return Err(CliError::Usage(self.usage()));
        }
        Ok(parsed)
    }

    /// Parses the process arguments, printing the error and exiting on failure.
    pub fn parse_env_or_exit(&self) -> CliArgs {
        let args: Vec<String> = std::env::args().skip(1).collect();
        match self.parse(&args) {
            Ok(parsed) => parsed,
            Err(err) => {
                println!("{err}");
                process::exit(err.exit_code());
            }
        }
    }
}

/// Whether any argument, with dashes removed and lower-cased, is `help`.
pub fn wants_help(args: &[String]) -> bool {
    args.iter()
        .any(|arg| arg.replace('-', "").to_lowercase() == "help")
}

/// Name the binary was invoked as, falling back to `default`.
pub fn program_name(default: &str) -> String {
    std::env::args()
        .next()
        .and_then(|arg0| {
            std::path::Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| default.to_owned())
}
