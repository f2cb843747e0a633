// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
///
/// The project root is always the invocation directory; there is no flag to
/// point the watcher elsewhere. Run the command from the directory that
/// contains the main package.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Watch a project tree, rebuild on change, and hot-swap the running binary.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML), relative to the project root.
    ///
    /// A missing file is not an error; built-in defaults apply.
    #[arg(long, value_name = "PATH", default_value = "Watchrun.toml")]
    pub config: String,

    /// Build tags passed to the build tool (`-tags <TAGS>`).
    ///
    /// Overrides `project.build_tags` from the config file.
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
