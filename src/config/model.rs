// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from `Watchrun.toml`:
///
/// ```toml
/// [project]
/// name = "api"
/// build_tags = "dev"
///
/// [watch]
/// watch = ['\.go$']
/// ignore = ['(\.js|\.html|\.bat|\.txt|\.md|\.exe|\.exe~)$']
/// debounce_ms = 1000
///
/// [build]
/// tool = "go"
/// env = { GOGC = "off" }
/// ```
///
/// All sections are optional and have defaults matching the values above.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Project identity overrides from `[project]`.
    #[serde(default)]
    pub project: ProjectSection,

    /// Watch/ignore patterns and debounce timing from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// Build tool selection and environment overrides from `[build]`.
    #[serde(default)]
    pub build: BuildSection,
}

/// `[project]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSection {
    /// Binary/project name; defaults to the root directory's base name.
    #[serde(default)]
    pub name: Option<String>,

    /// Conditional-compilation tags passed to the build tool via `-tags`.
    #[serde(default)]
    pub build_tags: Option<String>,
}

/// `[watch]` section.
///
/// Patterns are regular expressions matched against the full file path.
/// A path matching any `ignore` pattern is never acted on, regardless of
/// `watch` matches.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Inclusion patterns; a change must match one of these to count.
    #[serde(default = "default_watch_patterns")]
    pub watch: Vec<String>,

    /// Exclusion patterns, evaluated before inclusion.
    #[serde(default = "default_ignore_patterns")]
    pub ignore: Vec<String>,

    /// Quiescence window: a rebuild fires after this many milliseconds
    /// without further qualifying changes.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_watch_patterns() -> Vec<String> {
    vec![r"\.go$".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    vec![r"(\.js|\.html|\.bat|\.txt|\.md|\.exe|\.exe~)$".to_string()]
}

fn default_debounce_ms() -> u64 {
    1000
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            watch: default_watch_patterns(),
            ignore: default_ignore_patterns(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// The external build tool to invoke as `<tool> build -o <name>`.
    #[serde(default = "default_build_tool")]
    pub tool: String,

    /// Environment overrides applied to the build process only.
    ///
    /// The default disables the build tool's garbage collector for the
    /// duration of the compile.
    #[serde(default = "default_build_env")]
    pub env: BTreeMap<String, String>,
}

fn default_build_tool() -> String {
    "go".to_string()
}

fn default_build_env() -> BTreeMap<String, String> {
    BTreeMap::from([("GOGC".to_string(), "off".to_string())])
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            tool: default_build_tool(),
            env: default_build_env(),
        }
    }
}
