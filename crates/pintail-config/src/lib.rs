//! Configuration management for Pintail.
//!
//! A site is configured by a single `pintail.toml` file split into sections:
//!
//! - `[pintail]` holds site-wide settings.
//! - `[local]` shadows `[pintail]` when building a local preview.
//! - Sections whose name starts and ends with a slash (`["/guide/"]`) scope
//!   settings to one output directory.
//! - Any other section names an alternate source (see the `sources` key).
//!
//! All values are read back as strings. Booleans and numbers keep their TOML
//! text form, and arrays of scalars are joined with single spaces, so
//! `extra_files = ["*.css", "*.js"]` reads the same as `"*.css *.js"`.
//!
//! Missing keys are never an error: lookups return `None` and callers supply
//! their own defaults.
//!
//! ## Overlay configuration
//!
//! A `config_script` may print additional TOML on stdout. That output is
//! applied with [`Config::apply_overlay`] and shadows the file values.
//!
//! ## Environment Variable Expansion
//!
//! [`Config::get_expanded`] expands `${VAR}`, `$VAR` and a leading `~`.
//! It is used for repository URLs and file paths.

mod expand;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "pintail.toml";

/// Section holding site-wide settings.
pub const GLOBAL_SECTION: &str = "pintail";

/// Section shadowing [`GLOBAL_SECTION`] for local preview builds.
pub const LOCAL_SECTION: &str = "local";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config key (e.g., "`git_repository`").
        field: String,
        /// Error message (e.g., "${`GIT_TOKEN`} not set").
        message: String,
    },
}

/// Site configuration.
///
/// Wraps the parsed file plus an optional overlay produced by a
/// `config_script`. Lookups check the overlay first.
#[derive(Debug, Default, Clone)]
pub struct Config {
    file: Table,
    overlay: Table,
    local: bool,
    config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, can't be read, or isn't
    /// valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the content isn't valid TOML, or
    /// `ConfigError::Validation` if a top-level key is not a section.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file = parse_sections(content)?;
        Ok(Self {
            file,
            ..Self::default()
        })
    }

    /// Enable or disable local preview mode.
    #[must_use]
    pub fn with_local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    /// Whether local preview mode is enabled.
    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Path to the config file, if loaded from disk.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Apply overlay configuration (typically `config_script` output).
    ///
    /// Overlay values shadow file values. Applying a second overlay
    /// replaces the first.
    ///
    /// # Errors
    ///
    /// Returns error if the overlay isn't valid TOML.
    pub fn apply_overlay(&mut self, content: &str) -> Result<(), ConfigError> {
        self.overlay = parse_sections(content)?;
        Ok(())
    }

    /// Get the value for `key` in the section for `path`.
    ///
    /// A `None` path means the global `[pintail]` section. In local mode,
    /// global lookups check `[local]` first. Paths starting with a slash
    /// are normalized to end with one. A directory section never falls back
    /// to `[pintail]`; callers that want the global value ask for it.
    pub fn get(&self, key: &str, path: Option<&str>) -> Option<String> {
        let section = section_name(path);
        if self.local && section == GLOBAL_SECTION {
            let local = lookup(&self.overlay, LOCAL_SECTION, key)
                .or_else(|| lookup(&self.file, LOCAL_SECTION, key));
            if local.is_some() {
                return local;
            }
        }
        lookup(&self.overlay, &section, key).or_else(|| lookup(&self.file, &section, key))
    }

    /// Get a value split on whitespace, or an empty list when unset.
    pub fn get_list(&self, key: &str, path: Option<&str>) -> Vec<String> {
        self.get(key, path)
            .map(|v| v.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Get a whitespace-separated list combining overlay and file values.
    ///
    /// Unlike [`Config::get`], the overlay doesn't shadow the file: both
    /// contribute. Used for `extra_files`.
    pub fn get_merged(&self, key: &str, path: Option<&str>) -> Vec<String> {
        let section = section_name(path);
        [&self.overlay, &self.file]
            .into_iter()
            .filter_map(|table| lookup(table, &section, key))
            .flat_map(|v| {
                v.split_whitespace()
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Get a value with environment variables and `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvVar` if a referenced variable is unset.
    pub fn get_expanded(&self, key: &str, path: Option<&str>) -> Result<Option<String>, ConfigError> {
        self.get(key, path)
            .map(|v| expand::expand_env(&v, key))
            .transpose()
    }

    /// Whether `key` is set to a true value (`true`, `True`, `1`, `yes`).
    pub fn get_bool(&self, key: &str, path: Option<&str>) -> Option<bool> {
        self.get(key, path).map(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
    }

    /// All directory-scoped section names, in declaration order.
    ///
    /// A directory section both starts and ends with a slash.
    pub fn get_directories(&self) -> Vec<String> {
        let mut dirs: Vec<String> = Vec::new();
        for name in self.overlay.keys().chain(self.file.keys()) {
            if name.starts_with('/') && name.ends_with('/') && !dirs.contains(name) {
                dirs.push(name.clone());
            }
        }
        dirs
    }

    /// Get the root URL prefix for links from the directory at `path`.
    ///
    /// For local preview builds this is a relative prefix leading back to
    /// the output root. Otherwise it is `site_root`, or `/` when unset.
    pub fn get_site_root(&self, path: Option<&str>) -> String {
        match path {
            Some(path) if self.local => {
                if path == "/" {
                    return "./".to_owned();
                }
                let depth = path.matches('/').count().saturating_sub(1);
                "../".repeat(depth)
            }
            _ => self.get("site_root", None).unwrap_or_else(|| "/".to_owned()),
        }
    }
}

/// Normalize a lookup path to its section name.
fn section_name(path: Option<&str>) -> Cow<'_, str> {
    match path {
        None => Cow::Borrowed(GLOBAL_SECTION),
        Some(p) if p.starts_with('/') && !p.ends_with('/') => Cow::Owned(format!("{p}/")),
        Some(p) => Cow::Borrowed(p),
    }
}

/// Parse TOML content, requiring every top-level key to be a section.
fn parse_sections(content: &str) -> Result<Table, ConfigError> {
    let table: Table = content.parse()?;
    if let Some((key, _)) = table.iter().find(|(_, v)| !v.is_table()) {
        return Err(ConfigError::Validation(format!(
            "{key} must be inside a section such as [{GLOBAL_SECTION}]"
        )));
    }
    Ok(table)
}

fn lookup(table: &Table, section: &str, key: &str) -> Option<String> {
    table
        .get(section)
        .and_then(Value::as_table)
        .and_then(|s| s.get(key))
        .and_then(render_value)
}

/// Render a TOML value the way it would read in a flat key-value file.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(d) => Some(d.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(render_value)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::Table(_) => None,
    }
}
