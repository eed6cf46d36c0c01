//! TOML-based configuration for sql-lineage.
//!
//! Supports a config file (sql-lineage.toml) with environment variable
//! expansion in the output directory.
//!
//! Example configuration:
//! ```toml
//! [output]
//! directory = "${HOME}/lineage"
//! format = "mermaid"
//!
//! [metadata]
//! tool = "SQL Lineage Analyzer"
//! version = "1.0"
//! excerpt_chars = 500
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::extract::EXCERPT_CHARS;
use crate::graph::GraphMetadata;
use crate::render::DiagramFormat;

use super::PipelineConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SQL_LINEAGE_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid diagram format: {0}")]
    InvalidFormat(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where and how artifacts are written.
    pub output: OutputSettings,

    /// Values stamped into generated documents.
    pub metadata: MetadataSettings,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output directory (supports ${ENV_VAR} expansion).
    pub directory: String,

    /// Diagram format: "drawio", "mermaid" or "graphviz".
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            format: DiagramFormat::default().to_string(),
        }
    }
}

impl OutputSettings {
    /// Get the diagram format.
    pub fn diagram_format(&self) -> Result<DiagramFormat, SettingsError> {
        self.format
            .parse()
            .map_err(|_| SettingsError::InvalidFormat(self.format.clone()))
    }

    /// Get the output directory with environment variables expanded.
    pub fn resolved_directory(&self) -> Result<PathBuf, SettingsError> {
        expand_env_vars(&self.directory).map(PathBuf::from)
    }
}

/// Metadata configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataSettings {
    pub tool: String,
    pub version: String,

    /// Number of SQL characters kept in the JSON metadata.
    pub excerpt_chars: usize,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            tool: GraphMetadata::DEFAULT_TOOL.to_string(),
            version: GraphMetadata::DEFAULT_VERSION.to_string(),
            excerpt_chars: EXCERPT_CHARS,
        }
    }
}

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "sql-lineage.toml";

/// Config files tried by [`Settings::load`] when `SQL_LINEAGE_CONFIG` is unset,
/// most specific first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("sql-lineage").join("config.toml"));
    }
    paths
}

impl Settings {
    /// Parse a settings file. Missing sections and keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SettingsError::FileNotFound(path.to_path_buf()),
            _ => SettingsError::ReadError(e),
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from `SQL_LINEAGE_CONFIG` if set, else the first existing file in
    /// [`search_paths`], else defaults.
    ///
    /// An explicit `SQL_LINEAGE_CONFIG` that points nowhere is an error.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            tracing::debug!(path = %path, "loading settings from {}", CONFIG_ENV);
            return Self::from_file(path);
        }

        match search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::from_file(path)
            }
            None => Ok(Settings::default()),
        }
    }

    /// Resolve into the immutable per-run configuration.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, SettingsError> {
        Ok(PipelineConfig {
            output_dir: self.output.resolved_directory()?,
            format: self.output.diagram_format()?,
            tool: self.metadata.tool.clone(),
            version: self.metadata.version.clone(),
            excerpt_chars: self.metadata.excerpt_chars,
        })
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced && ch == '}' {
                chars.next();
                break;
            }
            if !braced && !(ch.is_alphanumeric() || ch == '_') {
                break;
            }
            var_name.push(ch);
            chars.next();
        }

        if var_name.is_empty() && !braced {
            // Just a lone $, keep it
            result.push('$');
            continue;
        }
        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
