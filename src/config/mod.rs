//! Configuration module for sql-lineage.
//!
//! [`Settings`] is the on-disk TOML model; [`PipelineConfig`] is the resolved,
//! immutable value handed to each pipeline invocation.

mod settings;

pub use settings::{
    expand_env_vars, search_paths, MetadataSettings, OutputSettings, Settings, SettingsError,
    CONFIG_ENV, LOCAL_CONFIG,
};

use std::path::PathBuf;

use crate::extract::EXCERPT_CHARS;
use crate::graph::GraphMetadata;
use crate::render::DiagramFormat;

/// Per-run configuration. Built once, passed by reference, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Existing, writable directory that receives all artifacts.
    pub output_dir: PathBuf,
    pub format: DiagramFormat,
    pub tool: String,
    pub version: String,
    pub excerpt_chars: usize,
}

impl PipelineConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: DiagramFormat::default(),
            tool: GraphMetadata::DEFAULT_TOOL.to_string(),
            version: GraphMetadata::DEFAULT_VERSION.to_string(),
            excerpt_chars: EXCERPT_CHARS,
        }
    }

    /// Set the diagram format.
    pub fn with_format(mut self, format: DiagramFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}
