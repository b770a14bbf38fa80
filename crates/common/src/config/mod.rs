//! Configuration management for the CiteGraph engine
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with CITEGRAPH__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Inference engine configuration
    #[serde(default)]
    pub inference: InferenceConfig,

    /// PageRank configuration
    #[serde(default)]
    pub pagerank: PageRankSettings,

    /// Louvain configuration
    #[serde(default)]
    pub louvain: LouvainSettings,

    /// Node similarity configuration
    #[serde(default)]
    pub similarity: SimilaritySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceConfig {
    /// Maximum expansion depth for citation-candidate inference
    #[serde(default = "default_citation_depth")]
    pub citation_depth: usize,

    /// Attribute holding a paper's publication year
    #[serde(default = "default_published_attribute")]
    pub published_attribute: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageRankSettings {
    /// Damping factor (typically 0.85)
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Maximum iterations
    #[serde(default = "default_pagerank_iterations")]
    pub max_iterations: usize,

    /// L1 score-delta convergence threshold
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LouvainSettings {
    /// Maximum local-move sweeps per level
    #[serde(default = "default_local_sweeps")]
    pub max_local_sweeps: usize,

    /// Maximum aggregation levels
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimilaritySettings {
    /// Keep only the top-k pairs (None = unrestricted)
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl EngineConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("CITEGRAPH_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with CITEGRAPH__ prefix
            // e.g., CITEGRAPH__PAGERANK__DAMPING=0.9
            .add_source(
                Environment::with_prefix("CITEGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("CITEGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            citation_depth: default_citation_depth(),
            published_attribute: default_published_attribute(),
        }
    }
}

impl Default for PageRankSettings {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            max_iterations: default_pagerank_iterations(),
            epsilon: default_epsilon(),
        }
    }
}

impl Default for LouvainSettings {
    fn default() -> Self {
        Self {
            max_local_sweeps: default_local_sweeps(),
            max_levels: default_max_levels(),
        }
    }
}

impl Default for SimilaritySettings {
    fn default() -> Self {
        Self { top_k: None }
    }
}

// Default value functions

fn default_citation_depth() -> usize {
    crate::DEFAULT_CITATION_DEPTH
}

fn default_published_attribute() -> String {
    "published".to_string()
}

fn default_damping() -> f64 {
    crate::DEFAULT_DAMPING_FACTOR
}

fn default_pagerank_iterations() -> usize {
    20
}

fn default_epsilon() -> f64 {
    1e-6
}

fn default_local_sweeps() -> usize {
    50
}

fn default_max_levels() -> usize {
    10
}
