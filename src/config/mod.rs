use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Recognized configuration, all optional (spec §6). Every field has a
/// default matching the values spec.md lists, following the teacher's
/// pattern of `#[serde(default = "...")]` functions rather than a single
/// blanket `Default` derive, so a partial TOML file still round-trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub post_processing: PostProcessingConfig,
    #[serde(default)]
    pub normalization: NormalizationConfig,
    #[serde(default)]
    pub query_merge: QueryMergeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,
    #[serde(default = "default_max_lines_per_chunk")]
    pub max_lines_per_chunk: usize,
    #[serde(default = "default_overlap_lines")]
    pub overlap_lines: usize,
    #[serde(default = "default_max_overlap_ratio")]
    pub max_overlap_ratio: f64,
    #[serde(default = "default_min_final_ratio")]
    pub min_final_ratio: f64,
    #[serde(default = "default_boundary_window")]
    pub boundary_window: usize,
    #[serde(default = "default_adjacency_gap")]
    pub adjacency_gap: usize,
    #[serde(default)]
    pub nested_functions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_true")]
    pub enable_ast: bool,
    #[serde(default = "default_true")]
    pub enable_semantic: bool,
    #[serde(default = "default_true")]
    pub enable_bracket_balance: bool,
    #[serde(default)]
    pub enable_overlap: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_memory_limit_mb")]
    pub memory_limit_mb: u64,
    #[serde(default = "default_per_strategy_timeout_ms")]
    pub per_strategy_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub enable_cache: bool,
    #[serde(default = "default_ast_cache_capacity")]
    pub ast_cache_capacity: u64,
    #[serde(default = "default_query_cache_capacity")]
    pub query_cache_capacity: u64,
    #[serde(default = "default_node_cache_capacity")]
    pub node_cache_capacity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostProcessingConfig {
    #[serde(default = "default_enabled_processors")]
    pub enabled_processors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConfig {
    #[serde(default)]
    pub strict_mode: bool,
    #[serde(default)]
    pub compute_text_descriptions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMergeConfig {
    #[serde(default = "default_query_merge_strategy")]
    pub strategy: String,
    #[serde(default = "default_max_context_size")]
    pub max_context_size: usize,
    #[serde(default = "default_max_chunk_count")]
    pub max_chunk_count: usize,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default)]
    pub cross_file: bool,
    #[serde(default = "default_conservative_gap_lines")]
    pub conservative_gap_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            features: FeaturesConfig::default(),
            performance: PerformanceConfig::default(),
            post_processing: PostProcessingConfig::default(),
            normalization: NormalizationConfig::default(),
            query_merge: QueryMergeConfig::default(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            min_chunk_size: default_min_chunk_size(),
            max_lines_per_chunk: default_max_lines_per_chunk(),
            overlap_lines: default_overlap_lines(),
            max_overlap_ratio: default_max_overlap_ratio(),
            min_final_ratio: default_min_final_ratio(),
            boundary_window: default_boundary_window(),
            adjacency_gap: default_adjacency_gap(),
            nested_functions: false,
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            enable_ast: true,
            enable_semantic: true,
            enable_bracket_balance: true,
            enable_overlap: false,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            memory_limit_mb: default_memory_limit_mb(),
            per_strategy_timeout_ms: default_per_strategy_timeout_ms(),
            enable_cache: true,
            ast_cache_capacity: default_ast_cache_capacity(),
            query_cache_capacity: default_query_cache_capacity(),
            node_cache_capacity: default_node_cache_capacity(),
        }
    }
}

impl Default for PostProcessingConfig {
    fn default() -> Self {
        Self {
            enabled_processors: default_enabled_processors(),
        }
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            compute_text_descriptions: false,
        }
    }
}

impl Default for QueryMergeConfig {
    fn default() -> Self {
        Self {
            strategy: default_query_merge_strategy(),
            max_context_size: default_max_context_size(),
            max_chunk_count: default_max_chunk_count(),
            similarity_threshold: default_similarity_threshold(),
            cross_file: false,
            conservative_gap_lines: default_conservative_gap_lines(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_max_chunk_size() -> usize {
    2000
}
fn default_min_chunk_size() -> usize {
    200
}
fn default_max_lines_per_chunk() -> usize {
    200
}
fn default_overlap_lines() -> usize {
    0
}
fn default_max_overlap_ratio() -> f64 {
    0.3
}
fn default_min_final_ratio() -> f64 {
    0.3
}
fn default_boundary_window() -> usize {
    3
}
fn default_adjacency_gap() -> usize {
    2
}
fn default_memory_limit_mb() -> u64 {
    512
}
fn default_per_strategy_timeout_ms() -> u64 {
    3000
}
fn default_ast_cache_capacity() -> u64 {
    200
}
fn default_query_cache_capacity() -> u64 {
    100
}
fn default_node_cache_capacity() -> u64 {
    1000
}
fn default_enabled_processors() -> Vec<String> {
    vec![
        "symbol_balance_repair".to_string(),
        "filter_and_merge".to_string(),
        "rebalance_tail".to_string(),
        "boundary_optimization".to_string(),
        "overlap_injection".to_string(),
    ]
}
fn default_query_merge_strategy() -> String {
    "semantic".to_string()
}
fn default_max_context_size() -> usize {
    4000
}
fn default_max_chunk_count() -> usize {
    3
}
fn default_similarity_threshold() -> f64 {
    0.7
}
fn default_conservative_gap_lines() -> usize {
    3
}

#[derive(Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "codegraph")
            .context("Failed to determine project directories")?;

        let config_dir = project_dirs.config_dir();
        let config_path = config_dir.join("config.toml");

        Ok(Self { config_path })
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub async fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(self.resolve_env_vars(config))
    }

    pub async fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write config file")?;

        Ok(())
    }

    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.load().await?;

        match key {
            "chunking.max_chunk_size" => config.chunking.max_chunk_size = value.parse()?,
            "chunking.min_chunk_size" => config.chunking.min_chunk_size = value.parse()?,
            "chunking.max_lines_per_chunk" => config.chunking.max_lines_per_chunk = value.parse()?,
            "chunking.overlap_lines" => config.chunking.overlap_lines = value.parse()?,
            "chunking.max_overlap_ratio" => config.chunking.max_overlap_ratio = value.parse()?,
            "features.enable_ast" => config.features.enable_ast = value.parse()?,
            "features.enable_semantic" => config.features.enable_semantic = value.parse()?,
            "features.enable_bracket_balance" => {
                config.features.enable_bracket_balance = value.parse()?
            }
            "features.enable_overlap" => config.features.enable_overlap = value.parse()?,
            "performance.memory_limit_mb" => config.performance.memory_limit_mb = value.parse()?,
            "performance.per_strategy_timeout_ms" => {
                config.performance.per_strategy_timeout_ms = value.parse()?
            }
            "performance.enable_cache" => config.performance.enable_cache = value.parse()?,
            "normalization.strict_mode" => config.normalization.strict_mode = value.parse()?,
            "normalization.compute_text_descriptions" => {
                config.normalization.compute_text_descriptions = value.parse()?
            }
            "query_merge.strategy" => config.query_merge.strategy = value.to_string(),
            "query_merge.max_context_size" => config.query_merge.max_context_size = value.parse()?,
            "query_merge.max_chunk_count" => config.query_merge.max_chunk_count = value.parse()?,
            "query_merge.similarity_threshold" => {
                config.query_merge.similarity_threshold = value.parse()?
            }
            "query_merge.cross_file" => config.query_merge.cross_file = value.parse()?,
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        self.save(&config).await?;
        Ok(())
    }

    fn resolve_env_vars(&self, mut config: Config) -> Config {
        if let Ok(limit) = std::env::var("CODEGRAPH_MEMORY_LIMIT_MB") {
            if let Ok(v) = limit.parse() {
                config.performance.memory_limit_mb = v;
            }
        }
        if let Ok(timeout) = std::env::var("CODEGRAPH_STRATEGY_TIMEOUT_MS") {
            if let Ok(v) = timeout.parse() {
                config.performance.per_strategy_timeout_ms = v;
            }
        }
        config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_section_6() {
        let config = Config::default();
        assert_eq!(config.chunking.max_chunk_size, 2000);
        assert_eq!(config.chunking.min_chunk_size, 200);
        assert_eq!(config.chunking.max_lines_per_chunk, 200);
        assert_eq!(config.chunking.overlap_lines, 0);
        assert!((config.chunking.max_overlap_ratio - 0.3).abs() < f64::EPSILON);
        assert!(config.features.enable_ast);
        assert!(!config.features.enable_overlap);
        assert_eq!(config.performance.memory_limit_mb, 512);
        assert_eq!(config.performance.per_strategy_timeout_ms, 3000);
        assert!(!config.normalization.strict_mode);
        assert_eq!(config.query_merge.strategy, "semantic");
        assert_eq!(config.query_merge.max_context_size, 4000);
        assert_eq!(config.query_merge.max_chunk_count, 3);
        assert!((config.query_merge.similarity_threshold - 0.7).abs() < f64::EPSILON);
        assert!(!config.query_merge.cross_file);
    }

    #[tokio::test]
    async fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.toml"));
        let mut config = Config::default();
        config.chunking.max_chunk_size = 4096;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.chunking.max_chunk_size, 4096);
    }
}
