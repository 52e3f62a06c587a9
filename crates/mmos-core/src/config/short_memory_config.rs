use serde::{Deserialize, Serialize};

use super::defaults;
use super::{EmbeddingConfig, EmbeddingProviderKind, TokenizerConfig};
use crate::errors::ConfigError;

/// How far block compression may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionStrategy {
    /// Per-turn extractive compression for every block.
    Extractive,
    /// Multi-turn blocks summarized, everything else extractive.
    GraphSummary,
    /// Full shape dispatch including question/answer templates.
    #[default]
    Template,
}

/// Relevance strategy selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// `ai` when an embedding provider is configured, `algorithm` otherwise.
    #[default]
    Auto,
    /// Embedding + lexical hybrid.
    Ai,
    /// Lexical only.
    Algorithm,
}

/// Vector similarity used for the embedding component of hybrid scoring.
/// Every metric maps into `[-1, 1]`, so one threshold serves all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Cosine of the angle, in `[-1, 1]`.
    #[default]
    Cosine,
    /// `1 / (1 + d)` over Euclidean distance `d`, in `(0, 1]`.
    Euclidean,
    /// Raw dot product clamped to `[-1, 1]`. Meant for unit vectors.
    DotProduct,
    /// `1 / (1 + d)` over Manhattan distance `d`, in `(0, 1]`.
    Manhattan,
    /// Jaccard index of the positive components, in `[0, 1]`. Two vectors
    /// with no positive component are identical.
    Jaccard,
}

/// Root configuration for the short-term memory engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShortMemoryConfig {
    pub window_size: usize,
    pub similarity_threshold: f64,
    pub filter_error_rate: f64,
    pub compression_strategy: CompressionStrategy,
    pub preserve_last_n: usize,
    pub strategy: StrategyKind,
    pub embedding_weight: f64,
    pub lexical_weight: f64,
    pub similarity_metric: SimilarityMetric,
    pub entity_top_n: usize,
    pub term_cache_capacity: u64,
    pub cooccurrence_window: usize,
    pub topic_keywords: usize,
    pub label_keywords: usize,
    pub rank_damping: f64,
    pub rank_epsilon: f64,
    pub rank_max_iterations: usize,
    pub keep_ratio: f64,
    pub summary_sentences: usize,
    pub tokenizer: TokenizerConfig,
    pub embedding: EmbeddingConfig,
}

impl Default for ShortMemoryConfig {
    fn default() -> Self {
        Self {
            window_size: defaults::DEFAULT_WINDOW_SIZE,
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            filter_error_rate: defaults::DEFAULT_FILTER_ERROR_RATE,
            compression_strategy: CompressionStrategy::default(),
            preserve_last_n: defaults::DEFAULT_PRESERVE_LAST_N,
            strategy: StrategyKind::default(),
            embedding_weight: defaults::DEFAULT_EMBEDDING_WEIGHT,
            lexical_weight: defaults::DEFAULT_LEXICAL_WEIGHT,
            similarity_metric: SimilarityMetric::default(),
            entity_top_n: defaults::DEFAULT_ENTITY_TOP_N,
            term_cache_capacity: defaults::DEFAULT_TERM_CACHE_CAPACITY,
            cooccurrence_window: defaults::DEFAULT_COOCCURRENCE_WINDOW,
            topic_keywords: defaults::DEFAULT_TOPIC_KEYWORDS,
            label_keywords: defaults::DEFAULT_LABEL_KEYWORDS,
            rank_damping: defaults::DEFAULT_RANK_DAMPING,
            rank_epsilon: defaults::DEFAULT_RANK_EPSILON,
            rank_max_iterations: defaults::DEFAULT_RANK_MAX_ITERATIONS,
            keep_ratio: defaults::DEFAULT_KEEP_RATIO,
            summary_sentences: defaults::DEFAULT_SUMMARY_SENTENCES,
            tokenizer: TokenizerConfig::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl ShortMemoryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a loosely typed JSON object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::invalid("window_size", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::invalid(
                "similarity_threshold",
                format!("{} is outside [0, 1]", self.similarity_threshold),
            ));
        }
        if !(self.filter_error_rate > 0.0 && self.filter_error_rate < 1.0) {
            return Err(ConfigError::invalid(
                "filter_error_rate",
                format!("{} is outside (0, 1)", self.filter_error_rate),
            ));
        }
        if self.embedding_weight < 0.0 || self.lexical_weight < 0.0 {
            return Err(ConfigError::invalid(
                "embedding_weight",
                "score weights must be non-negative",
            ));
        }
        if self.embedding_weight + self.lexical_weight <= 0.0 {
            return Err(ConfigError::invalid(
                "lexical_weight",
                "score weights must not both be zero",
            ));
        }
        for (field, value) in [
            ("entity_top_n", self.entity_top_n),
            ("cooccurrence_window", self.cooccurrence_window),
            ("topic_keywords", self.topic_keywords),
            ("label_keywords", self.label_keywords),
            ("rank_max_iterations", self.rank_max_iterations),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if !(self.rank_damping > 0.0 && self.rank_damping < 1.0) {
            return Err(ConfigError::invalid(
                "rank_damping",
                format!("{} is outside (0, 1)", self.rank_damping),
            ));
        }
        if self.rank_epsilon <= 0.0 {
            return Err(ConfigError::invalid("rank_epsilon", "must be positive"));
        }
        if !(self.keep_ratio > 0.0 && self.keep_ratio <= 1.0) {
            return Err(ConfigError::invalid(
                "keep_ratio",
                format!("{} is outside (0, 1]", self.keep_ratio),
            ));
        }
        if self.summary_sentences == 0 || self.summary_sentences > defaults::MAX_SUMMARY_SENTENCES
        {
            return Err(ConfigError::invalid(
                "summary_sentences",
                format!("must be between 1 and {}", defaults::MAX_SUMMARY_SENTENCES),
            ));
        }
        if self.term_cache_capacity == 0 {
            return Err(ConfigError::invalid("term_cache_capacity", "must be at least 1"));
        }
        if self.tokenizer.sentence_terminals.is_empty() {
            return Err(ConfigError::invalid(
                "tokenizer.sentence_terminals",
                "at least one terminal is required",
            ));
        }
        self.validate_embedding()
    }

    fn validate_embedding(&self) -> Result<(), ConfigError> {
        let embedding = &self.embedding;
        if embedding.cache_capacity == 0 {
            return Err(ConfigError::invalid(
                "embedding.cache_capacity",
                "must be at least 1",
            ));
        }
        if embedding.dimensions == Some(0) {
            return Err(ConfigError::invalid(
                "embedding.dimensions",
                "must be at least 1",
            ));
        }
        match embedding.provider {
            EmbeddingProviderKind::Api => {
                if embedding.endpoint.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::invalid(
                        "embedding.endpoint",
                        "required for the api provider",
                    ));
                }
                if embedding.timeout_secs == 0 {
                    return Err(ConfigError::invalid(
                        "embedding.timeout_secs",
                        "must be at least 1",
                    ));
                }
            }
            EmbeddingProviderKind::None => {
                if self.strategy == StrategyKind::Ai {
                    return Err(ConfigError::invalid(
                        "strategy",
                        "\"ai\" requires an embedding provider",
                    ));
                }
            }
            EmbeddingProviderKind::Hashed => {}
        }
        Ok(())
    }

    /// Hybrid weights scaled to sum to one.
    pub fn normalized_weights(&self) -> (f64, f64) {
        let total = self.embedding_weight + self.lexical_weight;
        (self.embedding_weight / total, self.lexical_weight / total)
    }
}
