// Single source of truth for all default values.

// --- Window ---
pub const DEFAULT_WINDOW_SIZE: usize = 100;
/// Trailing turns always emitted verbatim.
pub const TAIL_TURNS: usize = 2;
pub const DEFAULT_PRESERVE_LAST_N: usize = 2;

// --- Relevance ---
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_FILTER_ERROR_RATE: f64 = 0.01;
pub const DEFAULT_EMBEDDING_WEIGHT: f64 = 0.7;
pub const DEFAULT_LEXICAL_WEIGHT: f64 = 0.3;
pub const DEFAULT_ENTITY_TOP_N: usize = 8;
/// Tokenized turns kept across calls, by content hash.
pub const DEFAULT_TERM_CACHE_CAPACITY: u64 = 10_000;

// --- Topics ---
pub const DEFAULT_COOCCURRENCE_WINDOW: usize = 3;
pub const DEFAULT_TOPIC_KEYWORDS: usize = 5;
pub const DEFAULT_LABEL_KEYWORDS: usize = 2;
pub const DEFAULT_RANK_DAMPING: f64 = 0.85;
pub const DEFAULT_RANK_EPSILON: f64 = 1e-6;
pub const DEFAULT_RANK_MAX_ITERATIONS: usize = 100;

// --- Compression ---
pub const DEFAULT_KEEP_RATIO: f64 = 0.5;
pub const DEFAULT_SUMMARY_SENTENCES: usize = 2;
pub const MAX_SUMMARY_SENTENCES: usize = 2;

// --- Tokenizer ---
pub const DEFAULT_SENTENCE_TERMINALS: &str = ".!?;。！？；\n";

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_HASHED_DIMENSIONS: usize = 256;
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_EMBEDDING_MAX_RETRIES: u32 = 1;
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_ENV_VAR: &str = "MMOS_LOG";
