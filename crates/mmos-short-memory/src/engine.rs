//! ShortMemoryEngine: window, relevance, topics, compression, tail.

use std::collections::BTreeMap;
use std::sync::Arc;

use mmos_compression::CompressionEngine;
use mmos_core::config::defaults::TAIL_TURNS;
use mmos_core::config::{ShortMemoryConfig, StrategyKind};
use mmos_core::errors::{EmbeddingError, MmosResult};
use mmos_core::models::{
    CompressedConversation, CompressionStats, ContextEntry, Conversation, DegradationEvent,
    Fingerprint, Role, Turn,
};
use mmos_core::traits::{
    CompressionContext, IBlockCompressor, IEmbeddingProvider, IRelevanceStrategy,
};
use mmos_embeddings::{create_provider, EmbeddingCache, EmbeddingRequest, EmbeddingService};
use mmos_relevance::{
    strategy_for, term_cache, FingerprintIndex, LexicalStrategy, PreFilter, RelevanceScorer,
    TermCache,
};
use mmos_tokens::Tokenizer;
use mmos_topics::{TopicSegmenter, TurnTerms};
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

/// Compresses conversation history for the next model call.
///
/// Stateless between calls apart from the embedding and term caches, so
/// one engine serves any number of conversations, concurrently if needed.
pub struct ShortMemoryEngine {
    config: ShortMemoryConfig,
    tokenizer: Arc<Tokenizer>,
    term_cache: TermCache,
    embeddings: Option<EmbeddingService>,
    strategy: Box<dyn IRelevanceStrategy>,
    scorer: RelevanceScorer,
    segmenter: TopicSegmenter,
    compressor: CompressionEngine,
}

impl std::fmt::Debug for ShortMemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortMemoryEngine")
            .field("strategy", &self.strategy.name())
            .field("embeddings", &self.embeddings)
            .field("window_size", &self.config.window_size)
            .finish()
    }
}

impl ShortMemoryEngine {
    /// Validate `config` and build the engine with the embedding provider it
    /// names and a fresh embedding cache.
    pub fn new(config: ShortMemoryConfig) -> MmosResult<Self> {
        let cache = EmbeddingCache::new(config.embedding.cache_capacity);
        Self::with_cache(config, cache)
    }

    /// Like [`new`](Self::new), sharing an existing embedding cache.
    pub fn with_cache(config: ShortMemoryConfig, cache: EmbeddingCache) -> MmosResult<Self> {
        config.validate()?;
        let tokenizer = Arc::new(Tokenizer::new(&config.tokenizer));
        let provider = create_provider(&config.embedding, tokenizer.clone())?;
        Ok(Self::assemble(config, tokenizer, provider, cache))
    }

    /// Use an injected provider instead of the one `config.embedding`
    /// describes.
    pub fn with_provider(
        config: ShortMemoryConfig,
        provider: Arc<dyn IEmbeddingProvider>,
        cache: EmbeddingCache,
    ) -> MmosResult<Self> {
        // The injected provider satisfies `strategy = "ai"`.
        let mut checked = config.clone();
        checked.strategy = StrategyKind::Auto;
        checked.validate()?;
        let tokenizer = Arc::new(Tokenizer::new(&config.tokenizer));
        Ok(Self::assemble(config, tokenizer, Some(provider), cache))
    }

    fn assemble(
        config: ShortMemoryConfig,
        tokenizer: Arc<Tokenizer>,
        provider: Option<Arc<dyn IEmbeddingProvider>>,
        cache: EmbeddingCache,
    ) -> Self {
        let strategy = strategy_for(&config, provider.is_some());
        let embeddings = provider.map(|p| EmbeddingService::new(p, cache));
        info!(
            strategy = strategy.name(),
            provider = embeddings.as_ref().map(|e| e.provider_name()),
            window_size = config.window_size,
            compression = ?config.compression_strategy,
            "short memory engine ready"
        );
        Self {
            scorer: RelevanceScorer::from_config(&config),
            segmenter: TopicSegmenter::from_config(&config),
            compressor: CompressionEngine::from_config(tokenizer.clone(), &config),
            term_cache: term_cache(config.term_cache_capacity),
            strategy,
            embeddings,
            tokenizer,
            config,
        }
    }

    pub fn config(&self) -> &ShortMemoryConfig {
        &self.config
    }

    /// `ai` or `algorithm`.
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn embedding_cache(&self) -> Option<&EmbeddingCache> {
        self.embeddings.as_ref().map(EmbeddingService::cache)
    }

    /// Compress `conversation`. Never fails: provider errors degrade scoring
    /// to lexical, and a Block that cannot be compressed is kept verbatim.
    pub fn compress(&self, conversation: &Conversation) -> CompressedConversation {
        let turns = conversation.turns();
        let _span = info_span!("mmos.compress", turns = turns.len()).entered();

        let mut stats = CompressionStats {
            input_turns: turns.len(),
            ..Default::default()
        };
        if turns.len() <= TAIL_TURNS {
            stats.retained_turns = turns.len();
            return CompressedConversation {
                entries: turns.iter().cloned().map(ContextEntry::Verbatim).collect(),
                degradation: None,
                stats,
            };
        }

        let tail_start = turns.len() - TAIL_TURNS;
        let window_start = turns.len().saturating_sub(self.config.window_size);
        let prefix_start = window_start.min(tail_start);
        let expired = &turns[..prefix_start];
        let prefix = &turns[prefix_start..tail_start];
        let tail = &turns[tail_start..];

        let mut entries = Vec::with_capacity(turns.len());
        for turn in expired {
            if turn.role() == Role::System {
                entries.push(ContextEntry::Verbatim(turn.clone()));
                stats.retained_turns += 1;
            } else {
                stats.dropped_turns += 1;
            }
        }

        // Relevance.
        let mut index = self.index();
        for turn in turns[window_start..].iter().filter(|t| t.role() != Role::System) {
            index.add(turn);
        }
        let mut fingerprints: BTreeMap<u64, Fingerprint> = index
            .fingerprints()
            .into_iter()
            .map(|f| (f.sequence_index, f))
            .collect();
        let prefilter = PreFilter::build(&index, self.config.filter_error_rate);
        let plan = self.scorer.plan(prefix, prefix.len(), &fingerprints, &prefilter);
        stats.scored_candidates = plan.to_score.len();
        stats.skipped_candidates = plan.skipped.len();

        let mut degradation = None;
        let mut strategy: &dyn IRelevanceStrategy = self.strategy.as_ref();
        if strategy.uses_embeddings() && !plan.all_relevant && !plan.to_score.is_empty() {
            let targets: Vec<&Turn> = plan
                .embedding_targets()
                .into_iter()
                .filter_map(|seq| prefix.iter().find(|t| t.sequence_index() == seq))
                .collect();
            match self.embed(&targets) {
                Some(Ok(vectors)) => {
                    for (turn, vector) in targets.iter().zip(vectors) {
                        if let Some(fp) = fingerprints.get_mut(&turn.sequence_index()) {
                            fp.embedding = Some(vector);
                        }
                    }
                }
                Some(Err(err)) => {
                    warn!(
                        error = %err,
                        recoverable = err.is_recoverable(),
                        "embedding lookup failed, scoring lexically"
                    );
                    degradation = Some(DegradationEvent::now(
                        "embeddings",
                        err.to_string(),
                        LexicalStrategy.name(),
                    ));
                    strategy = &LexicalStrategy;
                }
                None => {}
            }
        }
        let report = self
            .scorer
            .judge(&plan, prefix, prefix.len(), &fingerprints, strategy);

        // Runs of contiguous relevant turns; system and dropped turns end a run.
        let mut runs: Vec<Vec<TurnTerms>> = Vec::new();
        let mut run: Vec<TurnTerms> = Vec::new();
        for turn in prefix {
            if turn.role() == Role::System {
                entries.push(ContextEntry::Verbatim(turn.clone()));
                stats.retained_turns += 1;
                close_run(&mut runs, &mut run);
            } else if report.is_relevant(turn.sequence_index()) {
                let terms = self.tokenizer.terms(turn.content()).unwrap_or_default();
                run.push(TurnTerms::new(turn.clone(), terms));
                stats.retained_turns += 1;
            } else {
                stats.dropped_turns += 1;
                close_run(&mut runs, &mut run);
            }
        }
        close_run(&mut runs, &mut run);

        // Topics and compression.
        let topics = self.segmenter.segment(&runs);
        stats.blocks = topics.blocks.len();
        let context = CompressionContext {
            fingerprints: &fingerprints,
            keyword_ranks: topics.ranks.as_map(),
        };
        for block in &topics.blocks {
            match self.compressor.compress_block(block, &context) {
                Ok(unit) => entries.push(ContextEntry::Compressed(unit)),
                Err(err) => {
                    warn!(
                        error = %err,
                        first = block.first_sequence_index(),
                        turns = block.len(),
                        "block compression failed, keeping turns verbatim"
                    );
                    stats.verbatim_fallbacks += 1;
                    entries.extend(block.turns.iter().cloned().map(ContextEntry::Verbatim));
                }
            }
        }
        entries.sort_by_key(ContextEntry::sequence_index);

        entries.extend(tail.iter().cloned().map(ContextEntry::Verbatim));
        stats.retained_turns += tail.len();

        debug!(
            retained = stats.retained_turns,
            dropped = stats.dropped_turns,
            blocks = stats.blocks,
            fallbacks = stats.verbatim_fallbacks,
            degraded = degradation.is_some(),
            "conversation compressed"
        );
        CompressedConversation {
            entries,
            degradation,
            stats,
        }
    }

    /// Compress independent conversations in parallel.
    pub fn compress_batch(&self, conversations: &[Conversation]) -> Vec<CompressedConversation> {
        conversations.par_iter().map(|c| self.compress(c)).collect()
    }

    /// Relevance of `a` to `b` under the configured strategy, outside any
    /// window. Symmetric.
    pub fn score(&self, a: &Turn, b: &Turn) -> f64 {
        let index = self.index();
        let mut fa = index.fingerprint(a);
        let mut fb = index.fingerprint(b);
        if self.strategy.uses_embeddings() {
            match self.embed(&[a, b]) {
                Some(Ok(mut vectors)) if vectors.len() == 2 => {
                    fb.embedding = vectors.pop();
                    fa.embedding = vectors.pop();
                }
                Some(Err(err)) => {
                    warn!(error = %err, "embedding lookup failed, scoring lexically");
                }
                _ => {}
            }
        }
        self.strategy.score(&fa, &fb)
    }

    /// Fingerprint of `turn` on its own, with an embedding when the
    /// configured strategy uses one and the provider delivers it.
    pub fn fingerprint(&self, turn: &Turn) -> Fingerprint {
        let index = self.index();
        let mut fingerprint = index.fingerprint(turn);
        if self.strategy.uses_embeddings() {
            match self.embed(&[turn]) {
                Some(Ok(mut vectors)) => fingerprint.embedding = vectors.pop(),
                Some(Err(err)) => {
                    warn!(error = %err, "embedding lookup failed, fingerprint is lexical only");
                }
                None => {}
            }
        }
        fingerprint
    }

    fn index(&self) -> FingerprintIndex {
        FingerprintIndex::from_config(
            &self.config,
            self.tokenizer.clone(),
            self.term_cache.clone(),
        )
    }

    /// One batched lookup for `turns`. `None` when no provider is configured.
    fn embed(&self, turns: &[&Turn]) -> Option<Result<Vec<Vec<f32>>, EmbeddingError>> {
        let service = self.embeddings.as_ref()?;
        if !service.is_available() {
            return Some(Err(EmbeddingError::ProviderUnavailable {
                provider: service.provider_name().to_string(),
                reason: "cooling down after a failed request".to_string(),
            }));
        }
        let hashes: Vec<String> = turns.iter().map(|t| t.content_hash()).collect();
        let requests: Vec<EmbeddingRequest<'_>> = turns
            .iter()
            .zip(&hashes)
            .map(|(turn, hash)| EmbeddingRequest {
                content_hash: hash,
                text: turn.content(),
            })
            .collect();
        Some(service.embed_all(&requests))
    }
}

fn close_run(runs: &mut Vec<Vec<TurnTerms>>, run: &mut Vec<TurnTerms>) {
    if !run.is_empty() {
        runs.push(std::mem::take(run));
    }
}

#[cfg(test)]
mod tests {
    use mmos_core::config::EmbeddingProviderKind;
    use mmos_core::models::ChatMessage;

    use super::*;

    fn conversation(messages: &[(Role, &str)]) -> Conversation {
        Conversation::from_messages(messages.iter().map(|(r, c)| ChatMessage::new(*r, *c)))
    }

    #[test]
    fn short_conversations_pass_through() {
        let engine = ShortMemoryEngine::new(ShortMemoryConfig::default()).unwrap();
        let input = conversation(&[(Role::User, "hi"), (Role::Assistant, "hello")]);
        let out = engine.compress(&input);
        assert_eq!(out.to_conversation().unwrap(), input);
        assert_eq!(out.stats.retained_turns, 2);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = ShortMemoryConfig {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(ShortMemoryEngine::new(config).is_err());
    }

    #[test]
    fn strategy_follows_provider() {
        let lexical = ShortMemoryEngine::new(ShortMemoryConfig::default()).unwrap();
        assert_eq!(lexical.strategy_name(), "algorithm");
        assert!(lexical.embedding_cache().is_none());

        let mut config = ShortMemoryConfig::default();
        config.embedding.provider = EmbeddingProviderKind::Hashed;
        let hybrid = ShortMemoryEngine::new(config).unwrap();
        assert_eq!(hybrid.strategy_name(), "ai");
    }

    #[test]
    fn old_system_turns_survive_the_window() {
        let config = ShortMemoryConfig {
            window_size: 3,
            ..Default::default()
        };
        let engine = ShortMemoryEngine::new(config).unwrap();
        let input = conversation(&[
            (Role::System, "You are a travel assistant."),
            (Role::User, "Best pizza in Naples?"),
            (Role::Assistant, "Try Da Michele."),
            (Role::User, "Louvre opening hours?"),
            (Role::Assistant, "9 to 18."),
            (Role::User, "Closed on Tuesday?"),
        ]);
        let out = engine.compress(&input);
        let turns = out.to_conversation().unwrap().into_turns();
        assert_eq!(turns[0].content(), "You are a travel assistant.");
        assert_eq!(out.stats.dropped_turns, 2);
        let last: Vec<&str> = turns.iter().rev().take(2).map(Turn::content).collect();
        assert_eq!(last, vec!["Closed on Tuesday?", "9 to 18."]);
    }

    #[test]
    fn fingerprint_is_stable() {
        let engine = ShortMemoryEngine::new(ShortMemoryConfig::default()).unwrap();
        let turn = Turn::user("Louvre tickets cost 17 euros", 0);
        assert_eq!(engine.fingerprint(&turn), engine.fingerprint(&turn));
    }

    #[test]
    fn oversized_window_compresses_without_preallocating() {
        let config = ShortMemoryConfig {
            window_size: usize::MAX,
            ..Default::default()
        };
        let engine = ShortMemoryEngine::new(config).unwrap();
        let input = conversation(&[
            (Role::User, "Louvre tickets?"),
            (Role::Assistant, "17 euros."),
            (Role::User, "Opening hours?"),
        ]);
        let out = engine.compress(&input);
        assert_eq!(out.stats.input_turns, 3);
        assert_eq!(out.stats.dropped_turns, 0);
        assert_eq!(out.to_conversation().unwrap().len(), 3);
    }
}
