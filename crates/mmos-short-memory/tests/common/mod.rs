//! Deterministic embedding providers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use mmos_core::errors::EmbeddingError;
use mmos_core::models::{ChatMessage, Conversation};
use mmos_core::traits::IEmbeddingProvider;
use serde::Deserialize;

/// Embeds text onto one axis per topic whose keywords it mentions, plus a
/// small shared bias so no vector is zero. Stands in for a semantic model.
pub struct TopicProvider {
    topics: Vec<Vec<&'static str>>,
}

impl TopicProvider {
    pub fn new() -> Self {
        Self {
            topics: vec![
                vec!["巴黎", "卢浮宫", "景点", "埃菲尔"],
                vec!["python", "异常", "finally", "try"],
                vec!["意大利面", "煮"],
                vec!["特斯拉", "股票"],
                vec!["transformer", "训练", "自注意力", "模型"],
                vec!["天气", "北京", "上海", "晴天"],
                vec!["louvre", "museum", "ticket"],
                vec!["sourdough", "bread", "dough"],
            ],
        }
    }
}

impl IEmbeddingProvider for TopicProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let lower = text.to_lowercase();
        let mut vector: Vec<f32> = self
            .topics
            .iter()
            .map(|words| {
                if words.iter().any(|w| lower.contains(w)) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        vector.push(0.1);
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.topics.len() + 1
    }

    fn name(&self) -> &str {
        "topic-mock"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Fails every request with the configured error.
pub struct FailingProvider {
    pub error: EmbeddingError,
}

impl FailingProvider {
    pub fn unavailable() -> Self {
        Self {
            error: EmbeddingError::ProviderUnavailable {
                provider: "mock".into(),
                reason: "connection refused".into(),
            },
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            error: EmbeddingError::RateLimited {
                provider: "mock".into(),
                retry_after_secs: Some(30),
            },
        }
    }
}

impl IEmbeddingProvider for FailingProvider {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(self.error.clone())
    }

    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(self.error.clone())
    }

    fn dimensions(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "failing-mock"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Counts `embed_batch` calls and the texts they carried.
pub struct CountingProvider {
    pub batches: AtomicUsize,
    pub texts: AtomicUsize,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self {
            batches: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }
}

impl IEmbeddingProvider for CountingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![text.len() as f32, 1.0, 0.5, 0.25])
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "counting-mock"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Deserialize)]
pub struct RelevanceCase {
    pub name: String,
    pub messages: Vec<ChatMessage>,
    pub expected_result: bool,
}

#[derive(Debug, Deserialize)]
pub struct TwoTopics {
    pub similarity_threshold: f64,
    pub topic_a: Vec<ChatMessage>,
    pub topic_b: Vec<ChatMessage>,
    pub tail: Vec<ChatMessage>,
    pub expected_blocks: usize,
    /// At the default threshold the older topic scores 0 against the anchor.
    pub default_threshold_blocks: usize,
}

#[derive(Debug, Deserialize)]
pub struct MustSurvive {
    pub similarity_threshold: f64,
    pub messages: Vec<ChatMessage>,
    pub must_survive: Vec<String>,
}

pub fn conversation(messages: impl IntoIterator<Item = ChatMessage>) -> Conversation {
    Conversation::from_messages(messages)
}
