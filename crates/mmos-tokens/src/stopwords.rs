//! Stop-word filtering.

use std::collections::HashSet;

use crate::markers;

const ENGLISH: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does",
    "doing", "for", "from", "had", "has", "have", "having", "he", "her", "here", "hers", "him",
    "his", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
    "my", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own",
    "please", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "we", "were", "will", "with", "would", "you", "your", "yours",
];

const CHINESE: &[&str] = &[
    "的", "了", "着", "是", "在", "和", "与", "及", "就", "都", "也", "还", "又", "而", "或",
    "我", "你", "他", "她", "它", "我们", "你们", "他们", "她们", "它们", "这", "那", "这个",
    "那个", "这些", "那些", "一个", "一些", "可以", "就是", "还是", "但是", "因为", "所以",
    "如果", "然后", "已经", "以及", "一下", "有点", "吧", "啊", "呀", "哦", "嗯", "请",
];

/// A stop-word set. Negation and interrogative markers are never members,
/// whatever the source list says.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::from_words(ENGLISH.iter().chain(CHINESE.iter()).copied())
    }
}

impl StopWords {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .filter(|w| !w.is_empty() && !markers::is_marker_term(w))
            .collect();
        Self { words }
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().to_lowercase();
            if !word.is_empty() && !markers::is_marker_term(&word) {
                self.words.insert(word);
            }
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
