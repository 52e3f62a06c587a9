//! # mmos-tokens
//!
//! Turns raw turn text into normalized terms with byte spans.
//!
//! - Sentence splitting on configurable terminals
//! - Unicode word segmentation (CJK as character bigrams), or jieba
//!   dictionary words for Chinese
//! - Stop-word removal that never touches negation or interrogative words
//! - Negation / interrogative marker scanning for compression

pub mod jieba_segmenter;
pub mod markers;
pub mod segmenter;
pub mod sentence_splitter;
pub mod stopwords;
pub mod tokenizer;

pub use jieba_segmenter::JiebaSegmenter;
pub use markers::{find_markers, is_question, Marker, MarkerKind};
pub use segmenter::UnicodeSegmenter;
pub use stopwords::StopWords;
pub use tokenizer::{Sentence, TokenizedText, Tokenizer};
