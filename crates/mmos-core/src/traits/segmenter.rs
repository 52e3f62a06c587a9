use crate::models::Token;

/// Word segmentation for a single sentence.
pub trait ISegmenter: Send + Sync {
    /// Segment `sentence`, which starts at byte `offset` of the full text.
    /// Returned spans are relative to the full text. Stop words are not
    /// removed here.
    fn segment(&self, sentence: &str, offset: usize) -> Vec<Token>;

    fn name(&self) -> &str;
}
