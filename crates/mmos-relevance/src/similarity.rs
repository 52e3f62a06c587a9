//! Vector similarity over dense and sparse vectors.
//!
//! Every function accumulates in a fixed order, so swapping the arguments
//! yields a bit-identical result. Every dense metric maps into `[-1, 1]`.

use std::collections::BTreeMap;

use mmos_core::config::SimilarityMetric;

/// Dense similarity under `metric`. Mismatched or empty vectors score 0.0.
pub fn vector_similarity(metric: SimilarityMetric, a: &[f32], b: &[f32]) -> f64 {
    match metric {
        SimilarityMetric::Cosine => cosine_similarity(a, b),
        SimilarityMetric::Euclidean => euclidean_similarity(a, b),
        SimilarityMetric::DotProduct => dot_product_similarity(a, b),
        SimilarityMetric::Manhattan => manhattan_similarity(a, b),
        SimilarityMetric::Jaccard => jaccard_similarity(a, b),
    }
}

/// Dense cosine similarity. Returns 0.0 for mismatched lengths or zero
/// vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    finish(dot, norm_a, norm_b)
}

/// `1 / (1 + d)` for Euclidean distance `d`.
pub fn euclidean_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let squared: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum();
    1.0 / (1.0 + squared.sqrt())
}

/// `1 / (1 + d)` for Manhattan distance `d`.
pub fn manhattan_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let distance: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64 - *y as f64).abs())
        .sum();
    1.0 / (1.0 + distance)
}

/// Dot product, clamped to `[-1, 1]`.
pub fn dot_product_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    dot.clamp(-1.0, 1.0)
}

/// Jaccard index of the sets of positive components. 1.0 when neither
/// vector has a positive component.
pub fn jaccard_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut both, mut either) = (0usize, 0usize);
    for (x, y) in a.iter().zip(b.iter()) {
        let (px, py) = (*x > 0.0, *y > 0.0);
        both += usize::from(px && py);
        either += usize::from(px || py);
    }
    if either == 0 {
        return 1.0;
    }
    both as f64 / either as f64
}

/// Cosine similarity of two sparse term-weight maps, merged in key order.
pub fn sparse_cosine(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let norm_a: f64 = a.values().map(|w| w * w).sum();
    let norm_b: f64 = b.values().map(|w| w * w).sum();

    let mut dot = 0.0f64;
    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();
    while let (Some((ka, wa)), Some((kb, wb))) = (left.peek(), right.peek()) {
        match ka.cmp(kb) {
            std::cmp::Ordering::Less => {
                left.next();
            }
            std::cmp::Ordering::Greater => {
                right.next();
            }
            std::cmp::Ordering::Equal => {
                dot += *wa * *wb;
                left.next();
                right.next();
            }
        }
    }

    finish(dot, norm_a, norm_b)
}

fn finish(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}
