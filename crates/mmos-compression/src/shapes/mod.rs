//! One compressor per Block shape.

pub mod extractive;
pub mod graph_summary;
pub mod qa_template;
