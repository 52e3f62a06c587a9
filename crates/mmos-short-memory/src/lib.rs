//! # mmos-short-memory
//!
//! Keeps a chat history inside a model's context budget.
//!
//! [`ShortMemoryEngine::compress`] takes the full conversation and returns
//! a shorter one: turns unrelated to the latest user question are dropped,
//! the rest are grouped by topic and compressed, and the final two turns are
//! passed through untouched. Numbers, entities, negations and question words
//! always survive.
//!
//! ```no_run
//! use mmos_core::models::{Conversation, Role};
//! use mmos_core::ShortMemoryConfig;
//! use mmos_short_memory::ShortMemoryEngine;
//!
//! let engine = ShortMemoryEngine::new(ShortMemoryConfig::default())?;
//! let mut conversation = Conversation::new();
//! conversation.push(Role::User, "推荐几个巴黎的景点");
//! conversation.push(Role::Assistant, "埃菲尔铁塔、卢浮宫、蒙马特高地都值得一去");
//! conversation.push(Role::User, "卢浮宫需要预约吗");
//! let compressed = engine.compress(&conversation);
//! let context = compressed.to_conversation()?;
//! # Ok::<(), mmos_core::MmosError>(())
//! ```

pub mod engine;
pub mod tracing_setup;

pub use engine::ShortMemoryEngine;
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
