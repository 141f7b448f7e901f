//! Agenco: personal registry of agents, contexts and prompts
//!
//! Records live in flat JSON documents (`agents.json`, `contexts.json`,
//! `prompts.json`). Agents and contexts reference files whose content is
//! aggregated on demand; prompts carry their own text. Entries can be searched,
//! copied to the clipboard, and published to the Agenco marketplace.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod logging;
pub mod marketplace;
pub mod registry;
pub mod search;
pub mod session;
pub mod storage;
pub mod tooling;

pub use error::{ApiError, StorageError};
pub use registry::{Agent, Context, Prompt, PromptUpdate, Record, RecordKind, Registries, Registry};
