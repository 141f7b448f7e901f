//! Publishing registry entries to the remote marketplace.

pub mod bundle;
pub mod client;
pub mod payload;

pub use bundle::{classify, DirectoryBundle, FileClass};
pub use client::{MarketplaceClient, PUBLISH_AGENT_PATH, PUBLISH_CONTEXT_PATH, PUBLISH_PROMPT_PATH, UPLOAD_ASSET_PATH};
pub use payload::{AssetRef, PublishPayload, PublishResponse};
