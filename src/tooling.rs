//! Tooling & Integration Layer
//!
//! The command line, the interactive menu, and the text/JSON formatting they share.

pub mod cli;
pub mod format;
pub mod menu;

pub use cli::{Cli, CliContext, Commands};

use crate::error::ApiError;
use std::future::Future;

/// Drive an async marketplace call to completion on a fresh runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, ApiError> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| ApiError::ConfigError(format!("Failed to create runtime: {}", e)))?;
    Ok(rt.block_on(future))
}
