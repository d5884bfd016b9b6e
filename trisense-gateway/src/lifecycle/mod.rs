//! Model lifecycle management.
//!
//! Every model lives in a [`ModelSlot`] that starts empty and is populated on
//! first use. The [`ModelManager`] owns the four slots for the lifetime of the
//! process and is the only thing that drives their loads.

mod health;
mod manager;
mod slot;

pub use health::{health, readiness, READY_SLOTS};
pub use manager::ModelManager;
pub use slot::ModelSlot;

use std::path::{Path, PathBuf};

use trisense_common::SlotName;

/// Why a model backend could not produce a handle.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("invalid model config: {0}")]
    Config(String),

    #[error("weights error: {0}")]
    Weights(#[from] candle_core::Error),

    #[error("load task failed: {0}")]
    Join(String),
}

/// A failed `ensure_loaded`, tagged with the slot that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load {slot} model from {location}: {cause}")]
pub struct ModelLoadError {
    pub slot: SlotName,
    pub location: String,
    pub cause: String,
}

/// Produces a slot handle from its configured location.
///
/// Loads are blocking and run on the blocking thread pool.
pub trait ModelLoader<H>: Send + Sync + 'static {
    fn load(&self, location: &Path) -> Result<H, LoadError>;
}

impl<H, F> ModelLoader<H> for F
where
    F: Fn(&Path) -> Result<H, LoadError> + Send + Sync + 'static,
{
    fn load(&self, location: &Path) -> Result<H, LoadError> {
        self(location)
    }
}
