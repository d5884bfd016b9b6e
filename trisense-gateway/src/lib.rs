//! TriSense inference gateway.
//!
//! Serves text, face, voice and meta models over HTTP. Models are loaded on
//! first use and cached for the lifetime of the process.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use lifecycle::{ModelLoadError, ModelManager, ModelSlot};
pub use state::AppState;
