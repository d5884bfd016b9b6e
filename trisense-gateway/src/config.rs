//! Configuration for the inference gateway.

use std::env;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use trisense_common::SlotName;

/// Main configuration structure for the gateway.
///
/// Read once at start-up; slot locations never change afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Source locations of the four model slots.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory holding `tokenizer.json`, `config.json` and `model.safetensors`.
    #[serde(default = "default_text_dir")]
    pub text_dir: String,
    /// Safetensors file or directory of safetensors files.
    #[serde(default = "default_face_path")]
    pub face_path: String,
    #[serde(default = "default_voice_path")]
    pub voice_path: String,
    #[serde(default = "default_meta_path")]
    pub meta_path: String,
}

impl ModelsConfig {
    /// Configured source location for a slot.
    pub fn location(&self, slot: SlotName) -> &str {
        match slot {
            SlotName::Text => &self.text_dir,
            SlotName::Face => &self.face_path,
            SlotName::Voice => &self.voice_path,
            SlotName::Meta => &self.meta_path,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            text_dir: default_text_dir(),
            face_path: default_face_path(),
            voice_path: default_voice_path(),
            meta_path: default_meta_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_text_dir() -> String {
    "bert_text_model".to_string()
}
fn default_face_path() -> String {
    "trisense_face_model".to_string()
}
fn default_voice_path() -> String {
    "trisense_voice_model".to_string()
}
fn default_meta_path() -> String {
    "trisense_meta_model.safetensors".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Flat environment variables that take precedence over everything else.
const LEGACY_OVERRIDES: [(&str, &str); 5] = [
    ("HF_TEXT_DIR", "models.text_dir"),
    ("FACE_MODEL_PATH", "models.face_path"),
    ("VOICE_MODEL_PATH", "models.voice_path"),
    ("META_MODEL_PATH", "models.meta_path"),
    ("PORT", "api.port"),
];

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. `HF_TEXT_DIR`, `FACE_MODEL_PATH`, `VOICE_MODEL_PATH`, `META_MODEL_PATH`, `PORT`
    /// 2. Environment variables (TRISENSE__SECTION__KEY format)
    /// 3. config.toml file (if present)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Same as [`Config::load`] with the flat overrides read through `lookup`.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ConfigLoader::builder()
            // Set defaults
            .set_default("api.host", default_host())?
            .set_default("api.port", default_port() as i64)?
            .set_default("models.text_dir", default_text_dir())?
            .set_default("models.face_path", default_face_path())?
            .set_default("models.voice_path", default_voice_path())?
            .set_default("models.meta_path", default_meta_path())?
            .set_default("logging.level", default_log_level())?
            // Load from config.toml if exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (TRISENSE__SECTION__KEY format)
            .add_source(
                Environment::with_prefix("TRISENSE")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_OVERRIDES {
            builder = builder.set_override_option(key, lookup(var))?;
        }

        builder.build()?.try_deserialize()
    }
}
