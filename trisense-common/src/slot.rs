//! Model slot identity and state types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The independently loadable models served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    /// Tokenizer + sequence classifier pair
    Text,
    /// Facial expression model
    Face,
    /// Voice model
    Voice,
    /// Meta-aggregation model
    Meta,
}

impl SlotName {
    /// All slot variants for iteration.
    pub const ALL: [SlotName; 4] = [
        SlotName::Text,
        SlotName::Face,
        SlotName::Voice,
        SlotName::Meta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotName::Text => "text",
            SlotName::Face => "face",
            SlotName::Voice => "voice",
            SlotName::Meta => "meta",
        }
    }
}

impl std::fmt::Display for SlotName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSlotNameError(pub String);

impl std::fmt::Display for ParseSlotNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown model slot: {}", self.0)
    }
}

impl std::error::Error for ParseSlotNameError {}

impl FromStr for SlotName {
    type Err = ParseSlotNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotName::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| ParseSlotNameError(s.to_string()))
    }
}

/// Load state of a slot as seen from outside the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Never loaded; the next request that needs it will load it
    Unloaded,
    /// Loaded and cached for the process lifetime
    Loaded,
    /// The last load attempt failed; the next request retries
    FailedLastAttempt,
}

impl SlotState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SlotState::Loaded)
    }
}

/// Per-slot entry of the model listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotReport {
    pub name: SlotName,
    /// Configured source location (directory or file)
    pub location: String,
    pub state: SlotState,
    pub loaded: bool,
    /// Number of underlying load executions so far
    pub load_attempts: u64,
    /// Cause of the most recent failed load, if the slot is in the failed state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
