//! TriSense Common Types
//!
//! Shared types used by the inference gateway and its clients.

pub mod analysis;
pub mod slot;

pub use analysis::{AnalyzeRequest, AnalyzeResponse, HealthResponse, HealthStatus, ReadyResponse};
pub use slot::{ParseSlotNameError, SlotName, SlotReport, SlotState};
