//! Health, readiness and analysis payloads.

use serde::{Deserialize, Serialize};

/// Which slots are currently warm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub text_ready: bool,
    pub face_ready: bool,
    pub voice_ready: bool,
    pub meta_ready: bool,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

/// Body of `GET /ready`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub ready: bool,
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Successful analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Raw per-class classifier logits
    pub logits: Vec<f32>,
    /// Mean of the logits clipped to [0.0, 1.0]
    pub anxiety_score: f32,
}
