//! Health and readiness derived from the slot cache.

use trisense_common::{HealthStatus, SlotName};

use super::ModelManager;

/// Slots the primary analysis endpoint needs.
pub const READY_SLOTS: [SlotName; 2] = [SlotName::Text, SlotName::Meta];

/// What is currently warm. Pure read; never loads anything.
pub async fn health(models: &ModelManager) -> HealthStatus {
    let snapshot = models.snapshot().await;
    let loaded = |slot: SlotName| snapshot.get(&slot).copied().unwrap_or(false);

    HealthStatus {
        text_ready: loaded(SlotName::Text),
        face_ready: loaded(SlotName::Face),
        voice_ready: loaded(SlotName::Voice),
        meta_ready: loaded(SlotName::Meta),
    }
}

/// Warm the [`READY_SLOTS`] and report whether all of them are loaded.
///
/// Load failures are logged and reported as "not ready", never returned.
pub async fn readiness(models: &ModelManager) -> bool {
    if let Err(err) = models.ensure(&READY_SLOTS).await {
        tracing::warn!("Not ready, {} model unavailable: {}", err.slot, err.cause);
    }

    for slot in READY_SLOTS {
        if !models.is_loaded(slot).await {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    use crate::engine::{TextModel, WeightBundle};
    use crate::lifecycle::{LoadError, ModelSlot};

    fn bundle(_: &Path) -> Result<WeightBundle, LoadError> {
        Ok(WeightBundle::from_tensors(HashMap::new()))
    }

    fn no_text(location: &Path) -> Result<TextModel, LoadError> {
        Err(LoadError::MissingArtifact(location.to_path_buf()))
    }

    fn manager() -> ModelManager {
        ModelManager::from_slots(
            ModelSlot::new(SlotName::Text, "missing_text", no_text),
            ModelSlot::new(SlotName::Face, "face", bundle),
            ModelSlot::new(SlotName::Voice, "voice", bundle),
            ModelSlot::new(SlotName::Meta, "meta", bundle),
        )
    }

    #[tokio::test]
    async fn test_health_does_not_load() {
        let models = manager();

        let before = health(&models).await;
        let after = health(&models).await;

        assert_eq!(before, HealthStatus::default());
        assert_eq!(before, after);
        assert!(models.snapshot().await.values().all(|loaded| !loaded));
        assert_eq!(models.face().load_attempts(), 0);
    }

    #[tokio::test]
    async fn test_health_reports_warm_slots() {
        let models = manager();
        models.ensure(&[SlotName::Voice]).await.unwrap();

        let status = health(&models).await;
        assert!(status.voice_ready);
        assert!(!status.text_ready);
        assert!(!status.face_ready);
    }

    #[tokio::test]
    async fn test_readiness_swallows_load_failure() {
        let models = manager();

        assert!(!readiness(&models).await);
        assert_eq!(models.text().load_attempts(), 1);
        // text failed first, so meta was never attempted
        assert_eq!(models.meta().load_attempts(), 0);
    }
}
