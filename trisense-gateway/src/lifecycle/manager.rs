//! Owner of the four model slots.

use std::collections::BTreeMap;

use trisense_common::{SlotName, SlotReport};

use super::{ModelLoadError, ModelSlot};
use crate::config::ModelsConfig;
use crate::engine::{TextModel, WeightBundle};

/// Process-wide model cache.
///
/// Constructed once at start-up with every slot unloaded. Request handlers
/// declare the slots they need through [`ModelManager::ensure`], so a request
/// that only needs text and meta never pays for face or voice.
pub struct ModelManager {
    text: ModelSlot<TextModel>,
    face: ModelSlot<WeightBundle>,
    voice: ModelSlot<WeightBundle>,
    meta: ModelSlot<WeightBundle>,
}

impl ModelManager {
    /// Slots backed by the on-disk loaders at the configured locations.
    pub fn new(config: &ModelsConfig) -> Self {
        Self::from_slots(
            ModelSlot::new(SlotName::Text, config.location(SlotName::Text), TextModel::load),
            ModelSlot::new(SlotName::Face, config.location(SlotName::Face), WeightBundle::load),
            ModelSlot::new(SlotName::Voice, config.location(SlotName::Voice), WeightBundle::load),
            ModelSlot::new(SlotName::Meta, config.location(SlotName::Meta), WeightBundle::load),
        )
    }

    pub fn from_slots(
        text: ModelSlot<TextModel>,
        face: ModelSlot<WeightBundle>,
        voice: ModelSlot<WeightBundle>,
        meta: ModelSlot<WeightBundle>,
    ) -> Self {
        Self {
            text,
            face,
            voice,
            meta,
        }
    }

    pub fn text(&self) -> &ModelSlot<TextModel> {
        &self.text
    }

    pub fn face(&self) -> &ModelSlot<WeightBundle> {
        &self.face
    }

    pub fn voice(&self) -> &ModelSlot<WeightBundle> {
        &self.voice
    }

    pub fn meta(&self) -> &ModelSlot<WeightBundle> {
        &self.meta
    }

    /// Load every named slot in order, stopping at the first failure.
    pub async fn ensure(&self, slots: &[SlotName]) -> Result<(), ModelLoadError> {
        for slot in slots {
            match slot {
                SlotName::Text => self.text.ensure_loaded().await.map(drop)?,
                SlotName::Face => self.face.ensure_loaded().await.map(drop)?,
                SlotName::Voice => self.voice.ensure_loaded().await.map(drop)?,
                SlotName::Meta => self.meta.ensure_loaded().await.map(drop)?,
            }
        }
        Ok(())
    }

    pub async fn is_loaded(&self, slot: SlotName) -> bool {
        match slot {
            SlotName::Text => self.text.is_loaded().await,
            SlotName::Face => self.face.is_loaded().await,
            SlotName::Voice => self.voice.is_loaded().await,
            SlotName::Meta => self.meta.is_loaded().await,
        }
    }

    /// Loaded flag of every slot. Never triggers a load.
    pub async fn snapshot(&self) -> BTreeMap<SlotName, bool> {
        let mut snapshot = BTreeMap::new();
        for slot in SlotName::ALL {
            snapshot.insert(slot, self.is_loaded(slot).await);
        }
        snapshot
    }

    /// Detailed per-slot state, in [`SlotName::ALL`] order.
    pub async fn reports(&self) -> Vec<SlotReport> {
        vec![
            self.text.report().await,
            self.face.report().await,
            self.voice.report().await,
            self.meta.report().await,
        ]
    }
}
