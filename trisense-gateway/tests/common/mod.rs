//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokenizers::Tokenizer;
use tower::ServiceExt;
use trisense_common::SlotName;
use trisense_gateway::engine::{
    EncodedInput, InferenceError, SequenceClassifier, TextModel, TextTokenizer, WeightBundle,
};
use trisense_gateway::lifecycle::LoadError;
use trisense_gateway::{api, AppState, ModelManager, ModelSlot};

const WORD_LEVEL: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": null,
    "pre_tokenizer": { "type": "Whitespace" },
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": { "[PAD]": 0, "[UNK]": 1, "i": 2, "feel": 3, "calm": 4, "anxious": 5 },
        "unk_token": "[UNK]"
    }
}"#;

pub fn tokenizer() -> TextTokenizer {
    TextTokenizer::from_tokenizer(Tokenizer::from_str(WORD_LEVEL).unwrap()).unwrap()
}

/// How the fake classifier behaves on `forward`.
#[derive(Clone)]
pub enum Behavior {
    Logits(Vec<f32>),
    Panic(&'static str),
}

/// Classifier that returns canned logits and records input lengths.
pub struct FakeClassifier {
    behavior: Behavior,
    seen_lengths: Arc<Mutex<Vec<usize>>>,
}

impl SequenceClassifier for FakeClassifier {
    fn forward(&self, input: &EncodedInput) -> Result<Vec<f32>, InferenceError> {
        self.seen_lengths.lock().unwrap().push(input.len());
        match &self.behavior {
            Behavior::Logits(logits) => Ok(logits.clone()),
            Behavior::Panic(message) => panic!("{}", message),
        }
    }
}

/// Counts loader invocations and the sequence lengths the classifier saw.
#[derive(Clone, Default)]
pub struct LoadWatch {
    pub loads: Arc<AtomicUsize>,
    pub seen_lengths: Arc<Mutex<Vec<usize>>>,
}

impl LoadWatch {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn seen_lengths(&self) -> Vec<usize> {
        self.seen_lengths.lock().unwrap().clone()
    }
}

/// Text slot whose loader succeeds only while `location` exists.
pub fn text_slot(location: &Path, behavior: Behavior, delay: Duration) -> (ModelSlot<TextModel>, LoadWatch) {
    let watch = LoadWatch::default();
    let loads = Arc::clone(&watch.loads);
    let seen_lengths = Arc::clone(&watch.seen_lengths);

    let slot = ModelSlot::new(SlotName::Text, location.display().to_string(), move |path: &Path| {
        loads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(delay);
        if !path.exists() {
            return Err(LoadError::MissingArtifact(path.to_path_buf()));
        }
        let classifier = FakeClassifier {
            behavior: behavior.clone(),
            seen_lengths: Arc::clone(&seen_lengths),
        };
        Ok(TextModel::new(tokenizer(), Box::new(classifier)))
    });

    (slot, watch)
}

/// Weight slot whose loader succeeds only while `location` exists.
pub fn bundle_slot(name: SlotName, location: &Path) -> (ModelSlot<WeightBundle>, LoadWatch) {
    let watch = LoadWatch::default();
    let loads = Arc::clone(&watch.loads);

    let slot = ModelSlot::new(name, location.display().to_string(), move |path: &Path| {
        loads.fetch_add(1, Ordering::SeqCst);
        if !path.exists() {
            return Err(LoadError::MissingArtifact(path.to_path_buf()));
        }
        Ok(WeightBundle::from_tensors(HashMap::new()))
    });

    (slot, watch)
}

/// A manager over fake loaders plus the watches on them.
pub struct TestModels {
    pub manager: ModelManager,
    pub text: LoadWatch,
    pub face: LoadWatch,
    pub voice: LoadWatch,
    pub meta: LoadWatch,
}

pub struct Locations {
    pub text: PathBuf,
    pub face: PathBuf,
    pub voice: PathBuf,
    pub meta: PathBuf,
}

impl Locations {
    /// Locations under `root`; nothing is created.
    pub fn under(root: &Path) -> Self {
        Self {
            text: root.join("bert_text_model"),
            face: root.join("trisense_face_model"),
            voice: root.join("trisense_voice_model"),
            meta: root.join("trisense_meta_model.safetensors"),
        }
    }

    /// Locations under `root` with every artifact present.
    pub fn present(root: &Path) -> Self {
        let locations = Self::under(root);
        std::fs::create_dir_all(&locations.text).unwrap();
        std::fs::create_dir_all(&locations.face).unwrap();
        std::fs::create_dir_all(&locations.voice).unwrap();
        std::fs::write(&locations.meta, b"").unwrap();
        locations
    }
}

pub fn test_models(locations: &Locations, behavior: Behavior) -> TestModels {
    test_models_with_delay(locations, behavior, Duration::ZERO)
}

pub fn test_models_with_delay(locations: &Locations, behavior: Behavior, delay: Duration) -> TestModels {
    let (text, text_watch) = text_slot(&locations.text, behavior, delay);
    let (face, face_watch) = bundle_slot(SlotName::Face, &locations.face);
    let (voice, voice_watch) = bundle_slot(SlotName::Voice, &locations.voice);
    let (meta, meta_watch) = bundle_slot(SlotName::Meta, &locations.meta);

    TestModels {
        manager: ModelManager::from_slots(text, face, voice, meta),
        text: text_watch,
        face: face_watch,
        voice: voice_watch,
        meta: meta_watch,
    }
}

/// Wrap a manager in the full application router.
pub fn app(manager: ModelManager) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(manager));
    (api::app(Arc::clone(&state)), state)
}

/// Send one request and decode the JSON response body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("Content-Type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}
