//! A single lazily loaded model.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use trisense_common::{SlotName, SlotReport, SlotState};

use super::{LoadError, ModelLoadError, ModelLoader};

enum LoadState<H> {
    Unloaded,
    Loaded(Arc<H>),
    Failed(ModelLoadError),
}

struct SlotInner<H> {
    name: SlotName,
    location: String,
    loader: Arc<dyn ModelLoader<H>>,
    state: RwLock<LoadState<H>>,
    /// Held for the whole duration of a load attempt.
    load_guard: Arc<Mutex<()>>,
    attempts: AtomicU64,
}

/// Named cache entry for one model handle.
///
/// The handle is present only in the loaded state. A failed attempt leaves the
/// slot empty and the next [`ModelSlot::ensure_loaded`] call retries from
/// scratch. At most one load attempt runs at a time; concurrent callers queue
/// on the slot's load guard and reuse the result if it succeeded.
pub struct ModelSlot<H> {
    inner: Arc<SlotInner<H>>,
}

impl<H: Send + Sync + 'static> ModelSlot<H> {
    pub fn new(name: SlotName, location: impl Into<String>, loader: impl ModelLoader<H>) -> Self {
        Self {
            inner: Arc::new(SlotInner {
                name,
                location: location.into(),
                loader: Arc::new(loader),
                state: RwLock::new(LoadState::Unloaded),
                load_guard: Arc::new(Mutex::new(())),
                attempts: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> SlotName {
        self.inner.name
    }

    pub fn location(&self) -> &str {
        &self.inner.location
    }

    /// Number of times the underlying loader has been invoked.
    pub fn load_attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> SlotState {
        match &*self.inner.state.read().await {
            LoadState::Unloaded => SlotState::Unloaded,
            LoadState::Loaded(_) => SlotState::Loaded,
            LoadState::Failed(_) => SlotState::FailedLastAttempt,
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.state().await.is_loaded()
    }

    /// Cause of the last failed attempt, if the slot is in the failed state.
    pub async fn last_error(&self) -> Option<ModelLoadError> {
        match &*self.inner.state.read().await {
            LoadState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Cached handle, without loading.
    pub async fn handle(&self) -> Option<Arc<H>> {
        match &*self.inner.state.read().await {
            LoadState::Loaded(handle) => Some(Arc::clone(handle)),
            _ => None,
        }
    }

    /// Return the cached handle, loading it first if needed.
    pub async fn ensure_loaded(&self) -> Result<Arc<H>, ModelLoadError> {
        if let Some(handle) = self.handle().await {
            return Ok(handle);
        }

        let guard = Arc::clone(&self.inner.load_guard).lock_owned().await;

        // The previous holder of the guard may have loaded it.
        if let Some(handle) = self.handle().await {
            return Ok(handle);
        }

        // The attempt owns the guard, so a dropped caller cannot abandon a
        // load halfway and let a second one start.
        let inner = Arc::clone(&self.inner);
        let attempt = tokio::spawn(async move {
            let _guard = guard;
            inner.load().await
        });

        match attempt.await {
            Ok(result) => result,
            Err(err) => Err(self.inner.load_error(LoadError::Join(err.to_string()))),
        }
    }

    pub async fn report(&self) -> SlotReport {
        // state and last_error must come from the same read
        let guard = self.inner.state.read().await;
        let (state, last_error) = match &*guard {
            LoadState::Unloaded => (SlotState::Unloaded, None),
            LoadState::Loaded(_) => (SlotState::Loaded, None),
            LoadState::Failed(err) => (SlotState::FailedLastAttempt, Some(err.cause.clone())),
        };

        SlotReport {
            name: self.name(),
            location: self.location().to_string(),
            state,
            loaded: state.is_loaded(),
            load_attempts: self.load_attempts(),
            last_error,
        }
    }
}

impl<H: Send + Sync + 'static> SlotInner<H> {
    async fn load(&self) -> Result<Arc<H>, ModelLoadError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Loading {} model from: {}", self.name, self.location);
        let started = Instant::now();

        let loader = Arc::clone(&self.loader);
        let location = PathBuf::from(&self.location);
        let result = tokio::task::spawn_blocking(move || loader.load(&location))
            .await
            .unwrap_or_else(|err| Err(LoadError::Join(err.to_string())));

        let mut state = self.state.write().await;
        match result {
            Ok(handle) => {
                let handle = Arc::new(handle);
                *state = LoadState::Loaded(Arc::clone(&handle));
                tracing::info!(
                    "{} model loaded in {} ms",
                    self.name,
                    started.elapsed().as_millis()
                );
                Ok(handle)
            }
            Err(err) => {
                let err = self.load_error(err);
                tracing::error!(
                    "Failed to load {} model from {}: {}",
                    self.name,
                    self.location,
                    err.cause
                );
                *state = LoadState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn load_error(&self, cause: LoadError) -> ModelLoadError {
        ModelLoadError {
            slot: self.name,
            location: self.location.clone(),
            cause: cause.to_string(),
        }
    }
}
