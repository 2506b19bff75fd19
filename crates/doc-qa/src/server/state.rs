//! Application state for the web server

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::QaConfig;
use crate::error::Result;
use crate::pipeline::QaPipeline;
use crate::providers::{LlmProvider, OllamaLlm};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: QaConfig,
    /// Pipeline shared by every request
    pipeline: QaPipeline,
    /// Held for the duration of a pipeline run
    run_lock: Mutex<()>,
}

impl AppState {
    /// Create state backed by Ollama
    pub fn new(config: QaConfig) -> Result<Self> {
        let llm = OllamaLlm::new(&config.llm)?;
        tracing::info!("Ollama provider initialized (model: {})", config.llm.model);
        Ok(Self::with_provider(config, Arc::new(llm)))
    }

    /// Create state around an injected model provider
    pub fn with_provider(config: QaConfig, llm: Arc<dyn LlmProvider>) -> Self {
        let pipeline = QaPipeline::new(&config, llm);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                run_lock: Mutex::new(()),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &QaConfig {
        &self.inner.config
    }

    /// Get the pipeline
    pub fn pipeline(&self) -> &QaPipeline {
        &self.inner.pipeline
    }

    /// Wait for exclusive use of the model. Runs are serialized so two uploads
    /// never drive the model at the same time.
    pub async fn lock_run(&self) -> MutexGuard<'_, ()> {
        self.inner.run_lock.lock().await
    }
}
