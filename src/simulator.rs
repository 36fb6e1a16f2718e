use chrono::Utc;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::fixture::FixtureSource;
use crate::types::{
    Backend, Detection, InferenceError, InferenceResult, Result, ResultMetadata, Stage,
    DEFAULT_MODEL_VERSION,
};

/// Upper bound of the random delay added on top of a backend's base latency.
pub const MAX_EXTRA_DELAY_MS: u64 = 200;

/// Runs the mock inference pipeline against a fixture source. A run waits
/// out the simulated backend latency, then fetches and normalizes the
/// backend's canned response and perturbs its detection scores.
pub struct Simulator {
    source: Arc<dyn FixtureSource>,
    stage_observer: Option<Arc<dyn Fn(Stage) + Send + Sync>>,
}

impl Simulator {
    pub fn new(source: Arc<dyn FixtureSource>) -> Self {
        Self {
            source,
            stage_observer: None,
        }
    }

    /// Install a hook called on entry to each pipeline stage, and once more
    /// with `Done` or `Failed` when the run settles.
    pub fn with_stage_observer(mut self, observer: impl Fn(Stage) + Send + Sync + 'static) -> Self {
        self.stage_observer = Some(Arc::new(observer));
        self
    }

    pub async fn run(&self, backend: Backend) -> Result<InferenceResult> {
        match self.run_pipeline(backend).await {
            Ok(result) => {
                self.observe(Stage::Done);
                Ok(result)
            }
            Err(err) => {
                self.observe(Stage::Failed(err.kind()));
                Err(err)
            }
        }
    }

    async fn run_pipeline(&self, backend: Backend) -> Result<InferenceResult> {
        self.observe(Stage::Delaying);
        let delay_ms = jittered_delay_ms(backend, &mut rand::rng());
        debug!("Simulating {} latency: {}ms", backend, delay_ms);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        self.observe(Stage::Fetching);
        let body = self.source.fetch(backend).await.map_err(|e| {
            error!("Failed to load mock response for {}: {}", backend, e);
            InferenceError::Network(e)
        })?;

        self.observe(Stage::Parsing);
        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Mock response for {} is not valid JSON: {}", backend, e);
            InferenceError::Parse(e.to_string())
        })?;
        let fields = match parsed {
            Value::Object(fields) => fields,
            other => {
                error!(
                    "Mock response for {} is not a JSON object, got {}",
                    backend,
                    json_type(&other)
                );
                return Err(InferenceError::Parse(format!(
                    "expected a JSON object, got {}",
                    json_type(&other)
                )));
            }
        };

        self.observe(Stage::Normalizing);
        let mut result = normalize_response(fields, backend);

        self.observe(Stage::Perturbing);
        perturb_scores(&mut result.detections, &mut rand::rng());

        info!(
            "Simulated {} inference: {} detections, {} instances, {} labels",
            backend,
            result.detections.len(),
            result.instances.len(),
            result.labels.len()
        );
        Ok(result)
    }

    fn observe(&self, stage: Stage) {
        if let Some(observer) = &self.stage_observer {
            observer(stage);
        }
    }
}

/// Total simulated latency for one run: the backend's base delay plus a
/// uniform random jitter below `MAX_EXTRA_DELAY_MS`.
pub fn jittered_delay_ms(backend: Backend, rng: &mut impl Rng) -> u64 {
    backend.base_delay_ms() + rng.random_range(0..MAX_EXTRA_DELAY_MS)
}

/// Shape a raw response object into an `InferenceResult`. Missing or
/// malformed sections become empty lists; missing metadata fields fall back
/// to values derived from the requested backend.
pub fn normalize_response(mut fields: Map<String, Value>, backend: Backend) -> InferenceResult {
    let detections = take_section(&mut fields, "detections");
    let instances = take_section(&mut fields, "instances");
    let labels = take_section(&mut fields, "labels");

    let metadata = match fields.remove("metadata") {
        Some(Value::Object(metadata)) => metadata,
        _ => Map::new(),
    };

    let inference_time = metadata
        .get("inference_time")
        .and_then(Value::as_f64)
        .unwrap_or(backend.base_delay_ms() as f64);
    let backend_name = metadata
        .get("backend")
        .and_then(Value::as_str)
        .unwrap_or(backend.identifier())
        .to_string();
    let model_version = metadata
        .get("model_version")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_MODEL_VERSION)
        .to_string();
    let timestamp = metadata
        .get("timestamp")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    InferenceResult {
        detections,
        instances,
        labels,
        metadata: ResultMetadata {
            inference_time,
            backend: backend_name,
            model_version,
            timestamp,
        },
    }
}

/// Nudge each detection score by a uniform jitter in (-0.05, 0.05), then
/// clamp into [0.01, 0.99] so scores stay presentable as percentages.
pub fn perturb_scores(detections: &mut [Detection], rng: &mut impl Rng) {
    for detection in detections {
        let jitter = (rng.random::<f64>() - 0.5) * 0.1;
        detection.score = (detection.score + jitter).clamp(0.01, 0.99);
    }
}

fn take_section<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Vec<T> {
    fields
        .remove(key)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
