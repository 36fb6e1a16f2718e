use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Model identifier reported when a fixture carries no `model_version`.
pub const DEFAULT_MODEL_VERSION: &str = "yolov8n-seg-1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Onnx,
    TensorRt,
    OpenVino,
    Cloud,
}

impl Backend {
    pub const ALL: [Backend; 4] = [
        Backend::Onnx,
        Backend::TensorRt,
        Backend::OpenVino,
        Backend::Cloud,
    ];

    /// Short name used in CLI arguments and result metadata.
    pub fn identifier(&self) -> &'static str {
        match self {
            Backend::Onnx => "ONNX",
            Backend::TensorRt => "TensorRT",
            Backend::OpenVino => "OpenVINO",
            Backend::Cloud => "Cloud",
        }
    }

    /// Base simulated latency in milliseconds, before jitter.
    pub fn base_delay_ms(&self) -> u64 {
        match self {
            Backend::Onnx => 1200,
            Backend::TensorRt => 800,
            Backend::OpenVino => 1000,
            Backend::Cloud => 2500,
        }
    }

    /// Location of the canned response, relative to the fixture root.
    pub fn fixture_path(&self) -> &'static str {
        match self {
            Backend::Onnx => "mock/onnx-response.json",
            Backend::TensorRt => "mock/tensorrt-response.json",
            Backend::OpenVino => "mock/openvino-response.json",
            Backend::Cloud => "mock/cloud-response.json",
        }
    }

    pub fn profile(&self) -> BackendProfile {
        match self {
            Backend::Onnx => BackendProfile {
                name: "ONNX Runtime",
                latency: "~18ms Jetson",
                description: "Optimized for various hardware, good balance of speed and compatibility.",
                color: "green",
            },
            Backend::TensorRt => BackendProfile {
                name: "NVIDIA TensorRT",
                latency: "~12ms Jetson",
                description: "NVIDIA specific, highest performance on Jetson/GPU platforms.",
                color: "red",
            },
            Backend::OpenVino => BackendProfile {
                name: "Intel OpenVINO",
                latency: "~55ms Android NDK",
                description: "Intel specific, optimized for Intel CPUs, VPUs, and iGPUs.",
                color: "blue",
            },
            Backend::Cloud => BackendProfile {
                name: "Cloud API",
                latency: "~220ms Cloud",
                description: "Fallback to cloud-based inference for complex models or remote processing.",
                color: "purple",
            },
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "onnx" => Ok(Backend::Onnx),
            "tensorrt" => Ok(Backend::TensorRt),
            "openvino" => Ok(Backend::OpenVino),
            "cloud" => Ok(Backend::Cloud),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// Display card for a backend: marketing name, indicative latency, blurb.
#[derive(Debug, Clone, Copy)]
pub struct BackendProfile {
    pub name: &'static str,
    pub latency: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub class_name: String,
    pub score: f64,
    #[serde(rename = "box")]
    pub bbox: [f64; 4], // [x1, y1, x2, y2]; corner ordering is by convention, not validated
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "class")]
    pub class_name: String,
    pub score: f64,
    pub mask: String, // base64 encoded mask
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "class")]
    pub class_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub inference_time: f64,
    pub backend: String,
    pub model_version: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub detections: Vec<Detection>,
    pub instances: Vec<Instance>,
    pub labels: Vec<Label>,
    pub metadata: ResultMetadata,
}

/// An upload candidate as seen by the intake validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub size: u64, // bytes
    pub mime_type: String,
}

impl MediaFile {
    pub fn new(name: &str, size: u64, mime_type: &str) -> Self {
        Self {
            name: name.to_string(),
            size,
            mime_type: mime_type.to_string(),
        }
    }
}

/// Outcome of checking an upload candidate against the intake policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValidation {
    Accepted { sanitized_name: String },
    Rejected { reason: String },
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, FileValidation::Accepted { .. })
    }

    /// Reason for the first policy check that failed, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            FileValidation::Rejected { reason } => Some(reason),
            FileValidation::Accepted { .. } => None,
        }
    }

    /// Name the file should be stored under, if it was accepted.
    pub fn sanitized_name(&self) -> Option<&str> {
        match self {
            FileValidation::Accepted { sanitized_name } => Some(sanitized_name),
            FileValidation::Rejected { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTypeCategory {
    Image,
    Video,
    Unknown,
}

/// Connection settings for a real inference endpoint. Informational only;
/// the simulator always serves from fixtures.
#[derive(Debug, Clone, Default)]
pub struct LiveApiConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model_slug: Option<String>,
    pub region: Option<String>,
}

impl LiveApiConfig {
    /// Read connection settings from the LV_* environment variables.
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        let read = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            api_url: read("LV_API_URL"),
            api_key: read("LV_API_KEY"),
            model_slug: read("LV_MODEL_SLUG"),
            region: read("LV_REGION"),
        }
    }

    /// Live mode requires every connection field to be set.
    pub fn is_live(&self) -> bool {
        self.api_url.is_some()
            && self.api_key.is_some()
            && self.model_slug.is_some()
            && self.region.is_some()
    }
}

/// Failure category attached to `Stage::Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    Other,
}

/// Pipeline stages in the order the simulator enters them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Delaying,
    Fetching,
    Parsing,
    Normalizing,
    Perturbing,
    Done,
    Failed(ErrorKind),
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown backend \"{0}\", expected one of ONNX, TensorRT, OpenVINO, Cloud")]
pub struct UnknownBackend(pub String);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline failure as reported to callers. Display strings are stable and
/// deliberately free of internal detail; the underlying cause stays in the
/// source chain and the logs.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Network error: Unable to load inference data. Please check your connection.")]
    Network(#[from] FetchError),

    #[error("Data parsing error: Invalid response format received.")]
    Parse(String),

    #[error("Inference failed: Could not process the request. Please try again.")]
    Other(String),
}

impl InferenceError {
    /// Failure category carried by the terminal `Stage::Failed`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InferenceError::Network(_) => ErrorKind::Network,
            InferenceError::Parse(_) => ErrorKind::Parse,
            InferenceError::Other(_) => ErrorKind::Other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InferenceError>;
