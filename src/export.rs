use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{Backend, ExportError, InferenceResult};

/// Render a result as pretty-printed JSON.
pub fn result_to_json_pretty(result: &InferenceResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write a result into `dir` as `inference-results-<millis>.json` and
/// return the path written.
pub fn write_result_json(
    result: &InferenceResult,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(result)?;
    let file_name = format!("inference-results-{}.json", Utc::now().timestamp_millis());
    let path = dir.as_ref().join(file_name);
    fs::write(&path, json)?;
    info!("Exported results to {}", path.display());
    Ok(path)
}

/// Render a human-readable summary of a result, one line per finding.
pub fn format_summary(result: &InferenceResult) -> String {
    let mut out = String::new();

    // The backend field normally holds a known identifier, but fixtures may
    // override it with an arbitrary string
    match result.metadata.backend.parse::<Backend>() {
        Ok(backend) => {
            let profile = backend.profile();
            out.push_str(&format!(
                "Inference Results - {} ({})\n",
                profile.name, profile.latency
            ));
        }
        Err(_) => {
            out.push_str(&format!("Inference Results - {}\n", result.metadata.backend));
        }
    }
    out.push_str(&format!(
        "Model {} | {:.0}ms | {}\n",
        result.metadata.model_version, result.metadata.inference_time, result.metadata.timestamp
    ));

    out.push_str(&format!("\nDetections ({})\n", result.detections.len()));
    for detection in &result.detections {
        out.push_str(&format!(
            "  {} {}% [{}]\n",
            detection.class_name,
            percent(detection.score),
            format_bbox(&detection.bbox)
        ));
    }

    out.push_str(&format!("\nInstances ({})\n", result.instances.len()));
    for instance in &result.instances {
        out.push_str(&format!(
            "  {} {}% (mask data available)\n",
            instance.class_name,
            percent(instance.score)
        ));
    }

    out.push_str(&format!("\nLabels ({})\n", result.labels.len()));
    for label in &result.labels {
        out.push_str(&format!(
            "  {} {}% (scene classification)\n",
            label.class_name,
            percent(label.score)
        ));
    }

    out
}

fn percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

fn format_bbox(bbox: &[f64; 4]) -> String {
    bbox.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
