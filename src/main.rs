use anyhow::Context;
use clap::Parser;
use inference_sim::{
    file_type_category, format_summary, media_file_from_path, validate_file, write_result_json,
    Backend, DirFixtureSource, FileValidation, LiveApiConfig, Simulator,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Mock edge vision inference pipeline: validate an upload, then simulate a
/// backend run against bundled fixture responses.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Image or video file to upload before running inference
    #[arg(long)]
    media: Option<PathBuf>,

    /// Backend to simulate: ONNX, TensorRT, OpenVINO or Cloud
    #[arg(long, default_value = "ONNX")]
    backend: String,

    /// Directory holding the mock response files
    #[arg(long, default_value = "assets")]
    fixtures: PathBuf,

    /// Write the results JSON into this directory after a successful run
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// List the available backends and exit
    #[arg(long)]
    list_backends: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.list_backends {
        for backend in Backend::ALL {
            let profile = backend.profile();
            println!(
                "{:<10} {:<16} {:<18} {}",
                backend.identifier(),
                profile.name,
                profile.latency,
                profile.description
            );
        }
        return Ok(());
    }

    let live = LiveApiConfig::from_env();
    if live.is_live() {
        info!("Live mode: API endpoint configured, results are still simulated");
    } else {
        info!("Demo mode: serving canned responses");
    }

    let backend: Backend = args.backend.parse()?;

    let media_path = match args.media.as_deref() {
        Some(path) => path,
        None => {
            error!("No media selected. Pass --media <FILE> to choose an image or video");
            anyhow::bail!("no media file selected");
        }
    };

    let media = media_file_from_path(media_path)
        .with_context(|| format!("cannot read {}", media_path.display()))?;

    match validate_file(&media) {
        FileValidation::Accepted { sanitized_name } => {
            let category = file_type_category(&media.mime_type);
            info!(
                "{:?} uploaded: {} ({} bytes)",
                category, sanitized_name, media.size
            );
        }
        FileValidation::Rejected { reason } => {
            error!("Upload rejected: {}", reason);
            anyhow::bail!("{}", reason);
        }
    }

    info!("Starting inference: running {} inference...", backend);

    let simulator = Simulator::new(Arc::new(DirFixtureSource::new(&args.fixtures)))
        .with_stage_observer(|stage| debug!("Pipeline stage: {:?}", stage));

    let progress = tokio::spawn(async {
        for step in [10u32, 25, 45, 65, 80, 90] {
            tokio::time::sleep(Duration::from_millis(300)).await;
            info!("Processing... {}%", step);
        }
    });

    let outcome = simulator.run(backend).await;
    progress.abort();

    match outcome {
        Ok(result) => {
            info!("Processing... 100%");
            info!(
                "Inference complete: found {} detections in {}ms",
                result.detections.len(),
                result.metadata.inference_time
            );
            println!("{}", format_summary(&result));

            if let Some(dir) = &args.export_dir {
                let path = write_result_json(&result, dir)?;
                println!("Results written to {}", path.display());
            }
        }
        Err(e) => {
            error!("Inference failed: {}", e);
            anyhow::bail!("{}", e);
        }
    }

    Ok(())
}
