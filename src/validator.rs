use std::path::Path;
use tracing::{debug, info, warn};

use crate::types::{FileTypeCategory, FileValidation, MediaFile};

/// Largest upload the intake policy accepts, in bytes (50MB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/svg+xml",
];

pub const ALLOWED_VIDEO_TYPES: [&str; 5] = [
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "video/x-msvideo",
];

/// Check a file against the intake policy. Size is checked before MIME
/// type and the first failing check decides the rejection reason.
pub fn validate_file(file: &MediaFile) -> FileValidation {
    debug!(
        "Validating {} ({} bytes, {})",
        file.name, file.size, file.mime_type
    );

    // Check file size
    if file.size > MAX_FILE_SIZE {
        warn!(
            "File size check failed for {}: {} bytes",
            file.name, file.size
        );
        let size_mb = file.size as f64 / (1024.0 * 1024.0);
        return FileValidation::Rejected {
            reason: format!(
                "File size ({:.1}MB) exceeds maximum allowed size of 50MB",
                size_mb
            ),
        };
    }

    // Check MIME type
    if file_type_category(&file.mime_type) == FileTypeCategory::Unknown {
        warn!(
            "File type check failed for {}: {}",
            file.name, file.mime_type
        );
        return FileValidation::Rejected {
            reason: format!(
                "File type \"{}\" is not supported. Allowed types: {}",
                file.mime_type,
                allowed_types_joined()
            ),
        };
    }

    // Sanitize filename
    let sanitized_name = sanitize_file_name(&file.name);
    if sanitized_name != file.name {
        warn!(
            "Sanitized file name {:?} to {:?}",
            file.name, sanitized_name
        );
    }

    info!(
        "Validation passed for {} ({} bytes, {})",
        sanitized_name, file.size, file.mime_type
    );
    FileValidation::Accepted { sanitized_name }
}

/// Replace anything outside [A-Za-z0-9._-] with underscores, collapse
/// underscore runs, strip leading and trailing underscores, and cap the
/// result at 255 characters.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    collapsed.trim_matches('_').chars().take(255).collect()
}

/// Bucket a MIME type into image, video, or unknown.
pub fn file_type_category(mime_type: &str) -> FileTypeCategory {
    if ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        FileTypeCategory::Image
    } else if ALLOWED_VIDEO_TYPES.contains(&mime_type) {
        FileTypeCategory::Video
    } else {
        FileTypeCategory::Unknown
    }
}

/// Build a `MediaFile` from a path on disk, guessing the MIME type from
/// the extension.
pub fn media_file_from_path(path: impl AsRef<Path>) -> std::io::Result<MediaFile> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_type_for_extension(path.extension().and_then(|e| e.to_str()));
    Ok(MediaFile::new(&name, metadata.len(), mime_type))
}

/// Map a file extension to the MIME type the intake policy knows it by.
pub fn mime_type_for_extension(extension: Option<&str>) -> &'static str {
    match extension.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg") | Some("ogv") => "video/ogg",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

fn allowed_types_joined() -> String {
    ALLOWED_IMAGE_TYPES
        .iter()
        .chain(ALLOWED_VIDEO_TYPES.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}
