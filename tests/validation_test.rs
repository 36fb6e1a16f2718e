use inference_sim::{
    file_type_category, media_file_from_path, sanitize_file_name, validate_file, FileTypeCategory,
    MediaFile, ALLOWED_IMAGE_TYPES, ALLOWED_VIDEO_TYPES, MAX_FILE_SIZE,
};
use std::sync::Once;
use tracing::info;
use tracing_subscriber;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

#[test]
fn test_accepts_file_at_size_limit() {
    init_tracing();

    let file = MediaFile::new("clip.mp4", MAX_FILE_SIZE, "video/mp4");
    let validation = validate_file(&file);

    assert!(validation.is_valid());
    assert_eq!(validation.reason(), None);
    assert_eq!(validation.sanitized_name(), Some("clip.mp4"));
}

#[test]
fn test_rejects_file_just_over_size_limit() {
    init_tracing();

    let file = MediaFile::new("clip.mp4", MAX_FILE_SIZE + 1, "video/mp4");
    let validation = validate_file(&file);

    assert!(!validation.is_valid());
    assert_eq!(
        validation.reason(),
        Some("File size (50.0MB) exceeds maximum allowed size of 50MB")
    );
}

#[test]
fn test_size_reason_rounds_to_one_decimal() {
    init_tracing();

    let file = MediaFile::new("big.png", 52_900_000, "image/png");
    let validation = validate_file(&file);
    assert_eq!(
        validation.reason(),
        Some("File size (50.4MB) exceeds maximum allowed size of 50MB")
    );

    let file = MediaFile::new("movie.mp4", 120 * 1024 * 1024, "video/mp4");
    let validation = validate_file(&file);
    assert_eq!(
        validation.reason(),
        Some("File size (120.0MB) exceeds maximum allowed size of 50MB")
    );
}

#[test]
fn test_rejects_unsupported_mime_type() {
    init_tracing();

    let file = MediaFile::new("document.pdf", 1024, "application/pdf");
    let validation = validate_file(&file);

    assert!(!validation.is_valid());
    assert_eq!(
        validation.reason(),
        Some(
            "File type \"application/pdf\" is not supported. Allowed types: \
             image/jpeg, image/jpg, image/png, image/gif, image/svg+xml, \
             video/mp4, video/webm, video/ogg, video/quicktime, video/x-msvideo"
        )
    );
}

#[test]
fn test_size_check_runs_before_type_check() {
    init_tracing();

    // Both checks would fail here; the size reason must win
    let file = MediaFile::new("huge.pdf", MAX_FILE_SIZE * 2, "application/pdf");
    let validation = validate_file(&file);

    assert!(!validation.is_valid());
    assert!(validation.reason().unwrap().starts_with("File size"));
}

#[test]
fn test_every_allowed_type_passes() {
    init_tracing();

    for mime_type in ALLOWED_IMAGE_TYPES.iter().chain(ALLOWED_VIDEO_TYPES.iter()).copied() {
        let file = MediaFile::new("sample.bin", 1024, mime_type);
        assert!(
            validate_file(&file).is_valid(),
            "expected {} to be accepted",
            mime_type
        );
    }
}

#[test]
fn test_accepted_file_reports_sanitized_name() {
    init_tracing();

    let file = MediaFile::new("holiday photo (1).jpg", 4096, "image/jpeg");
    let validation = validate_file(&file);

    assert!(validation.is_valid());
    assert_eq!(validation.sanitized_name(), Some("holiday_photo_1_.jpg"));
}

#[test]
fn test_sanitize_replaces_special_characters() {
    assert_eq!(sanitize_file_name("my file!.png"), "my_file_.png");
    assert_eq!(sanitize_file_name("caf\u{e9}.png"), "caf_.png");
}

#[test]
fn test_sanitize_collapses_underscore_runs() {
    assert_eq!(sanitize_file_name("a  b!!c.png"), "a_b_c.png");
    assert_eq!(sanitize_file_name("weird__name.png"), "weird_name.png");
}

#[test]
fn test_sanitize_trims_edge_underscores() {
    assert_eq!(sanitize_file_name("__draft__.png"), "draft_.png");
    assert_eq!(sanitize_file_name("!!!photo!!!"), "photo");
}

#[test]
fn test_sanitize_truncates_long_names() {
    let long_name = "a".repeat(300);
    assert_eq!(sanitize_file_name(&long_name).len(), 255);
}

#[test]
fn test_sanitize_keeps_clean_names() {
    assert_eq!(
        sanitize_file_name("report-2024.final_v2.png"),
        "report-2024.final_v2.png"
    );
}

#[test]
fn test_validation_is_deterministic() {
    init_tracing();

    let file = MediaFile::new("my file!.png", 2048, "image/png");
    assert_eq!(validate_file(&file), validate_file(&file));
}

#[test]
fn test_file_type_categories() {
    assert_eq!(file_type_category("image/png"), FileTypeCategory::Image);
    assert_eq!(file_type_category("video/quicktime"), FileTypeCategory::Video);
    assert_eq!(file_type_category("application/pdf"), FileTypeCategory::Unknown);
    // Matching is exact, there is no case folding
    assert_eq!(file_type_category("IMAGE/PNG"), FileTypeCategory::Unknown);
}

#[test]
fn test_media_file_from_path_uses_disk_metadata() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    std::fs::write(&path, vec![0u8; 1234]).unwrap();

    let media = media_file_from_path(&path).unwrap();
    assert_eq!(media.name, "photo.jpg");
    assert_eq!(media.size, 1234);
    assert_eq!(media.mime_type, "image/jpeg");

    let validation = validate_file(&media);
    assert!(validation.is_valid());
    info!("Round trip from disk validated as {:?}", validation);
}
