pub mod types;
pub mod validator;
pub mod fixture;
pub mod simulator;
pub mod export;

pub use types::*;
pub use validator::{
    file_type_category, media_file_from_path, sanitize_file_name, validate_file,
    ALLOWED_IMAGE_TYPES, ALLOWED_VIDEO_TYPES, MAX_FILE_SIZE,
};
pub use fixture::{DirFixtureSource, FixtureSource, HttpFixtureSource};
pub use simulator::{
    jittered_delay_ms, normalize_response, perturb_scores, Simulator, MAX_EXTRA_DELAY_MS,
};
pub use export::{format_summary, result_to_json_pretty, write_result_json};
