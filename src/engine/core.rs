mod ffmpeg_info;
mod log;
mod profile;
mod scan;
mod types;

pub use ffmpeg_info::tool_version;
pub use log::init_logging;
pub use profile::{
    DEFAULT_AUDIO_CODEC, DEFAULT_CONTAINER, DEFAULT_PIX_FMT, DEFAULT_SUFFIX, DEFAULT_VIDEO_CODEC,
    DEFAULT_VIDEO_PROFILE, TranscodeProfile, derive_output_path,
};
pub use scan::{SUPPORTED_EXTENSIONS, is_supported_input, supported_extensions_list};
pub use types::{ChildState, MediaInfo, TranscodeJob};
