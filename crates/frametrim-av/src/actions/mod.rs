//! Media processing actions.
//!
//! Actions shell out to ffmpeg and block until it exits.

mod trim;

pub use trim::{
    build_trim_command, resolve_frame_rate, trim_clip, ClipRequest, EncodeSettings, TrimSettings,
    TrimWindow,
};
