//! Subtitle format handling.
//!
//! The canonical representation throughout the crate is WebVTT text. All
//! other formats are derived from it on demand by the pure conversion
//! functions in [`convert`].

pub mod convert;

pub use convert::{convert, cue_count, sanitize_vtt, srt_to_vtt, vtt_to_srt, vtt_to_txt};
