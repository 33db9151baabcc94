//! State container for one translation result.
//!
//! Holds the canonical WebVTT text assembled from streamed fragments and
//! derives the displayed or exported representation on demand. Updates are
//! discrete actions; the rendering layer only reads.

use crate::config::OutputFormat;
use crate::subtitle::{sanitize_vtt, vtt_to_srt, vtt_to_txt};

/// Identifies one translation run. Fragments carrying a stale id are
/// ignored, which is how an abandoned stream is cut off when the transport
/// cannot be cancelled.
pub type RequestId = u64;

/// File name used when the source file name is unknown.
const DEFAULT_BASE_NAME: &str = "translated";

/// Exportable rendering of the current translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub content: String,
    pub filename: String,
    pub mime_type: &'static str,
}

#[derive(Debug, Default)]
pub struct TranslationSession {
    raw: String,
    canonical: String,
    format: OutputFormat,
    source_name: Option<String>,
    in_progress: bool,
    error: Option<String>,
    request_id: RequestId,
}

impl TranslationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the source file a translation will be derived from. Clears
    /// any previous result.
    pub fn load_source(&mut self, name: impl Into<String>) {
        self.source_name = Some(name.into());
        self.raw.clear();
        self.canonical.clear();
        self.error = None;
        // Invalidate fragments from a run that may still be in flight
        self.request_id += 1;
        self.in_progress = false;
    }

    /// Start a new translation run, discarding any previous result.
    /// Returns the id that fragments for this run must carry.
    pub fn begin(&mut self) -> RequestId {
        self.request_id += 1;
        self.raw.clear();
        self.canonical.clear();
        self.error = None;
        self.in_progress = true;
        self.request_id
    }

    /// Append a streamed fragment. Returns false if the fragment belongs to
    /// an abandoned run and was ignored.
    pub fn push_fragment(&mut self, id: RequestId, fragment: &str) -> bool {
        if id != self.request_id || !self.in_progress {
            return false;
        }
        self.raw.push_str(fragment);
        // Re-sanitize the whole accumulated text; a truncated trailing cue
        // is dropped until its block completes.
        self.canonical = sanitize_vtt(&self.raw);
        true
    }

    /// Mark the run complete.
    pub fn finish(&mut self, id: RequestId) {
        if id == self.request_id {
            self.in_progress = false;
        }
    }

    /// Record a failure. Whatever text accumulated before the failure is
    /// kept and remains renderable.
    pub fn fail(&mut self, id: RequestId, message: impl Into<String>) {
        if id == self.request_id {
            self.in_progress = false;
            self.error = Some(message.into());
        }
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// The sanitized WebVTT text accumulated so far.
    pub fn canonical_vtt(&self) -> &str {
        &self.canonical
    }

    /// Render the current result in the selected format.
    pub fn render(&self) -> String {
        self.render_as(self.format)
    }

    /// Render the current result in the given format.
    pub fn render_as(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Vtt => self.canonical.clone(),
            OutputFormat::Srt => vtt_to_srt(&self.canonical),
            OutputFormat::Txt => vtt_to_txt(&self.canonical),
        }
    }

    /// Produce the export payload for the given format: rendered content,
    /// suggested filename, and MIME type.
    pub fn export(&self, format: OutputFormat) -> Export {
        Export {
            content: self.render_as(format),
            filename: format!("{}.{}", self.base_name(), format.extension()),
            mime_type: format.mime_type(),
        }
    }

    /// Source file name with its final extension removed.
    fn base_name(&self) -> String {
        let Some(ref name) = self.source_name else {
            return DEFAULT_BASE_NAME.to_string();
        };

        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            Some(_) => DEFAULT_BASE_NAME.to_string(),
            None if name.is_empty() => DEFAULT_BASE_NAME.to_string(),
            None => name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENTS: &[&str] = &[
        "WEBVTT\n\n00:00:01.000",
        " --> 00:00:02.000\nHello\n\n",
        "00:00:03.000 --> 00:00:04.000\n- Hi\n- Bye",
    ];

    fn streamed_session() -> (TranslationSession, RequestId) {
        let mut session = TranslationSession::new();
        session.load_source("movie.vtt");
        let id = session.begin();
        for fragment in FRAGMENTS {
            assert!(session.push_fragment(id, fragment));
        }
        (session, id)
    }

    #[test]
    fn test_fragments_accumulate_into_canonical_vtt() {
        let (session, id) = streamed_session();
        assert_eq!(
            session.canonical_vtt(),
            "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n\n00:00:03.000 --> 00:00:04.000\n- Hi\n- Bye"
        );
        let mut session = session;
        session.finish(id);
        assert!(!session.is_in_progress());
    }

    #[test]
    fn test_partial_stream_renders_without_trailing_cue() {
        let mut session = TranslationSession::new();
        let id = session.begin();
        session.push_fragment(id, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n\n00:00:03.0");
        // Truncated trailing block has no --> line yet, so it is dropped
        assert_eq!(
            session.canonical_vtt(),
            "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello"
        );
    }

    #[test]
    fn test_stray_cue_numbers_are_sanitized() {
        let mut session = TranslationSession::new();
        let id = session.begin();
        session.push_fragment(id, "1\n00:00:01.000 --> 00:00:02.000\nHi");
        assert_eq!(
            session.canonical_vtt(),
            "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi"
        );
    }

    #[test]
    fn test_stale_fragments_are_ignored() {
        let mut session = TranslationSession::new();
        let old_id = session.begin();
        session.push_fragment(old_id, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nold");

        let new_id = session.begin();
        assert!(!session.push_fragment(old_id, "more old text"));
        assert!(session.push_fragment(new_id, "WEBVTT\n\n00:00:05.000 --> 00:00:06.000\nnew"));

        assert!(session.canonical_vtt().contains("new"));
        assert!(!session.canonical_vtt().contains("old"));
    }

    #[test]
    fn test_load_source_invalidates_in_flight_run() {
        let mut session = TranslationSession::new();
        let id = session.begin();
        session.push_fragment(id, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nfirst");

        session.load_source("other.srt");
        assert!(!session.push_fragment(id, "late fragment"));
        assert_eq!(session.canonical_vtt(), "");
    }

    #[test]
    fn test_fail_keeps_accumulated_text() {
        let mut session = TranslationSession::new();
        let id = session.begin();
        session.push_fragment(id, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nkept");
        session.fail(id, "network down");

        assert_eq!(session.error(), Some("network down"));
        assert!(!session.is_in_progress());
        assert!(session.canonical_vtt().contains("kept"));
    }

    #[test]
    fn test_render_per_format() {
        let (session, _) = streamed_session();

        assert_eq!(session.render_as(OutputFormat::Vtt), session.canonical_vtt());
        assert_eq!(
            session.render_as(OutputFormat::Srt),
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\n- Hi\n- Bye"
        );
        assert_eq!(session.render_as(OutputFormat::Txt), "Hello\n- Hi\n- Bye");
    }

    #[test]
    fn test_render_uses_selected_format() {
        let (mut session, _) = streamed_session();
        session.set_format(OutputFormat::Txt);
        assert_eq!(session.render(), "Hello\n- Hi\n- Bye");
    }

    #[test]
    fn test_export_filename_and_mime() {
        let (session, _) = streamed_session();

        let export = session.export(OutputFormat::Srt);
        assert_eq!(export.filename, "movie.srt");
        assert_eq!(export.mime_type, "application/x-subrip");
        assert!(export.content.starts_with("1\n"));

        let export = session.export(OutputFormat::Vtt);
        assert_eq!(export.filename, "movie.vtt");
        assert_eq!(export.mime_type, "text/vtt");
    }

    #[test]
    fn test_export_default_base_name() {
        let mut session = TranslationSession::new();
        let id = session.begin();
        session.push_fragment(id, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi");

        let export = session.export(OutputFormat::Txt);
        assert_eq!(export.filename, "translated.txt");
        assert_eq!(export.mime_type, "text/plain");
    }

    #[test]
    fn test_export_strips_only_final_extension() {
        let mut session = TranslationSession::new();
        session.load_source("season.1.episode.2.srt");
        let export = session.export(OutputFormat::Vtt);
        assert_eq!(export.filename, "season.1.episode.2.vtt");
    }
}
