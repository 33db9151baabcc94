use crate::config::{Config, OutputFormat, SourceFormat};
use crate::error::{Result, SubtransError};
use crate::session::TranslationSession;
use crate::subtitle::{convert, cue_count};
use crate::translate::{
    build_translation_prompt, GeminiTranslator, PromptOptions, Translator,
};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for one translation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Output subtitle format.
    pub format: OutputFormat,
    /// Source language code.
    pub source_lang: String,
    /// Target language code.
    pub target_lang: String,
    /// Style options folded into the prompt.
    pub prompt_options: PromptOptions,
    /// Show a progress spinner while streaming.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            source_lang: "en".to_string(),
            target_lang: "th".to_string(),
            prompt_options: PromptOptions::default(),
            show_progress: true,
        }
    }
}

/// Statistics from a translation run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total time taken.
    pub total_time: Duration,
    /// Number of streamed fragments received.
    pub fragments_received: usize,
    /// Total bytes of model output received.
    pub bytes_received: usize,
    /// Number of cues in the final output.
    pub cues: usize,
}

/// Result of a translation run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Path to the output subtitle file.
    pub output_path: PathBuf,
    /// Rendered output content.
    pub content: String,
    /// Run statistics.
    pub stats: PipelineStats,
}

/// Translate a subtitle file and write the result.
pub async fn translate_file(
    input: &Path,
    output: &Path,
    config: &Config,
    pipeline_config: PipelineConfig,
) -> Result<PipelineResult> {
    let cancelled = Arc::new(AtomicBool::new(false));
    translate_file_with_cancel(input, output, config, pipeline_config, cancelled).await
}

/// Translate a subtitle file with cancellation support.
///
/// Stages: read and normalize the source, submit the prompt, consume the
/// fragment stream into a [`TranslationSession`], render and write the
/// requested format. If the stream fails after some text has arrived, the
/// partial result is still written before the error propagates.
pub async fn translate_file_with_cancel(
    input: &Path,
    output: &Path,
    config: &Config,
    pipeline_config: PipelineConfig,
    cancelled: Arc<AtomicBool>,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    if !input.exists() {
        return Err(SubtransError::FileNotFound(input.display().to_string()));
    }

    let api_key = config.gemini_api_key.as_ref().ok_or_else(|| {
        SubtransError::Config(
            "Gemini API key not set. Set GEMINI_API_KEY environment variable.".to_string(),
        )
    })?;

    // Stage 1: read and normalize the source to canonical VTT
    info!("Stage 1/3: Reading {:?}", input);
    let raw_source = fs::read_to_string(input)?;
    let source_format = input
        .extension()
        .and_then(|e| e.to_str())
        .map(SourceFormat::from_extension)
        .unwrap_or_default();
    let source_vtt = convert(&raw_source, source_format, OutputFormat::Vtt);
    let source_cues = cue_count(&source_vtt);

    if source_cues == 0 {
        return Err(SubtransError::Config(format!(
            "No subtitle cues found in {} (detected format: {})",
            input.display(),
            source_format
        )));
    }

    info!("Read {} cues ({} input)", source_cues, source_format);

    // Stage 2: stream the translation
    info!(
        "Stage 2/3: Translating {} -> {} with {}",
        pipeline_config.source_lang, pipeline_config.target_lang, config.model
    );

    let prompt = build_translation_prompt(
        &pipeline_config.source_lang,
        &pipeline_config.target_lang,
        &pipeline_config.prompt_options,
        &source_vtt,
    );

    let translator = GeminiTranslator::new(api_key.clone()).with_model(config.model.clone());

    let spinner = if pipeline_config.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Waiting for translation...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut session = TranslationSession::new();
    if let Some(name) = input.file_name().and_then(|n| n.to_str()) {
        session.load_source(name);
    }
    session.set_format(pipeline_config.format);
    let request_id = session.begin();

    let mut stream = translator.submit(&prompt).await?;

    let mut fragments_received = 0usize;
    let mut bytes_received = 0usize;
    let mut stream_error: Option<SubtransError> = None;

    while let Some(item) = stream.next().await {
        if cancelled.load(Ordering::Relaxed) {
            if let Some(pb) = &spinner {
                pb.finish_and_clear();
            }
            return Err(SubtransError::Cancelled);
        }

        match item {
            Ok(fragment) => {
                bytes_received += fragment.len();
                fragments_received += 1;
                session.push_fragment(request_id, &fragment);

                if let Some(pb) = &spinner {
                    pb.set_message(format!(
                        "Translating... {} cues received",
                        cue_count(session.canonical_vtt())
                    ));
                }
            }
            Err(e) => {
                session.fail(request_id, e.to_string());
                stream_error = Some(e);
                break;
            }
        }
    }
    session.finish(request_id);

    debug!(
        "Stream done: {} fragments, {} bytes",
        fragments_received, bytes_received
    );

    // Stage 3: render and write
    info!("Stage 3/3: Writing {} output", pipeline_config.format);
    let content = session.render();
    let cues = cue_count(session.canonical_vtt());

    if let Some(error) = stream_error {
        if let Some(pb) = &spinner {
            pb.finish_and_clear();
        }
        // Keep whatever already arrived; a partial file beats nothing
        if !content.is_empty() {
            warn!(
                "Translation failed mid-stream; writing partial result ({} cues) to {:?}",
                cues, output
            );
            fs::write(output, &content)?;
        }
        return Err(error);
    }

    fs::write(output, &content)?;

    if let Some(pb) = &spinner {
        pb.finish_with_message(format!("✓ Translated {} cues", cues));
    }

    info!("Wrote {} cues to {:?}", cues, output);

    Ok(PipelineResult {
        output_path: output.to_path_buf(),
        content,
        stats: PipelineStats {
            total_time: start_time.elapsed(),
            fragments_received,
            bytes_received,
            cues,
        },
    })
}

/// Print a summary of the translation results.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     Translation Complete                       ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", result.output_path.display());
    println!("  Cues:       {}", result.stats.cues);
    println!(
        "  Streamed:   {} fragments ({} bytes)",
        result.stats.fragments_received, result.stats.bytes_received
    );
    println!(
        "  Total:      {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
