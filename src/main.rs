use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use subtrans::config::{Config, OutputFormat, SourceFormat};
use subtrans::subtitle::convert;
use subtrans::translate::{Emotionality, Liveliness, PromptOptions};
use subtrans::{interactive, pipeline, PipelineConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subtrans")]
#[command(version, about = "AI subtitle translation with WebVTT/SRT/TXT conversion")]
#[command(long_about = "Translate subtitle files (.vtt/.srt) to another language using the \
Google Gemini API, or convert between subtitle formats offline.")]
struct Cli {
    /// Input subtitle file (.vtt or .srt). Omit to run the interactive wizard.
    input: Option<PathBuf>,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: vtt, srt, txt
    #[arg(short, long)]
    format: Option<String>,

    /// Source language code (e.g., en, ja, es)
    #[arg(long, default_value = "en")]
    from: String,

    /// Target language code (e.g., en, th, es)
    #[arg(long, default_value = "th")]
    to: String,

    /// Convert between formats without calling the translation API
    #[arg(long)]
    convert_only: bool,

    /// Liveliness of the translated dialogue: subtle, natural, vivid
    #[arg(long, default_value = "natural")]
    liveliness: String,

    /// Emotional intensity of the translation: subtle, expressive, intense
    #[arg(long, default_value = "expressive")]
    emotionality: String,

    /// Comma-separated words or phrases to emphasize in the translation
    #[arg(long)]
    emphasize: Option<String>,

    /// Comma-separated words or phrases the translation must avoid
    #[arg(long)]
    avoid: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn derive_output_path(input: &Path, format: &OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("{}.{}", stem.to_string_lossy(), format.extension()));
    // Same extension as the input: writing there would clobber the source
    // file, so fall back to the wizard's `.translated.` naming
    if output.as_path() == input {
        output.set_file_name(format!(
            "{}.translated.{}",
            stem.to_string_lossy(),
            format.extension()
        ));
    }
    output
}

/// Offline format conversion, no API call involved.
fn run_convert(input: &Path, output: &Path, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let source_format = input
        .extension()
        .and_then(|e| e.to_str())
        .map(SourceFormat::from_extension)
        .unwrap_or_default();

    let converted = convert(&content, source_format, format);
    std::fs::write(output, converted)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Converted {} ({}) -> {} ({})", input.display(), source_format, output.display(), format);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // No input file: hand over to the interactive wizard
    let Some(input) = cli.input else {
        let wizard = interactive::run_interactive_wizard()?;
        let result = pipeline::translate_file(
            &wizard.input,
            &wizard.output,
            &wizard.config,
            wizard.pipeline_config,
        )
        .await?;
        pipeline::print_summary(&result);
        return Ok(());
    };

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    // Load configuration first so its default format can apply
    let config = Config::load().context("Failed to load configuration")?;

    let format: OutputFormat = match cli.format {
        Some(f) => f.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.default_format,
    };

    let output = cli
        .output
        .unwrap_or_else(|| derive_output_path(&input, &format));

    if cli.convert_only {
        return run_convert(&input, &output, format);
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    let liveliness: Liveliness = cli
        .liveliness
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let emotionality: Emotionality = cli
        .emotionality
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let pipeline_config = PipelineConfig {
        format,
        source_lang: cli.from.clone(),
        target_lang: cli.to.clone(),
        prompt_options: PromptOptions {
            liveliness,
            emotionality,
            keywords_to_emphasize: cli.emphasize,
            keywords_to_avoid: cli.avoid,
        },
        show_progress: true,
    };

    info!("Input:    {}", input.display());
    info!("Output:   {}", output.display());
    info!("Format:   {}", format);
    info!("Language: {} -> {}", cli.from, cli.to);

    let result = pipeline::translate_file(&input, &output, &config, pipeline_config).await?;
    pipeline::print_summary(&result);

    Ok(())
}
