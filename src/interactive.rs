use crate::config::{Config, OutputFormat};
use crate::pipeline::PipelineConfig;
use crate::translate::PromptOptions;
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::PathBuf;

const SUPPORTED_EXTENSIONS: &[&str] = &["srt", "vtt"];

const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ja", "Japanese"),
    ("zh", "Chinese"),
    ("th", "Thai"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("ko", "Korean"),
    ("pt", "Portuguese"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
];

pub struct InteractiveResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: Config,
    pub pipeline_config: PipelineConfig,
}

pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    // Step 1: Check/Setup API Key
    let config = setup_api_key()?;

    // Step 2: Select source file
    let input = select_source_file()?;

    // Step 3: Select languages
    let source_lang = select_language("Select source language:", 0)?;
    let target_lang = select_language("Select target language:", 3)?;

    // Step 4: Select output format
    let format = select_output_format(config.default_format)?;

    // Derive output path
    let output = derive_output_path(&input, &format);

    // Step 5: Confirm
    print_run_summary(&input, &output, &source_lang, &target_lang, &format);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    let pipeline_config = PipelineConfig {
        format,
        source_lang,
        target_lang,
        prompt_options: PromptOptions::default(),
        show_progress: true,
    };

    Ok(InteractiveResult {
        input,
        output,
        config,
        pipeline_config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║          subtrans - AI Subtitle Translator        ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn setup_api_key() -> anyhow::Result<Config> {
    let mut config = Config::load().unwrap_or_default();

    if config.gemini_api_key.is_some() {
        println!("{} API key configured", style("✓").green());
        return Ok(config);
    }

    println!("{} Gemini API key not found", style("!").yellow());
    println!("  Get one at: https://aistudio.google.com/apikey\n");

    let api_key: String = Input::new()
        .with_prompt("Enter your Gemini API key")
        .interact_text()?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key is required");
    }

    config.gemini_api_key = Some(api_key.trim().to_string());

    // Offer to save
    if Confirm::new()
        .with_prompt("Save API key to config file?")
        .default(true)
        .interact()?
    {
        config.save()?;
        println!("{} API key saved to config\n", style("✓").green());
    }

    Ok(config)
}

fn select_source_file() -> anyhow::Result<PathBuf> {
    println!("\n{}", style("Select subtitle file:").bold());

    let files = scan_subtitle_files(".")?;

    if files.is_empty() {
        println!("  No subtitle files found in current directory.\n");
        let path: String = Input::new()
            .with_prompt("Enter file path")
            .interact_text()?;
        let path = PathBuf::from(path);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        return Ok(path);
    }

    let mut items: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        let path: String = Input::new()
            .with_prompt("Enter file path")
            .interact_text()?;
        let path = PathBuf::from(path);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        return Ok(path);
    }

    Ok(files[selection].clone())
}

fn scan_subtitle_files(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn select_language(prompt: &str, default: usize) -> anyhow::Result<String> {
    let items: Vec<String> = LANGUAGES
        .iter()
        .map(|(code, name)| format!("{} ({})", name, code))
        .collect();

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact()?;

    Ok(LANGUAGES[selection].0.to_string())
}

fn select_output_format(default: OutputFormat) -> anyhow::Result<OutputFormat> {
    let formats = [
        (OutputFormat::Vtt, "WebVTT (.vtt)"),
        (OutputFormat::Srt, "SubRip (.srt)"),
        (OutputFormat::Txt, "Plain text (.txt)"),
    ];

    let default_index = formats.iter().position(|(f, _)| *f == default).unwrap_or(0);
    let items: Vec<&str> = formats.iter().map(|(_, label)| *label).collect();

    let selection = Select::new()
        .with_prompt("Select output format")
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(formats[selection].0)
}

fn derive_output_path(input: &PathBuf, format: &OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.clone();
    output.set_file_name(format!(
        "{}.translated.{}",
        stem.to_string_lossy(),
        format.extension()
    ));
    output
}

fn print_run_summary(
    input: &PathBuf,
    output: &PathBuf,
    source_lang: &str,
    target_lang: &str,
    format: &OutputFormat,
) {
    println!();
    println!("{}", style("Settings:").bold());
    println!("  Input:    {}", input.display());
    println!("  Output:   {}", output.display());
    println!("  Language: {} -> {}", source_lang, target_lang);
    println!("  Format:   {}", format);
    println!();
}
