//! Prompt construction for subtitle translation.
//!
//! The prompt pins down the contract the rest of the crate relies on: the
//! model must answer with plain WebVTT, timestamps untouched, no fences or
//! commentary, so that the streamed response can be sanitized and converted
//! directly.

/// How energetic the translated dialogue should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Liveliness {
    Subtle,
    #[default]
    Natural,
    Vivid,
}

impl std::fmt::Display for Liveliness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Liveliness::Subtle => write!(f, "Subtle"),
            Liveliness::Natural => write!(f, "Natural"),
            Liveliness::Vivid => write!(f, "Vivid"),
        }
    }
}

impl std::str::FromStr for Liveliness {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subtle" => Ok(Liveliness::Subtle),
            "natural" => Ok(Liveliness::Natural),
            "vivid" => Ok(Liveliness::Vivid),
            _ => Err(format!(
                "Unknown liveliness: {}. Use 'subtle', 'natural', or 'vivid'",
                s
            )),
        }
    }
}

/// How much emotional intensity the translation should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emotionality {
    Subtle,
    #[default]
    Expressive,
    Intense,
}

impl std::fmt::Display for Emotionality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Emotionality::Subtle => write!(f, "Subtle"),
            Emotionality::Expressive => write!(f, "Expressive"),
            Emotionality::Intense => write!(f, "Intense"),
        }
    }
}

impl std::str::FromStr for Emotionality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subtle" => Ok(Emotionality::Subtle),
            "expressive" => Ok(Emotionality::Expressive),
            "intense" => Ok(Emotionality::Intense),
            _ => Err(format!(
                "Unknown emotionality: {}. Use 'subtle', 'expressive', or 'intense'",
                s
            )),
        }
    }
}

/// Style options folded into the translation prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub liveliness: Liveliness,
    pub emotionality: Emotionality,
    pub keywords_to_emphasize: Option<String>,
    pub keywords_to_avoid: Option<String>,
}

/// Build the full translation prompt for one subtitle document.
pub fn build_translation_prompt(
    source_lang: &str,
    target_lang: &str,
    options: &PromptOptions,
    content: &str,
) -> String {
    let source_name = language_code_to_name(source_lang);
    let target_name = language_code_to_name(target_lang);

    let mut style_guide = format!(
        "**Translation Style Guide:**\n\
         - **Liveliness Level:** {}. Adjust the energy and pacing of the dialogue accordingly.\n\
         - **Emotionality Level:** {}. The translation should reflect this level of emotional intensity.",
        options.liveliness, options.emotionality
    );
    if let Some(ref emphasize) = options.keywords_to_emphasize {
        style_guide.push_str(&format!(
            "\n- **Keywords to Emphasize:** Prioritize using or capturing the essence of these words/phrases: \"{}\".",
            emphasize
        ));
    }
    if let Some(ref avoid) = options.keywords_to_avoid {
        style_guide.push_str(&format!(
            "\n- **Keywords to Avoid:** Do not use the following words/phrases: \"{}\".",
            avoid
        ));
    }

    format!(
        r#"You are an expert translator specializing in movie subtitles. Your task is to translate the following subtitle content from {source_name} to {target_name}.

**Translation Rules:**
1. **Style & Tone:** Translate the dialogue to be natural and idiomatic for spoken film dialogue, following the style guide below.
2. **Timestamp Accuracy:** Preserve the original timestamps perfectly. Do not alter their format or timing.
3. **Output Format:** The final output MUST be in valid WebVTT (.vtt) format.
4. **Line Breaks for Dialogue:** If a single subtitle cue contains dialogue from multiple speakers separated by a dash ('-'), place each speaker's dialogue on its own line.
5. **IMPORTANT:** Start generating the VTT content immediately. Do not include any introductory text, explanations, or code fences (like ```vtt or ```). The response must start directly with "WEBVTT".

{style_guide}

**Original Subtitle Content ({source_name}):**
---
{content}
---

Now, provide the translation in {target_name} following all the rules and the style guide above."#
    )
}

/// Convert language code to human-readable name for better prompting.
pub fn language_code_to_name(code: &str) -> &'static str {
    let lowercase = code.to_lowercase();
    match lowercase.as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "th" => "Thai",
        "vi" => "Vietnamese",
        "id" => "Indonesian",
        "ms" => "Malay",
        "nl" => "Dutch",
        "pl" => "Polish",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        "cs" => "Czech",
        "sv" => "Swedish",
        "da" => "Danish",
        "fi" => "Finnish",
        "no" => "Norwegian",
        "el" => "Greek",
        "he" => "Hebrew",
        "hu" => "Hungarian",
        "ro" => "Romanian",
        // For unknown codes, return a static fallback
        _ => "the target language",
    }
}
