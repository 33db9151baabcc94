//! Pure text-to-text subtitle format conversions.
//!
//! All three converters are total: any input string produces an output
//! string, and blocks without a recognizable `-->` timestamp line are
//! dropped rather than reported. Model output is rarely byte-perfect, so
//! the converters extract what they can and discard the rest.

use crate::config::{OutputFormat, SourceFormat};
use regex::Regex;

/// Convert WebVTT content to SRT.
///
/// Strips the `WEBVTT` header line, renumbers kept cues contiguously from 1,
/// and swaps decimal dots for commas in timestamp lines.
pub fn vtt_to_srt(vtt: &str) -> String {
    if vtt.is_empty() {
        return String::new();
    }

    let header = Regex::new(r"(?i)^WEBVTT[^\n]*\n").expect("Invalid regex");
    let clean = vtt.replace('\r', "");
    let clean = header.replace(&clean, "");
    let clean = clean.trim();

    let mut srt = String::new();
    let mut cue_number = 1;

    for block in clean.split("\n\n") {
        if block.trim().is_empty() {
            continue;
        }

        let lines: Vec<&str> = block.split('\n').collect();
        let Some(timestamp_index) = lines.iter().position(|l| l.contains("-->")) else {
            // No timestamp line: the block contributes nothing, and the
            // numbering stays contiguous for the cues that remain.
            continue;
        };

        srt.push_str(&cue_number.to_string());
        srt.push('\n');
        srt.push_str(&lines[timestamp_index].replace('.', ","));
        srt.push('\n');
        srt.push_str(&lines[timestamp_index + 1..].join("\n"));
        srt.push_str("\n\n");

        cue_number += 1;
    }

    srt.trim().to_string()
}

/// Convert SRT content to WebVTT.
///
/// Prepends the `WEBVTT` header, drops bare cue-number lines, and swaps
/// decimal commas for dots in timestamp lines. Also accepts input that is
/// already VTT-shaped, which makes it usable as a sanitization pass: the
/// search for the `-->` line skips stray cue numbers wherever they appear,
/// and dot timestamps pass through unchanged.
pub fn srt_to_vtt(srt: &str) -> String {
    // Whitespace-only input yields "" rather than a bare "WEBVTT" header;
    // an empty document stays empty through every conversion
    if srt.trim().is_empty() {
        return String::new();
    }

    let clean = srt.trim().replace('\r', "");
    let mut vtt = String::from("WEBVTT\n\n");

    for block in clean.split("\n\n") {
        if block.trim().is_empty() {
            continue;
        }

        let lines: Vec<&str> = block.split('\n').collect();
        let Some(timestamp_index) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };

        vtt.push_str(&lines[timestamp_index].replace(',', "."));
        vtt.push('\n');
        vtt.push_str(&lines[timestamp_index + 1..].join("\n"));
        vtt.push_str("\n\n");
    }

    vtt.trim().to_string()
}

/// Extract the dialogue text from WebVTT content.
///
/// Drops the header, timestamp lines, bare cue numbers, and blank lines;
/// keeps every other line trimmed, one subtitle line per output line.
pub fn vtt_to_txt(vtt: &str) -> String {
    if vtt.is_empty() {
        return String::new();
    }

    let cue_number = Regex::new(r"^\d+$").expect("Invalid regex");
    let mut txt = String::new();

    for line in vtt.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.to_lowercase().starts_with("webvtt")
            || trimmed.contains("-->")
            || cue_number.is_match(trimmed)
        {
            continue;
        }
        txt.push_str(trimmed);
        txt.push('\n');
    }

    txt.trim().to_string()
}

/// Normalize arbitrary VTT- or SRT-shaped text into strict WebVTT.
///
/// The model is asked for WebVTT but sometimes mixes in SRT-style cue
/// numbers; routing everything through [`srt_to_vtt`] strips those and is
/// a no-op on already-valid VTT. Idempotent.
pub fn sanitize_vtt(raw: &str) -> String {
    srt_to_vtt(raw)
}

/// Convert subtitle text between formats.
///
/// The input is first normalized to canonical VTT, then the requested
/// representation is derived from that.
pub fn convert(text: &str, from: SourceFormat, to: OutputFormat) -> String {
    let canonical = match from {
        SourceFormat::Vtt => sanitize_vtt(text),
        SourceFormat::Srt => srt_to_vtt(text),
    };

    match to {
        OutputFormat::Vtt => canonical,
        OutputFormat::Srt => vtt_to_srt(&canonical),
        OutputFormat::Txt => vtt_to_txt(&canonical),
    }
}

/// Number of recognized cues in a subtitle document.
pub fn cue_count(text: &str) -> usize {
    text.lines().filter(|l| l.contains("-->")).count()
}
