//! Multimodal prompt convention: `"<instruction>\nBase64 Image Data: <payload>"`.
//!
//! Callers embed one image as a trailing base64 segment of a plain text
//! prompt. This module splits it out once so every adapter can restructure it
//! into its own multimodal schema. Parsing never fails: a marker without a
//! usable payload yields the original string as plain text.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use tracing::warn;

/// Marker separating the text instruction from the image payload.
pub const IMAGE_SENTINEL: &str = "Base64 Image Data:";

/// Image formats recognised from their base64-encoded magic bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Svg,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Standard alphabet, padding optional, loose trailing bits accepted.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64 prefixes of each format's leading bytes.
const MAGIC_PREFIXES: &[(&str, ImageFormat)] = &[
    ("/9j/", ImageFormat::Jpeg),
    ("iVBORw0KGgo", ImageFormat::Png),
    ("R0lGOD", ImageFormat::Gif),
    ("UklGR", ImageFormat::Webp),
    ("PHN2Zy", ImageFormat::Svg),  // "<svg"
    ("PD94bWw", ImageFormat::Svg), // "<?xml"
];

/// Identify an image from its base64 text. Unrecognised data is assumed PNG.
pub fn sniff_format(base64: &str) -> ImageFormat {
    MAGIC_PREFIXES
        .iter()
        .find(|(prefix, _)| base64.starts_with(prefix))
        .map(|(_, format)| *format)
        .unwrap_or(ImageFormat::Png)
}

/// An image extracted from a prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    /// MIME type, declared by a data URI or sniffed from the payload.
    pub media_type: String,
    /// Raw base64 payload with whitespace removed.
    pub data: String,
}

impl ImageData {
    /// `data:<mime>;base64,<data>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A prompt after sentinel detection.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedPrompt {
    /// Text instruction (the whole prompt when there is no image).
    pub text: String,
    pub image: Option<ImageData>,
}

impl ParsedPrompt {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Split a prompt into its text instruction and optional embedded image.
pub fn parse_prompt(prompt: &str) -> ParsedPrompt {
    let Some(idx) = prompt.find(IMAGE_SENTINEL) else {
        return ParsedPrompt::text_only(prompt);
    };

    let text = prompt[..idx].trim();
    let raw = &prompt[idx + IMAGE_SENTINEL.len()..];

    match extract_payload(raw) {
        Some((declared, data)) => {
            let media_type = declared.unwrap_or_else(|| sniff_format(&data).mime_type().to_string());
            ParsedPrompt {
                text: text.to_string(),
                image: Some(ImageData { media_type, data }),
            }
        }
        None => {
            warn!("image marker present without a usable base64 payload, sending prompt as text");
            ParsedPrompt::text_only(prompt)
        }
    }
}

/// The payload after the marker: a bare base64 string or a base64 data URI.
fn extract_payload(raw: &str) -> Option<(Option<String>, String)> {
    let raw = raw.trim();

    let (declared, data) = match raw.strip_prefix("data:") {
        Some(uri) => {
            let (header, data) = uri.split_once(',')?;
            let mime = header.strip_suffix(";base64")?;
            let declared = (!mime.is_empty()).then(|| mime.to_string());
            (declared, data)
        }
        None => (None, raw),
    };

    let data: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    if data.is_empty() || PAYLOAD_ENGINE.decode(&data).is_err() {
        return None;
    }
    Some((declared, data))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
