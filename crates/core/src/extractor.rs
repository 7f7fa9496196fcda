use crate::error::ExtractError;
use crate::models::DocumentKind;
use base64::{engine::general_purpose::STANDARD, Engine};
use lopdf::Document;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Maps a file extension to the extractor that can read it. Unknown
/// extensions return `None` and the file is skipped by the sync engine.
pub fn detect_kind(path: &Path) -> Option<DocumentKind> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" | "jpg" | "jpeg" => Some(DocumentKind::Image),
        "txt" => Some(DocumentKind::PlainText),
        "pdf" => Some(DocumentKind::Pdf),
        _ => None,
    }
}

/// Text extraction boundary. Returning an empty string is not an error; it
/// tells the caller no text was detected and the document should be skipped.
pub trait TextExtractor {
    fn extract(&self, path: &Path, kind: DocumentKind) -> Result<String, ExtractError>;
}

/// Default extractor: plain files read directly, PDFs through lopdf, images
/// through an OCR endpoint configured via `OCR_ENDPOINT` / `OCR_API_KEY`.
#[derive(Default)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract(&self, path: &Path, kind: DocumentKind) -> Result<String, ExtractError> {
        match kind {
            DocumentKind::PlainText => fs::read_to_string(path).map_err(ExtractError::Io),
            DocumentKind::Pdf => extract_pdf_text(path),
            DocumentKind::Image => extract_image_text(path),
        }
    }
}

fn extract_pdf_text(path: &Path) -> Result<String, ExtractError> {
    let document =
        Document::load(path).map_err(|error| ExtractError::PdfParse(error.to_string()))?;

    let mut text = String::new();
    for (page_no, _page_id) in document.get_pages() {
        let page_text = document
            .extract_text(&[page_no])
            .map_err(|error| ExtractError::PdfParse(error.to_string()))?;

        if !page_text.trim().is_empty() {
            text.push_str(&page_text);
            text.push('\n');
        }
    }

    Ok(text)
}

#[derive(Debug, Clone, Serialize)]
struct OcrRequest {
    image_base64: String,
    source_path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OcrResponse {
    text: Option<String>,
}

#[derive(Debug, Clone)]
struct OcrEndpointConfig {
    endpoint: String,
    api_key: Option<String>,
}

fn parse_ocr_config() -> Option<OcrEndpointConfig> {
    let endpoint = std::env::var("OCR_ENDPOINT").ok()?;
    let endpoint = endpoint.trim().to_string();
    if endpoint.is_empty() {
        return None;
    }

    let api_key = std::env::var("OCR_API_KEY").ok().and_then(|value| {
        let key = value.trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    });

    Some(OcrEndpointConfig { endpoint, api_key })
}

/// Sends the image to the configured OCR endpoint. Without an endpoint the
/// result is empty text, which downstream treats as "nothing detected".
fn extract_image_text(path: &Path) -> Result<String, ExtractError> {
    let cfg = match parse_ocr_config() {
        Some(cfg) => cfg,
        None => return Ok(String::new()),
    };

    let image = fs::read(path).map_err(ExtractError::Io)?;
    let payload = OcrRequest {
        image_base64: STANDARD.encode(image),
        source_path: path.to_string_lossy().to_string(),
    };

    let mut request = Client::new()
        .post(&cfg.endpoint)
        .header("content-type", "application/json")
        .json(&payload);

    if let Some(api_key) = cfg.api_key {
        request = request.bearer_auth(api_key);
    }

    let response = request.send()?;

    if !response.status().is_success() {
        return Err(ExtractError::OcrFailed(format!(
            "OCR request to {} returned {}",
            cfg.endpoint,
            response.status()
        )));
    }

    let payload: OcrResponse = response.json()?;
    Ok(payload
        .text
        .map(|text| text.trim().to_string())
        .unwrap_or_default())
}
