//! Text extraction from files on disk.
//!
//! Supported formats are plain text (`.txt`, `.md`), PDF and Word documents
//! (`.docx`). A DOCX file is a ZIP archive; the body lives in
//! `word/document.xml`, where each `<w:p>` is a paragraph made of `<w:t>`
//! text runs separated by `<w:tab/>`, `<w:br/>` and `<w:cr/>` marks.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cleaner::char_len;
use crate::error::{DocumentError, Result};

#[allow(clippy::expect_used)]
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:p[ >].*?</w:p>").expect("valid paragraph pattern"));

#[allow(clippy::expect_used)]
static PARAGRAPH_PROPERTIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:pPr[ >].*?</w:pPr>").expect("valid paragraph properties pattern")
});

/// A text run (group 1) or a tab/break mark (group 2), in document order.
#[allow(clippy::expect_used)]
static RUN_CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:(tab|br|cr)(?:\s[^>]*)?/>")
        .expect("valid run content pattern")
});

/// Formats the loader can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// `.txt` or `.md`.
    Text,
    /// `.pdf`.
    Pdf,
    /// `.docx`.
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "md" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "" => Err(DocumentError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
            other => Err(DocumentError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Raw text extracted from a file, before cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedDocument {
    /// File name, used as the document identifier.
    pub name: String,

    /// Extracted text.
    pub text: String,

    /// Short human-readable description, e.g. `Paragraphs: 12`.
    pub metadata: String,

    /// Detected format.
    pub format: DocumentFormat,
}

/// Extract the text of a supported file.
///
/// Fails with [`DocumentError::EmptyDocument`] if the file has no
/// non-whitespace text.
pub fn load_document(path: &Path) -> Result<LoadedDocument> {
    let format = DocumentFormat::from_path(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    debug!("Loading {name} as {format:?}");

    let (text, metadata) = match format {
        DocumentFormat::Text => {
            let text = std::fs::read_to_string(path)?;
            let metadata = format!("Characters: {}", char_len(&text));
            (text, metadata)
        }
        DocumentFormat::Pdf => extract_pdf(path)?,
        DocumentFormat::Docx => extract_docx(path)?,
    };

    if text.trim().is_empty() {
        return Err(DocumentError::EmptyDocument(name));
    }

    Ok(LoadedDocument {
        name,
        text,
        metadata,
        format,
    })
}

/// Page texts, each under a `--- Page N ---` heading. Pages without
/// extractable text (scans, images) are left out; unreadable pages are
/// skipped with a warning.
fn extract_pdf(path: &Path) -> Result<(String, String)> {
    let pdf = lopdf::Document::load(path)?;
    let pages = pdf.get_pages();

    let mut text = String::new();
    for &number in pages.keys() {
        let page_text = match pdf.extract_text(&[number]) {
            Ok(page_text) => page_text,
            Err(err) => {
                warn!("Skipping unreadable page {number} of {}: {err}", path.display());
                continue;
            }
        };
        if page_text.trim().is_empty() {
            continue;
        }
        text.push_str(&format!("--- Page {number} ---\n"));
        text.push_str(page_text.trim_end());
        text.push('\n');
    }

    Ok((text, format!("Pages: {}", pages.len())))
}

fn extract_docx(path: &Path) -> Result<(String, String)> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    let (paragraphs, count) = docx_paragraphs(&xml);
    Ok((paragraphs.join("\n"), format!("Paragraphs: {count}")))
}

/// Non-empty paragraph texts plus the total paragraph count.
///
/// `<w:tab/>` becomes a tab and `<w:br/>`/`<w:cr/>` a newline. Tab stops
/// declared in paragraph properties are not content.
fn docx_paragraphs(xml: &str) -> (Vec<String>, usize) {
    let mut count = 0;
    let mut paragraphs = Vec::new();
    for paragraph in PARAGRAPH_RE.find_iter(xml) {
        count += 1;
        let body = PARAGRAPH_PROPERTIES_RE.replace_all(paragraph.as_str(), "");

        let mut text = String::new();
        for caps in RUN_CONTENT_RE.captures_iter(&body) {
            if let Some(run) = caps.get(1) {
                text.push_str(&unescape_xml(run.as_str()));
            } else if let Some(mark) = caps.get(2) {
                text.push(if mark.as_str() == "tab" { '\t' } else { '\n' });
            }
        }
        if !text.trim().is_empty() {
            paragraphs.push(text);
        }
    }

    (paragraphs, count)
}

fn unescape_xml(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
