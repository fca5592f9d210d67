//! Pure projections of a [`Document`] into exportable artifacts.
//!
//! None of these functions touch the store; they take a snapshot and return
//! bytes. The generation date is a parameter so that output is reproducible.

pub mod json;
pub mod markdown;
pub mod pdf;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DocError, Result};
use crate::models::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }

    /// Accepts the format name or its file extension.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "markdown" | "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown; charset=utf-8",
            Self::Json => "application/json",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Suggested file name for an export.
///
/// Derived from the project name with every character other than an ASCII
/// letter or digit replaced by `_`, lower-cased, e.g. `EcoTrack App` →
/// `ecotrack_app_documentation.pdf`. Without a project name the file is
/// `project_documentation.<ext>`.
pub fn export_filename(doc: &Document, format: ExportFormat) -> String {
    let stem = match doc.overview.project_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect::<String>(),
        None => "project".to_string(),
    };
    format!("{}_documentation.{}", stem, format.extension())
}

/// Date line used in document headers, e.g. `3/7/2025`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Render `doc` in `format`, dated `generated_on`.
pub fn render(doc: &Document, format: ExportFormat, generated_on: NaiveDate) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Markdown => Ok(markdown::render(doc, generated_on).into_bytes()),
        ExportFormat::Json => Ok(json::render(doc)?.into_bytes()),
        ExportFormat::Pdf => pdf::render(doc, generated_on),
    }
}

/// Render on a blocking worker so long PDF layouts never stall the async
/// executor. The document is a snapshot; the store is not held meanwhile.
pub async fn render_detached(doc: Document, format: ExportFormat) -> Result<Vec<u8>> {
    let generated_on = today();
    tokio::task::spawn_blocking(move || render(&doc, format, generated_on))
        .await
        .map_err(|e| DocError::Pdf(format!("render task failed: {}", e)))?
}
