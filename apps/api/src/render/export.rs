//! Print export: serializes a record into a standalone, print-ready HTML document and
//! hands it to a `PrintSink`.
//!
//! The document carries its own stylesheet (paper size, margins, point-based type,
//! no page breaks inside entries, accent-coloured headings) and never references the
//! screen stylesheet. Content comes from the same projection the preview uses.

use std::path::PathBuf;
use std::time::Duration;

use minijinja::{context, Environment, UndefinedBehavior};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::layout::{estimate_pages, PageGeometry};
use crate::models::resume::ResumeRecord;
use crate::models::validation::ValidationReport;
use crate::render::projector::project;
use crate::render::sink::{PrintSink, SinkError, StagedDocument};
use crate::render::theme::PresentedResume;
use crate::render::RenderError;

const DOCUMENT: &str = include_str!("../../templates/export/document.html");
const STAGED_FILE_NAME: &str = "document.html";

pub const DEFAULT_GRACE: Duration = Duration::from_millis(250);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Malformed résumé: {0}")]
    Malformed(ValidationReport),

    #[error("Export target unavailable: {0}")]
    Unavailable(String),

    #[error("Export dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("Export timed out after {0:?}")]
    Timeout(Duration),

    #[error("Export template error: {0}")]
    Template(minijinja::Error),
}

impl From<RenderError> for ExportError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::MalformedInput(report) => ExportError::Malformed(report),
            RenderError::Template(e) => ExportError::Template(e),
        }
    }
}

impl From<SinkError> for ExportError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Unavailable(msg) => ExportError::Unavailable(msg),
            SinkError::Failed(msg) => ExportError::DispatchFailed(msg),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Serializer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    /// `Resume - First Last`
    pub title: String,
    pub file_stem: String,
    pub html: String,
    pub estimated_pages: u16,
}

/// Page rule values, preformatted for the stylesheet.
#[derive(Debug, Serialize)]
struct PageView {
    size: &'static str,
    margin: String,
    body_font: String,
    line_height: String,
}

impl PageView {
    fn new(geometry: &PageGeometry) -> Self {
        PageView {
            size: geometry.paper.css_size(),
            margin: format!("{}in", geometry.margin_in),
            body_font: format!("{}pt", geometry.body_font_pt),
            line_height: geometry.line_height.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ExportSerializer {
    env: Environment<'static>,
}

impl ExportSerializer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("document.html", DOCUMENT)?;
        Ok(ExportSerializer { env })
    }

    pub fn serialize(
        &self,
        record: &ResumeRecord,
        geometry: &PageGeometry,
    ) -> Result<ExportDocument, RenderError> {
        let projection = project(record)?;
        let title = document_title(record);
        let estimated_pages = estimate_pages(&projection, geometry);

        let html = self.env.get_template("document.html")?.render(context! {
            title => &title,
            page => PageView::new(geometry),
            resume => PresentedResume::from_projection(&projection),
        })?;

        Ok(ExportDocument {
            file_stem: file_stem(&title),
            title,
            html,
            estimated_pages,
        })
    }
}

pub fn document_title(record: &ResumeRecord) -> String {
    format!("Resume - {}", record.personal_info.full_name())
}

/// `Resume - Ada Lovelace` → `Resume_Ada_Lovelace`.
fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            stem.push(c);
        } else if !stem.ends_with('_') && !stem.is_empty() {
            stem.push('_');
        }
    }
    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        "resume".to_string()
    } else {
        stem.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Export flow
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub geometry: PageGeometry,
    /// How long the staged document outlives a successful dispatch.
    pub grace: Duration,
    /// Upper bound on the sink's dispatch.
    pub timeout: Duration,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            geometry: PageGeometry::default(),
            grace: DEFAULT_GRACE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub title: String,
    pub sink: String,
    pub output: Option<PathBuf>,
    pub estimated_pages: u16,
}

/// Serializes `record`, stages it, and hands it to `sink`.
///
/// The staging directory is removed on every exit path. The record is only read.
pub async fn export_to_document(
    record: &ResumeRecord,
    serializer: &ExportSerializer,
    sink: &dyn PrintSink,
    options: &ExportOptions,
) -> Result<ExportReceipt, ExportError> {
    let document = serializer.serialize(record, &options.geometry)?;

    let staging = tempfile::Builder::new()
        .prefix("resume-export-")
        .tempdir()
        .map_err(|e| ExportError::Unavailable(format!("cannot create staging area: {e}")))?;
    let path = staging.path().join(STAGED_FILE_NAME);
    tokio::fs::write(&path, &document.html)
        .await
        .map_err(|e| ExportError::Unavailable(format!("cannot stage document: {e}")))?;

    let staged = StagedDocument {
        path,
        title: document.title.clone(),
        file_stem: document.file_stem.clone(),
    };
    debug!(sink = sink.name(), path = %staged.path.display(), "Document staged");

    let dispatched = match tokio::time::timeout(options.timeout, sink.dispatch(&staged)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!(sink = sink.name(), timeout = ?options.timeout, "Print dispatch timed out");
            return Err(ExportError::Timeout(options.timeout));
        }
    };

    // The print target may still be reading the staged file.
    tokio::time::sleep(options.grace).await;

    if let Err(e) = staging.close() {
        warn!("Failed to remove export staging directory: {e}");
    }

    info!(
        title = %document.title,
        sink = %dispatched.sink,
        pages = document.estimated_pages,
        "Export complete"
    );
    Ok(ExportReceipt {
        title: document.title,
        sink: dispatched.sink,
        output: dispatched.output,
        estimated_pages: document.estimated_pages,
    })
}
