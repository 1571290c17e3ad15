//! Fixed-layout job-order documents.
//!
//! A [`JobOrderRenderer`] turns one [`model::Order`] into a two-page A4 PDF:
//! page 1 carries the sales header and up to two product columns, page 2 the
//! planner's materials table, remarks, signatures and status footer. Output is
//! byte-identical for identical input.
//!
//! The order model, a record store and the sales/planner workflow live next to
//! the renderer but are never called by it.

mod assets;
mod canvas;
mod column;
mod debug;
mod draw;
mod error;
mod font;
mod layout;
mod metrics;
pub mod model;
mod pdf;
mod pdfinspect;
mod planner_page;
mod sales_page;
mod signature;
pub mod store;
pub mod text;
mod types;
pub mod workflow;

pub use assets::LogoSource;
pub use canvas::{Command, Document, Page};
use debug::{DebugLogger, DefectLog};
pub use debug::{DefectKind, RenderDefect};
use draw::Painter;
pub use error::JobOrderError;
use font::FontRegistry;
pub use font::{FontWeight, MissingGlyph};
pub use metrics::{DocumentMetrics, PageMetrics};
use model::Order;
use pdf::PdfOptions;
pub use pdfinspect::{
    JOB_ORDER_PAGE_COUNT, PdfInspectError, PdfInspectErrorCode, PdfInspectReport,
    inspect_pdf_bytes, inspect_pdf_path, job_order_shape_issues, require_job_order_shape,
};
use sales_page::SalesPageOptions;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;
pub use types::{Color, Pt, Rect, Size};
pub use workflow::{PDF_MIME_TYPE, pdf_file_name};

const DEFAULT_REGULAR_FONT: &str = "Helvetica";
const DEFAULT_BOLD_FONT: &str = "Helvetica-Bold";

/// Everything a render left out, plus what it cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub defects: Vec<RenderDefect>,
    pub metrics: DocumentMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub report: RenderReport,
}

impl RenderedDocument {
    /// Lowercase hex SHA-256 of the PDF bytes.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        digest.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

/// Immutable after [`JobOrderRendererBuilder::build`]; share it freely across threads.
pub struct JobOrderRenderer {
    font_registry: Arc<FontRegistry>,
    pdf_options: PdfOptions,
    logo: Option<LogoSource>,
    blank_second_column: bool,
    debug: Option<Arc<DebugLogger>>,
}

impl JobOrderRenderer {
    pub fn builder() -> JobOrderRendererBuilder {
        JobOrderRendererBuilder::new()
    }

    /// Composes both pages without serializing them.
    pub fn compose_document(&self, order: &Order) -> (Document, Vec<RenderDefect>) {
        let (document, defects, _) = self.compose(order);
        (document, defects.into_defects())
    }

    fn compose(&self, order: &Order) -> (Document, DefectLog, Vec<PageMetrics>) {
        let mut canvas = canvas::Canvas::new(Size::a4());
        let mut defects = DefectLog::new(self.debug.clone());
        let mut pages = Vec::with_capacity(2);
        let options = SalesPageOptions {
            logo: self.logo.as_ref(),
            blank_second_column: self.blank_second_column,
        };

        let t_page = Instant::now();
        {
            let mut painter = Painter::new(&mut canvas, &self.font_registry, &mut defects);
            let frame_bottom = sales_page::compose_sales_page(&mut painter, order, &options);
            tracing::debug!(order = %order.id, frame_bottom, "page 1 composed");
        }
        pages.push(PageMetrics {
            page_number: 1,
            compose_ms: t_page.elapsed().as_secs_f64() * 1000.0,
            command_count: canvas.current_command_count(),
            content_bytes: 0,
        });
        canvas.show_page();

        defects.set_page(2);
        let t_page = Instant::now();
        {
            let mut painter = Painter::new(&mut canvas, &self.font_registry, &mut defects);
            let footer_bottom = planner_page::compose_planner_page(&mut painter, order);
            tracing::debug!(order = %order.id, footer_bottom, "page 2 composed");
        }
        pages.push(PageMetrics {
            page_number: 2,
            compose_ms: t_page.elapsed().as_secs_f64() * 1000.0,
            command_count: canvas.current_command_count(),
            content_bytes: 0,
        });
        canvas.show_page();

        (canvas.finish(), defects, pages)
    }

    /// Renders `order` into memory. Only a serialization failure is an error;
    /// anything the page could not show is listed in the report.
    pub fn render(&self, order: &Order) -> Result<RenderedDocument, JobOrderError> {
        let (document, defects, mut pages) = self.compose(order);
        let mut bytes = Vec::new();
        let summary = pdf::document_to_pdf_to_writer(
            &document,
            &self.font_registry,
            &self.pdf_options,
            self.debug.clone(),
            &mut bytes,
        )?;
        for (page, content_bytes) in pages.iter_mut().zip(summary.page_content_bytes) {
            page.content_bytes = content_bytes;
        }
        let metrics = DocumentMetrics {
            total_compose_ms: pages.iter().map(|page| page.compose_ms).sum(),
            total_bytes: summary.bytes_written,
            pages,
        };
        defects.emit_summary(&format!("order:{}", order.id));
        let defects = defects.into_defects();
        tracing::debug!(
            order = %order.id,
            bytes = metrics.total_bytes,
            defects = defects.len(),
            "job order rendered"
        );
        Ok(RenderedDocument {
            bytes,
            report: RenderReport { defects, metrics },
        })
    }

    /// Serializes in memory first; `writer` sees either the whole document or
    /// nothing from a failed render.
    pub fn render_to_writer<W: std::io::Write>(
        &self,
        order: &Order,
        writer: &mut W,
    ) -> Result<RenderReport, JobOrderError> {
        let rendered = self.render(order)?;
        writer.write_all(&rendered.bytes)?;
        writer.flush()?;
        Ok(rendered.report)
    }

    /// Writes to a sibling `.partial` file and renames it into place, so a
    /// failed render never leaves a truncated PDF at `path`.
    pub fn render_to_file(
        &self,
        order: &Order,
        path: impl AsRef<std::path::Path>,
    ) -> Result<RenderReport, JobOrderError> {
        let path = path.as_ref();
        let rendered = self.render(order)?;
        let mut partial = path.as_os_str().to_owned();
        partial.push(".partial");
        let partial = std::path::PathBuf::from(partial);
        let written = std::fs::write(&partial, &rendered.bytes)
            .and_then(|()| std::fs::rename(&partial, path));
        if let Err(err) = written {
            let _ = std::fs::remove_file(&partial);
            tracing::warn!(path = %path.display(), error = %err, "job order file not written");
            return Err(err.into());
        }
        Ok(rendered.report)
    }

    /// Renders independent orders in parallel. Results come back in input
    /// order; the first failure (in input order) is returned.
    pub fn render_many_parallel(
        &self,
        orders: &[Order],
    ) -> Result<Vec<RenderedDocument>, JobOrderError> {
        use rayon::prelude::*;

        let mut results: Vec<(usize, Result<RenderedDocument, JobOrderError>)> = orders
            .par_iter()
            .enumerate()
            .map(|(idx, order)| (idx, self.render(order)))
            .collect();
        results.sort_by_key(|(idx, _)| *idx);

        let mut rendered = Vec::with_capacity(results.len());
        for (_, res) in results {
            rendered.push(res?);
        }
        Ok(rendered)
    }
}

#[derive(Clone)]
pub struct JobOrderRendererBuilder {
    regular_font: String,
    bold_font: String,
    logo: Option<LogoSource>,
    blank_second_column: bool,
    pdf_options: PdfOptions,
    debug_path: Option<std::path::PathBuf>,
}

impl JobOrderRendererBuilder {
    pub fn new() -> Self {
        Self {
            regular_font: DEFAULT_REGULAR_FONT.to_string(),
            bold_font: DEFAULT_BOLD_FONT.to_string(),
            logo: None,
            blank_second_column: false,
            pdf_options: PdfOptions::default(),
            debug_path: None,
        }
    }

    // Base-14 face for regular text, e.g. "Helvetica" or "Courier".
    pub fn regular_font(mut self, name: impl Into<String>) -> Self {
        self.regular_font = name.into();
        self
    }

    pub fn bold_font(mut self, name: impl Into<String>) -> Self {
        self.bold_font = name.into();
        self
    }

    // Masthead logo. Decoded per render; a bad image is a defect, not an error.
    pub fn logo_png(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.logo = Some(LogoSource::Bytes(bytes.into()));
        self
    }

    pub fn logo_data_uri(mut self, uri: impl Into<String>) -> Self {
        self.logo = Some(LogoSource::DataUri(uri.into()));
        self
    }

    // Print the empty product template when an order has no second product.
    pub fn blank_second_column(mut self, enabled: bool) -> Self {
        self.blank_second_column = enabled;
        self
    }

    // Document title for the Info dictionary.
    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.pdf_options.document_title = Some(title.into());
        self
    }

    // Enable debug logging to a JSONL file: one record per defect, one summary per render.
    pub fn debug_log(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.debug_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<JobOrderRenderer, JobOrderError> {
        if self
            .pdf_options
            .document_title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(JobOrderError::InvalidConfiguration(
                "document_title must not be blank".to_string(),
            ));
        }
        let registry = FontRegistry::embed(&self.regular_font, &self.bold_font)?;
        let debug = if let Some(path) = self.debug_path {
            Some(Arc::new(DebugLogger::new(path)?))
        } else {
            None
        };
        Ok(JobOrderRenderer {
            font_registry: Arc::new(registry),
            pdf_options: self.pdf_options,
            logo: self.logo,
            blank_second_column: self.blank_second_column,
            debug,
        })
    }
}

impl Default for JobOrderRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}
