use lopdf::{Document as LoDocument, Object as LoObject};
use std::collections::BTreeSet;
use std::path::Path;

/// A job order is always two A4 portrait pages.
pub const JOB_ORDER_PAGE_COUNT: usize = 2;
const A4_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 595.28, 841.89];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfInspectErrorCode {
    PdfParseFailed,
    PdfEncryptedUnsupported,
    PdfEmptyOrNoPages,
    PdfIoError,
    PdfUnexpectedPageCount,
    PdfUnexpectedMediaBox,
}

impl PdfInspectErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfInspectErrorCode::PdfParseFailed => "PDF_PARSE_FAILED",
            PdfInspectErrorCode::PdfEncryptedUnsupported => "PDF_ENCRYPTED_UNSUPPORTED",
            PdfInspectErrorCode::PdfEmptyOrNoPages => "PDF_EMPTY_OR_NO_PAGES",
            PdfInspectErrorCode::PdfIoError => "PDF_IO_ERROR",
            PdfInspectErrorCode::PdfUnexpectedPageCount => "PDF_UNEXPECTED_PAGE_COUNT",
            PdfInspectErrorCode::PdfUnexpectedMediaBox => "PDF_UNEXPECTED_MEDIA_BOX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfInspectError {
    pub code: PdfInspectErrorCode,
    pub message: String,
}

impl std::fmt::Display for PdfInspectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for PdfInspectError {}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfInspectReport {
    pub pdf_version: String,
    pub page_count: usize,
    pub encrypted: bool,
    pub file_size_bytes: usize,
    /// `[llx lly urx ury]` per page, in page order. `None` when a page has no readable box.
    pub media_boxes: Vec<Option<[f32; 4]>>,
    /// BaseFont names referenced by any page, sorted.
    pub font_names: Vec<String>,
}

pub fn inspect_pdf_bytes(bytes: &[u8]) -> Result<PdfInspectReport, PdfInspectError> {
    let pdf = LoDocument::load_mem(bytes).map_err(|err| PdfInspectError {
        code: PdfInspectErrorCode::PdfParseFailed,
        message: err.to_string(),
    })?;

    let pages = pdf.get_pages();
    let mut media_boxes = Vec::with_capacity(pages.len());
    let mut font_names = BTreeSet::new();
    for page_id in pages.values() {
        let page = pdf.get_object(*page_id).and_then(LoObject::as_dict).ok();
        media_boxes.push(page.and_then(|page| media_box(&pdf, page)));
        if let Some(page) = page {
            collect_font_names(&pdf, page, &mut font_names);
        }
    }

    Ok(PdfInspectReport {
        pdf_version: pdf.version.clone(),
        page_count: pages.len(),
        encrypted: pdf.is_encrypted(),
        file_size_bytes: bytes.len(),
        media_boxes,
        font_names: font_names.into_iter().collect(),
    })
}

pub fn inspect_pdf_path(path: &Path) -> Result<PdfInspectReport, PdfInspectError> {
    let data = std::fs::read(path).map_err(|err| PdfInspectError {
        code: PdfInspectErrorCode::PdfIoError,
        message: err.to_string(),
    })?;
    inspect_pdf_bytes(&data)
}

fn media_box(pdf: &LoDocument, page: &lopdf::Dictionary) -> Option<[f32; 4]> {
    let (_, object) = pdf.dereference(page.get(b"MediaBox").ok()?).ok()?;
    let values = object.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let mut out = [0.0f32; 4];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.as_float().ok()?;
    }
    Some(out)
}

fn collect_font_names(pdf: &LoDocument, page: &lopdf::Dictionary, out: &mut BTreeSet<String>) {
    let Some(resources) = page
        .get(b"Resources")
        .ok()
        .and_then(|obj| pdf.dereference(obj).ok())
        .and_then(|(_, obj)| obj.as_dict().ok())
    else {
        return;
    };
    let Some(fonts) = resources
        .get(b"Font")
        .ok()
        .and_then(|obj| pdf.dereference(obj).ok())
        .and_then(|(_, obj)| obj.as_dict().ok())
    else {
        return;
    };
    for (_, font) in fonts.iter() {
        let base_name = pdf
            .dereference(font)
            .ok()
            .and_then(|(_, obj)| obj.as_dict().ok())
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|name| name.as_name().ok());
        if let Some(name) = base_name {
            out.insert(String::from_utf8_lossy(name).into_owned());
        }
    }
}

/// Everything that keeps `report` from being a well-formed job order.
pub fn job_order_shape_issues(report: &PdfInspectReport) -> Vec<PdfInspectErrorCode> {
    let mut issues = Vec::new();
    if report.encrypted {
        issues.push(PdfInspectErrorCode::PdfEncryptedUnsupported);
    }
    if report.page_count == 0 {
        issues.push(PdfInspectErrorCode::PdfEmptyOrNoPages);
    } else if report.page_count != JOB_ORDER_PAGE_COUNT {
        issues.push(PdfInspectErrorCode::PdfUnexpectedPageCount);
    }
    let a4 = |bbox: &Option<[f32; 4]>| {
        bbox.is_some_and(|bbox| {
            bbox.iter()
                .zip(A4_MEDIA_BOX.iter())
                .all(|(got, want)| (got - want).abs() < 0.01)
        })
    };
    if !report.media_boxes.iter().all(a4) {
        issues.push(PdfInspectErrorCode::PdfUnexpectedMediaBox);
    }
    issues
}

pub fn require_job_order_shape(report: &PdfInspectReport) -> Result<(), PdfInspectError> {
    match job_order_shape_issues(report).into_iter().next() {
        None => Ok(()),
        Some(code) => {
            let message = match code {
                PdfInspectErrorCode::PdfEncryptedUnsupported => {
                    "encrypted pdf is not a job order".to_string()
                }
                PdfInspectErrorCode::PdfEmptyOrNoPages => "pdf has no pages".to_string(),
                PdfInspectErrorCode::PdfUnexpectedPageCount => format!(
                    "expected {} pages, found {}",
                    JOB_ORDER_PAGE_COUNT, report.page_count
                ),
                PdfInspectErrorCode::PdfUnexpectedMediaBox => {
                    "every page must be A4 portrait".to_string()
                }
                PdfInspectErrorCode::PdfParseFailed | PdfInspectErrorCode::PdfIoError => {
                    code.as_str().to_string()
                }
            };
            Err(PdfInspectError { code, message })
        }
    }
}
