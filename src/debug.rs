use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Optional JSON-lines sink shared by every render of one renderer.
#[derive(Clone)]
pub(crate) struct DebugLogger {
    inner: Arc<Mutex<BufWriter<File>>>,
}

impl DebugLogger {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    pub fn log_json(&self, json: &str) {
        if let Ok(mut writer) = self.inner.lock() {
            let _ = writeln!(writer, "{json}");
        }
    }

    pub fn emit_summary(&self, context: &str, counters: &BTreeMap<String, u64>) {
        if let Ok(mut writer) = self.inner.lock() {
            let mut counts_json = String::from("{");
            for (idx, (key, value)) in counters.iter().enumerate() {
                if idx > 0 {
                    counts_json.push(',');
                }
                counts_json.push_str(&format!("\"{}\":{}", json_escape(key), value));
            }
            counts_json.push('}');
            let json = format!(
                "{{\"type\":\"debug.summary\",\"context\":\"{}\",\"counts\":{}}}",
                json_escape(context),
                counts_json
            );
            let _ = writeln!(writer, "{json}");
        }
    }

    pub fn flush(&self) {
        if let Ok(mut writer) = self.inner.lock() {
            let _ = writer.flush();
        }
    }
}

pub(crate) fn json_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefectKind {
    MissingGlyph,
    LogoUndecodable,
    MaterialRowsOverflow,
    TextLinesDropped,
}

impl DefectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefectKind::MissingGlyph => "missing_glyph",
            DefectKind::LogoUndecodable => "logo_undecodable",
            DefectKind::MaterialRowsOverflow => "material_rows_overflow",
            DefectKind::TextLinesDropped => "text_lines_dropped",
        }
    }
}

/// Something the engine left out of the page instead of failing the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDefect {
    pub page: usize,
    pub kind: DefectKind,
    pub element: String,
    pub detail: String,
}

/// Collects the recoverable defects of one render.
pub(crate) struct DefectLog {
    page: usize,
    defects: Vec<RenderDefect>,
    counts: BTreeMap<String, u64>,
    debug: Option<Arc<DebugLogger>>,
}

impl DefectLog {
    pub(crate) fn new(debug: Option<Arc<DebugLogger>>) -> Self {
        Self {
            page: 1,
            defects: Vec::new(),
            counts: BTreeMap::new(),
            debug,
        }
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub(crate) fn record(&mut self, kind: DefectKind, element: &str, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::warn!(
            page = self.page,
            kind = kind.as_str(),
            element,
            detail = detail.as_str(),
            "render defect, element skipped"
        );
        if let Some(logger) = self.debug.as_deref() {
            let json = format!(
                "{{\"type\":\"render.defect\",\"page\":{},\"kind\":\"{}\",\"element\":\"{}\",\"detail\":\"{}\"}}",
                self.page,
                kind.as_str(),
                json_escape(element),
                json_escape(&detail)
            );
            logger.log_json(&json);
        }
        let key = format!("render.defect.{}", kind.as_str());
        *self.counts.entry(key).or_insert(0) += 1;
        self.defects.push(RenderDefect {
            page: self.page,
            kind,
            element: element.to_string(),
            detail,
        });
    }

    /// Writes this render's `debug.summary` line, if a debug log is attached.
    pub(crate) fn emit_summary(&self, context: &str) {
        if let Some(logger) = self.debug.as_deref() {
            logger.emit_summary(context, &self.counts);
            logger.flush();
        }
    }

    pub(crate) fn into_defects(self) -> Vec<RenderDefect> {
        self.defects
    }
}
