use crate::assets::{AlphaData, ImageData};
use crate::canvas::{Command, Document, Page};
use crate::debug::DebugLogger;
use crate::font::{FontRegistry, FontWeight};
use crate::types::{Color, Pt, Size};
use fixed::types::I32F32;
use std::io::{self, Write};
use std::sync::Arc;

const PDF_HEADER: &[u8] = b"%PDF-1.7\n";
const PDF_PRODUCER: &str = "joborder";

const PDF_CATALOG_ID: usize = 1;
const PDF_PAGES_ID: usize = 2;
const PDF_RESOURCES_ID: usize = 3;

#[derive(Debug, Clone, Default)]
pub(crate) struct PdfOptions {
    pub document_title: Option<String>,
}

/// What the writer produced, for metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PdfWriteSummary {
    pub bytes_written: usize,
    pub page_content_bytes: Vec<usize>,
}

/// Serializes one recorded document straight into `writer`: shared resources
/// first, then one content stream and page object per page, then the page tree,
/// info, catalog and cross-reference table.
pub(crate) struct PdfStreamWriter<'a, W: Write> {
    writer: &'a mut W,
    offset: usize,
    offsets: Vec<usize>, // index by object id; 0 is the free object.
    next_id: usize,
    page_size: Size,
    options: PdfOptions,
    debug: Option<Arc<DebugLogger>>,

    font_resources: Vec<(String, usize)>,
    image_resources: Vec<(String, usize)>,
    image_bytes_total: usize,

    page_ids: Vec<usize>,
    page_content_bytes: Vec<usize>,
}

impl<'a, W: Write> PdfStreamWriter<'a, W> {
    pub(crate) fn new(
        writer: &'a mut W,
        page_size: Size,
        options: PdfOptions,
        debug: Option<Arc<DebugLogger>>,
    ) -> io::Result<Self> {
        let mut offset: usize = 0;
        write_bytes(writer, PDF_HEADER, &mut offset)?;
        write_bytes(writer, b"%\xE2\xE3\xCF\xD3\n", &mut offset)?;

        Ok(Self {
            writer,
            offset,
            offsets: vec![0; PDF_RESOURCES_ID + 1],
            next_id: PDF_RESOURCES_ID + 1,
            page_size,
            options,
            debug,
            font_resources: Vec::new(),
            image_resources: Vec::new(),
            image_bytes_total: 0,
            page_ids: Vec::new(),
            page_content_bytes: Vec::new(),
        })
    }

    /// Writes both faces once; every page refers to them through the shared
    /// resource dictionary.
    pub(crate) fn add_fonts(&mut self, fonts: &FontRegistry) -> io::Result<()> {
        for (weight, face) in fonts.faces() {
            let id = self.alloc_ids(1);
            self.write_object(id, &font_object(face.base_name))?;
            self.font_resources
                .push((FontRegistry::resource_name(weight).to_string(), id));
        }
        Ok(())
    }

    pub(crate) fn add_document(&mut self, document: &Document) -> io::Result<()> {
        let differs =
            |a: Pt, b: Pt| (a.to_milli_i64() - b.to_milli_i64()).abs() > 10;
        if differs(document.page_size.width, self.page_size.width)
            || differs(document.page_size.height, self.page_size.height)
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "mixed page sizes are not supported in a single PDF stream",
            ));
        }
        for (resource_id, image) in &document.images {
            self.add_image(resource_id, image)?;
        }
        for page in &document.pages {
            self.add_page(page)?;
        }
        Ok(())
    }

    fn add_image(&mut self, resource_id: &str, image: &ImageData) -> io::Result<()> {
        let smask_id = match image.alpha.as_ref() {
            Some(alpha) => {
                let id = self.alloc_ids(1);
                self.write_object(id, &image_smask_object(alpha))?;
                self.image_bytes_total += alpha.data.len();
                Some(id)
            }
            None => None,
        };
        let id = self.alloc_ids(1);
        self.write_object(id, &image_object(image, smask_id))?;
        self.image_bytes_total += image.data.len();
        self.image_resources.push((resource_id.to_string(), id));
        Ok(())
    }

    fn add_page(&mut self, page: &Page) -> io::Result<()> {
        let start = self.alloc_ids(2);
        let content_id = start;
        let page_id = start + 1;

        let image_names: Vec<&str> = self
            .image_resources
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        let content_stream = render_page(page, &image_names);
        self.page_content_bytes.push(content_stream.len());
        self.write_object(content_id, &stream_object(&content_stream))?;
        self.page_ids.push(page_id);

        let page_obj = format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] /Resources {} 0 R /Contents {} 0 R >>",
            PDF_PAGES_ID,
            fmt_pt(self.page_size.width),
            fmt_pt(self.page_size.height),
            PDF_RESOURCES_ID,
            content_id,
        );
        self.write_object(page_id, &page_obj)?;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> io::Result<PdfWriteSummary> {
        let t_finish = std::time::Instant::now();

        let mut resources = format!("<< /Font {}", named_resources(&self.font_resources));
        if !self.image_resources.is_empty() {
            resources.push_str(&format!(" /XObject {}", named_resources(&self.image_resources)));
        }
        resources.push_str(" >>");
        self.write_object(PDF_RESOURCES_ID, &resources)?;

        let kids = self
            .page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        let pages = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            self.page_ids.len()
        );
        self.write_object(PDF_PAGES_ID, &pages)?;

        let info_id = self.alloc_ids(1);
        let info = info_object(self.options.document_title.as_deref());
        self.write_object(info_id, &info)?;

        let mut catalog = format!("<< /Type /Catalog /Pages {} 0 R", PDF_PAGES_ID);
        if self.options.document_title.is_some() {
            catalog.push_str(" /ViewerPreferences << /DisplayDocTitle true >>");
        }
        catalog.push_str(" >>");
        self.write_object(PDF_CATALOG_ID, &catalog)?;

        let total_objects = self.next_id.saturating_sub(1);
        let xref_start = self.offset;
        write_str(
            self.writer,
            &format!("xref\n0 {}\n", total_objects + 1),
            &mut self.offset,
        )?;
        write_bytes(self.writer, b"0000000000 65535 f \n", &mut self.offset)?;
        for id in 1..=total_objects {
            let obj_offset = self.offsets.get(id).copied().unwrap_or(0);
            write_str(
                self.writer,
                &format!("{:010} 00000 n \n", obj_offset),
                &mut self.offset,
            )?;
        }
        let trailer = format!(
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF",
            total_objects + 1,
            PDF_CATALOG_ID,
            info_id,
            xref_start
        );
        write_str(self.writer, &trailer, &mut self.offset)?;
        self.writer.flush()?;

        let bytes_written = self.offset;
        if let Some(logger) = self.debug.as_deref() {
            let json = format!(
                "{{\"type\":\"pdf.link\",\"ms\":{:.3},\"bytes\":{},\"pages\":{},\"fonts\":{},\"images\":{},\"image_bytes\":{}}}",
                t_finish.elapsed().as_secs_f64() * 1000.0,
                bytes_written,
                self.page_ids.len(),
                self.font_resources.len(),
                self.image_resources.len(),
                self.image_bytes_total,
            );
            logger.log_json(&json);
        }

        Ok(PdfWriteSummary {
            bytes_written,
            page_content_bytes: self.page_content_bytes,
        })
    }

    fn alloc_ids(&mut self, count: usize) -> usize {
        let start = self.next_id;
        self.next_id += count;
        if self.offsets.len() < self.next_id {
            self.offsets.resize(self.next_id, 0);
        }
        start
    }

    fn write_object(&mut self, obj_id: usize, body: &str) -> io::Result<()> {
        write_pdf_object(self.writer, &mut self.offset, &mut self.offsets, obj_id, body)
    }
}

/// Serializes `document` with the two faces of `fonts` into `writer`.
pub(crate) fn document_to_pdf_to_writer<W: Write>(
    document: &Document,
    fonts: &FontRegistry,
    options: &PdfOptions,
    debug: Option<Arc<DebugLogger>>,
    writer: &mut W,
) -> io::Result<PdfWriteSummary> {
    let mut stream = PdfStreamWriter::new(writer, document.page_size, options.clone(), debug)?;
    stream.add_fonts(fonts)?;
    stream.add_document(document)?;
    stream.finish()
}

fn render_page(page: &Page, image_names: &[&str]) -> String {
    let mut out = String::new();
    let mut current_font = FontWeight::Regular;
    let mut current_font_size = Pt::from_f32(12.0);

    for cmd in &page.commands {
        match cmd {
            Command::SetFillColor(color) => out.push_str(&color_to_pdf_fill(*color)),
            Command::SetStrokeColor(color) => out.push_str(&color_to_pdf_stroke(*color)),
            Command::SetLineWidth(width) => {
                out.push_str(&format!("{} w\n", fmt_pt(*width)));
            }
            Command::SetFont(weight) => current_font = *weight,
            Command::SetFontSize(size) => current_font_size = *size,
            Command::MoveTo { x, y } => {
                out.push_str(&format!("{} {} m\n", fmt_pt(*x), fmt_pt(*y)));
            }
            Command::LineTo { x, y } => {
                out.push_str(&format!("{} {} l\n", fmt_pt(*x), fmt_pt(*y)));
            }
            Command::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} re\n",
                    fmt_pt(*x),
                    fmt_pt(*y),
                    fmt_pt(*width),
                    fmt_pt(*height)
                ));
            }
            Command::Fill => out.push_str("f\n"),
            Command::Stroke => out.push_str("S\n"),
            Command::DrawString { x, y, text } => {
                out.push_str("BT\n");
                out.push_str(&format!(
                    "/{} {} Tf\n",
                    FontRegistry::resource_name(current_font),
                    fmt_pt(current_font_size)
                ));
                out.push_str(&format!("{} {} Td\n", fmt_pt(*x), fmt_pt(*y)));
                out.push_str(&format!("({}) Tj\n", escape_pdf_string(text)));
                out.push_str("ET\n");
            }
            Command::DrawImage {
                x,
                y,
                width,
                height,
                resource_id,
            } => {
                if image_names.contains(&resource_id.as_str()) {
                    out.push_str("q\n");
                    out.push_str(&format!(
                        "{} 0 0 {} {} {} cm\n",
                        fmt_pt(*width),
                        fmt_pt(*height),
                        fmt_pt(*x),
                        fmt_pt(*y)
                    ));
                    out.push_str(&format!("/{} Do\n", resource_id));
                    out.push_str("Q\n");
                }
            }
        }
    }

    out
}

fn image_object(image: &ImageData, smask_id: Option<usize>) -> String {
    let stream_data = encode_stream_data(&image.data);
    let filters = match image.filter {
        "/DCTDecode" => "[/ASCIIHexDecode /DCTDecode]",
        _ => "[/ASCIIHexDecode /FlateDecode]",
    };
    let smask = smask_id
        .map(|id| format!(" /SMask {} 0 R", id))
        .unwrap_or_default();
    format!(
        "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} /BitsPerComponent {} /Length {} /Filter {}{} >>
stream
{}
endstream",
        image.width,
        image.height,
        image.color_space,
        image.bits_per_component,
        stream_data.len(),
        filters,
        smask,
        stream_data
    )
}

fn image_smask_object(alpha: &AlphaData) -> String {
    let stream_data = encode_stream_data(&alpha.data);
    format!(
        "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceGray /BitsPerComponent 8 /Length {} /Filter [/ASCIIHexDecode /FlateDecode] >>
stream
{}
endstream",
        alpha.width,
        alpha.height,
        stream_data.len(),
        stream_data
    )
}

fn encode_stream_data(data: &[u8]) -> String {
    let mut hex = ascii_hex_encode(data);
    hex.push('>');
    hex
}

fn ascii_hex_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2 + data.len() / 32);
    for (index, byte) in data.iter().enumerate() {
        use std::fmt::Write;
        let _ = write!(&mut out, "{:02X}", byte);
        if index % 32 == 31 {
            out.push('\n');
        }
    }
    out
}

fn font_object(base_name: &str) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        base_name
    )
}

fn named_resources(entries: &[(String, usize)]) -> String {
    let entries = entries
        .iter()
        .map(|(resource, id)| format!("/{} {} 0 R", resource, id))
        .collect::<Vec<_>>();
    format!("<< {} >>", entries.join(" "))
}

fn stream_object(content: &str) -> String {
    format!(
        "<< /Length {} >>\nstream\n{}\nendstream",
        content.len(),
        content
    )
}

fn info_object(title: Option<&str>) -> String {
    let mut entries = vec![format!("/Producer ({})", PDF_PRODUCER)];
    if let Some(title) = title {
        entries.push(format!("/Title ({})", escape_pdf_string(title)));
    }
    format!("<< {} >>", entries.join(" "))
}

fn write_pdf_object<W: Write>(
    writer: &mut W,
    offset: &mut usize,
    offsets: &mut [usize],
    obj_id: usize,
    body: &str,
) -> io::Result<()> {
    if let Some(slot) = offsets.get_mut(obj_id) {
        *slot = *offset;
    }
    write_str(writer, &format!("{} 0 obj\n", obj_id), offset)?;
    write_bytes(writer, body.as_bytes(), offset)?;
    write_bytes(writer, b"\nendobj\n", offset)?;
    Ok(())
}

fn write_bytes<W: Write>(writer: &mut W, data: &[u8], offset: &mut usize) -> io::Result<()> {
    writer.write_all(data)?;
    *offset += data.len();
    Ok(())
}

fn write_str<W: Write>(writer: &mut W, data: &str, offset: &mut usize) -> io::Result<()> {
    write_bytes(writer, data.as_bytes(), offset)
}

/// Literal-string escaping. Page text is already printable ASCII; titles are
/// reduced to it here as well.
fn escape_pdf_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if crate::text::is_drawable(c) && c != '\n' => out.push(c),
            _ => {}
        }
    }
    out
}

fn fmt(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = I32F32::from_num(value);
    let scaled = (fixed * I32F32::from_num(1000)).round();
    let milli: i64 = scaled.to_num();
    format_milli(milli)
}

fn format_milli(milli: i64) -> String {
    if milli == 0 {
        return "0".to_string();
    }
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int_part = abs / 1000;
    let frac_part = abs % 1000;
    if frac_part == 0 {
        format!("{}{}", sign, int_part)
    } else {
        let mut s = format!("{}{}.{:03}", sign, int_part, frac_part);
        while s.ends_with('0') {
            s.pop();
        }
        s
    }
}

fn fmt_pt(value: Pt) -> String {
    format_milli(value.to_milli_i64())
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn color_to_pdf_fill(color: Color) -> String {
    format!(
        "{} {} {} rg\n",
        fmt(clamp_unit(color.r)),
        fmt(clamp_unit(color.g)),
        fmt(clamp_unit(color.b))
    )
}

fn color_to_pdf_stroke(color: Color) -> String {
    format!(
        "{} {} {} RG\n",
        fmt(clamp_unit(color.r)),
        fmt(clamp_unit(color.g)),
        fmt(clamp_unit(color.b))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LogoSource, png_fixture};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn fonts() -> FontRegistry {
        FontRegistry::embed("Helvetica", "Helvetica-Bold").expect("fonts")
    }

    fn one_page_document(commands: Vec<Command>) -> Document {
        Document {
            page_size: Size::a4(),
            pages: vec![Page { commands }],
            images: BTreeMap::new(),
        }
    }

    fn write(doc: &Document, options: &PdfOptions) -> (Vec<u8>, PdfWriteSummary) {
        let mut out = Vec::new();
        let summary = document_to_pdf_to_writer(doc, &fonts(), options, None, &mut out).expect("pdf");
        (out, summary)
    }

    fn count_token(bytes: &[u8], token: &[u8]) -> usize {
        if token.is_empty() || bytes.len() < token.len() {
            return 0;
        }
        bytes.windows(token.len()).filter(|w| *w == token).count()
    }

    fn temp_log_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("joborder_{tag}_{}_{}.jsonl", std::process::id(), nanos))
    }

    #[test]
    fn format_milli_trims_trailing_zeroes() {
        assert_eq!(format_milli(0), "0");
        assert_eq!(format_milli(595_280), "595.28");
        assert_eq!(format_milli(-1_500), "-1.5");
        assert_eq!(format_milli(841_890), "841.89");
        assert_eq!(fmt(0.9), "0.9");
    }

    #[test]
    fn escapes_delimiters_in_text() {
        assert_eq!(escape_pdf_string("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_pdf_string("Caf\u{e9}\n"), "Caf");
    }

    #[test]
    fn writes_two_winansi_fonts_and_a4_media_box() {
        let doc = one_page_document(vec![
            Command::SetFont(FontWeight::Bold),
            Command::SetFontSize(Pt::from_f32(8.0)),
            Command::DrawString {
                x: Pt::from_f32(35.0),
                y: Pt::from_f32(700.5),
                text: "PO (draft)".to_string(),
            },
        ]);
        let (bytes, summary) = write(&doc, &PdfOptions::default());
        assert!(bytes.starts_with(b"%PDF-1.7\n"));
        assert_eq!(count_token(&bytes, b"/Encoding /WinAnsiEncoding"), 2);
        assert_eq!(count_token(&bytes, b"/BaseFont /Helvetica-Bold"), 1);
        assert_eq!(count_token(&bytes, b"/MediaBox [0 0 595.28 841.89]"), 1);
        assert_eq!(count_token(&bytes, b"/F2 8 Tf\n35 700.5 Td\n(PO \\(draft\\)) Tj"), 1);
        assert_eq!(summary.page_content_bytes.len(), 1);
        assert_eq!(summary.bytes_written, bytes.len());
    }

    #[test]
    fn startxref_points_at_the_table() {
        let (bytes, _) = write(&one_page_document(vec![]), &PdfOptions::default());
        let text = String::from_utf8_lossy(&bytes);
        let tail = text.rsplit("startxref\n").next().expect("startxref");
        let offset: usize = tail.lines().next().expect("offset").parse().expect("number");
        assert!(text[offset..].starts_with("xref\n0 "));
        assert!(text.ends_with("%%EOF"));
    }

    #[test]
    fn title_lands_in_info_dictionary() {
        let options = PdfOptions {
            document_title: Some("Job Order PO-118".to_string()),
        };
        let (bytes, _) = write(&one_page_document(vec![]), &options);
        assert_eq!(count_token(&bytes, b"/Title (Job Order PO-118)"), 1);
        assert_eq!(count_token(&bytes, b"/DisplayDocTitle true"), 1);
        assert_eq!(count_token(&bytes, b"/Producer (joborder)"), 1);
    }

    #[test]
    fn translucent_image_gets_soft_mask() {
        let image = LogoSource::Bytes(png_fixture(2, 2, 100)).decode().expect("png");
        let mut doc = one_page_document(vec![Command::DrawImage {
            x: Pt::from_f32(10.0),
            y: Pt::from_f32(10.0),
            width: Pt::from_f32(35.0),
            height: Pt::from_f32(35.0),
            resource_id: "Im1".to_string(),
        }]);
        doc.images.insert("Im1".to_string(), image);
        let (bytes, _) = write(&doc, &PdfOptions::default());
        assert_eq!(count_token(&bytes, b"/SMask "), 1);
        assert_eq!(count_token(&bytes, b"/XObject << /Im1 "), 1);
        assert_eq!(count_token(&bytes, b"35 0 0 35 10 10 cm\n/Im1 Do"), 1);
    }

    #[test]
    fn unknown_image_resource_is_not_drawn() {
        let doc = one_page_document(vec![Command::DrawImage {
            x: Pt::ZERO,
            y: Pt::ZERO,
            width: Pt::from_f32(1.0),
            height: Pt::from_f32(1.0),
            resource_id: "Im9".to_string(),
        }]);
        let (bytes, _) = write(&doc, &PdfOptions::default());
        assert_eq!(count_token(&bytes, b" Do\n"), 0);
        assert_eq!(count_token(&bytes, b"/XObject"), 0);
    }

    #[test]
    fn link_summary_reaches_debug_log() {
        let path = temp_log_path("pdf_link");
        let logger = Arc::new(DebugLogger::new(&path).expect("log"));
        let mut out = Vec::new();
        document_to_pdf_to_writer(
            &one_page_document(vec![]),
            &fonts(),
            &PdfOptions::default(),
            Some(logger.clone()),
            &mut out,
        )
        .expect("pdf");
        logger.flush();
        let content = std::fs::read_to_string(&path).expect("read log");
        assert!(content.contains("\"type\":\"pdf.link\""));
        assert!(content.contains("\"fonts\":2"));
        let _ = std::fs::remove_file(path);
    }
}
