use crate::error::JobOrderError;
use crate::types::Pt;

// Advance widths (1/1000 em) for WinAnsi codes 0x20..=0x7E, from the Adobe core AFM files.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

const COURIER_WIDTHS: [u16; 95] = [600; 95];

const FIRST_CHAR: u8 = 0x20;
const LAST_CHAR: u8 = 0x7E;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// A character the face has no advance width for. Drawing code treats this as a
/// recoverable defect and skips the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingGlyph {
    pub codepoint: u32,
    pub ch: char,
    pub font: String,
}

impl std::fmt::Display for MissingGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "font {} has no glyph for U+{:04X}",
            self.font, self.codepoint
        )
    }
}

/// One of the PDF base-14 faces the engine carries metrics for.
#[derive(Debug, Clone)]
pub(crate) struct StandardFont {
    pub(crate) base_name: &'static str,
    widths: &'static [u16; 95],
}

impl StandardFont {
    pub(crate) fn resolve(name: &str) -> Option<StandardFont> {
        let normalized = name
            .trim()
            .trim_matches('"')
            .trim_matches('\'')
            .to_ascii_lowercase();
        let (base_name, widths) = match normalized.as_str() {
            "helvetica" => ("Helvetica", &HELVETICA_WIDTHS),
            "helvetica-oblique" => ("Helvetica-Oblique", &HELVETICA_WIDTHS),
            "helvetica-bold" => ("Helvetica-Bold", &HELVETICA_BOLD_WIDTHS),
            "helvetica-boldoblique" => ("Helvetica-BoldOblique", &HELVETICA_BOLD_WIDTHS),
            "courier" => ("Courier", &COURIER_WIDTHS),
            "courier-bold" => ("Courier-Bold", &COURIER_WIDTHS),
            "courier-oblique" => ("Courier-Oblique", &COURIER_WIDTHS),
            "courier-boldoblique" => ("Courier-BoldOblique", &COURIER_WIDTHS),
            _ => return None,
        };
        Some(StandardFont { base_name, widths })
    }

    fn advance_for_char(&self, ch: char) -> Option<u16> {
        let code = ch as u32;
        if code < FIRST_CHAR as u32 || code > LAST_CHAR as u32 {
            return None;
        }
        self.widths.get((code - FIRST_CHAR as u32) as usize).copied()
    }

    pub(crate) fn measure_text_width(&self, font_size: Pt, text: &str) -> Result<Pt, MissingGlyph> {
        let mut total_units: i32 = 0;
        for ch in text.chars() {
            let Some(adv) = self.advance_for_char(ch) else {
                return Err(MissingGlyph {
                    codepoint: ch as u32,
                    ch,
                    font: self.base_name.to_string(),
                });
            };
            total_units = total_units.saturating_add(adv as i32);
        }
        if total_units <= 0 {
            return Ok(Pt::ZERO);
        }
        Ok(font_size.mul_ratio(total_units, 1000))
    }
}

/// The two faces a job-order document embeds. Built once per render by the assembler.
#[derive(Debug, Clone)]
pub(crate) struct FontRegistry {
    regular: StandardFont,
    bold: StandardFont,
}

impl FontRegistry {
    pub(crate) fn embed(regular: &str, bold: &str) -> Result<Self, JobOrderError> {
        let regular = StandardFont::resolve(regular)
            .ok_or_else(|| JobOrderError::FontEmbedding(regular.to_string()))?;
        let bold = StandardFont::resolve(bold)
            .ok_or_else(|| JobOrderError::FontEmbedding(bold.to_string()))?;
        Ok(Self { regular, bold })
    }

    pub(crate) fn face(&self, weight: FontWeight) -> &StandardFont {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    /// Resource name used in content streams and the page resource dictionary.
    pub(crate) fn resource_name(weight: FontWeight) -> &'static str {
        match weight {
            FontWeight::Regular => "F1",
            FontWeight::Bold => "F2",
        }
    }

    pub(crate) fn faces(&self) -> [(FontWeight, &StandardFont); 2] {
        [
            (FontWeight::Regular, &self.regular),
            (FontWeight::Bold, &self.bold),
        ]
    }

    pub(crate) fn measure_text_width(
        &self,
        weight: FontWeight,
        font_size: Pt,
        text: &str,
    ) -> Result<Pt, MissingGlyph> {
        self.face(weight).measure_text_width(font_size, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FontRegistry {
        FontRegistry::embed("Helvetica", "Helvetica-Bold").expect("base14 faces")
    }

    #[test]
    fn measures_helvetica_with_afm_widths() {
        let fonts = registry();
        // "Box" = 667 + 556 + 500 units.
        let width = fonts
            .measure_text_width(FontWeight::Regular, Pt::from_f32(10.0), "Box")
            .expect("measurable");
        assert_eq!(width.to_milli_i64(), 17_230);
    }

    #[test]
    fn bold_face_is_wider_than_regular() {
        let fonts = registry();
        let size = Pt::from_f32(10.0);
        let regular = fonts
            .measure_text_width(FontWeight::Regular, size, "JOB ORDER")
            .expect("regular");
        let bold = fonts
            .measure_text_width(FontWeight::Bold, size, "JOB ORDER")
            .expect("bold");
        assert!(bold > regular);
    }

    #[test]
    fn reports_missing_glyph_outside_winansi_ascii() {
        let fonts = registry();
        let err = fonts
            .measure_text_width(FontWeight::Regular, Pt::from_f32(8.0), "caf\u{e9}")
            .expect_err("e-acute is not measured");
        assert_eq!(err.codepoint, 0xE9);
        assert_eq!(err.font, "Helvetica");
    }

    #[test]
    fn empty_text_has_zero_width() {
        let fonts = registry();
        let width = fonts
            .measure_text_width(FontWeight::Bold, Pt::from_f32(8.0), "")
            .expect("empty");
        assert_eq!(width, Pt::ZERO);
    }

    #[test]
    fn embedding_unknown_face_fails() {
        let err = FontRegistry::embed("Comic Sans", "Helvetica-Bold").expect_err("unknown face");
        assert!(matches!(err, JobOrderError::FontEmbedding(name) if name == "Comic Sans"));
    }

    #[test]
    fn resolves_face_names_case_insensitively() {
        let face = StandardFont::resolve(" courier-BOLD ").expect("courier bold");
        assert_eq!(face.base_name, "Courier-Bold");
        let width = face
            .measure_text_width(Pt::from_f32(10.0), "ab")
            .expect("measurable");
        assert_eq!(width.to_milli_i64(), 12_000);
    }
}
