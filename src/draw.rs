use crate::canvas::Canvas;
use crate::debug::{DefectKind, DefectLog};
use crate::font::{FontRegistry, FontWeight};
use crate::text::{self, DEFAULT_MAX_CHARS};
use crate::types::{Color, Pt, Rect};

pub(crate) const BORDER_WIDTH: f32 = 0.5;
pub(crate) const TICK_WIDTH: f32 = 0.8;
pub(crate) const CHECKBOX_WIDTH: f32 = 12.0;
pub(crate) const CHECKBOX_HEIGHT: f32 = 8.0;
pub(crate) const LINE_PITCH: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

/// How one text run is drawn: a single face at a fixed size, no wrapping.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextStyle {
    pub(crate) size: f32,
    pub(crate) weight: FontWeight,
    pub(crate) align: Align,
    pub(crate) max_chars: usize,
    pub(crate) max_lines: Option<usize>,
}

impl TextStyle {
    pub(crate) fn regular(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            align: Align::Left,
            max_chars: DEFAULT_MAX_CHARS,
            max_lines: None,
        }
    }

    pub(crate) fn bold(size: f32) -> Self {
        Self {
            weight: FontWeight::Bold,
            ..Self::regular(size)
        }
    }

    pub(crate) fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    // No fixed element is right-aligned yet.
    #[allow(dead_code)]
    pub(crate) fn right_aligned(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub(crate) fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub(crate) fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }
}

/// Stateless drawing primitives over one page of the canvas.
///
/// Every primitive restates the graphics state it needs; the canvas drops the
/// redundant changes. Text that cannot be measured is skipped and recorded as a
/// defect, so no primitive ever fails.
pub(crate) struct Painter<'a> {
    canvas: &'a mut Canvas,
    fonts: &'a FontRegistry,
    defects: &'a mut DefectLog,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        canvas: &'a mut Canvas,
        fonts: &'a FontRegistry,
        defects: &'a mut DefectLog,
    ) -> Self {
        Self {
            canvas,
            fonts,
            defects,
        }
    }

    pub(crate) fn defects(&mut self) -> &mut DefectLog {
        self.defects
    }

    pub(crate) fn canvas(&mut self) -> &mut Canvas {
        self.canvas
    }

    /// Draws `value` with its first baseline at `y`. `x` is the left edge, the
    /// center for centered text, or the right edge for right-aligned text.
    pub(crate) fn text(&mut self, x: f32, y: f32, value: Option<&str>, style: TextStyle) {
        let prepared = text::prepare(value, style.max_chars);
        if prepared.is_empty() {
            return;
        }
        let mut lines: Vec<&str> = prepared.split('\n').collect();
        let max_lines = style.max_lines.unwrap_or(usize::MAX);
        if lines.len() > max_lines {
            let dropped = lines.len() - max_lines;
            lines.truncate(max_lines);
            self.defects.record(
                DefectKind::TextLinesDropped,
                &format!("text at ({x}, {y})"),
                format!("{dropped} line(s) do not fit"),
            );
        }

        let size = Pt::from_f32(style.size);
        let mut widest = Pt::ZERO;
        for line in &lines {
            match self.fonts.measure_text_width(style.weight, size, line) {
                Ok(width) => widest = widest.max(width),
                Err(missing) => {
                    self.defects.record(
                        DefectKind::MissingGlyph,
                        &format!("text at ({x}, {y})"),
                        missing.to_string(),
                    );
                    return;
                }
            }
        }

        let origin_x = match style.align {
            Align::Left => Pt::from_f32(x),
            Align::Center => Pt::from_f32(x) - widest.mul_ratio(1, 2),
            Align::Right => Pt::from_f32(x) - widest,
        };
        self.canvas.set_fill_color(Color::BLACK);
        self.canvas.set_font(style.weight);
        self.canvas.set_font_size(size);
        let pitch = style.size * LINE_PITCH;
        for (idx, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = Pt::from_f32(y - pitch * idx as f32);
            self.canvas.draw_string(origin_x, baseline, *line);
        }
    }

    /// Unfilled outline, 0.5 stroke.
    pub(crate) fn boxed(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.canvas.set_stroke_color(Color::BLACK);
        self.canvas.set_line_width(Pt::from_f32(BORDER_WIDTH));
        self.canvas.rectangle(Rect::new(x, y, width, height));
        self.canvas.stroke();
    }

    /// Flat gray fill with no border.
    pub(crate) fn filled_box(&mut self, x: f32, y: f32, width: f32, height: f32, shade: f32) {
        self.canvas.set_fill_color(Color::gray(shade));
        self.canvas.rectangle(Rect::new(x, y, width, height));
        self.canvas.fill();
    }

    pub(crate) fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.stroke_segment(x1, y1, x2, y2, BORDER_WIDTH);
    }

    /// The diagonal selection mark for a checkbox whose lower-left corner is `(x, y)`.
    pub(crate) fn tick(&mut self, x: f32, y: f32) {
        self.stroke_segment(
            x + 3.0,
            y + 2.0,
            x + CHECKBOX_WIDTH - 3.0,
            y + CHECKBOX_HEIGHT - 2.0,
            TICK_WIDTH,
        );
    }

    /// A 12x8 checkbox, ticked when `checked`.
    pub(crate) fn checkbox(&mut self, x: f32, y: f32, checked: bool) {
        self.boxed(x, y, CHECKBOX_WIDTH, CHECKBOX_HEIGHT);
        if checked {
            self.tick(x, y);
        }
    }

    pub(crate) fn image(&mut self, rect: Rect, resource_id: &str) {
        self.canvas.draw_image(rect, resource_id);
    }

    fn stroke_segment(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.canvas.set_stroke_color(Color::BLACK);
        self.canvas.set_line_width(Pt::from_f32(width));
        self.canvas.move_to(Pt::from_f32(x1), Pt::from_f32(y1));
        self.canvas.line_to(Pt::from_f32(x2), Pt::from_f32(y2));
        self.canvas.stroke();
    }
}
