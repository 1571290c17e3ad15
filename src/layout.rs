//! Fixed page geometry shared by both composers. All values are points in PDF
//! user space (origin bottom-left).

pub(crate) const PAGE_WIDTH: f32 = 595.28;
pub(crate) const PAGE_HEIGHT: f32 = 841.89;
pub(crate) const MARGIN: f32 = 30.0;
pub(crate) const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

pub(crate) const TEXT_SIZE: f32 = 8.0;
pub(crate) const SMALL_SIZE: f32 = 7.0;
pub(crate) const CAPTION_SIZE: f32 = 6.0;
pub(crate) const HEADER_SIZE: f32 = 10.0;
pub(crate) const TITLE_SIZE: f32 = 11.0;

pub(crate) const BAND_SHADE: f32 = 0.9;
pub(crate) const TABLE_HEADER_SHADE: f32 = 0.85;

pub(crate) const SIGNATURE_HEIGHT: f32 = 70.0;

pub(crate) const REMARKS_MAX_CHARS: usize = 1000;
pub(crate) const MATERIAL_ROWS: usize = 25;

pub(crate) const LOGO_RESOURCE: &str = "Im1";
pub(crate) const LOGO_HEIGHT: f32 = 35.0;
// Approximate title width the logo sits to the left of.
pub(crate) const TITLE_WIDTH_APPROX: f32 = 190.0;
