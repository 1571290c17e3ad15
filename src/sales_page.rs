use crate::assets::LogoSource;
use crate::column::render_column;
use crate::debug::DefectKind;
use crate::draw::{CHECKBOX_HEIGHT, CHECKBOX_WIDTH, Painter, TextStyle};
use crate::layout::{
    BAND_SHADE, CONTENT_WIDTH, HEADER_SIZE, LOGO_HEIGHT, LOGO_RESOURCE, MARGIN, PAGE_HEIGHT, PAGE_WIDTH,
    SIGNATURE_HEIGHT, SMALL_SIZE, TEXT_SIZE, TITLE_SIZE, TITLE_WIDTH_APPROX,
};
use crate::model::{Company, Order, SkuType};
use crate::signature::{SignatureCell, signature_block};
use crate::types::Rect;

const HEADER_ROW_HEIGHT: f32 = 30.0;
const HEADER_LEFT_WIDTH: f32 = 340.0;
const SECTION_BAND_HEIGHT: f32 = 16.0;
const COMPANY_PITCH: f32 = 180.0;

pub(crate) struct SalesPageOptions<'a> {
    pub(crate) logo: Option<&'a LogoSource>,
    pub(crate) blank_second_column: bool,
}

/// Page 1: masthead, header block, the two product columns and the sales
/// signatures. Returns the y of the frame's bottom edge.
pub(crate) fn compose_sales_page(painter: &mut Painter<'_>, order: &Order, options: &SalesPageOptions<'_>) -> f32 {
    let mut y = PAGE_HEIGHT - 30.0;
    painter.text(
        PAGE_WIDTH / 2.0,
        y,
        Some("HALAGEL GROUP OF COMPANIES"),
        TextStyle::bold(TITLE_SIZE).centered(),
    );
    y -= 10.0;
    painter.text(PAGE_WIDTH / 2.0, y, Some("JOB ORDER"), TextStyle::bold(HEADER_SIZE).centered());
    if let Some(logo) = options.logo {
        place_logo(painter, logo, y);
    }

    y -= 25.0;
    let mut company_x = MARGIN;
    for company in Company::ALL {
        painter.checkbox(company_x, y, order.company == *company);
        painter.text(
            company_x + CHECKBOX_WIDTH + 5.0,
            y + 1.0,
            Some(company.label()),
            TextStyle::regular(SMALL_SIZE),
        );
        company_x += COMPANY_PITCH;
    }

    y -= 20.0;
    header_rows(painter, order, y);
    // The section band overlaps the lower part of the second header row.
    y -= HEADER_ROW_HEIGHT + 20.0;

    painter.filled_box(MARGIN, y - SECTION_BAND_HEIGHT, CONTENT_WIDTH, SECTION_BAND_HEIGHT, BAND_SHADE);
    painter.boxed(MARGIN, y - SECTION_BAND_HEIGHT, CONTENT_WIDTH, SECTION_BAND_HEIGHT);
    painter.text(
        PAGE_WIDTH / 2.0,
        y - 11.0,
        Some("SECTION A (To be completed by Sales Representative)"),
        TextStyle::bold(HEADER_SIZE).centered(),
    );
    let content_top = y - SECTION_BAND_HEIGHT;

    let first_end = render_column(painter, MARGIN, content_top, Some(&order.product));
    let second_end = match (&order.product2, options.blank_second_column) {
        (Some(product2), _) => render_column(painter, PAGE_WIDTH / 2.0, content_top, Some(product2)),
        (None, true) => render_column(painter, PAGE_WIDTH / 2.0, content_top, None),
        (None, false) => first_end,
    };

    let bottom = first_end.min(second_end) - SIGNATURE_HEIGHT - 10.0;
    let signature_top = bottom + SIGNATURE_HEIGHT;
    painter.boxed(MARGIN, bottom, CONTENT_WIDTH, content_top - bottom);
    painter.line(PAGE_WIDTH / 2.0, content_top, PAGE_WIDTH / 2.0, signature_top);

    signature_block(
        painter,
        bottom,
        &[
            SignatureCell {
                title: "Prepared by :",
                name: order.sales_prepared_by.as_deref(),
                date: order.sales_date.as_deref(),
            },
            SignatureCell {
                title: "Approved by :",
                name: order.sales_approved_by.as_deref(),
                date: None,
            },
            SignatureCell {
                title: "Received by :",
                name: order.sales_received_by.as_deref(),
                date: None,
            },
        ],
    );
    bottom
}

fn place_logo(painter: &mut Painter<'_>, logo: &LogoSource, title_y: f32) {
    let image = match logo.decode() {
        Ok(image) => image,
        Err(reason) => {
            painter.defects().record(DefectKind::LogoUndecodable, "logo", reason);
            return;
        }
    };
    let width = image.width as f32 * LOGO_HEIGHT / image.height as f32;
    let x = PAGE_WIDTH / 2.0 - TITLE_WIDTH_APPROX / 2.0 - width - 15.0;
    painter.canvas().register_image(LOGO_RESOURCE, image);
    painter.image(Rect::new(x, title_y - 5.0, width, LOGO_HEIGHT), LOGO_RESOURCE);
}

fn header_rows(painter: &mut Painter<'_>, order: &Order, top: f32) {
    let right_x = MARGIN + HEADER_LEFT_WIDTH;
    let right_width = CONTENT_WIDTH - HEADER_LEFT_WIDTH;

    let row_bottom = top - HEADER_ROW_HEIGHT;
    let label_y = top - 18.0;
    painter.boxed(MARGIN, row_bottom, HEADER_LEFT_WIDTH, HEADER_ROW_HEIGHT);
    painter.text(MARGIN + 5.0, label_y, Some("CUSTOMER NAME :"), TextStyle::regular(TEXT_SIZE));
    painter.text(MARGIN + 100.0, label_y, Some(order.customer_name.as_str()), TextStyle::bold(TEXT_SIZE));
    painter.boxed(right_x, row_bottom, right_width, HEADER_ROW_HEIGHT);
    painter.text(right_x + 5.0, label_y, Some("PO NUMBER :"), TextStyle::regular(TEXT_SIZE));
    painter.text(right_x + 80.0, label_y, Some(order.po_number.as_str()), TextStyle::bold(TEXT_SIZE));

    let top = row_bottom;
    let row_bottom = top - HEADER_ROW_HEIGHT;
    let label_y = top - 18.0;
    painter.boxed(MARGIN, row_bottom, HEADER_LEFT_WIDTH, HEADER_ROW_HEIGHT);
    let center_y = top - HEADER_ROW_HEIGHT / 2.0;
    let box_y = center_y - CHECKBOX_HEIGHT / 2.0;
    painter.text(MARGIN + 40.0, center_y - 3.0, Some("EXISTING SKU"), TextStyle::regular(TEXT_SIZE));
    painter.checkbox(MARGIN + 110.0, box_y, order.sku_type == SkuType::Existing);
    painter.text(MARGIN + 180.0, center_y - 3.0, Some("NEW SKU"), TextStyle::regular(TEXT_SIZE));
    painter.checkbox(MARGIN + 230.0, box_y, order.sku_type == SkuType::New);

    painter.boxed(right_x, row_bottom, right_width, HEADER_ROW_HEIGHT);
    painter.text(right_x + 5.0, label_y, Some("ESTIMATE DELIVERY DATE :"), TextStyle::regular(TEXT_SIZE));
    painter.text(right_x + 130.0, label_y, Some(order.est_delivery_date.as_str()), TextStyle::bold(TEXT_SIZE));
}
