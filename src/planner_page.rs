use crate::debug::DefectKind;
use crate::draw::{LINE_PITCH, Painter, TextStyle};
use crate::layout::{
    BAND_SHADE, CONTENT_WIDTH, HEADER_SIZE, MARGIN, MATERIAL_ROWS, PAGE_HEIGHT, PAGE_WIDTH, REMARKS_MAX_CHARS,
    SIGNATURE_HEIGHT, SMALL_SIZE, TABLE_HEADER_SHADE, TEXT_SIZE,
};
use crate::model::{FinalStatus, MaterialRow, Order};
use crate::signature::{SignatureCell, signature_block};

const COLUMN_WIDTHS: [f32; 6] = [55.0, 140.0, 85.0, 85.0, 85.0, 85.0];
const COLUMN_HEADERS: [&str; 6] = [
    "Item Code",
    "Raw @ Packaging Material",
    "Quantity Required\n(kg/pcs)",
    "Stock Balance\n(kg/pcs)",
    "Quantity to Order\n(kg/pcs)",
    "PR No",
];
const TABLE_HEADER_HEIGHT: f32 = 25.0;
const TABLE_ROW_HEIGHT: f32 = 14.0;
const REMARKS_BOX_HEIGHT: f32 = 55.0;
const STATUS_BOX_WIDTH: f32 = 16.0;
const STATUS_BOX_HEIGHT: f32 = 14.0;

/// Status checkboxes of the footer, left to right: box offset, label offset.
const STATUS_CHOICES: [(FinalStatus, f32, f32); 3] = [
    (FinalStatus::Closed, 140.0, 160.0),
    (FinalStatus::Pending, 280.0, 300.0),
    (FinalStatus::Delivered, 420.0, 440.0),
];

/// Page 2: section B header, materials table, remarks, planner signatures and
/// the status footer. Returns the y of the pending-reason line.
pub(crate) fn compose_planner_page(painter: &mut Painter<'_>, order: &Order) -> f32 {
    let mut py = PAGE_HEIGHT - 30.0;
    painter.filled_box(MARGIN, py - 18.0, CONTENT_WIDTH, 18.0, BAND_SHADE);
    painter.boxed(MARGIN, py - 18.0, CONTENT_WIDTH, 18.0);
    painter.text(
        PAGE_WIDTH / 2.0,
        py - 13.0,
        Some("SECTION B (To be completed by Planner )"),
        TextStyle::bold(HEADER_SIZE).centered(),
    );

    py -= 35.0;
    painter.text(MARGIN + 20.0, py, Some("JOB ORDER NO :"), TextStyle::bold(TEXT_SIZE));
    painter.boxed(MARGIN + 100.0, py - 5.0, 250.0, 18.0);
    painter.text(MARGIN + 105.0, py, order.job_order_no.as_deref(), TextStyle::regular(TEXT_SIZE));
    painter.text(MARGIN + 370.0, py, Some("Date:"), TextStyle::regular(TEXT_SIZE));
    painter.boxed(MARGIN + 400.0, py - 5.0, 135.0, 18.0);
    painter.text(MARGIN + 405.0, py, order.section_b_date.as_deref(), TextStyle::regular(TEXT_SIZE));

    py -= 25.0;
    py = materials_table(painter, &order.materials, py);

    py -= 10.0;
    painter.text(MARGIN, py, Some("Remarks:"), TextStyle::bold(TEXT_SIZE));
    py -= 5.0;
    painter.boxed(MARGIN, py - 50.0, CONTENT_WIDTH, REMARKS_BOX_HEIGHT);
    let first_baseline = py - 5.0;
    let remarks_lines = 1 + ((first_baseline - (py - 48.0)) / (TEXT_SIZE * LINE_PITCH)) as usize;
    painter.text(
        MARGIN + 5.0,
        first_baseline,
        order.remarks.as_deref(),
        TextStyle::regular(TEXT_SIZE)
            .max_chars(REMARKS_MAX_CHARS)
            .max_lines(remarks_lines),
    );
    py -= 60.0;

    signature_block(
        painter,
        py - SIGNATURE_HEIGHT,
        &[
            SignatureCell {
                title: "Prepared by",
                name: order.planner_prepared_by.as_deref(),
                date: order.planner_prepared_date.as_deref(),
            },
            SignatureCell {
                title: "Reviewed by",
                name: order.planner_reviewed_by.as_deref(),
                date: order.planner_reviewed_date.as_deref(),
            },
            SignatureCell {
                title: "Approved by",
                name: order.planner_approved_by.as_deref(),
                date: order.planner_approved_date.as_deref(),
            },
            SignatureCell {
                title: "Received by",
                name: order.planner_received_by.as_deref(),
                date: order.planner_received_date.as_deref(),
            },
        ],
    );
    py -= SIGNATURE_HEIGHT + 15.0;

    status_footer(painter, order, py)
}

fn materials_table(painter: &mut Painter<'_>, materials: &[MaterialRow], mut py: f32) -> f32 {
    painter.filled_box(MARGIN, py - TABLE_HEADER_HEIGHT, CONTENT_WIDTH, TABLE_HEADER_HEIGHT, TABLE_HEADER_SHADE);
    painter.boxed(MARGIN, py - TABLE_HEADER_HEIGHT, CONTENT_WIDTH, TABLE_HEADER_HEIGHT);
    let mut x = MARGIN;
    for (width, header) in COLUMN_WIDTHS.iter().zip(COLUMN_HEADERS) {
        painter.boxed(x, py - TABLE_HEADER_HEIGHT, *width, TABLE_HEADER_HEIGHT);
        painter.text(x + 3.0, py - 10.0, Some(header), TextStyle::bold(SMALL_SIZE));
        x += width;
    }
    py -= TABLE_HEADER_HEIGHT;

    if materials.len() > MATERIAL_ROWS {
        painter.defects().record(
            DefectKind::MaterialRowsOverflow,
            "materials table",
            format!("{} of {} rows not printed", materials.len() - MATERIAL_ROWS, materials.len()),
        );
    }

    for idx in 0..MATERIAL_ROWS {
        let cells = materials.get(idx).map(material_cells);
        let mut x = MARGIN;
        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            painter.boxed(x, py - TABLE_ROW_HEIGHT, *width, TABLE_ROW_HEIGHT);
            if let Some(cells) = &cells {
                painter.text(x + 3.0, py - 10.0, Some(cells[col].as_str()), TextStyle::regular(TEXT_SIZE));
            }
            x += width;
        }
        py -= TABLE_ROW_HEIGHT;
    }
    py
}

fn material_cells(row: &MaterialRow) -> [String; 6] {
    [
        row.item_code.clone(),
        row.material_name.clone(),
        format_quantity(row.qty_required()),
        format_quantity(row.stock_balance()),
        format_quantity(row.qty_to_order()),
        row.pr_no.clone(),
    ]
}

/// Shortest decimal form: 10 not 10.0, 2.5 stays 2.5.
fn format_quantity(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn status_footer(painter: &mut Painter<'_>, order: &Order, mut py: f32) -> f32 {
    painter.line(MARGIN, py, PAGE_WIDTH - MARGIN, py);
    painter.line(MARGIN, py - 2.0, PAGE_WIDTH - MARGIN, py - 2.0);

    py -= 15.0;
    painter.text(MARGIN, py, Some("Date of Job Order completion :"), TextStyle::regular(TEXT_SIZE));
    painter.boxed(MARGIN + 140.0, py - 4.0, 120.0, 14.0);
    painter.text(MARGIN + 145.0, py + 1.0, order.completion_date.as_deref(), TextStyle::regular(TEXT_SIZE));
    painter.text(MARGIN + 280.0, py, Some("Quantity delivered :"), TextStyle::regular(TEXT_SIZE));
    painter.boxed(MARGIN + 370.0, py - 4.0, 120.0, 14.0);
    painter.text(MARGIN + 375.0, py + 1.0, order.qty_delivered.as_deref(), TextStyle::regular(TEXT_SIZE));

    py -= 20.0;
    painter.text(MARGIN, py, Some("Status of Job Order:"), TextStyle::regular(TEXT_SIZE));
    for (status, box_offset, label_offset) in &STATUS_CHOICES {
        painter.boxed(MARGIN + box_offset, py - 2.0, STATUS_BOX_WIDTH, STATUS_BOX_HEIGHT);
        if order.final_status.as_ref() == Some(status) {
            painter.tick(MARGIN + box_offset, py - 2.0);
        }
        painter.text(MARGIN + label_offset, py + 2.0, Some(status.label()), TextStyle::regular(TEXT_SIZE));
    }

    py -= 20.0;
    painter.text(MARGIN, py, Some("Reason of pending :"), TextStyle::regular(TEXT_SIZE));
    painter.line(MARGIN + 100.0, py - 2.0, PAGE_WIDTH - MARGIN, py - 2.0);
    painter.text(MARGIN + 105.0, py, order.pending_reason.as_deref(), TextStyle::regular(TEXT_SIZE));
    py
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::testkit::*;
    use crate::model::{Company, ProductSpec};
    use chrono::{TimeZone, Utc};

    fn order() -> Order {
        let created = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).single().expect("timestamp");
        let mut order = Order::new("k3j9", created, Company::PlantM, ProductSpec::new("Omega 3"));
        order.job_order_no = Some("JO-2024-031".to_string());
        order
    }

    fn rows(count: usize) -> Vec<MaterialRow> {
        (0..count)
            .map(|idx| {
                let mut row = MaterialRow::new(format!("r{idx}")).with_quantities(10.0, 15.0);
                row.item_code = format!("RM-{idx:03}");
                row
            })
            .collect()
    }

    fn status_tick_offsets(commands: &[crate::canvas::Command]) -> Vec<f32> {
        // Only the footer uses 16-wide status boxes; every page-2 tick is a status tick.
        tick_origins(commands).into_iter().map(|(x, _)| x - MARGIN).collect()
    }

    #[test]
    fn material_rows_fill_in_order_then_blank() {
        let mut order = order();
        order.materials = rows(3);
        let (commands, defects) = paint(|p| {
            compose_planner_page(p, &order);
        });
        assert!(defects.is_empty());
        let codes: Vec<String> = strings(&commands).into_iter().filter(|s| s.starts_with("RM-")).collect();
        assert_eq!(codes, vec!["RM-000", "RM-001", "RM-002"]);
        let (_, first) = string_at(&commands, "RM-000").expect("row 1");
        let (_, third) = string_at(&commands, "RM-002").expect("row 3");
        assert!(close(first - third, 2.0 * TABLE_ROW_HEIGHT));
        // 10 required against 15 in stock orders nothing.
        assert!(strings(&commands).contains(&"0".to_string()));
        assert!(strings(&commands).contains(&"15".to_string()));
    }

    #[test]
    fn grid_always_has_twenty_five_rows() {
        let empty = order();
        let (commands, _) = paint(|p| {
            compose_planner_page(p, &empty);
        });
        let row_cells = commands
            .iter()
            .filter(|c| {
                matches!(c, crate::canvas::Command::Rectangle { height, .. }
                    if close(height.to_f32(), TABLE_ROW_HEIGHT))
            })
            .count();
        // Completion and delivered boxes plus the three status boxes are 14 tall as well.
        assert_eq!(row_cells, MATERIAL_ROWS * COLUMN_WIDTHS.len() + 5);
    }

    #[test]
    fn overflowing_rows_are_reported_not_printed() {
        let mut order = order();
        order.materials = rows(27);
        let (commands, defects) = paint(|p| {
            compose_planner_page(p, &order);
        });
        let codes = strings(&commands).into_iter().filter(|s| s.starts_with("RM-")).count();
        assert_eq!(codes, MATERIAL_ROWS);
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].kind, DefectKind::MaterialRowsOverflow);
    }

    #[test]
    fn pending_ticks_pending_and_prints_reason() {
        let mut order = order();
        order.final_status = Some(FinalStatus::Pending);
        order.pending_reason = Some("Awaiting bottle stock".to_string());
        let (commands, _) = paint(|p| {
            compose_planner_page(p, &order);
        });
        assert_eq!(status_tick_offsets(&commands), vec![280.0]);
        let (x, _) = string_at(&commands, "Awaiting bottle stock").expect("reason");
        assert!(close(x, MARGIN + 105.0));
    }

    #[test]
    fn closed_without_reason_leaves_line_blank() {
        let mut order = order();
        order.final_status = Some(FinalStatus::Closed);
        let (commands, _) = paint(|p| {
            compose_planner_page(p, &order);
        });
        assert_eq!(status_tick_offsets(&commands), vec![140.0]);
        let reason_y = string_at(&commands, "Reason of pending :").expect("label").1;
        let on_reason_line = commands.iter().filter(|c| {
            matches!(c, crate::canvas::Command::DrawString { y, .. } if close(y.to_f32(), reason_y))
        });
        assert_eq!(on_reason_line.count(), 1);
    }

    #[test]
    fn delivered_has_its_own_checkbox() {
        let mut order = order();
        order.final_status = Some(FinalStatus::Delivered);
        let (commands, _) = paint(|p| {
            compose_planner_page(p, &order);
        });
        assert_eq!(status_tick_offsets(&commands), vec![420.0]);
        assert!(strings(&commands).contains(&"Delivered".to_string()));
    }

    #[test]
    fn remarks_allow_long_text_but_only_lines_that_fit() {
        let mut order = order();
        order.remarks = Some(format!("{}\nsecond\nthird\nfourth\nfifth\nsixth", "x".repeat(400)));
        let (commands, defects) = paint(|p| {
            compose_planner_page(p, &order);
        });
        assert!(strings(&commands).contains(&"x".repeat(400)));
        assert!(strings(&commands).contains(&"fifth".to_string()));
        assert!(!strings(&commands).contains(&"sixth".to_string()));
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].kind, DefectKind::TextLinesDropped);
    }

    #[test]
    fn header_shows_job_order_number() {
        let (commands, _) = paint(|p| {
            compose_planner_page(p, &order());
        });
        let (x, y) = string_at(&commands, "JO-2024-031").expect("job order no");
        assert!(close(x, MARGIN + 105.0));
        assert!(close(y, PAGE_HEIGHT - 65.0));
        // Two-line headers stack.
        assert!(strings(&commands).contains(&"(kg/pcs)".to_string()));
    }

    #[test]
    fn quantities_print_without_trailing_zeroes() {
        assert_eq!(format_quantity(10.0), "10");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(-0.0), "0");
    }
}
