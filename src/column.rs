//! One product column of section A.
//!
//! The column is a fixed template: every row is drawn whether or not the product
//! fills it, so its height never depends on the data. `None` draws the empty
//! template.

use crate::draw::{CHECKBOX_HEIGHT, CHECKBOX_WIDTH, Painter, TextStyle};
use crate::layout::{CONTENT_WIDTH, SMALL_SIZE, TEXT_SIZE};
use crate::model::{PackingType, ProductCategory, ProductSpec, ProductType, SupplyItem, SupplyParty, UnitType};

pub(crate) const COLUMN_WIDTH: f32 = CONTENT_WIDTH / 2.0;

const UNIT_ROW_HEIGHT: f32 = 12.0;
const SPEC_ROW_PITCH: f32 = 11.0;
const QUANTITY_ROW_PITCH: f32 = 13.0;
const REQUIREMENT_ROW_PITCH: f32 = 11.0;

struct ColumnFrame {
    inner_x: f32,
    content_width: f32,
}

struct SpecRow<'a> {
    label: &'a str,
    selected: bool,
}

/// Draws the column whose left edge is `start_x`, below `content_top`, and
/// returns the y just under its last row.
pub(crate) fn render_column(
    painter: &mut Painter<'_>,
    start_x: f32,
    content_top: f32,
    product: Option<&ProductSpec>,
) -> f32 {
    let frame = ColumnFrame {
        inner_x: start_x + 5.0,
        content_width: COLUMN_WIDTH - 10.0,
    };
    let mut cy = content_top - 10.0;

    cy = product_detail(painter, &frame, cy, product);
    cy = product_specification(painter, &frame, cy, product);
    requirements(painter, &frame, cy, product)
}

fn product_detail(painter: &mut Painter<'_>, frame: &ColumnFrame, mut cy: f32, product: Option<&ProductSpec>) -> f32 {
    let x = frame.inner_x;
    painter.text(x, cy, Some("A. PRODUCT DETAIL"), TextStyle::bold(TEXT_SIZE));
    cy -= 15.0;

    painter.text(x, cy, Some("PRODUCT NAME :"), TextStyle::regular(TEXT_SIZE));
    painter.line(x + 80.0, cy, x + frame.content_width, cy);
    painter.text(
        x + 82.0,
        cy + 2.0,
        product.map(|p| p.product_name.as_str()),
        TextStyle::regular(TEXT_SIZE),
    );
    cy -= 18.0;

    painter.text(x, cy - 6.0, Some("QUANTITY ORDER :"), TextStyle::regular(TEXT_SIZE));
    let table_x = x + 90.0;
    let table_width = frame.content_width - 90.0;
    let mut ty = cy + 4.0;
    let quantity = product.map(|p| p.order_quantity.to_string());
    for unit in UnitType::ALL {
        painter.boxed(table_x, ty - UNIT_ROW_HEIGHT, 60.0, UNIT_ROW_HEIGHT);
        painter.text(table_x + 2.0, ty - 9.0, Some(unit.label()), TextStyle::regular(TEXT_SIZE));
        painter.boxed(table_x + 60.0, ty - UNIT_ROW_HEIGHT, table_width - 60.0, UNIT_ROW_HEIGHT);
        if product.and_then(|p| p.unit_type.as_ref()) == Some(unit) {
            painter.text(table_x + 65.0, ty - 9.0, quantity.as_deref(), TextStyle::regular(TEXT_SIZE));
        }
        ty -= UNIT_ROW_HEIGHT;
    }
    ty - 12.0
}

fn product_specification(
    painter: &mut Painter<'_>,
    frame: &ColumnFrame,
    mut cy: f32,
    product: Option<&ProductSpec>,
) -> f32 {
    let x = frame.inner_x;
    painter.text(x, cy, Some("B. PRODUCT SPECIFICATION (PLEASE TICK /)"), TextStyle::bold(TEXT_SIZE));
    cy -= 12.0;

    let categories: Vec<SpecRow<'_>> = ProductCategory::ALL
        .iter()
        .filter(|c| **c != ProductCategory::Others)
        .map(|c| SpecRow {
            label: c.label(),
            selected: product.is_some_and(|p| p.has_category(c)),
        })
        .collect();
    let others = (
        product.is_some_and(|p| p.has_category(&ProductCategory::Others)),
        product.and_then(|p| p.categories_others.as_deref()),
    );
    cy = spec_group(painter, frame, cy, "PRODUCT CATEGORY", &categories, Some(others));

    let types: Vec<SpecRow<'_>> = ProductType::ALL
        .iter()
        .map(|t| SpecRow {
            label: t.label(),
            selected: product.is_some_and(|p| p.has_product_type(t)),
        })
        .collect();
    cy = spec_group(painter, frame, cy, "PRODUCT TYPE", &types, None);

    let packing: Vec<SpecRow<'_>> = PackingType::ALL
        .iter()
        .filter(|t| **t != PackingType::Others)
        .map(|t| SpecRow {
            label: t.label(),
            selected: product.is_some_and(|p| p.has_packing_type(t)),
        })
        .collect();
    let others = (
        product.is_some_and(|p| p.has_packing_type(&PackingType::Others)),
        product.and_then(|p| p.packing_types_others.as_deref()),
    );
    cy = spec_group(painter, frame, cy, "PACKING TYPE", &packing, Some(others));

    cy -= 2.0;
    painter.text(x, cy, Some("WEIGHT / ITEM"), TextStyle::regular(TEXT_SIZE));
    painter.boxed(x + 95.0, cy - 2.0, frame.content_width - 95.0, 11.0);
    painter.text(
        x + 98.0,
        cy + 1.0,
        product.map(|p| p.weight_per_item.as_str()),
        TextStyle::regular(TEXT_SIZE),
    );
    cy -= 15.0;

    let quantities = [
        ("QUANTITY PER BOTTLE", product.and_then(|p| p.qty_per_bottle.as_deref())),
        ("QUANTITY PER BLISTER", product.and_then(|p| p.qty_per_blister.as_deref())),
        ("QUANTITY PER BOX / SET", product.and_then(|p| p.qty_per_box_set.as_deref())),
        ("QUANTITY PER CARTON", product.and_then(|p| p.qty_per_carton.as_deref())),
    ];
    for (label, value) in quantities {
        painter.text(x, cy, Some(label), TextStyle::regular(SMALL_SIZE));
        painter.boxed(x + 115.0, cy - 2.0, frame.content_width - 115.0, 11.0);
        painter.text(x + 118.0, cy + 1.0, value, TextStyle::regular(TEXT_SIZE));
        cy -= QUANTITY_ROW_PITCH;
    }
    cy
}

/// One labelled checkbox group; `others` adds the trailing "Others :" row with
/// its qualifier line. Returns the y where the next group starts.
fn spec_group(
    painter: &mut Painter<'_>,
    frame: &ColumnFrame,
    cy: f32,
    label: &str,
    rows: &[SpecRow<'_>],
    others: Option<(bool, Option<&str>)>,
) -> f32 {
    painter.text(frame.inner_x, cy, Some(label), TextStyle::regular(TEXT_SIZE));
    let bx = frame.inner_x + 95.0;
    let bw = frame.content_width - 95.0;
    let mut by = cy + 2.0;
    for row in rows {
        painter.checkbox(bx, by - CHECKBOX_HEIGHT, row.selected);
        painter.text(
            bx + CHECKBOX_WIDTH + 5.0,
            by - CHECKBOX_HEIGHT + 1.0,
            Some(row.label),
            TextStyle::regular(SMALL_SIZE),
        );
        by -= SPEC_ROW_PITCH;
    }
    if let Some((selected, qualifier)) = others {
        painter.checkbox(bx, by - CHECKBOX_HEIGHT, selected);
        if selected {
            painter.text(
                bx + CHECKBOX_WIDTH + 40.0,
                by - CHECKBOX_HEIGHT + 1.0,
                qualifier,
                TextStyle::regular(SMALL_SIZE),
            );
        }
        painter.text(
            bx + CHECKBOX_WIDTH + 5.0,
            by - CHECKBOX_HEIGHT + 1.0,
            Some("Others :"),
            TextStyle::regular(SMALL_SIZE),
        );
        painter.line(bx + CHECKBOX_WIDTH + 35.0, by - 9.0, bx + bw, by - 9.0);
        by -= SPEC_ROW_PITCH;
    }
    by - 4.0
}

fn requirements(painter: &mut Painter<'_>, frame: &ColumnFrame, mut cy: f32, product: Option<&ProductSpec>) -> f32 {
    let x = frame.inner_x;
    cy -= 5.0;
    painter.text(x, cy, Some("C. REQUIREMENT (PLEASE TICK /)"), TextStyle::bold(TEXT_SIZE));
    cy -= 10.0;

    let customer_x = x + 85.0;
    let halagel_x = x + 85.0 + 55.0 + 5.0;
    let mut last_row = cy;
    for item in SupplyItem::ALL {
        let chosen = product.and_then(|p| p.supply_source.get(item));
        painter.text(x, cy, Some(item.label()), TextStyle::regular(SMALL_SIZE));
        for (party, box_x) in [(SupplyParty::Customer, customer_x), (SupplyParty::Halagel, halagel_x)] {
            painter.checkbox(box_x, cy - 2.0, chosen == Some(party));
            painter.text(
                box_x + CHECKBOX_WIDTH + 5.0,
                cy + 1.0,
                Some(party.label()),
                TextStyle::regular(SMALL_SIZE),
            );
        }
        last_row = cy;
        cy -= REQUIREMENT_ROW_PITCH;
    }
    last_row - 8.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::testkit::*;
    use crate::layout::MARGIN;
    use crate::model::SupplySource;

    const TOP: f32 = 600.0;

    fn sample() -> ProductSpec {
        let mut supply = SupplySource::default();
        supply.set(SupplyItem::RawMaterial, Some(SupplyParty::Customer));
        supply.set(SupplyItem::Others, Some(SupplyParty::Halagel));
        ProductSpec {
            order_quantity: 5000,
            unit_type: Some(UnitType::Box),
            categories: vec![ProductCategory::Others],
            categories_others: Some("Pet Care".to_string()),
            product_types: vec![ProductType::Softgel, ProductType::Unrecognized("Gummy".to_string())],
            packing_types: vec![PackingType::AmberGlassBottle],
            weight_per_item: "500mg".to_string(),
            qty_per_carton: Some("48".to_string()),
            supply_source: supply,
            ..ProductSpec::new("Omega 3")
        }
    }

    #[test]
    fn column_height_does_not_depend_on_data() {
        let mut filled = 0.0;
        let mut blank = 0.0;
        paint(|p| filled = render_column(p, MARGIN, TOP, Some(&sample())));
        paint(|p| blank = render_column(p, MARGIN, TOP, None));
        assert_eq!(filled, blank);
        assert!(close(TOP - filled, 507.0));
    }

    #[test]
    fn ticks_follow_selections() {
        let (commands, _) = paint(|p| {
            render_column(p, MARGIN, TOP, Some(&sample()));
        });
        // Others category, softgel, amber glass, raw material customer, others halagel.
        assert_eq!(tick_origins(&commands).len(), 5);
    }

    #[test]
    fn blank_template_has_no_ticks_and_no_values() {
        let (commands, _) = paint(|p| {
            render_column(p, MARGIN, TOP, None);
        });
        assert!(tick_origins(&commands).is_empty());
        let drawn = strings(&commands);
        assert!(drawn.contains(&"A. PRODUCT DETAIL".to_string()));
        assert!(drawn.contains(&"INSERT:".to_string()));
        assert!(!drawn.iter().any(|s| s == "0"));
    }

    #[test]
    fn quantity_lands_in_the_matching_unit_row() {
        let (commands, _) = paint(|p| {
            render_column(p, MARGIN, TOP, Some(&sample()));
        });
        let (_, box_row_y) = string_at(&commands, "Box").expect("box row label");
        let (qty_x, qty_y) = string_at(&commands, "5000").expect("quantity");
        assert!(close(qty_y, box_row_y));
        assert!(close(qty_x, MARGIN + 5.0 + 90.0 + 65.0));
    }

    #[test]
    fn product_type_group_has_no_others_row() {
        let mut product = sample();
        product.product_types_others = Some("Chewable".to_string());
        let (commands, _) = paint(|p| {
            render_column(p, MARGIN, TOP, Some(&product));
        });
        assert!(!strings(&commands).contains(&"Chewable".to_string()));
    }

    #[test]
    fn others_qualifier_printed_only_when_ticked() {
        let (commands, _) = paint(|p| {
            render_column(p, MARGIN, TOP, Some(&sample()));
        });
        let drawn = strings(&commands);
        assert!(drawn.contains(&"Pet Care".to_string()));

        let mut unticked = sample();
        unticked.categories.clear();
        let (commands, _) = paint(|p| {
            render_column(p, MARGIN, TOP, Some(&unticked));
        });
        assert!(!strings(&commands).contains(&"Pet Care".to_string()));
    }

    #[test]
    fn supply_ticks_are_radio() {
        let (commands, _) = paint(|p| {
            render_column(p, MARGIN, TOP, Some(&sample()));
        });
        let ticks = tick_origins(&commands);
        let customer_x = MARGIN + 5.0 + 85.0;
        let halagel_x = MARGIN + 5.0 + 145.0;
        let customer: Vec<_> = ticks.iter().filter(|(x, _)| close(*x, customer_x)).collect();
        let halagel: Vec<_> = ticks.iter().filter(|(x, _)| close(*x, halagel_x)).collect();
        assert_eq!(customer.len(), 1);
        assert_eq!(halagel.len(), 1);
        assert!(customer[0].1 > halagel[0].1);
    }
}
