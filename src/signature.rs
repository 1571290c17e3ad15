use crate::draw::{Painter, TextStyle};
use crate::layout::{CAPTION_SIZE, CONTENT_WIDTH, MARGIN, SIGNATURE_HEIGHT, SMALL_SIZE};

pub(crate) struct SignatureCell<'a> {
    pub(crate) title: &'a str,
    pub(crate) name: Option<&'a str>,
    pub(crate) date: Option<&'a str>,
}

/// Draws a full-width signature grid whose bottom edge is `bottom`, one equal
/// cell per entry, each with a title, a name line and a date line.
pub(crate) fn signature_block(painter: &mut Painter<'_>, bottom: f32, cells: &[SignatureCell<'_>]) {
    if cells.is_empty() {
        return;
    }
    let top = bottom + SIGNATURE_HEIGHT;
    let cell_width = CONTENT_WIDTH / cells.len() as f32;

    painter.boxed(MARGIN, bottom, CONTENT_WIDTH, SIGNATURE_HEIGHT);
    for idx in 1..cells.len() {
        let x = MARGIN + cell_width * idx as f32;
        painter.line(x, top, x, bottom);
    }

    let title_line = top - 12.0;
    let name_line = bottom + 30.0;
    let date_line = bottom + 15.0;
    for y in [title_line, name_line, date_line] {
        painter.line(MARGIN, y, MARGIN + CONTENT_WIDTH, y);
    }

    for (idx, cell) in cells.iter().enumerate() {
        let x = MARGIN + cell_width * idx as f32;
        painter.text(x + 3.0, top - 9.0, Some(cell.title), TextStyle::bold(SMALL_SIZE));
        painter.text(x + 3.0, name_line - 9.0, Some("Name :"), TextStyle::regular(CAPTION_SIZE));
        painter.text(x + 30.0, name_line - 9.0, cell.name, TextStyle::regular(SMALL_SIZE));
        painter.text(x + 3.0, date_line - 9.0, Some("Date :"), TextStyle::regular(CAPTION_SIZE));
        painter.text(x + 30.0, date_line - 9.0, cell.date, TextStyle::regular(SMALL_SIZE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::testkit::*;

    #[test]
    fn cells_split_content_width_evenly() {
        let (commands, _) = paint(|p| {
            signature_block(
                p,
                100.0,
                &[
                    SignatureCell { title: "Prepared by", name: Some("Aina"), date: Some("2024-05-02") },
                    SignatureCell { title: "Reviewed by", name: None, date: None },
                    SignatureCell { title: "Approved by", name: Some("Hakim"), date: None },
                    SignatureCell { title: "Received by", name: None, date: None },
                ],
            )
        });
        let (x, y) = string_at(&commands, "Approved by").expect("third title");
        assert!(close(x, MARGIN + 2.0 * CONTENT_WIDTH / 4.0 + 3.0));
        assert!(close(y, 161.0));
        let (x, y) = string_at(&commands, "Hakim").expect("third name");
        assert!(close(x, MARGIN + 2.0 * CONTENT_WIDTH / 4.0 + 30.0));
        assert!(close(y, 121.0));
        assert_eq!(strings(&commands).iter().filter(|s| *s == "Name :").count(), 4);
    }

    #[test]
    fn absent_names_leave_the_line_blank() {
        let (commands, _) = paint(|p| {
            signature_block(p, 100.0, &[SignatureCell { title: "Received by :", name: None, date: None }])
        });
        assert_eq!(
            strings(&commands),
            vec!["Received by :".to_string(), "Name :".to_string(), "Date :".to_string()]
        );
    }
}
