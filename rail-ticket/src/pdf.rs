use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, LineDashPattern, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb, TextMatrix,
};

use crate::document::{TicketDocument, LEGAL_NOTICE, PASSENGER_COLUMNS, SIGNATURE};
use crate::{TicketError, TicketResult};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
/// Space kept free at the bottom of each page for the footer
const FOOTER_HEIGHT: f32 = 30.0;
const LINE_HEIGHT: f32 = 6.0;
const TABLE_COLUMNS: [f32; 5] = [20.0, 88.0, 104.0, 124.0, 164.0];
const BARCODE_WIDTH: f32 = 62.0;
const BARCODE_HEIGHT: f32 = 14.0;
const QR_SIZE: f32 = 42.0;

fn pdf_err(e: printpdf::Error) -> TicketError {
    TicketError::Pdf(format!("{:?}", e))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn watermark_grey() -> Color {
    Color::Rgb(Rgb::new(0.88, 0.88, 0.88, None))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Vertical cursor over a growing set of A4 pages.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    fonts: &'a Fonts,
    ticket: &'a TicketDocument,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference, fonts: &'a Fonts, ticket: &'a TicketDocument) -> Self {
        let cursor = Self {
            doc,
            fonts,
            ticket,
            layer,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        };
        cursor.decorate_page();
        cursor
    }

    /// Start a new page unless `height` still fits above the footer.
    fn ensure(&mut self, height: f32) {
        if self.y - height >= MARGIN + FOOTER_HEIGHT {
            return;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", self.pages));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.decorate_page();
    }

    /// Watermark and footer go on every page.
    fn decorate_page(&self) {
        let layer = &self.layer;

        layer.set_fill_color(watermark_grey());
        layer.begin_text_section();
        layer.set_font(&self.fonts.bold, 54.0);
        layer.set_text_matrix(TextMatrix::TranslateRotate(Mm(38.0).into(), Mm(95.0).into(), 35.0));
        layer.write_text(self.ticket.watermark.clone(), &self.fonts.bold);
        layer.end_text_section();

        layer.set_fill_color(black());
        layer.use_text(SIGNATURE, 9.0, Mm(150.0), Mm(MARGIN + 16.0), &self.fonts.bold);
        let mut y = MARGIN + 8.0;
        for notice in LEGAL_NOTICE {
            layer.use_text(notice, 7.0, Mm(MARGIN), Mm(y), &self.fonts.regular);
            y -= 4.0;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn dashed_divider(&mut self) {
        self.ensure(LINE_HEIGHT);
        self.layer.set_outline_color(black());
        self.layer.set_outline_thickness(0.6);
        self.layer.set_line_dash_pattern(LineDashPattern {
            dash_1: Some(3),
            gap_1: Some(2),
            ..Default::default()
        });
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
        });
        self.layer.set_line_dash_pattern(LineDashPattern::default());
        self.y -= LINE_HEIGHT;
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32) {
        self.layer.add_rect(Rect::new(Mm(x), Mm(y), Mm(x + width), Mm(y + height)));
    }
}

/// Draw a laid-out ticket onto A4 pages and return the PDF bytes.
pub fn write_pdf(ticket: &TicketDocument) -> TicketResult<Vec<u8>> {
    let (doc, _) = draw(ticket)?;
    doc.save_to_bytes().map_err(pdf_err)
}

/// Returns the document together with the number of pages used.
fn draw(ticket: &TicketDocument) -> TicketResult<(PdfDocumentReference, usize)> {
    let (doc, page, layer) = PdfDocument::new(ticket.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
    let doc = doc.with_document_id(format!("ticket-{}", ticket.pnr));
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
    };

    let pages = {
        let first_layer = doc.get_page(page).get_layer(layer);
        let mut cursor = PageCursor::new(&doc, first_layer, &fonts, ticket);

        draw_header(&mut cursor);
        cursor.dashed_divider();
        draw_passengers(&mut cursor);
        cursor.dashed_divider();
        draw_fares(&mut cursor);
        draw_qr(&mut cursor);
        cursor.pages
    };

    Ok((doc, pages))
}

fn draw_header(cursor: &mut PageCursor<'_>) {
    let ticket = cursor.ticket;
    cursor.text(&ticket.title, 16.0, MARGIN, true);
    cursor.y -= LINE_HEIGHT * 2.0;

    // Barcode sits to the right of the details block
    let bar_top = cursor.y;
    let module = BARCODE_WIDTH / ticket.barcode.len() as f32;
    let bar_x = PAGE_WIDTH - MARGIN - BARCODE_WIDTH;
    cursor.layer.set_fill_color(black());
    for (start, width) in ticket.barcode.bars() {
        cursor.fill_rect(
            bar_x + start as f32 * module,
            bar_top - BARCODE_HEIGHT,
            width as f32 * module,
            BARCODE_HEIGHT,
        );
    }

    for (label, value) in &ticket.fields {
        cursor.text(label, 9.0, MARGIN, true);
        cursor.text(value, 9.0, MARGIN + 32.0, false);
        cursor.y -= LINE_HEIGHT;
    }
}

fn draw_passengers(cursor: &mut PageCursor<'_>) {
    let header = |cursor: &mut PageCursor<'_>| {
        for (title, x) in PASSENGER_COLUMNS.iter().zip(TABLE_COLUMNS) {
            cursor.text(title, 9.0, x, true);
        }
        cursor.y -= LINE_HEIGHT;
    };

    let ticket = cursor.ticket;
    cursor.ensure(LINE_HEIGHT * 2.0);
    header(cursor);

    for row in &ticket.passenger_rows {
        let pages_before = cursor.pages;
        cursor.ensure(LINE_HEIGHT);
        if cursor.pages != pages_before {
            header(cursor);
        }
        for (cell, x) in row.iter().zip(TABLE_COLUMNS) {
            cursor.text(cell, 9.0, x, false);
        }
        cursor.y -= LINE_HEIGHT;
    }
}

fn draw_fares(cursor: &mut PageCursor<'_>) {
    let ticket = cursor.ticket;
    cursor.ensure(LINE_HEIGHT * ticket.fare_lines.len() as f32);
    for line in &ticket.fare_lines {
        cursor.text(&line.label, 10.0, 110.0, line.emphasized);
        cursor.text(&line.amount, 10.0, 165.0, line.emphasized);
        cursor.y -= LINE_HEIGHT;
    }
}

fn draw_qr(cursor: &mut PageCursor<'_>) {
    cursor.ensure(QR_SIZE + LINE_HEIGHT);
    let qr = &cursor.ticket.qr;
    let module = QR_SIZE / qr.width() as f32;
    let top = cursor.y;

    cursor.layer.set_fill_color(black());
    for y in 0..qr.width() {
        for x in 0..qr.width() {
            if qr.is_dark(x, y) {
                cursor.fill_rect(
                    MARGIN + x as f32 * module,
                    top - (y + 1) as f32 * module,
                    module,
                    module,
                );
            }
        }
    }
    cursor.y -= QR_SIZE + LINE_HEIGHT;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::{booking, fare, party, passengers};

    #[test]
    fn test_writes_a_pdf() {
        let ticket = TicketDocument::assemble(Some(&booking()), &passengers(), &fare(), "E-TICKET").unwrap();
        let bytes = write_pdf(&ticket).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_short_ticket_fits_one_page() {
        let ticket = TicketDocument::assemble(Some(&booking()), &passengers(), &fare(), "E-TICKET").unwrap();
        let (_, pages) = draw(&ticket).unwrap();
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_full_party_fits_one_page() {
        let ticket = TicketDocument::assemble(Some(&booking()), &party(6), &fare(), "E-TICKET").unwrap();
        let (_, pages) = draw(&ticket).unwrap();
        assert_eq!(pages, 1);
    }

    fn canvas(ticket: &TicketDocument) -> (PdfDocumentReference, PdfLayerReference, Fonts) {
        let (doc, page, layer) = PdfDocument::new(ticket.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica).unwrap(),
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).unwrap(),
        };
        let layer = doc.get_page(page).get_layer(layer);
        (doc, layer, fonts)
    }

    #[test]
    fn test_ensure_breaks_only_above_the_footer() {
        let ticket = TicketDocument::assemble(Some(&booking()), &passengers(), &fare(), "E-TICKET").unwrap();
        let (doc, layer, fonts) = canvas(&ticket);
        let mut cursor = PageCursor::new(&doc, layer, &fonts, &ticket);

        cursor.y = MARGIN + FOOTER_HEIGHT + LINE_HEIGHT;
        cursor.ensure(LINE_HEIGHT);
        assert_eq!(cursor.pages, 1, "an exact fit stays on the page");

        cursor.ensure(LINE_HEIGHT + 0.5);
        assert_eq!(cursor.pages, 2);
        assert_eq!(cursor.y, PAGE_HEIGHT - MARGIN);
    }

    #[test]
    fn test_passenger_table_repeats_header_on_new_page() {
        let ticket = TicketDocument::assemble(Some(&booking()), &party(6), &fare(), "E-TICKET").unwrap();
        let (doc, layer, fonts) = canvas(&ticket);
        let mut cursor = PageCursor::new(&doc, layer, &fonts, &ticket);

        // Room for the header and two rows
        cursor.y = MARGIN + FOOTER_HEIGHT + LINE_HEIGHT * 3.0;
        draw_passengers(&mut cursor);

        assert_eq!(cursor.pages, 2);
        // Second page holds a fresh header plus the remaining four rows
        assert_eq!(cursor.y, PAGE_HEIGHT - MARGIN - LINE_HEIGHT * 5.0);
    }
}
