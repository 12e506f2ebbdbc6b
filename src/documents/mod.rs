//! PDF documents: customer invoice and vendor purchase order.
//!
//! Both are letter size and drawn with the built-in Helvetica faces.
//! Layout is expressed in points from the top-left corner and converted to
//! printpdf's bottom-left millimetre space at draw time.

use chrono::{DateTime, Datelike, Utc};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};

use crate::errors::AppError;
use crate::models::{format_money, Order, VendorSettings};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN * 2.0;
/// Rows below this line continue on a new page.
const PAGE_BREAK_Y: f32 = 700.0;

type Rgb8 = (u8, u8, u8);

const PRIMARY: Rgb8 = (11, 46, 39);
const ACCENT: Rgb8 = (65, 218, 193);
const WHITE: Rgb8 = (255, 255, 255);
const PANEL: Rgb8 = (249, 250, 251);
const MUTED: Rgb8 = (100, 100, 100);
const BODY: Rgb8 = (60, 60, 60);
const RULE: Rgb8 = (200, 200, 200);
const FOOTER_TEXT: Rgb8 = (136, 136, 136);
const WARNING_BG: Rgb8 = (254, 243, 199);
const WARNING_TEXT: Rgb8 = (146, 64, 14);
const PO_BLUE: Rgb8 = (37, 99, 235);
const PO_LIGHT: Rgb8 = (243, 244, 246);

/// Render the customer invoice for an order.
pub fn render_invoice(order: &Order, vendor: &VendorSettings) -> Result<Vec<u8>, AppError> {
    let reference = order.reference(8);
    let mut canvas = Canvas::new(&format!("Invoice {}", reference))?;

    // Header band
    canvas.fill_rect(0.0, 0.0, PAGE_WIDTH, 80.0, PRIMARY);
    canvas.text_center(&vendor.company_name, PAGE_WIDTH / 2.0, 35.0, 24.0, true, ACCENT);
    canvas.text_center(
        "Private Secure Order Invoice",
        PAGE_WIDTH / 2.0,
        55.0,
        12.0,
        false,
        WHITE,
    );

    let mut y = 100.0;

    // Invoice number and date
    canvas.fill_rect(MARGIN, y, CONTENT_WIDTH, 50.0, PANEL);
    canvas.text("Invoice #:", MARGIN + 15.0, y + 20.0, 10.0, false, MUTED);
    canvas.text("Date:", MARGIN + 15.0, y + 35.0, 10.0, false, MUTED);
    canvas.text(&reference, MARGIN + 70.0, y + 20.0, 10.0, true, PRIMARY);
    canvas.text(
        &format_date(&order.created_at, "%B %-d, %Y"),
        MARGIN + 70.0,
        y + 35.0,
        10.0,
        false,
        PRIMARY,
    );
    y += 70.0;

    // Customer block
    canvas.section_bar("Customer Information", y, PRIMARY);
    y += 35.0;
    let practice = non_empty_or(&order.practice_name, "N/A");
    canvas.text(
        &format!("Practice Name: {}", practice),
        MARGIN + 10.0,
        y,
        10.0,
        false,
        BODY,
    );
    y += 15.0;
    canvas.text(
        &format!("Name: {}", order.customer_name()),
        MARGIN + 10.0,
        y,
        10.0,
        false,
        BODY,
    );
    canvas.text(
        &format!("Email: {}", order.email),
        MARGIN + 300.0,
        y,
        10.0,
        false,
        BODY,
    );
    y += 15.0;
    canvas.text(
        &format!("Phone: {}", non_empty_or(&order.phone, "Not provided")),
        MARGIN + 10.0,
        y,
        10.0,
        false,
        BODY,
    );
    let address = order.shipping_address.one_line();
    if !address.is_empty() {
        y += 15.0;
        canvas.text(
            &fit(&format!("Shipping: {}", address), CONTENT_WIDTH - 20.0, 10.0),
            MARGIN + 10.0,
            y,
            10.0,
            false,
            BODY,
        );
    }
    y += 30.0;

    // Items table
    let price_x = MARGIN + CONTENT_WIDTH - 10.0;
    let qty_x = MARGIN + 350.0;
    let draw_item_header = |canvas: &Canvas, y: f32| {
        canvas.fill_rect(MARGIN, y, CONTENT_WIDTH, 25.0, PRIMARY);
        canvas.text("Product", MARGIN + 10.0, y + 17.0, 10.0, true, WHITE);
        canvas.text_center("Qty", qty_x, y + 17.0, 10.0, true, WHITE);
        canvas.text_right("Price", price_x, y + 17.0, 10.0, true, WHITE);
    };
    draw_item_header(&canvas, y);
    y += 30.0;

    for item in &order.items {
        if y > PAGE_BREAK_Y {
            canvas.new_page();
            y = MARGIN;
            draw_item_header(&canvas, y);
            y += 30.0;
        }
        canvas.fill_rect(MARGIN, y - 5.0, CONTENT_WIDTH, 20.0, PANEL);
        canvas.text(
            &fit(&item.name, 320.0, 10.0),
            MARGIN + 10.0,
            y + 8.0,
            10.0,
            false,
            BODY,
        );
        canvas.text_center(&item.quantity.to_string(), qty_x, y + 8.0, 10.0, false, BODY);
        canvas.text_right(
            &format!("${}", format_money(item.price)),
            price_x,
            y + 8.0,
            10.0,
            false,
            BODY,
        );
        y += 20.0;
    }

    // Totals, disclaimer and contact need roughly 200pt
    if y > PAGE_HEIGHT - 250.0 {
        canvas.new_page();
        y = MARGIN;
    }
    y += 15.0;
    canvas.hline(MARGIN + 300.0, MARGIN + CONTENT_WIDTH, y, RULE);
    y += 20.0;

    let label_x = MARGIN + 350.0;
    let total_row = |canvas: &Canvas, label: &str, amount: f64, y: &mut f32| {
        canvas.text(label, label_x, *y, 10.0, false, MUTED);
        canvas.text_right(
            &format!("${}", format_money(amount)),
            price_x,
            *y,
            10.0,
            false,
            BODY,
        );
        *y += 18.0;
    };
    total_row(&canvas, "Subtotal:", order.subtotal, &mut y);
    total_row(&canvas, "Processing Fee (5%):", order.processing_fee, &mut y);
    if order.shipping_cost > 0.0 {
        let label = if order.shipping_option.is_empty() {
            "Shipping:".to_string()
        } else {
            format!("Shipping ({}):", order.shipping_option)
        };
        total_row(&canvas, &fit(&label, 150.0, 10.0), order.shipping_cost, &mut y);
    }

    canvas.hline(MARGIN + 300.0, MARGIN + CONTENT_WIDTH, y, RULE);
    y += 20.0;
    canvas.text("Total:", label_x, y, 14.0, true, PRIMARY);
    canvas.text_right(
        &format!("${}", format_money(order.total)),
        price_x,
        y,
        14.0,
        true,
        ACCENT,
    );
    y += 40.0;

    // Disclaimer
    canvas.fill_rect(MARGIN, y, CONTENT_WIDTH, 40.0, WARNING_BG);
    canvas.text(
        "Disclaimer: Peptides are NOT FDA approved. They should be used under the",
        MARGIN + 10.0,
        y + 15.0,
        9.0,
        false,
        WARNING_TEXT,
    );
    canvas.text(
        "guidance of a medical provider.",
        MARGIN + 10.0,
        y + 28.0,
        9.0,
        false,
        WARNING_TEXT,
    );
    y += 55.0;

    canvas.text_center(
        &format!("Questions? Contact us at {}", vendor.email),
        PAGE_WIDTH / 2.0,
        y,
        10.0,
        false,
        MUTED,
    );

    // Footer band
    let footer_y = 750.0;
    canvas.fill_rect(0.0, footer_y, PAGE_WIDTH, PAGE_HEIGHT - footer_y, PRIMARY);
    canvas.text_center(
        &format!(
            "(c) {} {}. All rights reserved.",
            Utc::now().year(),
            vendor.company_name
        ),
        PAGE_WIDTH / 2.0,
        footer_y + 25.0,
        9.0,
        false,
        FOOTER_TEXT,
    );

    canvas.finish()
}

/// Render the purchase-order memo sent to the vendor for an order.
pub fn render_purchase_order(order: &Order, vendor: &VendorSettings) -> Result<Vec<u8>, AppError> {
    let mut canvas = Canvas::new(&format!("Purchase Order {}", order.reference(6)))?;
    let right = MARGIN + CONTENT_WIDTH;

    // Vendor letterhead
    let mut y = MARGIN + 10.0;
    canvas.text(&vendor.company_name, MARGIN, y, 14.0, true, PO_BLUE);
    y += 16.0;
    for line in [
        vendor.street_address.clone(),
        vendor.city_state_zip.clone(),
        format!("Phone: {}", vendor.phone),
        format!("Fax: {}", vendor.fax),
        format!("Website: {}", vendor.website),
    ] {
        canvas.text(&line, MARGIN, y, 9.0, false, MUTED);
        y += 12.0;
    }

    // Title block
    canvas.text_right("PURCHASE ORDER", right, MARGIN + 14.0, 22.0, true, PO_BLUE);
    canvas.text("DATE", right - 150.0, MARGIN + 36.0, 9.0, false, MUTED);
    canvas.text_right(
        &format_date(&order.created_at, "%m-%d-%Y"),
        right,
        MARGIN + 36.0,
        9.0,
        false,
        BODY,
    );
    canvas.text("PO #", right - 150.0, MARGIN + 50.0, 9.0, false, MUTED);
    canvas.text_right(&order.reference(6), right, MARGIN + 50.0, 9.0, false, BODY);

    y += 14.0;

    // Vendor and ship-to columns
    let half = (CONTENT_WIDTH - 32.0) / 2.0;
    let ship_x = MARGIN + half + 32.0;
    canvas.fill_rect(MARGIN, y, half, 16.0, PO_BLUE);
    canvas.fill_rect(ship_x, y, half, 16.0, PO_BLUE);
    canvas.text("VENDOR", MARGIN + 8.0, y + 11.5, 9.0, true, WHITE);
    canvas.text("SHIP TO", ship_x + 8.0, y + 11.5, 9.0, true, WHITE);
    y += 28.0;

    let vendor_lines = vec![
        vendor.company_name.clone(),
        vendor.contact_name.clone(),
        vendor.street_address.clone(),
        vendor.city_state_zip.clone(),
        format!("Phone: {}", vendor.phone),
    ];
    let address = &order.shipping_address;
    let mut ship_lines = vec![order.customer_name(), address.street.clone()];
    if let Some(street2) = address.street2.as_ref().filter(|s| !s.trim().is_empty()) {
        ship_lines.push(street2.clone());
    }
    ship_lines.push(format!("{}, {} {}", address.city, address.state, address.zip));
    ship_lines.push(format!("Phone: {}", order.phone));
    ship_lines.push(format!("Email: {}", order.email));

    let rows = vendor_lines.len().max(ship_lines.len());
    for i in 0..rows {
        if let Some(line) = vendor_lines.get(i) {
            canvas.text(&fit(line, half - 12.0, 9.0), MARGIN + 12.0, y, 9.0, false, MUTED);
        }
        if let Some(line) = ship_lines.get(i) {
            canvas.text(&fit(line, half - 12.0, 9.0), ship_x + 12.0, y, 9.0, false, MUTED);
        }
        y += 13.0;
    }
    y += 10.0;

    // Requisitioner / ship via row
    let quarter = CONTENT_WIDTH / 4.0;
    let headings = ["REQUISITIONER", "SHIP VIA", "F.O.B.", "SHIPPING TERMS"];
    canvas.fill_rect(MARGIN, y, CONTENT_WIDTH, 16.0, PO_BLUE);
    for (i, heading) in headings.iter().enumerate() {
        canvas.text(heading, MARGIN + quarter * i as f32 + 8.0, y + 11.5, 8.5, true, WHITE);
    }
    y += 16.0;
    canvas.outline_rect(MARGIN, y, CONTENT_WIDTH, 22.0, RULE);
    let ship_via = non_empty_or(&order.shipping_option, "Standard");
    canvas.text(
        &fit(&order.customer_name(), quarter - 16.0, 9.0),
        MARGIN + 8.0,
        y + 14.0,
        9.0,
        false,
        BODY,
    );
    canvas.text(
        &fit(ship_via, quarter - 16.0, 9.0),
        MARGIN + quarter + 8.0,
        y + 14.0,
        9.0,
        false,
        BODY,
    );
    y += 36.0;

    // Items table
    let cols = [MARGIN + 8.0, MARGIN + 90.0, MARGIN + 330.0, right - 90.0, right - 8.0];
    let draw_item_header = |canvas: &Canvas, y: f32| {
        canvas.fill_rect(MARGIN, y, CONTENT_WIDTH, 18.0, PO_BLUE);
        canvas.text("ITEM #", cols[0], y + 12.5, 8.5, true, WHITE);
        canvas.text("DESCRIPTION", cols[1], y + 12.5, 8.5, true, WHITE);
        canvas.text_center("QTY", cols[2], y + 12.5, 8.5, true, WHITE);
        canvas.text_right("UNIT PRICE", cols[3], y + 12.5, 8.5, true, WHITE);
        canvas.text_right("TOTAL", cols[4], y + 12.5, 8.5, true, WHITE);
    };
    draw_item_header(&canvas, y);
    y += 18.0;

    for (index, item) in order.items.iter().enumerate() {
        if y > PAGE_BREAK_Y {
            canvas.new_page();
            y = MARGIN;
            draw_item_header(&canvas, y);
            y += 18.0;
        }
        y += 16.0;
        canvas.text(&format!("[{:08}]", index + 1), cols[0], y, 9.0, false, BODY);
        canvas.text(&fit(&item.name, 220.0, 9.0), cols[1], y, 9.0, true, BODY);
        canvas.text_center(&item.quantity.to_string(), cols[2], y, 9.0, false, BODY);
        canvas.text_right(&format_money(item.unit_price()), cols[3], y, 9.0, false, BODY);
        canvas.text_right(&format_money(item.price), cols[4], y, 9.0, true, BODY);
        y += 8.0;
        canvas.hline(MARGIN, right, y, RULE);
    }

    if y > PAGE_HEIGHT - 220.0 {
        canvas.new_page();
        y = MARGIN;
    }
    y += 24.0;

    // Comments and totals side by side
    canvas.fill_rect(MARGIN, y, half, 16.0, PO_BLUE);
    canvas.text(
        "Comments or Special Instructions",
        MARGIN + 8.0,
        y + 11.5,
        8.5,
        true,
        WHITE,
    );
    canvas.outline_rect(MARGIN, y + 16.0, half, 80.0, RULE);
    let mut note_y = y + 30.0;
    for line in wrap(&order.notes, half - 16.0, 9.0).into_iter().take(5) {
        canvas.text(&line, MARGIN + 8.0, note_y, 9.0, false, BODY);
        note_y += 12.0;
    }

    let totals = [
        ("SUBTOTAL", format_money(order.subtotal)),
        ("TAX", String::new()),
        ("SHIPPING", format_money(order.shipping_cost)),
        ("OTHER", format_money(order.processing_fee)),
    ];
    let mut row_y = y;
    for (label, value) in totals {
        row_y += 18.0;
        canvas.text(label, ship_x, row_y, 9.0, false, BODY);
        canvas.text_right(&value, right, row_y, 9.0, false, BODY);
        canvas.hline(ship_x, right, row_y + 6.0, RULE);
    }
    row_y += 8.0;
    canvas.fill_rect(ship_x, row_y, half, 20.0, PO_LIGHT);
    canvas.text("TOTAL", ship_x + 4.0, row_y + 14.0, 10.0, true, BODY);
    canvas.text_right(
        &format!("$ {}", format_money(order.total)),
        right - 4.0,
        row_y + 14.0,
        10.0,
        true,
        PO_BLUE,
    );

    // Contact footer
    let footer_y = (y + 130.0).max(row_y + 50.0);
    canvas.hline(MARGIN, right, footer_y, RULE);
    canvas.text_center(
        "If you have any questions about this purchase order, please contact",
        PAGE_WIDTH / 2.0,
        footer_y + 18.0,
        9.0,
        false,
        MUTED,
    );
    canvas.text_center(
        &format!("{}, {}, {}", vendor.contact_name, vendor.phone, vendor.email),
        PAGE_WIDTH / 2.0,
        footer_y + 31.0,
        9.0,
        false,
        MUTED,
    );

    canvas.finish()
}

/// Format an RFC 3339 timestamp, falling back to the raw string.
fn format_date(timestamp: &str, pattern: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn pdf_error(err: printpdf::Error) -> AppError {
    tracing::error!("PDF error: {:?}", err);
    AppError::Internal(format!("Failed to render PDF: {}", err))
}

fn color((r, g, b): Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// Approximate Helvetica advance width in points.
fn text_width(text: &str, size: f32) -> f32 {
    let units: f32 = text
        .chars()
        .map(|c| match c {
            ' ' | ',' | '.' | ':' | ';' | '!' | '|' | 'i' | 'j' | 'l' | 'I' | '[' | ']' | '(' | ')' => 278.0,
            'f' | 't' | 'r' | '-' => 333.0,
            'm' | 'M' | 'W' => 833.0,
            'w' => 722.0,
            '0'..='9' | '$' | '#' | 'a'..='z' => 556.0,
            'A'..='Z' => 667.0,
            _ => 600.0,
        })
        .sum();
    units * size / 1000.0
}

/// Truncate text with "..." so it fits `max_width`.
fn fit(text: &str, max_width: f32, size: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        out.push(c);
        if text_width(&out, size) + text_width("...", size) > max_width {
            out.pop();
            break;
        }
    }
    format!("{}...", out.trim_end())
}

/// Greedy word wrap to `max_width`.
fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, size) > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current = fit(word, max_width, size);
            } else {
                current = fit(&candidate, max_width, size);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Drawing surface with top-left point coordinates.
struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Canvas {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn text(&self, text: &str, x: f32, y: f32, size: f32, bold: bool, rgb: Rgb8) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color(rgb));
        self.layer
            .use_text(text, size, mm(x), mm(PAGE_HEIGHT - y), font);
    }

    fn text_right(&self, text: &str, x: f32, y: f32, size: f32, bold: bool, rgb: Rgb8) {
        self.text(text, x - text_width(text, size), y, size, bold, rgb);
    }

    fn text_center(&self, text: &str, x: f32, y: f32, size: f32, bold: bool, rgb: Rgb8) {
        self.text(text, x - text_width(text, size) / 2.0, y, size, bold, rgb);
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, rgb: Rgb8) {
        self.layer.set_fill_color(color(rgb));
        self.layer.add_rect(Rect::new(
            mm(x),
            mm(PAGE_HEIGHT - y - height),
            mm(x + width),
            mm(PAGE_HEIGHT - y),
        ));
    }

    fn outline_rect(&self, x: f32, y: f32, width: f32, height: f32, rgb: Rgb8) {
        let (top, bottom) = (PAGE_HEIGHT - y, PAGE_HEIGHT - y - height);
        self.layer.set_outline_color(color(rgb));
        self.layer.set_outline_thickness(0.75);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(mm(x), mm(top)), false),
                (Point::new(mm(x + width), mm(top)), false),
                (Point::new(mm(x + width), mm(bottom)), false),
                (Point::new(mm(x), mm(bottom)), false),
            ],
            is_closed: true,
        });
    }

    fn hline(&self, x1: f32, x2: f32, y: f32, rgb: Rgb8) {
        self.layer.set_outline_color(color(rgb));
        self.layer.set_outline_thickness(0.75);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(mm(x1), mm(PAGE_HEIGHT - y)), false),
                (Point::new(mm(x2), mm(PAGE_HEIGHT - y)), false),
            ],
            is_closed: false,
        });
    }

    fn section_bar(&self, title: &str, y: f32, rgb: Rgb8) {
        self.fill_rect(MARGIN, y, CONTENT_WIDTH, 25.0, rgb);
        self.text(title, MARGIN + 10.0, y + 17.0, 11.0, true, WHITE);
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, OrderStatus, ShippingAddress};

    fn order(item_count: usize) -> Order {
        let items = (0..item_count)
            .map(|i| OrderItem {
                product_id: None,
                name: format!("Peptide blend number {}", i + 1),
                quantity: 2,
                price: 90.0,
            })
            .collect::<Vec<_>>();
        let subtotal = 90.0 * item_count as f64;
        Order {
            id: "0f8fad5b-d9cb-469f-a165-70867728950e".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            title: "Dr.".to_string(),
            practice_name: "Analytical Clinic".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            shipping_address: ShippingAddress {
                street: "1 Main St".to_string(),
                street2: Some("Suite 4".to_string()),
                city: "Austin".to_string(),
                state: "TX".to_string(),
                zip: "78701".to_string(),
                country: "USA".to_string(),
            },
            shipping_option: "Express".to_string(),
            shipping_cost: 15.0,
            items,
            subtotal,
            processing_fee: subtotal * 0.05,
            total: subtotal * 1.05 + 15.0,
            status: OrderStatus::Pending,
            payment_link: None,
            notes: "Please ship in cold packs. Leave at the front desk if nobody answers."
                .to_string(),
            referral: String::new(),
            created_at: "2024-03-05T10:00:00+00:00".to_string(),
            updated_at: "2024-03-05T10:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_invoice_is_pdf() {
        let bytes = render_invoice(&order(3), &VendorSettings::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_purchase_order_is_pdf() {
        let bytes = render_purchase_order(&order(3), &VendorSettings::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_orders_span_pages() {
        let short = render_invoice(&order(1), &VendorSettings::default()).unwrap();
        let long = render_invoice(&order(60), &VendorSettings::default()).unwrap();
        assert!(long.len() > short.len());
        assert!(render_purchase_order(&order(60), &VendorSettings::default()).is_ok());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date("2024-03-05T10:00:00+00:00", "%m-%d-%Y"),
            "03-05-2024"
        );
        assert_eq!(
            format_date("2024-03-05T10:00:00+00:00", "%B %-d, %Y"),
            "March 5, 2024"
        );
        assert_eq!(format_date("yesterday", "%m-%d-%Y"), "yesterday");
    }

    #[test]
    fn test_fit_truncates_long_text() {
        let fitted = fit(&"W".repeat(100), 100.0, 10.0);
        assert!(fitted.ends_with("..."));
        assert!(text_width(&fitted, 10.0) <= 100.0);
        assert_eq!(fit("short", 100.0, 10.0), "short");
    }

    #[test]
    fn test_wrap_splits_on_words() {
        let lines = wrap("alpha beta gamma delta", 60.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width(l, 10.0) <= 60.0));
    }
}
