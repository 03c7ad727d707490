//! Printable month statement.
//!
//! The statement is laid out on A4 pages in millimetres measured from the
//! top-left corner (text starts 10 mm in, lines advance by 8 mm, a new page
//! starts once the cursor passes 270 mm) and then written as a plain PDF 1.4
//! file using the built-in Helvetica font.

use super::format::format_amount;
use crate::core::services::MemberRoster;
use crate::core::{MonthKey, MonthView};

const LEFT_MM: f64 = 10.0;
const TITLE_Y_MM: f64 = 10.0;
const TOP_MM: f64 = 20.0;
const LINE_STEP_MM: f64 = 8.0;
const SECTION_GAP_MM: f64 = 10.0;
const PAGE_BREAK_MM: f64 = 270.0;

const PAGE_WIDTH_PT: f64 = 595.28;
const PAGE_HEIGHT_PT: f64 = 841.89;
const PT_PER_MM: f64 = 72.0 / 25.4;
const FONT_SIZE_PT: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PdfLine {
    pub x_mm: f64,
    pub y_mm: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub lines: Vec<PdfLine>,
}

struct Cursor {
    pages: Vec<PdfPage>,
    y: f64,
}

impl Cursor {
    fn put(&mut self, y_mm: f64, text: String) {
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PdfLine {
                x_mm: LEFT_MM,
                y_mm,
                text,
            });
        }
    }

    /// Writes a line at the cursor and advances, breaking the page when full.
    fn line(&mut self, text: String) {
        self.put(self.y, text);
        self.y += LINE_STEP_MM;
        if self.y > PAGE_BREAK_MM {
            self.pages.push(PdfPage::default());
            self.y = TOP_MM;
        }
    }
}

/// `expense-summary-<Month>-<Year>.pdf`
pub fn pdf_file_name(month: &MonthKey) -> String {
    format!("expense-summary-{}.pdf", month.label().replace(' ', "-"))
}

/// Places every statement line on its page.
pub fn layout_summary(view: &MonthView, roster: &MemberRoster, currency: &str) -> Vec<PdfPage> {
    let mut cursor = Cursor {
        pages: vec![PdfPage::default()],
        y: TOP_MM,
    };
    cursor.put(
        TITLE_Y_MM,
        format!("Expense Summary for {}", view.month.label()),
    );

    for expense in &view.expenses {
        cursor.line(format!(
            "{}: {} - {} ({})",
            expense.date,
            expense.description,
            format_amount(currency, expense.amount),
            roster.name_of(expense.paid_by)
        ));
    }

    cursor.y += SECTION_GAP_MM;
    cursor.put(cursor.y, "Summary:".to_string());
    cursor.y += SECTION_GAP_MM;

    for summary in &view.settlement.summaries {
        cursor.line(format!(
            "{}: Paid {}, Share {}, Will Pay {}, Will Receive {}",
            summary.name,
            format_amount(currency, summary.total_paid),
            format_amount(currency, summary.share),
            format_amount(currency, summary.will_pay),
            format_amount(currency, summary.will_receive)
        ));
    }

    let total = format_amount(currency, view.settlement.total);
    cursor.put(cursor.y, format!("Total Expense: {total}"));
    cursor.pages
}

/// Lays out and serializes the statement.
pub fn render_summary_pdf(view: &MonthView, roster: &MemberRoster, currency: &str) -> Vec<u8> {
    write_pdf(&layout_summary(view, roster, currency))
}

fn write_pdf(pages: &[PdfPage]) -> Vec<u8> {
    // 1: catalog, 2: page tree, 3: font, then a page and its content per page.
    let page_ids: Vec<usize> = (0..pages.len()).map(|index| 4 + index * 2).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH_PT} {PAGE_HEIGHT_PT}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            id + 1
        ));
        let content = page_content(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }

    let xref_start = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
        objects.len() + 1
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

fn page_content(page: &PdfPage) -> String {
    let mut content = String::new();
    for line in &page.lines {
        content.push_str(&format!(
            "BT /F1 {FONT_SIZE_PT} Tf {:.2} {:.2} Td ({}) Tj ET\n",
            line.x_mm * PT_PER_MM,
            PAGE_HEIGHT_PT - line.y_mm * PT_PER_MM,
            escape_text(&line.text)
        ));
    }
    content
}

/// PDF string literal body. Latin-1 characters are octal-escaped; anything
/// outside it cannot be shown by the base font and becomes `?`.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            _ if (c as u32) < 256 => escaped.push_str(&format!("\\{:03o}", c as u32)),
            _ => escaped.push('?'),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Session;
    use crate::domain::ExpenseDraft;
    use crate::storage::{MemoryStore, SplitStore};
    use chrono::NaiveDate;

    fn session_with(count: usize) -> Session {
        let mut session = Session::open(SplitStore::new(MemoryStore::new())).unwrap();
        let payer = session.members()[0].id;
        for day in 0..count {
            let date = NaiveDate::from_ymd_opt(2024, 3, 1 + (day % 28) as u32).unwrap();
            session
                .add_expense(ExpenseDraft::new(date, "Snacks", 10.0, payer))
                .unwrap();
        }
        session
    }

    #[test]
    fn short_statement_fits_one_page() {
        let session = session_with(2);
        let view = session.month_view(MonthKey::new(2024, 2).unwrap());
        let pages = layout_summary(&view, session.roster(), "Rs.");
        assert_eq!(pages.len(), 1);

        let lines = &pages[0].lines;
        assert_eq!(lines[0].text, "Expense Summary for March 2024");
        assert_eq!(lines[0].y_mm, 10.0);
        assert_eq!(lines[1].y_mm, 20.0);
        assert!(lines[1].text.ends_with("Snacks - Rs. 10 (Member 1)"));
        assert_eq!(lines[3].text, "Summary:");
        assert_eq!(lines[3].y_mm, 46.0);
        assert_eq!(
            lines[4].text,
            "Member 1: Paid Rs. 20, Share Rs. 5, Will Pay Rs. 0, Will Receive Rs. 15"
        );
        assert_eq!(lines.last().unwrap().text, "Total Expense: Rs. 20");
    }

    #[test]
    fn long_statement_breaks_after_270mm() {
        let session = session_with(40);
        let view = session.month_view(MonthKey::new(2024, 2).unwrap());
        let pages = layout_summary(&view, session.roster(), "Rs.");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 33);
        assert!(pages[0].lines.iter().all(|line| line.y_mm <= PAGE_BREAK_MM));
        assert_eq!(pages[1].lines[0].y_mm, TOP_MM);
    }

    #[test]
    fn rendered_file_has_consistent_cross_reference() {
        let session = session_with(40);
        let view = session.month_view(MonthKey::new(2024, 2).unwrap());
        let bytes = render_summary_pdf(&view, session.roster(), "Rs.");
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("(Expense Summary for March 2024) Tj"));

        let start: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|line| line.parse().ok())
            .unwrap();
        assert!(text[start..].starts_with("xref"));
    }

    #[test]
    fn text_is_escaped_for_pdf_strings() {
        assert_eq!(escape_text("a (b) \\ c"), "a \\(b\\) \\\\ c");
        assert_eq!(escape_text("café"), "caf\\351");
        assert_eq!(escape_text("₹"), "?");
    }

    #[test]
    fn file_name_uses_month_label() {
        let month = MonthKey::new(2024, 2).unwrap();
        assert_eq!(pdf_file_name(&month), "expense-summary-March-2024.pdf");
    }
}
