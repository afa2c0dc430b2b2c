//! # Report Layout
//!
//! Places every line of the annual report on A4 pages. Coordinates are in
//! millimetres from the top-left corner, with `y` on the text baseline.
//!
//! ## Page Plan
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │ FAGAFIJO                  20 │   │ Détail des Ventes        20  │
//! │ Rapport Annuel ...        35 │   │ Quotidiennes                 │
//! │ Année / Date de génération   │   │ Date  Brute  Hon.  Nette 35  │
//! │ Résumé Annuel             80 │   │ 05/01/2025 ...           43  │
//! │   4 summary lines   95..125  │   │ ...  (8mm step)              │
//! │ Détail Mensuel           145 │   │                              │
//! │ Mois Brutes Hon. Nettes J 160│   │                              │
//! │   one row per month (10mm)   │   │                              │
//! └──────────────────────────────┘   └──────────────────────────────┘
//!   rows past y=270 continue on a new page at y=20
//! ```

use chrono::NaiveDate;
use ventes_core::calendar::format_date_fr;
use ventes_core::{format_amount, MonthlySummary, SaleRecord, Totals};

/// A4 width in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;

/// A4 height in millimetres.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Rows whose baseline would pass this line move to a new page.
pub const PAGE_BOTTOM_MM: f32 = 270.0;

/// Baseline of the first row on a continuation page.
pub const PAGE_TOP_MM: f32 = 20.0;

const LEFT_MM: f32 = 20.0;
const MONTH_ROW_STEP_MM: f32 = 10.0;
const DETAIL_ROW_STEP_MM: f32 = 8.0;

const MONTH_COLUMNS: [f32; 5] = [20.0, 60.0, 110.0, 150.0, 190.0];
const DETAIL_COLUMNS: [f32; 4] = [20.0, 60.0, 110.0, 150.0];

// =============================================================================
// Document Model
// =============================================================================

/// Font weight of a text item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub weight: FontWeight,
    pub text: String,
}

/// One page of the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPage {
    pub items: Vec<TextItem>,
}

impl ReportPage {
    /// Finds the first item with exactly this text.
    pub fn find(&self, text: &str) -> Option<&TextItem> {
        self.items.iter().find(|item| item.text == text)
    }
}

/// A laid-out report, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub pages: Vec<ReportPage>,
}

/// Everything the layout needs.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    /// Heading printed at the top of the first page.
    pub title: &'a str,
    pub year: i32,
    pub generated_on: NaiveDate,
    pub totals: Totals,
    /// The 12 monthly summaries of `year`.
    pub monthly: &'a [MonthlySummary],
    /// Every record, in collection order.
    pub records: &'a [SaleRecord],
}

// =============================================================================
// Page Writer
// =============================================================================

/// Tracks the current page and font, the way a drawing context would.
struct PageWriter {
    pages: Vec<ReportPage>,
    size_pt: f32,
    weight: FontWeight,
}

impl PageWriter {
    fn new() -> Self {
        PageWriter {
            pages: vec![ReportPage::default()],
            size_pt: 12.0,
            weight: FontWeight::Regular,
        }
    }

    fn font(&mut self, size_pt: f32, weight: FontWeight) {
        self.size_pt = size_pt;
        self.weight = weight;
    }

    fn size(&mut self, size_pt: f32) {
        self.size_pt = size_pt;
    }

    fn weight(&mut self, weight: FontWeight) {
        self.weight = weight;
    }

    fn add_page(&mut self) {
        self.pages.push(ReportPage::default());
    }

    fn text(&mut self, x_mm: f32, y_mm: f32, text: impl Into<String>) {
        let item = TextItem {
            x_mm,
            y_mm,
            size_pt: self.size_pt,
            weight: self.weight,
            text: text.into(),
        };
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    /// Advances to the next row, breaking the page when it would overflow.
    fn next_row(&mut self, y_mm: f32, step_mm: f32) -> f32 {
        let y = y_mm + step_mm;
        if y > PAGE_BOTTOM_MM {
            self.add_page();
            PAGE_TOP_MM
        } else {
            y
        }
    }

    fn finish(self) -> ReportDocument {
        ReportDocument { pages: self.pages }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Lays out the annual report.
///
/// ## Sections
/// 1. Header: title, subtitle, year, generation date
/// 2. `Résumé Annuel`: gross, fee, net totals and the number of days
/// 3. `Détail Mensuel`: 12 rows, 5 columns
/// 4. `Détail des Ventes Quotidiennes`: one row per record, on a fresh page,
///    only when there is at least one record
pub fn build_report(input: &ReportInput<'_>) -> ReportDocument {
    let mut w = PageWriter::new();

    w.font(24.0, FontWeight::Bold);
    w.text(LEFT_MM, 20.0, input.title);

    w.font(18.0, FontWeight::Regular);
    w.text(LEFT_MM, 35.0, "Rapport Annuel des Ventes Quotidiennes");

    w.size(12.0);
    w.text(LEFT_MM, 50.0, format!("Année: {}", input.year));
    w.text(
        LEFT_MM,
        60.0,
        format!("Date de génération: {}", format_date_fr(input.generated_on)),
    );

    w.font(14.0, FontWeight::Bold);
    w.text(LEFT_MM, 80.0, "Résumé Annuel");

    w.font(10.0, FontWeight::Regular);
    let totals = &input.totals;
    w.text(
        LEFT_MM,
        95.0,
        format!("Total des ventes brutes: {}", format_amount(totals.total)),
    );
    w.text(
        LEFT_MM,
        105.0,
        format!("Total des honoraires: {}", format_amount(totals.honoraire_total)),
    );
    w.text(
        LEFT_MM,
        115.0,
        format!("Total des ventes nettes: {}", format_amount(totals.net_total)),
    );
    w.text(
        LEFT_MM,
        125.0,
        format!("Nombre de jours avec ventes: {}", totals.days_with_sales),
    );

    w.font(12.0, FontWeight::Bold);
    w.text(LEFT_MM, 145.0, "Détail Mensuel");

    let mut y = 160.0;
    w.font(9.0, FontWeight::Bold);
    for (x, label) in MONTH_COLUMNS
        .iter()
        .zip(["Mois", "Ventes Brutes", "Honoraires", "Ventes Nettes", "Jours"])
    {
        w.text(*x, y, label);
    }

    w.weight(FontWeight::Regular);
    for month in input.monthly {
        y = w.next_row(y, MONTH_ROW_STEP_MM);
        w.text(MONTH_COLUMNS[0], y, month.month.as_str());
        w.text(MONTH_COLUMNS[1], y, format_amount(month.total));
        w.text(MONTH_COLUMNS[2], y, format_amount(month.honoraire_total));
        w.text(MONTH_COLUMNS[3], y, format_amount(month.net_total));
        w.text(MONTH_COLUMNS[4], y, month.days.to_string());
    }

    if !input.records.is_empty() {
        w.add_page();
        w.font(14.0, FontWeight::Bold);
        w.text(LEFT_MM, 20.0, "Détail des Ventes Quotidiennes");

        // header keeps the bold weight, only the size changes
        y = 35.0;
        w.size(9.0);
        for (x, label) in DETAIL_COLUMNS
            .iter()
            .zip(["Date", "Vente Brute", "Honoraire", "Vente Nette"])
        {
            w.text(*x, y, label);
        }

        w.weight(FontWeight::Regular);
        for sale in input.records {
            y = w.next_row(y, DETAIL_ROW_STEP_MM);
            w.text(DETAIL_COLUMNS[0], y, format_date_fr(sale.date));
            w.text(DETAIL_COLUMNS[1], y, format_amount(sale.amount));
            w.text(DETAIL_COLUMNS[2], y, format_amount(sale.honoraire_amount));
            w.text(DETAIL_COLUMNS[3], y, format_amount(sale.net_amount));
        }
    }

    w.finish()
}

/// File name of the exported report: `<prefix>-<year>.pdf`.
pub fn report_file_name(prefix: &str, year: i32) -> String {
    format!("{prefix}-{year}.pdf")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Days;
    use ventes_core::aggregate::{monthly_summaries, totals};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn layout(records: &[SaleRecord]) -> ReportDocument {
        let monthly = monthly_summaries(records, 2025);
        build_report(&ReportInput {
            title: "FAGAFIJO",
            year: 2025,
            generated_on: date(2025, 12, 31),
            totals: totals(records),
            monthly: &monthly,
            records,
        })
    }

    #[test]
    fn test_header_and_summary() {
        let records = vec![
            SaleRecord::new(date(2025, 1, 5), 50.0),
            SaleRecord::new(date(2025, 3, 15), 100.0),
        ];
        let doc = layout(&records);
        let first = &doc.pages[0];

        let title = first.find("FAGAFIJO").unwrap();
        assert_eq!((title.y_mm, title.size_pt), (20.0, 24.0));
        assert_eq!(title.weight, FontWeight::Bold);

        assert!(first.find("Année: 2025").is_some());
        assert!(first.find("Date de génération: 31/12/2025").is_some());
        assert!(first.find("Total des ventes brutes: 150.00 $").is_some());
        assert!(first.find("Total des honoraires: 30.00 $").is_some());
        assert!(first.find("Total des ventes nettes: 120.00 $").is_some());
        assert_eq!(first.find("Nombre de jours avec ventes: 2").unwrap().y_mm, 125.0);
    }

    #[test]
    fn test_december_row_overflows_to_second_page() {
        let doc = layout(&[]);

        // 160 + 11 * 10 = 270 still fits, the twelfth row does not
        let novembre = doc.pages[0].find("Novembre").unwrap();
        assert_eq!(novembre.y_mm, 270.0);

        assert_eq!(doc.pages.len(), 2);
        let decembre = doc.pages[1].find("Décembre").unwrap();
        assert_eq!(decembre.y_mm, PAGE_TOP_MM);
    }

    #[test]
    fn test_empty_collection_has_no_detail_section() {
        let doc = layout(&[]);
        assert!(doc
            .pages
            .iter()
            .all(|p| p.find("Détail des Ventes Quotidiennes").is_none()));
        assert!(doc.pages[0].find("0.00 $").is_some());
    }

    #[test]
    fn test_detail_section_starts_on_new_page() {
        let records = vec![SaleRecord::new(date(2025, 1, 5), 50.0)];
        let doc = layout(&records);

        assert_eq!(doc.pages.len(), 3);
        let detail = &doc.pages[2];
        let heading = detail.find("Détail des Ventes Quotidiennes").unwrap();
        assert_eq!((heading.y_mm, heading.size_pt), (20.0, 14.0));

        let header = detail.find("Vente Brute").unwrap();
        assert_eq!((header.y_mm, header.size_pt), (35.0, 9.0));
        assert_eq!(header.weight, FontWeight::Bold);

        let row = detail.find("05/01/2025").unwrap();
        assert_eq!(row.y_mm, 43.0);
        assert_eq!(row.weight, FontWeight::Regular);
        assert!(detail.find("50.00 $").is_some());
        assert!(detail.find("10.00 $").is_some());
        assert!(detail.find("40.00 $").is_some());
    }

    #[test]
    fn test_detail_rows_paginate() {
        let start = date(2025, 1, 1);
        let records: Vec<SaleRecord> = (0..30)
            .map(|i| SaleRecord::new(start + Days::new(i), 10.0))
            .collect();
        let doc = layout(&records);

        // 43 + 28 * 8 = 267 is the last row that fits
        assert_eq!(doc.pages.len(), 4);
        let overflow = doc.pages[3].find("30/01/2025").unwrap();
        assert_eq!(overflow.y_mm, PAGE_TOP_MM);
        assert_eq!(doc.pages[2].find("29/01/2025").unwrap().y_mm, 267.0);
    }

    #[test]
    fn test_month_row_columns() {
        let records = vec![SaleRecord::new(date(2025, 2, 3), 200.0)];
        let doc = layout(&records);
        let page = &doc.pages[0];

        let fevrier = page.find("Février").unwrap();
        let row: Vec<&TextItem> = page.items.iter().filter(|i| i.y_mm == fevrier.y_mm).collect();
        let texts: Vec<&str> = row.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Février", "200.00 $", "40.00 $", "160.00 $", "1"]);
        let xs: Vec<f32> = row.iter().map(|i| i.x_mm).collect();
        assert_eq!(xs, MONTH_COLUMNS.to_vec());
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name("rapport-ventes-quotidiennes", 2025),
            "rapport-ventes-quotidiennes-2025.pdf"
        );
    }
}
