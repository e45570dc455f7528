use std::{fs, path::Path};

use crate::{
    errors::{LedgerError, Result},
    ledger::Ledger,
    storage::paths::ensure_dir,
};

use super::table::{format_money, format_quantity};

pub const DEFAULT_REPORT_TITLE: &str = "Renovation Budget";
const DEFAULT_LINES_PER_PAGE: usize = 60;
const PAGE_BREAK: char = '\u{0C}';

/// Byte encoding of the rendered document.
///
/// Latin-1 is the strict mode: any glyph above U+00FF fails the export with
/// `ExportResource` instead of being silently replaced. The euro sign is
/// the usual casualty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageEncoding {
    #[default]
    Utf8,
    Latin1,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub currency_symbol: String,
    pub lines_per_page: usize,
    pub encoding: PageEncoding,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.into(),
            currency_symbol: "€".into(),
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            encoding: PageEncoding::Utf8,
        }
    }
}

/// Renders the printable document: title, then a three-line paragraph per
/// entry in ledger order, paginated with form feeds after
/// `lines_per_page` lines.
pub fn render(ledger: &Ledger, options: &ReportOptions) -> String {
    let lines_per_page = options.lines_per_page.max(1);
    let symbol = options.currency_symbol.as_str();

    let mut lines: Vec<String> = Vec::new();
    lines.push(options.title.clone());
    lines.push(String::new());
    for entry in ledger.entries() {
        lines.push(format!(
            "Room: {} | Category: {} | Subcategory: {}",
            entry.room, entry.category, entry.subcategory
        ));
        lines.push(format!(
            "Product: {} | Quantity: {} {}",
            entry.product,
            format_quantity(entry.quantity),
            entry.unit_type.label()
        ));
        lines.push(format!(
            "Unit price: {} {} | Total cost: {} {}",
            format_money(entry.unit_price),
            symbol,
            format_money(entry.total_cost),
            symbol
        ));
        lines.push(String::new());
    }
    while lines.last().map(String::is_empty) == Some(true) {
        lines.pop();
    }

    let mut output = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            if index % lines_per_page == 0 {
                output.push(PAGE_BREAK);
            } else {
                output.push('\n');
            }
        }
        output.push_str(line);
    }
    output
}

/// Produces the final byte stream for the chosen encoding.
pub fn encode(text: &str, encoding: PageEncoding) -> Result<Vec<u8>> {
    match encoding {
        PageEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        PageEncoding::Latin1 => {
            let mut bytes = Vec::with_capacity(text.len());
            for ch in text.chars() {
                let code = ch as u32;
                if code > 0xFF {
                    return Err(LedgerError::ExportResource(format!(
                        "character `{}` (U+{:04X}) is not representable in Latin-1 output",
                        ch, code
                    )));
                }
                bytes.push(code as u8);
            }
            Ok(bytes)
        }
    }
}

pub fn write_report_file(ledger: &Ledger, options: &ReportOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let bytes = encode(&render(ledger, options), options.encoding)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ItemDraft, UnitKind};

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .add(
                ItemDraft::new("Kitchen", "Floors", "Tile", UnitKind::Length, 25.0)
                    .with_subcategory("Parquet")
                    .with_quantity(10.0),
            )
            .expect("add entry");
        ledger
    }

    #[test]
    fn report_lists_each_entry_as_a_paragraph() {
        let text = render(&sample_ledger(), &ReportOptions::default());
        assert!(text.starts_with("Renovation Budget"));
        assert!(text.contains("Room: Kitchen | Category: Floors | Subcategory: Parquet"));
        assert!(text.contains("Product: Tile | Quantity: 10 Meters (m)"));
        assert!(text.contains("Unit price: 25.00 € | Total cost: 250.00 €"));
    }

    #[test]
    fn paragraphs_follow_ledger_order() {
        let mut ledger = sample_ledger();
        ledger
            .add(
                ItemDraft::new("Bathroom", "Walls", "Paint", UnitKind::Count, 12.0)
                    .with_subcategory("Ceramic"),
            )
            .expect("add entry");
        let text = render(&ledger, &ReportOptions::default());
        let kitchen = text.find("Room: Kitchen").expect("first entry");
        let bathroom = text.find("Room: Bathroom").expect("second entry");
        assert!(kitchen < bathroom);
    }

    #[test]
    fn long_reports_break_into_pages() {
        let mut ledger = Ledger::new();
        for index in 0..4 {
            ledger
                .add(
                    ItemDraft::new("Kitchen", "Floors", format!("Tile {index}"), UnitKind::Piece, 5.0)
                        .with_subcategory("Parquet"),
                )
                .expect("add entry");
        }

        let options = ReportOptions {
            lines_per_page: 5,
            ..ReportOptions::default()
        };
        let text = render(&ledger, &options);
        let pages: Vec<&str> = text.split(PAGE_BREAK).collect();
        // Title + blank + four 4-line paragraphs minus the trailing blank
        // is 17 lines, which paginates at five lines into four pages.
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].lines().count(), 5);
    }

    #[test]
    fn empty_ledger_renders_title_only() {
        let text = render(&Ledger::new(), &ReportOptions::default());
        assert_eq!(text, "Renovation Budget");
    }

    #[test]
    fn latin1_rejects_the_euro_sign() {
        let text = render(&sample_ledger(), &ReportOptions::default());
        let err = encode(&text, PageEncoding::Latin1).unwrap_err();
        assert!(matches!(err, LedgerError::ExportResource(message) if message.contains("20AC")));
    }

    #[test]
    fn latin1_accepts_latin1_safe_symbols() {
        let options = ReportOptions {
            currency_symbol: "£".into(),
            encoding: PageEncoding::Latin1,
            ..ReportOptions::default()
        };
        let text = render(&sample_ledger(), &options);
        let bytes = encode(&text, PageEncoding::Latin1).expect("encode");
        // Single byte per character, pound sign at 0xA3.
        assert_eq!(bytes.len(), text.chars().count());
        assert!(bytes.contains(&0xA3));
    }

    #[test]
    fn utf8_passes_the_euro_through() {
        let text = render(&sample_ledger(), &ReportOptions::default());
        let bytes = encode(&text, PageEncoding::Utf8).expect("encode");
        assert_eq!(bytes, text.as_bytes());
    }
}
